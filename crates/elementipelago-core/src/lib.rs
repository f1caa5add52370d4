//! Elementipelago Core -- recipe graph generation and drawer reachability.
//!
//! This crate generates the deterministic recipe graph an Elementipelago room
//! is played on, and tracks which of a player's elements can still lead to a
//! discovery as items arrive and locations are checked.
//!
//! # Pipeline
//!
//! 1. **Generate** -- [`graph::build_graph`] grows a layered DAG of
//!    placements from the room seed using [`rng::GraphRng`], and derives the
//!    [`recipe::RecipeIndex`] and the ingredient catalog from it.
//! 2. **Replay** -- [`session::Session::start`] applies the room snapshot
//!    (items received, locations checked, locations still missing).
//! 3. **Track** -- every later event updates the append-only inventory sets
//!    and triggers a full [`reachability::Reachability::recompute`].
//! 4. **Goal** -- once every intermediate location is checked, the session
//!    emits [`session::SessionEvent::GoalReached`] exactly once.
//!
//! # Key Types
//!
//! - [`element::Element`] -- typed element id with wire-name and location-id
//!   round-trips.
//! - [`graph::Graph`] -- placement sequence, recipe index, and catalog.
//! - [`recipe::RecipeIndex`] -- unordered ingredient pair to ordered outputs.
//! - [`reachability::Reachability`] -- drawer, explorable, and exhausted sets.
//! - [`session::Session`] -- event-driven glue for the multiplayer client.

pub mod element;
pub mod goal;
pub mod graph;
pub mod reachability;
pub mod recipe;
pub mod rng;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
