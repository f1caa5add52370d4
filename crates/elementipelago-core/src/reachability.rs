//! Explorable/exhausted classification of the player's drawer.
//!
//! `received` and `sent` only ever grow. After either changes the caller runs
//! [`Reachability::recompute`], which rebuilds the derived sets from scratch
//! with one pass over the recipe index. Recompute is a pure function of
//! `(received, sent, recipes, compounds_are_ingredients)`, so replaying the
//! same inventory always lands in the same state.

use crate::element::Element;
use crate::recipe::RecipeIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Drawer state of one session.
///
/// Only `received`, `sent`, and the ingredient flag are persisted; the
/// derived sets are empty after deserialization until the next recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reachability {
    compounds_are_ingredients: bool,
    received: BTreeSet<Element>,
    sent: BTreeSet<Element>,
    #[serde(skip)]
    drawer: BTreeSet<Element>,
    #[serde(skip)]
    explorable: BTreeSet<Element>,
    #[serde(skip)]
    exhausted: BTreeSet<Element>,
}

impl Reachability {
    pub fn new(compounds_are_ingredients: bool) -> Self {
        Self {
            compounds_are_ingredients,
            received: BTreeSet::new(),
            sent: BTreeSet::new(),
            drawer: BTreeSet::new(),
            explorable: BTreeSet::new(),
            exhausted: BTreeSet::new(),
        }
    }

    // -- Inventory API --

    /// Record an element handed to the player. Returns `true` if it is new.
    pub fn receive(&mut self, element: Element) -> bool {
        self.received.insert(element)
    }

    /// Record an element whose location has been checked. Returns `true` if
    /// it is new.
    pub fn mark_sent(&mut self, element: Element) -> bool {
        self.sent.insert(element)
    }

    /// Rebuild drawer, explorable, and exhausted sets.
    ///
    /// A drawer element is explorable when it forms a pair, with another
    /// drawer element, that still has an output outside `sent`. Every other
    /// drawer element is exhausted, including one whose only partners have
    /// not been received yet.
    pub fn recompute(&mut self, recipes: &RecipeIndex) {
        self.drawer = if self.compounds_are_ingredients {
            self.received.union(&self.sent).copied().collect()
        } else {
            self.received.clone()
        };

        self.explorable.clear();
        self.exhausted = self.drawer.clone();

        for (pair, outputs) in recipes.iter() {
            let (a, b) = (pair.first(), pair.second());
            if !self.drawer.contains(&a) || !self.drawer.contains(&b) {
                continue;
            }
            if outputs.iter().any(|o| !self.sent.contains(o)) {
                self.explorable.insert(a);
                self.explorable.insert(b);
                self.exhausted.remove(&a);
                self.exhausted.remove(&b);
            }
        }

        log::debug!(
            "recomputed drawer: {} elements, {} explorable, {} exhausted",
            self.drawer.len(),
            self.explorable.len(),
            self.exhausted.len()
        );
    }

    // -- Query API --

    pub fn is_explorable(&self, element: &Element) -> bool {
        self.explorable.contains(element)
    }

    pub fn is_exhausted(&self, element: &Element) -> bool {
        self.exhausted.contains(element)
    }

    pub fn in_drawer(&self, element: &Element) -> bool {
        self.drawer.contains(element)
    }

    pub fn received(&self) -> &BTreeSet<Element> {
        &self.received
    }

    pub fn sent(&self) -> &BTreeSet<Element> {
        &self.sent
    }

    pub fn drawer(&self) -> &BTreeSet<Element> {
        &self.drawer
    }

    pub fn explorable(&self) -> &BTreeSet<Element> {
        &self.explorable
    }

    pub fn exhausted(&self) -> &BTreeSet<Element> {
        &self.exhausted
    }

    /// Outputs of drawer pairs that have not been sent yet: what the player
    /// could discover right now.
    pub fn discoverable(&self, recipes: &RecipeIndex) -> BTreeSet<Element> {
        recipes
            .iter()
            .filter(|(pair, _)| self.drawer.contains(&pair.first()) && self.drawer.contains(&pair.second()))
            .flat_map(|(_, outputs)| outputs.iter().copied())
            .filter(|o| !self.sent.contains(o))
            .collect()
    }
}
