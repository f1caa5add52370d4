//! Procedural recipe graph generation.
//!
//! The graph is grown in layers from a handful of free start elements. Every
//! new element is produced by a pair of already-placed elements, so the
//! placement sequence is a DAG by construction: ingredient slots always point
//! backward.
//!
//! Generation is a pure function of [`GraphConfig`]. Every client in a room
//! regenerates the same graph from the room's seed, so the order of RNG draws
//! below is part of the contract.

use crate::element::{Element, ElementKind};
use crate::recipe::RecipeIndex;
use crate::rng::GraphRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Draws allowed when choosing the kind of a new element.
pub const KIND_ATTEMPT_LIMIT: u32 = 100;

/// Draws allowed when choosing an unused ingredient pair.
pub const PAIR_ATTEMPT_LIMIT: u32 = 100_000;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort graph construction. No partial graph is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("{start_items} start items requested but only {inputs} inputs exist")]
    TooManyStartItems { start_items: u32, inputs: u32 },

    #[error("no start items to combine, {remaining} elements left to place")]
    NoStartItems { remaining: u32 },

    #[error("unsatisfiable configuration: no placeable kind for slot {slot} after {attempts} draws")]
    Unsatisfiable { slot: u32, attempts: u32 },

    #[error("no unused ingredient pair among {placed} placed elements after {attempts} draws")]
    PairsExhausted { placed: u32, attempts: u32 },
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Position in the placement sequence. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(pub u32);

/// A placement: two earlier slots combining into `output`, or a free start
/// element when `ingredients` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub ingredients: Option<(SlotId, SlotId)>,
    pub output: Element,
}

impl Edge {
    pub fn kind(&self) -> ElementKind {
        self.output.kind
    }

    /// Whether this is a start element handed out for free.
    pub fn is_given(&self) -> bool {
        self.ingredients.is_none()
    }
}

/// Parameters for [`build_graph`]. Fixed for a session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub seed: u64,
    pub inputs: u32,
    pub outputs: u32,
    pub intermediates: u32,
    pub start_items: u32,
    pub compounds_are_ingredients: bool,
}

impl GraphConfig {
    pub fn build(&self) -> Result<Graph, GraphError> {
        Placer::new(self)?.run()
    }
}

/// A generated recipe graph. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    edges: Vec<Edge>,
    recipes: RecipeIndex,
    ingredients: Vec<Element>,
}

impl Graph {
    /// The full placement sequence, start elements first and deferred
    /// compounds last.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, slot: SlotId) -> Option<&Edge> {
        self.edges.get(slot.0 as usize)
    }

    /// The element placed at `slot`.
    pub fn element_at(&self, slot: SlotId) -> Option<Element> {
        self.edge(slot).map(|e| e.output)
    }

    pub fn recipes(&self) -> &RecipeIndex {
        &self.recipes
    }

    /// Every element that may be used as an ingredient.
    pub fn ingredients(&self) -> &[Element] {
        &self.ingredients
    }

    /// Products of combining `a` and `b`, in either order.
    pub fn combine(&self, a: &Element, b: &Element) -> Option<&[Element]> {
        self.recipes.outputs(a, b)
    }

    /// The start elements, in slot order.
    pub fn start_elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.edges.iter().filter(|e| e.is_given()).map(|e| e.output)
    }
}

/// Generate a recipe graph. See [`GraphConfig`].
pub fn build_graph(
    seed: u64,
    inputs: u32,
    outputs: u32,
    intermediates: u32,
    start_items: u32,
    compounds_are_ingredients: bool,
) -> Result<Graph, GraphError> {
    GraphConfig {
        seed,
        inputs,
        outputs,
        intermediates,
        start_items,
        compounds_are_ingredients,
    }
    .build()
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Run `attempt` until it yields a value, at most `limit` times.
fn retry<T>(limit: u32, mut attempt: impl FnMut() -> Option<T>) -> Option<T> {
    (0..limit).find_map(|_| attempt())
}

/// Mutable state of one generation run.
struct Placer<'a> {
    config: &'a GraphConfig,
    rng: GraphRng,
    inputs_to_place: Vec<u32>,
    intermediates_to_place: Vec<u32>,
    outputs_to_place: Vec<u32>,
    inputs_placed: u32,
    outputs_placed: u32,
    used_pairs: HashSet<(u32, u32)>,
    edges: Vec<Edge>,
    deferred: Vec<Edge>,
}

impl<'a> Placer<'a> {
    fn new(config: &'a GraphConfig) -> Result<Self, GraphError> {
        if config.start_items > config.inputs {
            return Err(GraphError::TooManyStartItems {
                start_items: config.start_items,
                inputs: config.inputs,
            });
        }

        let mut placer = Self {
            config,
            rng: GraphRng::new(config.seed),
            inputs_to_place: (1..=config.inputs).collect(),
            intermediates_to_place: (1..=config.intermediates).collect(),
            outputs_to_place: (1..=config.outputs).collect(),
            inputs_placed: 0,
            outputs_placed: 0,
            used_pairs: HashSet::new(),
            edges: Vec::new(),
            deferred: Vec::new(),
        };

        for id in placer.inputs_to_place.drain(..config.start_items as usize) {
            placer.edges.push(Edge {
                ingredients: None,
                output: Element::input(id),
            });
        }

        let remaining = placer.remaining();
        if placer.edges.is_empty() && remaining > 0 {
            return Err(GraphError::NoStartItems { remaining });
        }

        Ok(placer)
    }

    fn remaining(&self) -> u32 {
        (self.inputs_to_place.len() + self.intermediates_to_place.len() + self.outputs_to_place.len())
            as u32
    }

    fn run(mut self) -> Result<Graph, GraphError> {
        while self.remaining() > 0 {
            self.place_layer()?;
        }
        self.edges.append(&mut self.deferred);

        let recipes = self.index_recipes();
        let ingredients = self.catalog();

        log::info!(
            "built recipe graph (seed {}): {} placements, {} recipe pairs, {} ingredients",
            self.config.seed,
            self.edges.len(),
            recipes.len(),
            ingredients.len()
        );

        Ok(Graph {
            edges: self.edges,
            recipes,
            ingredients,
        })
    }

    fn place_layer(&mut self) -> Result<(), GraphError> {
        let previous_items = self.edges.len() as u64;
        let pair_budget = (previous_items * previous_items / 2) as i64 - self.used_pairs.len() as i64 - 1;
        let max_layer_size = pair_budget.min(self.remaining() as i64 - 1);

        let layer_size = if max_layer_size <= 0 {
            1
        } else {
            self.rng.below(max_layer_size as u64) + 1
        };

        log::debug!(
            "layer over {previous_items} placements: {layer_size} new (max {max_layer_size})"
        );

        let mut layer = Vec::with_capacity(layer_size as usize);
        for _ in 0..layer_size {
            let slot = (self.edges.len() + layer.len() + self.deferred.len()) as u32;
            let kind = self.choose_kind().ok_or(GraphError::Unsatisfiable {
                slot,
                attempts: KIND_ATTEMPT_LIMIT,
            })?;
            let (i1, i2) = self
                .choose_pair(previous_items)
                .ok_or(GraphError::PairsExhausted {
                    placed: previous_items as u32,
                    attempts: PAIR_ATTEMPT_LIMIT,
                })?;
            let id = self.take_id(kind);

            let edge = Edge {
                ingredients: Some((SlotId(i1), SlotId(i2))),
                output: Element::new(kind, id),
            };
            if kind != ElementKind::Output || self.config.compounds_are_ingredients {
                layer.push(edge);
            } else {
                self.deferred.push(edge);
            }
        }

        self.edges.append(&mut layer);
        Ok(())
    }

    /// Rejection-sample a kind. Inputs are only accepted while more outputs
    /// than inputs have been placed.
    fn choose_kind(&mut self) -> Option<ElementKind> {
        let kind = retry(KIND_ATTEMPT_LIMIT, || {
            let kind = ElementKind::from_draw(self.rng.below(3) + 1)?;
            let open = match kind {
                ElementKind::Input => {
                    self.outputs_placed > self.inputs_placed && !self.inputs_to_place.is_empty()
                }
                ElementKind::Intermediate => !self.intermediates_to_place.is_empty(),
                ElementKind::Output => !self.outputs_to_place.is_empty(),
            };
            open.then_some(kind)
        })?;

        match kind {
            ElementKind::Input => self.inputs_placed += 1,
            ElementKind::Output => self.outputs_placed += 1,
            ElementKind::Intermediate => {}
        }
        Some(kind)
    }

    /// Draw an unused, ordered pair of earlier slots and mark it used.
    fn choose_pair(&mut self, previous_items: u64) -> Option<(u32, u32)> {
        retry(PAIR_ATTEMPT_LIMIT, || {
            let a = self.rng.below(previous_items) as u32;
            let b = self.rng.below(previous_items) as u32;
            let pair = (a.min(b), a.max(b));
            self.used_pairs.insert(pair).then_some(pair)
        })
    }

    /// Remove a uniformly drawn id from the pool for `kind`.
    fn take_id(&mut self, kind: ElementKind) -> u32 {
        let pool = match kind {
            ElementKind::Input => &mut self.inputs_to_place,
            ElementKind::Intermediate => &mut self.intermediates_to_place,
            ElementKind::Output => &mut self.outputs_to_place,
        };
        let idx = self.rng.below(pool.len() as u64) as usize;
        pool.remove(idx)
    }

    fn index_recipes(&self) -> RecipeIndex {
        self.edges
            .iter()
            .filter(|e| e.kind() != ElementKind::Input)
            .filter_map(|e| {
                let (i1, i2) = e.ingredients?;
                let a = self.edges[i1.0 as usize].output;
                let b = self.edges[i2.0 as usize].output;
                Some((a, b, e.output))
            })
            .collect()
    }

    fn catalog(&self) -> Vec<Element> {
        let config = self.config;
        let mut ingredients: Vec<Element> = (1..=config.inputs)
            .map(Element::input)
            .chain((1..=config.intermediates).map(Element::intermediate))
            .collect();
        if config.compounds_are_ingredients {
            ingredients.extend((1..=config.outputs).map(Element::output));
        }
        ingredients
    }
}

// ===========================================================================
// Tests
// ===========================================================================
