//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::element::{Element, ElementKind};
use crate::graph::{Graph, GraphConfig};
use crate::recipe::RecipeIndex;
use crate::session::{ReceivedItem, SessionConfig};
use std::collections::HashSet;

// ===========================================================================
// Element constructors
// ===========================================================================

pub fn fire() -> Element {
    Element::input(1)
}
pub fn water() -> Element {
    Element::input(2)
}
pub fn earth() -> Element {
    Element::input(3)
}
pub fn steam() -> Element {
    Element::intermediate(1)
}
pub fn mud() -> Element {
    Element::intermediate(2)
}
pub fn geyser() -> Element {
    Element::output(1)
}

// ===========================================================================
// Fixtures
// ===========================================================================

/// `{fire, water} -> [steam]`.
pub fn single_recipe_index() -> RecipeIndex {
    [(fire(), water(), steam())].into_iter().collect()
}

/// `{fire, water} -> [steam]`, `{water, earth} -> [mud]`,
/// `{steam, earth} -> [geyser]`.
pub fn small_index() -> RecipeIndex {
    [
        (fire(), water(), steam()),
        (water(), earth(), mud()),
        (steam(), earth(), geyser()),
    ]
    .into_iter()
    .collect()
}

/// A mid-sized room configuration that always generates.
pub fn sample_session_config() -> SessionConfig {
    SessionConfig {
        graph_seed: 2_827_108,
        element_amount: 10,
        compound_amount: 40,
        intermediate_amount: 15,
        compounds_are_ingredients: false,
    }
}

/// A received item as the server would send it for `element`.
pub fn received(element: Element, id: u32) -> ReceivedItem {
    ReceivedItem {
        name: element.to_string(),
        id,
    }
}

// ===========================================================================
// Invariant checks
// ===========================================================================

/// Assert every structural property a generated graph must hold.
pub fn assert_graph_invariants(config: &GraphConfig, graph: &Graph) {
    let edges = graph.edges();

    // Completeness: each kind's ids are exactly 1..=count.
    for (kind, count) in [
        (ElementKind::Input, config.inputs),
        (ElementKind::Intermediate, config.intermediates),
        (ElementKind::Output, config.outputs),
    ] {
        let mut ids: Vec<u32> = edges
            .iter()
            .filter(|e| e.kind() == kind)
            .map(|e| e.output.id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=count).collect::<Vec<_>>(), "{kind:?} ids");
    }

    let mut seen_pairs = HashSet::new();
    for (idx, edge) in edges.iter().enumerate() {
        let Some((i1, i2)) = edge.ingredients else {
            assert!(idx < config.start_items as usize, "given edge at slot {idx}");
            continue;
        };

        // Acyclicity.
        assert!(i1 <= i2, "unordered slots at {idx}");
        assert!((i2.0 as usize) < idx, "slot {idx} refers forward to {i2:?}");

        // Pair uniqueness.
        assert!(seen_pairs.insert((i1, i2)), "pair {i1:?},{i2:?} reused at {idx}");

        // Compound deferral.
        if !config.compounds_are_ingredients {
            for slot in [i1, i2] {
                let ingredient = edges[slot.0 as usize].output;
                assert_ne!(
                    ingredient.kind,
                    ElementKind::Output,
                    "compound used as ingredient at slot {idx}"
                );
            }
        }
    }
}
