//! Recipe index: unordered ingredient pair to ordered outputs.
//!
//! Built once by the graph builder and immutable afterwards. Entries keep
//! their first-insertion order so that iteration, and everything derived
//! from it, is reproducible.

use crate::element::Element;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An unordered pair of ingredients, stored normalized (`first <= second`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IngredientPair {
    first: Element,
    second: Element,
}

impl IngredientPair {
    pub fn new(a: Element, b: Element) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> Element {
        self.first
    }

    pub fn second(&self) -> Element {
        self.second
    }

    pub fn contains(&self, el: &Element) -> bool {
        self.first == *el || self.second == *el
    }
}

/// One index entry: an ingredient pair and everything it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub pair: IngredientPair,
    pub outputs: Vec<Element>,
}

/// Lookup from an unordered pair of elements to the elements it produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RecipeEntry>", into = "Vec<RecipeEntry>")]
pub struct RecipeIndex {
    entries: Vec<RecipeEntry>,
    lookup: HashMap<IngredientPair, usize>,
}

impl RecipeIndex {
    /// Append `output` to the entry for `{a, b}`, creating it if absent.
    pub(crate) fn insert(&mut self, a: Element, b: Element, output: Element) {
        let pair = IngredientPair::new(a, b);
        match self.lookup.get(&pair) {
            Some(&idx) => self.entries[idx].outputs.push(output),
            None => {
                self.lookup.insert(pair, self.entries.len());
                self.entries.push(RecipeEntry {
                    pair,
                    outputs: vec![output],
                });
            }
        }
    }

    /// Whether `{a, b}` is a recipe, in either order.
    pub fn contains(&self, a: &Element, b: &Element) -> bool {
        self.lookup.contains_key(&IngredientPair::new(*a, *b))
    }

    /// Outputs of `{a, b}` in generation order, in either order.
    pub fn outputs(&self, a: &Element, b: &Element) -> Option<&[Element]> {
        self.lookup
            .get(&IngredientPair::new(*a, *b))
            .map(|&idx| self.entries[idx].outputs.as_slice())
    }

    /// Iterate `(pair, outputs)` in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&IngredientPair, &[Element])> {
        self.entries.iter().map(|e| (&e.pair, e.outputs.as_slice()))
    }

    /// Number of distinct ingredient pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of outputs across all pairs.
    pub fn output_count(&self) -> usize {
        self.entries.iter().map(|e| e.outputs.len()).sum()
    }
}

/// Builds an index from `(a, b, output)` triples, in order.
impl FromIterator<(Element, Element, Element)> for RecipeIndex {
    fn from_iter<I: IntoIterator<Item = (Element, Element, Element)>>(iter: I) -> Self {
        let mut index = RecipeIndex::default();
        for (a, b, output) in iter {
            index.insert(a, b, output);
        }
        index
    }
}

impl From<Vec<RecipeEntry>> for RecipeIndex {
    fn from(entries: Vec<RecipeEntry>) -> Self {
        let mut index = RecipeIndex::default();
        for entry in entries {
            for output in entry.outputs {
                index.insert(entry.pair.first, entry.pair.second, output);
            }
        }
        index
    }
}

impl From<RecipeIndex> for Vec<RecipeEntry> {
    fn from(index: RecipeIndex) -> Self {
        index.entries
    }
}
