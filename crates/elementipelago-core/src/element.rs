//! Element identity: kinds, display names, and location ids.
//!
//! Elements travel between the game and the multiplayer server by name
//! (`"Element 3"`, `"Intermediate 7"`, `"Compound 12"`) and, for discovered
//! elements, by location id. This module owns both round-trips.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location ids `1..=LOCATION_AMOUNT` are compounds; intermediates follow.
pub const LOCATION_AMOUNT: u32 = 2000;

/// Received item ids below this are upgrades, not elements.
pub const NON_ELEMENT_ITEMS: u32 = 100;

/// The role an element plays in the recipe graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// A base element, handed to the player rather than discovered.
    Input,
    /// A discoverable element that also serves as an ingredient.
    Intermediate,
    /// A compound. Only an ingredient when the room says so.
    Output,
}

impl ElementKind {
    /// Map a kind draw in `1..=3` to its kind.
    pub fn from_draw(draw: u64) -> Option<Self> {
        match draw {
            1 => Some(ElementKind::Input),
            2 => Some(ElementKind::Intermediate),
            3 => Some(ElementKind::Output),
            _ => None,
        }
    }

    /// The name prefix used on the wire.
    pub fn prefix(self) -> &'static str {
        match self {
            ElementKind::Input => "Element",
            ElementKind::Intermediate => "Intermediate",
            ElementKind::Output => "Compound",
        }
    }
}

/// A typed element identifier. Identity is the `(kind, id)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub id: u32,
}

impl Element {
    pub fn new(kind: ElementKind, id: u32) -> Self {
        Self { kind, id }
    }

    pub fn input(id: u32) -> Self {
        Self::new(ElementKind::Input, id)
    }

    pub fn intermediate(id: u32) -> Self {
        Self::new(ElementKind::Intermediate, id)
    }

    pub fn output(id: u32) -> Self {
        Self::new(ElementKind::Output, id)
    }

    /// Parse a wire name. Any shape other than `"<Prefix> <id>"` is `None`.
    pub fn parse(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// The location id that is checked when this element is discovered.
    /// Inputs are never discovered and have no location.
    pub fn location_id(&self) -> Option<u32> {
        match self.kind {
            ElementKind::Input => None,
            ElementKind::Intermediate => LOCATION_AMOUNT.checked_add(self.id),
            ElementKind::Output => Some(self.id),
        }
    }

    /// Inverse of [`Element::location_id`].
    pub fn from_location_id(location: u32) -> Option<Self> {
        match location {
            0 => None,
            l if l <= LOCATION_AMOUNT => Some(Element::output(l)),
            l => Some(Element::intermediate(l - LOCATION_AMOUNT)),
        }
    }
}

/// Whether a location must be checked before the goal is reached.
pub fn is_goal_location(location: u32, intermediate_amount: u32) -> bool {
    location > LOCATION_AMOUNT && location - LOCATION_AMOUNT <= intermediate_amount
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.prefix(), self.id)
    }
}

/// Error returned when a string is not a valid element name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not an element name: {0:?}")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseElementError(s.to_string());

        let (prefix, rest) = s.split_once(|c: char| c.is_whitespace()).ok_or_else(err)?;
        let kind = [
            ElementKind::Input,
            ElementKind::Intermediate,
            ElementKind::Output,
        ]
        .into_iter()
        .find(|k| k.prefix() == prefix)
        .ok_or_else(err)?;

        let digits = rest.trim_start();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let id: u32 = digits.parse().map_err(|_| err())?;
        if id == 0 {
            return Err(err());
        }
        Ok(Element::new(kind, id))
    }
}
