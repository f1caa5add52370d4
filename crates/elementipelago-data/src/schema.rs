//! Serde structs for room data files.
//!
//! These mirror the slot data the multiplayer server hands out and are
//! resolved into core types by the loader.

use serde::{Deserialize, Deserializer};

/// Slot data as stored on disk or sent by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotData {
    pub graph_seed: u64,
    pub element_amount: u32,
    pub compound_amount: u32,
    pub intermediate_amount: u32,
    /// Older servers send this as an integer flag.
    #[serde(default = "default_true", deserialize_with = "bool_or_int")]
    pub compounds_are_ingredients: bool,
}

fn default_true() -> bool {
    true
}

/// A flag written either as a boolean or as an integer (0 is false).
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn bool_or_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}
