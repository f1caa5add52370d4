//! Room files on disk: `slot_data` and `room`, each in RON, TOML, or JSON.
//!
//! Slot data is checked against the location-id layout before it becomes a
//! [`SessionConfig`].

use elementipelago_core::element::LOCATION_AMOUNT;
use elementipelago_core::session::{RoomSnapshot, START_ITEMS, SessionConfig};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::schema::SlotData;

/// Why a room directory could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("room file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("unsupported room file format: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// The same room file exists in two formats.
    #[error("ambiguous room file: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("cannot parse {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The file parsed but describes a room that cannot be played.
    #[error("invalid room in {file}: {detail}")]
    Invalid { file: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Room file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Look for `<base_name>.{ron,toml,json}` in `dir`. At most one may exist.
pub fn find_room_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = ["ron", "toml", "json"]
        .into_iter()
        .map(|ext| dir.join(format!("{base_name}.{ext}")))
        .filter(|path| path.exists());

    match (present.next(), present.next()) {
        (Some(a), Some(b)) => Err(DataLoadError::ConflictingFormats { a, b }),
        (found, _) => Ok(found),
    }
}

pub fn require_room_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_room_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

/// Parse a room file in the format its extension names.
pub fn read_room_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    let parsed: Result<T, String> = match format {
        Format::Ron => ron::from_str(&content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|detail| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    })
}

/// Validate slot data and turn it into a session configuration.
pub fn resolve_slot_data(data: SlotData, file: &Path) -> Result<SessionConfig, DataLoadError> {
    let invalid = |detail: String| DataLoadError::Invalid {
        file: file.to_path_buf(),
        detail,
    };

    if data.element_amount < START_ITEMS {
        return Err(invalid(format!(
            "element_amount {} is below the {START_ITEMS} start elements",
            data.element_amount
        )));
    }
    if data.compound_amount > LOCATION_AMOUNT {
        return Err(invalid(format!(
            "compound_amount {} exceeds the {LOCATION_AMOUNT} compound locations",
            data.compound_amount
        )));
    }
    if data.intermediate_amount > u32::MAX - LOCATION_AMOUNT {
        return Err(invalid(format!(
            "intermediate_amount {} overflows the location id range",
            data.intermediate_amount
        )));
    }

    Ok(SessionConfig {
        graph_seed: data.graph_seed,
        element_amount: data.element_amount,
        compound_amount: data.compound_amount,
        intermediate_amount: data.intermediate_amount,
        compounds_are_ingredients: data.compounds_are_ingredients,
    })
}

/// Load and validate a slot data file.
pub fn load_session_config(path: &Path) -> Result<SessionConfig, DataLoadError> {
    let data: SlotData = read_room_file(path)?;
    resolve_slot_data(data, path)
}

/// Load a room snapshot file.
pub fn load_room_snapshot(path: &Path) -> Result<RoomSnapshot, DataLoadError> {
    read_room_file(path)
}
