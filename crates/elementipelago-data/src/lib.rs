//! Data-driven room configuration for Elementipelago.
//!
//! A room directory holds a required `slot_data` file and an optional `room`
//! snapshot, each in RON, TOML, or JSON.

pub mod loader;
pub mod schema;

use std::path::Path;

use elementipelago_core::session::{RoomSnapshot, SessionConfig};

pub use loader::{DataLoadError, load_room_snapshot, load_session_config};

/// Everything needed to start a session.
#[derive(Debug, Clone)]
pub struct RoomData {
    pub config: SessionConfig,
    pub snapshot: RoomSnapshot,
}

/// Load a room directory. Without a `room` file the room is fresh.
pub fn load_room(dir: &Path) -> Result<RoomData, DataLoadError> {
    let slot_path = loader::require_room_file(dir, "slot_data")?;
    let config = load_session_config(&slot_path)?;

    let snapshot = match loader::find_room_file(dir, "room")? {
        Some(path) => load_room_snapshot(&path)?,
        None => RoomSnapshot::fresh(&config),
    };

    Ok(RoomData { config, snapshot })
}
