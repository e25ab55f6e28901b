//! Purpose: Shared session-info JSON serializer for diagnostics.
//! Exports: `session_info_json`.
//! Role: Keep the session metadata envelope shape consistent for callers
//! that surface diagnostics.
//! Invariants: Stable key names/order for the v0 info payload.
//! Invariants: Optional blocks are emitted only when the source value exists.
use serde_json::{Map, Value, json};

use crate::core::session::Session;

pub fn session_info_json(session: &Session) -> Value {
    let mut map = Map::new();
    map.insert(
        "engine_version".to_string(),
        json!(Session::engine_version()),
    );
    map.insert("closed".to_string(), json!(session.is_closed()));
    map.insert(
        "open_virtual_files".to_string(),
        json!(session.open_virtual_files()),
    );
    if let Some(dir) = session.data_dir() {
        map.insert("data_dir".to_string(), json!(dir.display().to_string()));
    }
    if let Ok(Some(region)) = session.default_value("region") {
        map.insert("region".to_string(), json!(region));
    }
    Value::Object(map)
}
