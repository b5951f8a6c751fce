//! Session handoff: moving the monitored state to a secondary view.
//!
//! A detail/history view runs in a different context from the dashboard
//! (another page, another process) and receives the full state through
//! session-scoped storage. The engine's side of that contract is a
//! serializable [`SessionSnapshot`]; a stale or corrupted stash is never
//! fatal - it just means "no data".

use nodewatch_types::SessionSnapshot;

use crate::error::Result;

/// Serialize a snapshot for stashing in session storage.
pub fn to_json(snapshot: &SessionSnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Parse a previously stashed snapshot.
pub fn from_json(json: &str) -> Result<SessionSnapshot> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a previously stashed snapshot, degrading to an empty one.
///
/// Malformed JSON and incompatible schema versions are logged at `warn`
/// and mapped to an empty snapshot so downstream views render an empty
/// state instead of failing.
pub fn from_json_or_empty(json: &str) -> SessionSnapshot {
    match serde_json::from_str::<SessionSnapshot>(json) {
        Ok(snapshot) if snapshot.is_compatible() => snapshot,
        Ok(snapshot) => {
            tracing::warn!(
                version = snapshot.version,
                "incompatible session snapshot version, treating as no data"
            );
            SessionSnapshot::new()
        }
        Err(err) => {
            tracing::warn!(%err, "failed to parse session snapshot, treating as no data");
            SessionSnapshot::new()
        }
    }
}
