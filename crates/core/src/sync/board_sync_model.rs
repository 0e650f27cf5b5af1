//! Save outcomes and the sync status state machine.

use serde::{Deserialize, Serialize};

/// Where a save ended up durable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// The store acknowledged the full replace.
    Remote,
    /// Only the local cache holds the edit.
    Local,
}

/// Result of a save attempt that reached at least the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    /// `true` only when the store acknowledged the write.
    pub ok: bool,
    pub mode: SaveMode,
}

impl SaveOutcome {
    pub fn remote() -> Self {
        Self {
            ok: true,
            mode: SaveMode::Remote,
        }
    }

    pub fn local() -> Self {
        Self {
            ok: false,
            mode: SaveMode::Local,
        }
    }
}

/// Status shown to the user while a session is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Saved,
    Saving,
    LocalOnly,
    Error,
}

impl SyncStatus {
    /// Any mutation starts (or restarts) a save cycle.
    pub fn on_mutation(self) -> Self {
        Self::Saving
    }

    pub fn on_save_settled<E>(self, result: &Result<SaveOutcome, E>) -> Self {
        match result {
            Ok(outcome) => match outcome.mode {
                SaveMode::Remote => Self::Saved,
                SaveMode::Local => Self::LocalOnly,
            },
            Err(_) => Self::Error,
        }
    }

    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Saving)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_settled_state_moves_to_saving_on_mutation() {
        for status in [
            SyncStatus::Saved,
            SyncStatus::LocalOnly,
            SyncStatus::Error,
            SyncStatus::Saving,
        ] {
            assert_eq!(status.on_mutation(), SyncStatus::Saving);
        }
    }

    #[test]
    fn settle_maps_outcome_to_status() {
        let saving = SyncStatus::Saving;
        assert_eq!(
            saving.on_save_settled::<()>(&Ok(SaveOutcome::remote())),
            SyncStatus::Saved
        );
        assert_eq!(
            saving.on_save_settled::<()>(&Ok(SaveOutcome::local())),
            SyncStatus::LocalOnly
        );
        assert_eq!(saving.on_save_settled(&Err("cache")), SyncStatus::Error);
    }

    #[test]
    fn save_mode_serializes_lowercase() {
        let json = serde_json::to_string(&SaveOutcome::local()).unwrap();
        assert_eq!(json, r#"{"ok":false,"mode":"local"}"#);
    }
}
