use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-facing failure recorded in controller state.
///
/// Both kinds render the same fixed message; the underlying cause is never
/// surfaced to presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailure {
    #[error("Failed to load data.")]
    ListLoadFailed,
    #[error("Failed to load data.")]
    DetailLoadFailed,
}

impl LoadFailure {
    pub fn message(&self) -> String {
        self.to_string()
    }
}
