//! Inbound request payload and the canonical input derived from it.

use serde::{Deserialize, Serialize};

/// A task submission as received at the boundary.
///
/// Carries at most one of `audio_base64` / `text` plus an optional
/// destination address. Field names match the JSON wire format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRequest {
    /// Recorded audio, base64-encoded (standard alphabet)
    pub audio_base64: Option<String>,

    /// Typed task text
    pub text: Option<String>,

    /// Destination address for the notification (dispatch is skipped
    /// when absent)
    pub user_email: Option<String>,
}

impl TaskRequest {
    /// Create a text-only request
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// How the canonical text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Transcribed from recorded audio
    Spoken,
    /// Supplied as text verbatim
    Typed,
}

/// The single normalized text string fed into analysis
#[derive(Debug, Clone)]
pub struct CanonicalInput {
    pub text: String,
    pub provenance: Provenance,
}

impl CanonicalInput {
    pub fn spoken(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provenance: Provenance::Spoken,
        }
    }

    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provenance: Provenance::Typed,
        }
    }
}
