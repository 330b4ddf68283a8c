//! Types for the status reporter.

use serde::{Deserialize, Serialize};

/// Status text shown while no submission is running.
pub const IDLE_STATUS: &str = "Ready";

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    Failure,
    Timeout,
    Cancelled,
}

/// The message surfaced for the last finished submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub message: String,
}

/// Operator-visible progress state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// 0-100
    pub progress_percent: u8,
    pub status_text: String,
    pub busy: bool,
    /// Survives the reset to idle so the operator can still read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<Outcome>,
}

impl UiState {
    pub fn idle() -> Self {
        Self {
            progress_percent: 0,
            status_text: IDLE_STATUS.to_string(),
            busy: false,
            last_outcome: None,
        }
    }

    /// Whether the live part of the state is idle (ignores `last_outcome`).
    pub fn is_idle(&self) -> bool {
        !self.busy && self.progress_percent == 0 && self.status_text == IDLE_STATUS
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_state() {
        let state = UiState::idle();
        assert!(state.is_idle());
        assert_eq!(state.status_text, "Ready");
        assert!(state.last_outcome.is_none());
    }

    #[test]
    fn test_serialization_skips_missing_outcome() {
        let json = serde_json::to_value(UiState::idle()).unwrap();
        assert_eq!(json["progress_percent"], 0);
        assert_eq!(json["busy"], false);
        assert!(json.get("last_outcome").is_none());

        let state = UiState {
            last_outcome: Some(Outcome {
                kind: OutcomeKind::Timeout,
                message: "Timed out".to_string(),
            }),
            ..UiState::idle()
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["last_outcome"]["kind"], "timeout");
    }
}
