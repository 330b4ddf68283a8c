//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the ETL job poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Hard ceiling on status queries before timing out.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between status queries (milliseconds).
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Progress shown when polling starts (percent).
    #[serde(default = "default_progress_base")]
    pub progress_base: u8,

    /// Progress added per non-terminal attempt (percent).
    #[serde(default = "default_progress_step")]
    pub progress_step: u8,
}

fn default_max_attempts() -> u32 {
    15
}

fn default_interval() -> u64 {
    3000 // 3 seconds
}

fn default_progress_base() -> u8 {
    50
}

fn default_progress_step() -> u8 {
    3
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval(),
            progress_base: default_progress_base(),
            progress_step: default_progress_step(),
        }
    }
}

impl PollerConfig {
    /// Progress to display after `attempts` non-terminal polls.
    ///
    /// Grows with the attempt count and never reaches 100.
    pub fn progress_for_attempt(&self, attempts: u32) -> u8 {
        let step = u32::from(self.progress_step);
        let raw = u32::from(self.progress_base)
            .saturating_add(attempts.saturating_sub(1).saturating_mul(step));
        raw.min(99) as u8
    }
}

/// Defaults applied to OCR submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrDefaults {
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_confidence_threshold")]
    pub default_confidence_threshold: f64,
}

impl Default for OcrDefaults {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            default_confidence_threshold: default_confidence_threshold(),
        }
    }
}

/// Defaults applied to ETL submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlDefaults {
    /// Processing language when not translating.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Page size of the recent jobs list.
    #[serde(default = "default_recent_jobs_limit")]
    pub recent_jobs_limit: u32,
}

impl Default for EtlDefaults {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            recent_jobs_limit: default_recent_jobs_limit(),
        }
    }
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_confidence_threshold() -> f64 {
    30.0
}

fn default_recent_jobs_limit() -> u32 {
    20
}
