pub mod config;
pub mod health;
pub mod languages;
pub mod metrics;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod status;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ServerConfig,
    ServicesConfig,
};
pub use health::{HealthProber, ServiceHealth};
pub use languages::{display_name, load_language_options, LanguageOption};
pub use pipeline::{
    CancelHandle, CancelToken, EtlDefaults, EtlDriver, JobPoller, OcrDefaults, OcrDriver,
    PipelineError, PollReport, PollerConfig, ProcessingType, SubmissionError, SubmissionForm,
    SubmissionRequest, SubmissionRouter, TerminalState, ValidationError,
};
pub use render::{render, ConfidenceBand, DisplayPayload, ProcessingResult, Tab, TabContent};
pub use services::{
    EtlResult, EtlService, FileStorage, HttpEtlService, HttpFileStorage, HttpOcrService,
    JobHandle, JobStatus, JobStatusReport, JobSummary, OcrResult, OcrService, ServiceError,
    UploadFile, UploadReceipt,
};
pub use status::{BusyGuard, Outcome, OutcomeKind, StatusReporter, UiState};
