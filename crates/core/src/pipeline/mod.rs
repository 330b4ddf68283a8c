//! Submission orchestration.
//!
//! A submission flows through the [`SubmissionRouter`], which validates the
//! form, takes the status reporter and dispatches to one of two drivers:
//! - **OCR**: upload, then extract (request/response)
//! - **ETL**: upload, then submit, then the [`JobPoller`] loop until a
//!   terminal state

mod cancel;
mod config;
mod error;
mod etl;
mod ocr;
mod poller;
mod request;
mod router;

pub use cancel::{CancelHandle, CancelToken};
pub use config::{EtlDefaults, OcrDefaults, PollerConfig};
pub use error::{PipelineError, SubmissionError, ValidationError};
pub use etl::EtlDriver;
pub use ocr::OcrDriver;
pub use poller::{JobPoller, PollReport, TerminalState};
pub use request::{ProcessingType, SubmissionForm, SubmissionRequest};
pub use router::SubmissionRouter;
