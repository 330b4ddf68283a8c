//! Operator console for the docflow orchestrator.

pub mod api;
pub mod metrics;
pub mod state;
