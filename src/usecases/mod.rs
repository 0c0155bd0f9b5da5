//! Application use cases. Orchestrate domain logic via ports.

pub mod export_service;
pub mod manage_service;

pub use export_service::ExportService;
pub use manage_service::{EditPhase, ManagePollService, MutationOutcome};
