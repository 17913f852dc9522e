pub mod analytics;
pub mod compliance;
pub mod config;
pub mod demo;
pub mod domain;
pub mod duration;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod format;
pub mod ingest;
pub mod normalize;
pub mod policy;
pub mod report;
pub mod validate;

pub use compliance::ComplianceTag;
pub use evaluate::{evaluate_incident_sla, SlaEvaluation, SlaEvaluator};

