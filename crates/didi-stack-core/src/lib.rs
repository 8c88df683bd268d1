//! Core of the didi-stack project scaffolder.
//!
//! Provisioning is an ordered [`pipeline::Pipeline`] of external commands,
//! template writes and JSON merges, executed by a fail-fast
//! [`pipeline::PipelineRunner`] against an explicit project root.

pub mod command;
pub mod config;
pub mod error;
pub mod json;
pub mod pipeline;
pub mod project;
pub mod templates;

pub use command::{CommandRunner, CommandSpec, ProcessRunner};
pub use config::ScaffoldConfig;
pub use error::{Result, ScaffoldError};
pub use json::{merge_field, read_config, write_config, JsonEdit};
pub use pipeline::{
    Pipeline, PipelineRunner, Reporter, RunSummary, Step, StepAction, StepRecord, StepStatus,
};
pub use project::{ProjectName, DEFAULT_PROJECT_NAME};
pub use templates::{write_template, Template};
