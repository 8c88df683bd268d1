//! Fail-fast execution of a pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use super::{Pipeline, Step, StepAction};
use crate::command::{CommandRunner, CommandSpec};
use crate::error::{Result, ScaffoldError};
use crate::templates::write_template;

/// Step execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step not yet started.
    Pending,
    /// Step currently running.
    Running,
    /// Step completed successfully.
    Completed,
    /// Step failed.
    Failed,
}

impl StepStatus {
    /// Lowercase label used in log events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Status of one step in the last run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Root the final steps ran in.
    pub project_root: PathBuf,
    /// Number of steps executed.
    pub completed: usize,
}

/// Receives progress events while a pipeline runs.
pub trait Reporter {
    /// A new group of steps begins.
    fn section(&mut self, title: &str);
    fn step_started(&mut self, step: &Step);
    fn step_succeeded(&mut self, step: &Step);
    fn step_failed(&mut self, step: &Step, error: &ScaffoldError);
}

/// Runs pipeline steps one after another, stopping at the first failure.
///
/// No step is retried and completed steps are never rolled back.
pub struct PipelineRunner<C, R> {
    commands: C,
    reporter: R,
    timeout: Option<Duration>,
    records: Vec<StepRecord>,
}

impl<C, R> PipelineRunner<C, R>
where
    C: CommandRunner,
    R: Reporter,
{
    pub fn new(commands: C, reporter: R) -> Self {
        Self {
            commands,
            reporter,
            timeout: None,
            records: Vec::new(),
        }
    }

    /// Bound every command step by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-step status of the most recent run.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn commands(&self) -> &C {
        &self.commands
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Run `pipeline`, starting in `base_dir`.
    pub async fn run(&mut self, pipeline: &Pipeline, base_dir: &Path) -> Result<RunSummary> {
        self.records = pipeline
            .steps()
            .iter()
            .map(|step| StepRecord {
                name: step.name.clone(),
                status: StepStatus::Pending,
            })
            .collect();

        info!(
            project = %pipeline.project(),
            steps = pipeline.len(),
            base_dir = %base_dir.display(),
            "pipeline started"
        );

        let mut root = base_dir.to_path_buf();
        for (index, step) in pipeline.steps().iter().enumerate() {
            if let Some(section) = &step.section {
                self.reporter.section(section);
            }
            self.records[index].status = StepStatus::Running;
            self.reporter.step_started(step);
            debug!(
                step = %step.name,
                index,
                status = StepStatus::Running.as_str(),
                root = %root.display(),
                "step started"
            );

            match self.execute(step, base_dir, &mut root).await {
                Ok(()) => {
                    self.records[index].status = StepStatus::Completed;
                    self.reporter.step_succeeded(step);
                    debug!(
                        step = %step.name,
                        index,
                        status = StepStatus::Completed.as_str(),
                        "step finished"
                    );
                }
                Err(err) => {
                    self.records[index].status = StepStatus::Failed;
                    self.reporter.step_failed(step, &err);
                    info!(
                        step = %step.name,
                        index,
                        status = StepStatus::Failed.as_str(),
                        error = %err,
                        "pipeline halted"
                    );
                    return Err(err);
                }
            }
        }

        info!(project_root = %root.display(), "pipeline complete");
        Ok(RunSummary {
            project_root: root,
            completed: pipeline.len(),
        })
    }

    async fn execute(&self, step: &Step, base_dir: &Path, root: &mut PathBuf) -> Result<()> {
        match &step.action {
            StepAction::Command(spec) => self.run_command(spec, root).await,
            StepAction::EnterProjectRoot(dir) => {
                let candidate = base_dir.join(dir);
                if !candidate.is_dir() {
                    return Err(ScaffoldError::StepFailed {
                        stage: step.name.clone(),
                        detail: format!(
                            "project directory {} does not exist",
                            candidate.display()
                        ),
                    });
                }
                *root = candidate;
                Ok(())
            }
            StepAction::WriteTemplates(templates) => {
                for template in templates {
                    write_template(root, template)?;
                }
                Ok(())
            }
            StepAction::EditJson(edit) => edit.apply(root),
        }
    }

    async fn run_command(&self, spec: &CommandSpec, cwd: &Path) -> Result<()> {
        let fut = self.commands.run(spec, cwd);

        match self.timeout {
            Some(after) => match tokio::time::timeout(after, fut).await {
                Ok(result) => result,
                Err(_) => Err(ScaffoldError::Timeout {
                    stage: spec.stage.clone(),
                    after,
                }),
            },
            None => fut.await,
        }
    }
}
