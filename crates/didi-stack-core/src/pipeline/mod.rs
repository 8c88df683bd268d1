//! The provisioning pipeline.
//!
//! A pipeline is a strictly ordered list of steps. Step *i + 1* may rely on
//! every side effect of steps *1..=i*; nothing is skipped and nothing is
//! retried.

mod runner;

pub use runner::{PipelineRunner, Reporter, RunSummary, StepRecord, StepStatus};

use serde_json::json;

use crate::command::CommandSpec;
use crate::config::ScaffoldConfig;
use crate::json::JsonEdit;
use crate::project::ProjectName;
use crate::templates::{self, Template};

/// What a step does.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Run an external command in the current root.
    Command(CommandSpec),
    /// Switch the root to the named directory under the base directory.
    EnterProjectRoot(String),
    /// Write templates under the current root.
    WriteTemplates(Vec<Template>),
    /// Merge into a JSON document under the current root.
    EditJson(JsonEdit),
}

/// One unit of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Stage label shown while the step runs.
    pub name: String,
    /// Header printed before the step starts.
    pub section: Option<String>,
    pub action: StepAction,
}

impl Step {
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        Self {
            name: name.into(),
            section: None,
            action,
        }
    }

    /// Build a command step labelled with the command's stage.
    pub fn command(spec: CommandSpec) -> Self {
        Self::new(spec.stage.clone(), StepAction::Command(spec))
    }

    /// Print `section` before this step.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

/// An ordered list of steps for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    project: ProjectName,
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(project: ProjectName, steps: Vec<Step>) -> Self {
        Self { project, steps }
    }

    /// The Vite + React + TailwindCSS + shadcn/ui provisioning sequence.
    pub fn standard(project: &ProjectName, config: &ScaffoldConfig) -> Self {
        let tools = &config.tools;
        let npm = |stage: &str| CommandSpec::new(stage, tools.npm.as_str());
        let git = |stage: &str| CommandSpec::new(stage, tools.git.as_str());

        let steps = vec![
            Step::command(npm("Creating App").args([
                "create",
                "vite@latest",
                project.as_str(),
                "--",
                "--template",
                config.vite_template.as_str(),
            ]))
            .with_section("Starting with our Vite + React (TypeScript) app"),
            Step::new(
                format!("Entering {}", project),
                StepAction::EnterProjectRoot(project.as_str().to_string()),
            ),
            Step::command(npm("Dependencies Installation").args(["install"]))
                .with_section("Installing project dependencies"),
            Step::command(npm("Installing TailwindCSS").args([
                "install",
                "-D",
                "tailwindcss@3",
                "postcss",
                "autoprefixer",
            ]))
            .with_section("Installing TailwindCSS, cus you have style..."),
            Step::command(
                CommandSpec::new("Initializing TailwindCSS", tools.npx.as_str())
                    .args(["tailwindcss", "init", "-p"]),
            ),
            Step::new(
                "Updated tsconfig.json",
                StepAction::EditJson(JsonEdit::new(
                    "tsconfig.json",
                    ["compilerOptions"],
                    json!({
                        "baseUrl": ".",
                        "paths": { "@/*": ["./src/*"] },
                    }),
                )),
            ),
            Step::command(npm("Installing Shadcn/ui").args([
                "install",
                "tailwindcss-animate",
                "class-variance-authority",
                "clsx",
                "tailwind-merge",
                "lucide-react",
            ])),
            Step::new(
                "Configured TailwindCSS",
                StepAction::WriteTemplates(vec![templates::TAILWIND_CONFIG]),
            ),
            Step::new(
                "Configured styles",
                StepAction::WriteTemplates(vec![templates::GLOBALS_CSS]),
            ),
            Step::new(
                "Landing page ready!",
                StepAction::WriteTemplates(vec![
                    templates::APP_TSX,
                    templates::MAIN_TSX,
                    templates::INDEX_HTML,
                ]),
            ),
            Step::new(
                "Added utility functions",
                StepAction::WriteTemplates(vec![templates::UTILS_TS]),
            ),
            Step::new(
                "Updated package.json with custom scripts",
                StepAction::EditJson(JsonEdit::new(
                    "package.json",
                    ["scripts"],
                    json!({ "local": "vite --open" }),
                )),
            ),
            Step::command(git("Initializing Git repository").args(["init"]))
                .with_section("Initializing a Git repository"),
            Step::new(
                "Created .gitignore file",
                StepAction::WriteTemplates(vec![templates::GITIGNORE]),
            )
            .with_section("Creating .gitignore file"),
            Step::command(git("Staging files for initial commit").args(["add", "."]))
                .with_section("Making the initial commit"),
            Step::command(git("Making initial commit").args([
                "commit",
                "-m",
                config.commit_message.as_str(),
            ])),
        ];

        Self::new(project.clone(), steps)
    }

    pub fn project(&self) -> &ProjectName {
        &self.project
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
