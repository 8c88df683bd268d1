use std::io::{BufRead, IsTerminal};

use anyhow::Result;
use clap::Parser;
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use tracing::info;

use didi_stack_core::{
    Pipeline, PipelineRunner, ProcessRunner, ProjectName, ScaffoldConfig, DEFAULT_PROJECT_NAME,
};

use super::reporter::ConsoleReporter;

/// Scaffold a new project.
#[derive(Parser)]
pub struct InitCommand {}

impl InitCommand {
    /// Execute the init command.
    pub async fn execute(self) -> Result<()> {
        let config = ScaffoldConfig::load()?;
        let project = if std::io::stdin().is_terminal() {
            prompt_project_name()?
        } else {
            read_project_name(std::io::stdin().lock())?
        };
        let term = Term::stdout();
        if term.is_term() {
            let _ = term.clear_screen();
        }

        let base_dir = std::env::current_dir()?;
        let pipeline = Pipeline::standard(&project, &config);
        info!(project = %project, steps = pipeline.len(), "scaffolding project");

        let mut runner = PipelineRunner::new(ProcessRunner, ConsoleReporter::new())
            .with_timeout(config.step_timeout());
        runner.run(&pipeline, &base_dir).await?;

        println!();
        println!(
            "{}",
            style("Project setup complete! Just run -").green().bold()
        );
        println!();
        println!("  {} {}", style("cd").dim(), shell_quote(project.as_str()));
        println!("  {}", style("npm run local").dim());
        println!();
        println!(
            "{}",
            style("and your app will be up in no time.").green().bold()
        );
        println!();

        Ok(())
    }
}

fn prompt_project_name() -> Result<ProjectName> {
    let raw = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Let's get going. What will be the app's name")
        .default(DEFAULT_PROJECT_NAME.to_string())
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            ProjectName::parse(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    Ok(ProjectName::parse(&raw)?)
}

/// Take the name from the first line of piped input. A blank line or empty
/// input selects the default.
fn read_project_name(mut input: impl BufRead) -> Result<ProjectName> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let raw = match line.trim() {
        "" => DEFAULT_PROJECT_NAME,
        name => name,
    };
    Ok(ProjectName::parse(raw)?)
}

/// Quote `name` for the `cd` hint when a shell would split it.
fn shell_quote(name: &str) -> String {
    let plain = name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', r"'\''"))
    }
}
