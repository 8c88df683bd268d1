mod init;
mod reporter;

pub use init::InitCommand;

use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use console::style;
use didi_stack_core::ScaffoldError;

/// didi-stack - Vite + React + TailwindCSS + shadcn/ui starter
#[derive(Parser)]
#[command(name = "didi-stack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new project in the current directory.
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Init(cmd) => cmd.execute().await,
        }
    }
}

/// Report a rejected command line and pick the exit code.
///
/// `--help` and `--version` succeed; every other parse failure exits 1.
pub fn usage_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            let usage = ScaffoldError::Usage("Missing or invalid command. Use \"init\".".into());
            eprintln!("{}", style(format!("Error: {}", usage)).red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::try_parse_from(["didi-stack", "init"]);
        assert!(matches!(cli.map(|c| c.command), Ok(Commands::Init(_))));
    }

    #[test]
    fn test_cli_rejects_missing_command() {
        let err = Cli::try_parse_from(["didi-stack"]).err().unwrap();
        assert!(!matches!(
            err.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["didi-stack", "build"]).is_err());
        assert!(Cli::try_parse_from(["didi-stack", "init", "extra"]).is_err());
        assert!(Cli::try_parse_from(["didi-stack", "init", "--force"]).is_err());
    }

    #[test]
    fn test_help_is_not_a_failure() {
        let err = Cli::try_parse_from(["didi-stack", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
