use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    pagelens::logging::init().context("init logging")?;

    let cli = pagelens::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        pagelens::cli::Command::Summarize(args) => {
            pagelens::run::summarize(args).await.context("summarize")?;
        }
        pagelens::cli::Command::Sentiment(args) => {
            pagelens::run::sentiment(args).await.context("sentiment")?;
        }
        pagelens::cli::Command::Images(args) => {
            pagelens::run::images(args).await.context("images")?;
        }
        pagelens::cli::Command::Test(args) => {
            pagelens::run::test_connection(args).await.context("test")?;
        }
        pagelens::cli::Command::Config {
            command: pagelens::cli::ConfigCommand::Show(args),
        } => {
            pagelens::run::config_show(args).context("config show")?;
        }
        pagelens::cli::Command::Config {
            command: pagelens::cli::ConfigCommand::Set(args),
        } => {
            pagelens::run::config_set(args).context("config set")?;
        }
        pagelens::cli::Command::Config {
            command: pagelens::cli::ConfigCommand::Reset(args),
        } => {
            pagelens::run::config_reset(args).context("config reset")?;
        }
    }

    Ok(())
}
