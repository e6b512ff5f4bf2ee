//! iXiA - chat assistant with math, creative and remote chat models.
//!
//! Quick start:
//!   ixia ask "what's 5 + 3?"             # One-shot reply
//!   ixia chat -m creative                # Interactive session
//!   ixia chat --export notes.md -f md    # Save the transcript on exit
//!   ixia eval "2 + 3 * (4 - 1)"          # Bare arithmetic
//!   ixia config init                     # Write ~/.ixia/config.toml

mod cli;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ixia_assistant::application::evaluator::MATH_PROMPT_REPLY;
use ixia_assistant::application::{
    evaluate, format_reply, format_settings_table, format_transcript, format_value,
    ChatSession, Dispatcher, KeywordTable, OutputFormat,
};
use ixia_assistant::domain::{AppConfig, AppError, EvalOutcome, ModelSelector, Transcript};
use ixia_assistant::infrastructure::{
    ensure_config_exists, load_config_or_default, load_keyword_table, HttpTransport,
    RuntimeConfig,
};

use cli::{Cli, Commands, ConfigAction, ReplCommand};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output_format().map_err(anyhow::Error::msg)?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);

    match cli.command {
        Commands::Ask { model, message } => {
            let app = load_config_or_default(&config_path).context("Failed to load configuration")?;
            let mut session = build_session(&app, &config_path, cli.keywords.as_deref(), model)?;
            let reply = session.send(&message.join(" ")).await?;
            println!("{}", format_reply(&reply, cli.sentiment));
        }
        Commands::Chat { model, export } => {
            let app = load_config_or_default(&config_path).context("Failed to load configuration")?;
            let session = build_session(&app, &config_path, cli.keywords.as_deref(), model)?;
            cmd_chat(session, export.as_deref(), format, cli.sentiment).await?;
        }
        Commands::Eval { expression } => {
            cmd_eval(&expression.join(" "));
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(&config_path)?,
            ConfigAction::Init => cmd_config_init(&config_path)?,
        },
    }

    Ok(())
}

/// Wire the dispatcher and session from the loaded configuration.
fn build_session(
    app: &AppConfig,
    config_path: &Path,
    keywords: Option<&Path>,
    model: Option<String>,
) -> anyhow::Result<ChatSession> {
    let provider = Arc::new(RuntimeConfig::new(
        app.remote.clone(),
        Some(config_path.to_path_buf()),
    ));
    let transport = Arc::new(HttpTransport::new().context("Failed to initialise HTTP client")?);

    let table = match keywords {
        Some(path) => load_keyword_table(path).context("Failed to load keyword table")?,
        None => KeywordTable::builtin(),
    };

    let dispatcher =
        Dispatcher::new(provider, transport, table).with_typing_delay(app.chat.typing_delay());
    let model = ModelSelector::resolve(model.as_deref().unwrap_or(&app.chat.default_model));

    Ok(ChatSession::new(
        dispatcher,
        model,
        app.chat.max_message_chars,
    ))
}

/// Interactive conversation on stdin.
async fn cmd_chat(
    mut session: ChatSession,
    export: Option<&Path>,
    format: OutputFormat,
    show_sentiment: bool,
) -> anyhow::Result<()> {
    println!("💬 iXiA chat ({} model)", session.model());
    println!("   /model <chat|math|creative>   /export [path]   /quit");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", "you>".green().bold());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let Some(command) = ReplCommand::parse(&line) else {
            continue;
        };

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Model(tag) => {
                let model = ModelSelector::resolve(tag);
                session.set_model(model);
                println!("Switched to the {model} model.");
            }
            ReplCommand::Export(path) => {
                let written =
                    export_transcript(session.transcript(), path.map(Path::new), format)?;
                println!("✅ Exported to {}", written.display());
            }
            ReplCommand::Unknown(name) => {
                println!("{} Unknown command {name}. Try /model, /export or /quit.", "⚠".yellow());
            }
            ReplCommand::Message(text) => match session.send(text).await {
                Ok(reply) => println!("{}\n", format_reply(&reply, show_sentiment)),
                Err(AppError::InvalidInput { message }) => {
                    println!("{} {message}", "⚠".yellow());
                }
                Err(e) => return Err(e.into()),
            },
        }
    }

    if let Some(path) = export {
        if !session.transcript().is_empty() {
            let written = export_transcript(session.transcript(), Some(path), format)?;
            println!("✅ Exported to {}", written.display());
        }
    }

    Ok(())
}

/// Write the transcript, defaulting to `<title>_export.<ext>` in the
/// working directory.
fn export_transcript(
    transcript: &Transcript,
    path: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<PathBuf> {
    let path = path.map_or_else(
        || PathBuf::from(format!("{}.{}", transcript.export_stem(), format.extension())),
        Path::to_path_buf,
    );

    let content = format_transcript(transcript, format).context("Failed to format transcript")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

/// Evaluate a bare expression and print the value or the advisory.
fn cmd_eval(expression: &str) {
    match evaluate(expression) {
        EvalOutcome::Value(value) => println!("{}", format_value(value)),
        EvalOutcome::NoSignal => println!("{MATH_PROMPT_REPLY}"),
        EvalOutcome::Failed(err) => println!("{err}"),
    }
}

/// Print the resolved remote settings.
fn cmd_config_show(config_path: &Path) -> anyhow::Result<()> {
    let app = load_config_or_default(config_path).context("Failed to load configuration")?;
    let provider = RuntimeConfig::new(app.remote, Some(config_path.to_path_buf()));

    println!("📄 Config file: {}", config_path.display());
    if !config_path.exists() {
        println!("   (not found, using defaults; run `ixia config init`)");
    }
    println!();
    println!("{}", format_settings_table(&provider));

    Ok(())
}

/// Write a default configuration file.
fn cmd_config_init(config_path: &Path) -> anyhow::Result<()> {
    if ensure_config_exists(config_path).context("Failed to create configuration")? {
        println!("✅ Created {}", config_path.display());
    } else {
        println!("Config already exists at {}", config_path.display());
    }

    Ok(())
}

/// Setup tracing/logging. Logs go to stderr so replies stay clean on stdout.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
