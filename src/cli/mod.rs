//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the assistant.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ixia_assistant::application::OutputFormat;

/// iXiA - chat assistant with math, creative and remote chat models.
///
/// Quick start: ixia ask "what's 5 + 3?" | ixia chat -m creative | ixia eval "(2 + 3) * 4"
#[derive(Parser, Debug)]
#[command(name = "ixia")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ~/.ixia/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keyword reply table in JSON, replacing the built-in one.
    #[arg(long, global = true)]
    pub keywords: Option<PathBuf>,

    /// Export format: text, markdown, or json.
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,

    /// Tag each reply with its sentiment.
    #[arg(long, global = true)]
    pub sentiment: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a single message and print the reply.
    Ask {
        /// Model: chat, math, or creative.
        #[arg(short, long)]
        model: Option<String>,

        /// Message text.
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },

    /// Start an interactive conversation (/model <tag>, /export <path>, /quit).
    Chat {
        /// Model: chat, math, or creative.
        #[arg(short, long)]
        model: Option<String>,

        /// Write the transcript to this file when the session ends.
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Evaluate an arithmetic expression.
    Eval {
        /// Expression, e.g. "2 + 3 * (4 - 1)".
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            allow_negative_numbers = true
        )]
        expression: Vec<String>,
    },

    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved remote settings.
    Show,

    /// Write a default configuration file if none exists.
    Init,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}

/// One line typed into the interactive chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Quit,
    /// Switch model; the tag may be empty.
    Model(&'a str),
    /// Export the transcript, optionally to a given path.
    Export(Option<&'a str>),
    /// A slash command nobody handles.
    Unknown(&'a str),
    Message(&'a str),
}

impl<'a> ReplCommand<'a> {
    /// Parse a REPL line. Blank lines yield `None`.
    ///
    /// Commands must match a whole word: `/modelx` is unknown, not `/model`.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if !line.starts_with('/') {
            return Some(Self::Message(line));
        }

        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(command, rest)| (command, rest.trim()));

        Some(match command {
            "/quit" | "/exit" => Self::Quit,
            "/model" => Self::Model(rest),
            "/export" => Self::Export(Some(rest).filter(|p| !p.is_empty())),
            _ => Self::Unknown(command),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::parse_from(["ixia", "ask", "-m", "math", "what's", "5", "+", "3?"]);
        match cli.command {
            Commands::Ask { model, message } => {
                assert_eq!(model.as_deref(), Some("math"));
                assert_eq!(message.join(" "), "what's 5 + 3?");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_eval_accepts_leading_minus() {
        let cli = Cli::parse_from(["ixia", "eval", "-5", "+", "2"]);
        assert!(matches!(cli.command, Commands::Eval { ref expression } if expression.join(" ") == "-5 + 2"));
    }

    #[test]
    fn test_repl_commands_match_whole_words() {
        assert_eq!(ReplCommand::parse("   "), None);
        assert_eq!(ReplCommand::parse("/quit"), Some(ReplCommand::Quit));
        assert_eq!(ReplCommand::parse("/model  math "), Some(ReplCommand::Model("math")));
        assert_eq!(ReplCommand::parse("/model"), Some(ReplCommand::Model("")));
        assert_eq!(
            ReplCommand::parse("/modelfoo"),
            Some(ReplCommand::Unknown("/modelfoo"))
        );
        assert_eq!(
            ReplCommand::parse("/modelfoo math"),
            Some(ReplCommand::Unknown("/modelfoo"))
        );
        assert_eq!(ReplCommand::parse("/export"), Some(ReplCommand::Export(None)));
        assert_eq!(
            ReplCommand::parse("/export chat.md"),
            Some(ReplCommand::Export(Some("chat.md")))
        );
        assert_eq!(
            ReplCommand::parse(" 2 + 2 "),
            Some(ReplCommand::Message("2 + 2"))
        );
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["ixia", "config", "show", "-vv", "-f", "json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output_format(), Ok(OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));
    }
}
