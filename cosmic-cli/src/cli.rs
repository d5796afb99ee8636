use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cosmic", version, about = "Terminal front end for the cosmic portfolio assistant")]
pub struct Cli {
    /// Config file (defaults to $COSMIC_CONFIG or config.json in the platform config dir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask a single question and type out the answer.
    Ask {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Read prompts line by line; a new line takes over from an unfinished answer.
    Chat,
    /// Treat stdin lines as speech transcripts and run voice commands.
    ///
    /// A blank line ends the current recognition session; `!code` reports a
    /// recognizer error such as `!no-speech`.
    Listen,
    /// Play the animated subtitle.
    Intro,
    /// Store the API key in the OS keyring.
    SetKey { key: String },
    /// Remove the stored API key from the OS keyring.
    ClearKey,
}
