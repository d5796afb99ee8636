use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use cosmic_core::config::AppConfig;
use cosmic_core::outcome::Outcome;
use cosmic_core::subtitle::{NBSP, stagger};
use cosmic_engine::dispatcher::{Dispatcher, Submission};
use cosmic_engine::listener::{ListenError, stop_pair};
use cosmic_runtime::config_store::ConfigStore;
use cosmic_runtime::defaults::default_config_path;
use cosmic_runtime::runtime_engine::{build_assistant, build_dispatcher, build_listening_loop};
use cosmic_runtime::secrets::{SecretKey, delete_secret, resolve_api_key, set_secret};
use cosmic_engine::traits::DisplaySink;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

mod cli;
mod terminal;
mod voice;

use crate::cli::{Cli, Command};
use crate::terminal::TerminalDisplay;
use crate::voice::{ConsoleOpener, ConsoleSpeech, LineRecognizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = ConfigStore::at_path(cli.config.clone().unwrap_or_else(default_config_path));
    let cfg = store.load_or_default()?;
    log::debug!("config loaded from {}", store.path().display());

    match cli.command {
        Command::Ask { prompt } => ask(&cfg, &prompt.join(" ")).await,
        Command::Chat => chat(&cfg).await,
        Command::Listen => listen(&cfg).await,
        Command::Intro => intro(&cfg).await,
        Command::SetKey { key } => {
            set_secret(SecretKey::GeminiApiKey, key.trim()).context("store API key")?;
            println!("API key stored.");
            Ok(())
        }
        Command::ClearKey => {
            if delete_secret(SecretKey::GeminiApiKey).context("remove API key")? {
                println!("API key removed.");
            } else {
                println!("No API key was stored.");
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn dispatcher(cfg: &AppConfig) -> anyhow::Result<Arc<Dispatcher>> {
    Ok(Arc::new(build_dispatcher(cfg, resolve_api_key())?))
}

async fn ask(cfg: &AppConfig, prompt: &str) -> anyhow::Result<()> {
    let d = dispatcher(cfg)?;
    let display = TerminalDisplay::stdout();

    match d.submit(prompt, &display).await {
        Submission::Rejected(_) => std::process::exit(2),
        Submission::Dispatched(Outcome::Failure { .. }) => std::process::exit(1),
        Submission::Dispatched(_) => Ok(()),
    }
}

async fn chat(cfg: &AppConfig) -> anyhow::Result<()> {
    let d = dispatcher(cfg)?;
    let display = Arc::new(TerminalDisplay::stdout());

    println!("Ask the cosmos anything. Ctrl-D to quit.");
    run_chat(d, display, BufReader::new(tokio::io::stdin())).await
}

/// Submits every input line on its own task and, at end of input, waits for
/// all of them so no answer is cut off.
async fn run_chat<S, R>(d: Arc<Dispatcher>, display: Arc<S>, input: R) -> anyhow::Result<()>
where
    S: DisplaySink + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut pending = JoinSet::new();

    while let Some(line) = lines.next_line().await.context("read prompt")? {
        let d = d.clone();
        let display = display.clone();
        // The resubmit policy decides who owns the screen.
        pending.spawn(async move { d.submit(&line, &*display).await });
    }

    while let Some(done) = pending.join_next().await {
        done.context("join request")?;
    }
    Ok(())
}

async fn listen(cfg: &AppConfig) -> anyhow::Result<()> {
    let speech = Arc::new(ConsoleSpeech {
        pitch: cfg.voice.pitch,
        rate: cfg.voice.rate,
    });
    let assistant = Arc::new(build_assistant(cfg, speech, Arc::new(ConsoleOpener)));
    let lp = build_listening_loop(cfg, assistant.clone());

    let (stop, signal) = stop_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    assistant.greet().await;
    let mut rec = LineRecognizer::stdin();
    match lp.run(&mut rec, signal).await {
        Ok(()) if rec.is_exhausted() => Ok(()),
        Ok(()) => {
            // Interrupted while tokio's stdin reader is parked in a blocking
            // read, which would hold up runtime shutdown until the next line.
            std::process::exit(0)
        }
        // End of input is the normal way out.
        Err(ListenError::Restart(_)) if rec.is_exhausted() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn intro(cfg: &AppConfig) -> anyhow::Result<()> {
    let step = Duration::from_millis(cfg.subtitle.step_ms);
    let start = tokio::time::Instant::now();
    let mut out = std::io::stdout();

    for glyph in stagger(&cfg.subtitle.text, step) {
        tokio::time::sleep_until(start + glyph.delay).await;
        let ch = if glyph.ch == NBSP { ' ' } else { glyph.ch };
        write!(out, "{ch}")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}
