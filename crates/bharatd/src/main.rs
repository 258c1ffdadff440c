//! Bharat daemon - voice-driven command interpreter.
//!
//! Consumes finalized utterances from the transcriber, resolves each
//! to an intent (session gate, safety net, name learning, statistical
//! classifier) and dispatches the resulting action to the speech,
//! display and device sinks.

use anyhow::{Context, Result};
use bharat_common::config::{self, AssistantConfig};
use bharat_common::dispatcher::{Dispatcher, Outcome};
use bharat_common::memory;
use bharat_common::resolver::Resolver;
use bharatd::classifier::ModelClassifier;
use bharatd::sinks::{ConsoleDisplay, EspeakSpeech, LoggingDeviceSink};
use bharatd::transcript::{ChildTranscript, StdinTranscript, TranscriptSource};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Utterances ready for resolution. The transcriber produces faster
/// than the dispatcher consumes when speech synthesis blocks, so the
/// queue is bounded and the producer waits.
const QUEUE_CAPACITY: usize = 32;

#[derive(Parser)]
#[command(name = "bharatd")]
#[command(about = "Bharat SOC - Hindi voice assistant daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Read utterances from stdin instead of the transcriber
    #[arg(long)]
    simulate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("bharatd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = AssistantConfig::load_or_default(&cli.config)?;

    // Required model missing is a fatal startup error, reported before
    // the run loop ever starts.
    let classifier = ModelClassifier::new(&config.classifier);
    classifier.verify_model()?;

    let user_memory = memory::load(&config.memory_file).context("loading user memory")?;
    info!(
        name = user_memory.name.as_deref().unwrap_or("<unset>"),
        "user memory loaded"
    );

    let source: Box<dyn TranscriptSource> = if cli.simulate {
        info!("simulation mode: reading utterances from stdin");
        Box::new(StdinTranscript)
    } else {
        Box::new(ChildTranscript::spawn(&config.transcriber)?)
    };

    let speech = EspeakSpeech::new(&config.speech);
    let display = ConsoleDisplay::new(&config.display);
    let dispatcher = Dispatcher::new(speech, display, LoggingDeviceSink, config.thresholds);
    let resolver = Resolver::new(&config, classifier);

    run(source, resolver, dispatcher, user_memory, &config).await
}

async fn run(
    mut source: Box<dyn TranscriptSource>,
    mut resolver: Resolver<ModelClassifier>,
    mut dispatcher: Dispatcher<EspeakSpeech, ConsoleDisplay, LoggingDeviceSink>,
    mut user_memory: memory::UserMemory,
    config: &AssistantConfig,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<String>(QUEUE_CAPACITY);
    tokio::task::spawn_blocking(move || {
        while let Some(utterance) = source.next_utterance() {
            if tx.blocking_send(utterance).is_err() {
                break;
            }
        }
    });

    dispatcher.announce("System Online.", "SYSTEM", "ONLINE");
    info!("ready");

    loop {
        tokio::select! {
            next = rx.recv() => {
                let Some(text) = next else {
                    info!("utterance source closed");
                    break;
                };
                if text.trim().is_empty() {
                    continue;
                }
                let resolution = resolver.resolve(&mut user_memory, &text, Utc::now());
                match dispatcher.dispatch(resolution, &user_memory) {
                    Outcome::Continue => {}
                    Outcome::Shutdown => {
                        // Let the farewell land on the display before
                        // the process goes away.
                        tokio::time::sleep(Duration::from_secs(config.shutdown_pause_secs)).await;
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            }
        }
    }

    info!("bharatd stopped");
    Ok(())
}
