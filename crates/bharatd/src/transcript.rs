//! Speech-to-text source.
//!
//! The recognizer runs as a child process and emits one finalized
//! utterance per stdout line; partial results never cross this
//! boundary. `StdinTranscript` backs `--simulate`, where an operator
//! types utterances instead of speaking them.

use anyhow::{bail, Context, Result};
use bharat_common::config::TranscriberSettings;
use std::io::{BufRead, BufReader, Lines};
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{info, warn};

/// A lazy, unbounded sequence of finalized utterance strings. Blocking
/// by nature; the daemon drives it from a dedicated producer task.
pub trait TranscriptSource: Send {
    /// Next finalized utterance, or `None` when the source is done.
    fn next_utterance(&mut self) -> Option<String>;
}

/// Utterances from an external transcriber subprocess.
pub struct ChildTranscript {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

impl ChildTranscript {
    pub fn spawn(settings: &TranscriberSettings) -> Result<Self> {
        if !settings.model_dir.exists() {
            bail!(
                "speech model directory '{}' not found",
                settings.model_dir.display()
            );
        }
        let mut child = Command::new(&settings.command)
            .arg("--model")
            .arg(&settings.model_dir)
            .args(["--samplerate", &settings.sample_rate.to_string()])
            .args(["--device", &settings.input_device.to_string()])
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("starting transcriber '{}'", settings.command))?;
        let stdout = child.stdout.take().context("transcriber stdout unavailable")?;
        info!(command = settings.command, "transcriber started");
        Ok(Self {
            child,
            lines: BufReader::new(stdout).lines(),
        })
    }
}

impl TranscriptSource for ChildTranscript {
    fn next_utterance(&mut self) -> Option<String> {
        match self.lines.next()? {
            Ok(line) => Some(line),
            Err(e) => {
                warn!(error = %e, "transcriber read error");
                None
            }
        }
    }
}

impl Drop for ChildTranscript {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Utterances typed on stdin, for development without a microphone.
#[derive(Default)]
pub struct StdinTranscript;

impl TranscriptSource for StdinTranscript {
    fn next_utterance(&mut self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end().to_string()),
            Err(e) => {
                warn!(error = %e, "stdin read error");
                None
            }
        }
    }
}
