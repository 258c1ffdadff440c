//! Statistical classifier adapter.
//!
//! Runs a fastText-style `predict-prob` child once and keeps it alive:
//! one utterance per stdin line, one `__label__<intent> <confidence>`
//! answer per stdout line, so the model is loaded a single time at
//! first use rather than per utterance. Any failure - missing binary,
//! crash, garbage output - degrades to an ignorable ("unknown", 0.0)
//! prediction and discards the child; the next utterance respawns it.
//! The model must never take the daemon down.

use anyhow::{bail, Context, Result};
use bharat_common::config::ClassifierSettings;
use bharat_common::resolver::{IntentClassifier, Prediction};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;
use tracing::{info, warn};

pub struct ModelClassifier {
    command: String,
    model_file: PathBuf,
    child: Mutex<Option<ModelProcess>>,
}

impl ModelClassifier {
    pub fn new(settings: &ClassifierSettings) -> Self {
        Self {
            command: settings.command.clone(),
            model_file: settings.model_file.clone(),
            child: Mutex::new(None),
        }
    }

    /// Startup check. A missing model is a fatal configuration error
    /// and the operator has to fix it before the run loop starts.
    pub fn verify_model(&self) -> Result<()> {
        if !self.model_file.exists() {
            bail!(
                "classifier model '{}' not found; copy the trained model next to the daemon",
                self.model_file.display()
            );
        }
        Ok(())
    }

    fn predict(&self, text: &str) -> Result<Prediction> {
        let mut guard = match self.child.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_none() {
            *guard = Some(ModelProcess::spawn(&self.command, &self.model_file)?);
        }
        let outcome = guard
            .as_mut()
            .context("classifier process unavailable")
            .and_then(|process| process.predict(text));
        if outcome.is_err() {
            // Dead or wedged child: drop it, the next utterance
            // respawns a fresh one.
            *guard = None;
        }
        outcome
    }
}

impl IntentClassifier for ModelClassifier {
    fn classify(&self, text: &str) -> Prediction {
        match self.predict(text) {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!(error = %e, "classifier failed, treating as unknown");
                Prediction {
                    label: "unknown".to_string(),
                    confidence: 0.0,
                }
            }
        }
    }
}

/// The long-lived `predict-prob` child and its line-protocol pipes.
struct ModelProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ModelProcess {
    fn spawn(command: &str, model_file: &Path) -> Result<Self> {
        let mut child = Command::new(command)
            .arg("predict-prob")
            .arg(model_file)
            .arg("-")
            .arg("1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("spawning classifier '{}'", command))?;
        let stdin = child.stdin.take().context("classifier stdin unavailable")?;
        let stdout = child
            .stdout
            .take()
            .context("classifier stdout unavailable")?;
        info!(command, "classifier started");
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn predict(&mut self, text: &str) -> Result<Prediction> {
        self.stdin
            .write_all(format!("{}\n", text).as_bytes())
            .context("writing utterance to classifier")?;
        self.stdin.flush().context("flushing classifier stdin")?;

        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .context("reading classifier output")?;
        if read == 0 {
            bail!("classifier closed its output");
        }
        parse_prediction(&line)
    }
}

impl Drop for ModelProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Parse one `__label__<intent> <confidence>` line.
fn parse_prediction(line: &str) -> Result<Prediction> {
    let line = line.trim_end();
    let mut parts = line.split_whitespace();
    let label = parts
        .next()
        .and_then(|raw| raw.strip_prefix("__label__"))
        .with_context(|| format!("no label in classifier output: {:?}", line))?;
    let confidence: f64 = parts
        .next()
        .with_context(|| format!("no confidence in classifier output: {:?}", line))?
        .parse()
        .context("confidence is not a number")?;
    Ok(Prediction {
        label: label.to_string(),
        confidence: confidence.clamp(0.0, 1.0),
    })
}
