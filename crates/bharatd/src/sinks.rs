//! Speech, display and device sink implementations.
//!
//! All best-effort: the dispatcher logs and swallows their failures.

use anyhow::{ensure, Context, Result};
use bharat_common::config::{DisplaySettings, SpeechSettings};
use bharat_common::dispatcher::{DeviceSink, DisplaySink, SpeechSink};
use std::process::Command;
use tracing::info;

/// Speech synthesis through an espeak-ng subprocess.
pub struct EspeakSpeech {
    command: String,
    voice: String,
    speed: u32,
}

impl EspeakSpeech {
    pub fn new(settings: &SpeechSettings) -> Self {
        Self {
            command: settings.command.clone(),
            voice: settings.voice.clone(),
            speed: settings.speed,
        }
    }
}

impl SpeechSink for EspeakSpeech {
    fn say(&self, text: &str) -> Result<()> {
        info!(text, "assistant");
        let status = Command::new(&self.command)
            .args(["-v", &self.voice, "-s", &self.speed.to_string(), text])
            .status()
            .with_context(|| format!("running '{}'", self.command))?;
        ensure!(status.success(), "{} exited with {}", self.command, status);
        Ok(())
    }
}

/// Stand-in for the 16x2 character LCD: renders the two truncated
/// lines to stdout. The truncation budget matches the panel so what
/// you see in a terminal is what the hardware would show.
pub struct ConsoleDisplay {
    width: usize,
}

impl ConsoleDisplay {
    pub fn new(settings: &DisplaySettings) -> Self {
        Self {
            width: settings.width,
        }
    }

    fn clip(&self, line: &str) -> String {
        line.chars().take(self.width).collect()
    }
}

impl DisplaySink for ConsoleDisplay {
    fn show(&self, line1: &str, line2: &str) -> Result<()> {
        println!("|{:<width$}|", self.clip(line1), width = self.width);
        println!("|{:<width$}|", self.clip(line2), width = self.width);
        Ok(())
    }
}

/// Actuator stand-in that records switching on the log. Deployments
/// with real relays replace this with a GPIO-backed sink.
pub struct LoggingDeviceSink;

impl DeviceSink for LoggingDeviceSink {
    fn set(&self, device: &str, on: bool) -> Result<()> {
        info!(device, on, "device actuated");
        Ok(())
    }
}
