//! Assistant configuration.
//!
//! Loaded from a TOML file next to the daemon (`bharat.toml` by
//! default). Every field has a default matching the shipped hardware
//! setup, so a missing file is not an error - only a malformed one is.
//! Fuzzy-match thresholds and the classifier confidence floor are
//! configuration, not hidden constants.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file, resolved relative to the working
/// directory like the model and memory files.
pub const DEFAULT_CONFIG_FILE: &str = "bharat.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Trigger phrases that wake the assistant. Matched by exact
    /// substring containment; the list carries the recognizer's usual
    /// mangled renderings of the name.
    #[serde(default = "default_wake_words")]
    pub wake_words: Vec<String>,

    /// Inactivity window in seconds before an awake session lapses.
    #[serde(default = "default_wake_window_secs")]
    pub wake_window_secs: i64,

    #[serde(default)]
    pub thresholds: MatchThresholds,

    /// Classifier predictions at or below this confidence are ignored.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Persisted user memory record.
    #[serde(default = "default_memory_file")]
    pub memory_file: PathBuf,

    #[serde(default)]
    pub speech: SpeechSettings,

    #[serde(default)]
    pub classifier: ClassifierSettings,

    #[serde(default)]
    pub transcriber: TranscriberSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    /// Pause after the farewell on `stop`, so the display and speech
    /// land before the process exits.
    #[serde(default = "default_shutdown_pause_secs")]
    pub shutdown_pause_secs: u64,
}

fn default_wake_words() -> Vec<String> {
    ["bharat", "भारत", "barat", "bart", "varat", "parrot", "birth", "baarat"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_wake_window_secs() -> i64 {
    15
}

fn default_confidence_threshold() -> f64 {
    0.4
}

fn default_memory_file() -> PathBuf {
    PathBuf::from("personal_memory.json")
}

fn default_shutdown_pause_secs() -> u64 {
    2
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_words: default_wake_words(),
            wake_window_secs: default_wake_window_secs(),
            thresholds: MatchThresholds::default(),
            confidence_threshold: default_confidence_threshold(),
            memory_file: default_memory_file(),
            speech: SpeechSettings::default(),
            classifier: ClassifierSettings::default(),
            transcriber: TranscriberSettings::default(),
            display: DisplaySettings::default(),
            shutdown_pause_secs: default_shutdown_pause_secs(),
        }
    }
}

impl AssistantConfig {
    /// Load from `path`, falling back to defaults when the file does
    /// not exist. A file that exists but fails to parse is a startup
    /// error - a silently ignored typo in thresholds is worse than a
    /// refusal to start.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Fuzzy-match thresholds per call site. Short command synonyms vary
/// a lot across dialects and get the loosest floor; numeral lookup is
/// the strictest because a wrong operand is worse than no answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchThresholds {
    /// Single-token tests in the name-query rule.
    #[serde(default = "default_token_threshold")]
    pub token: f64,

    /// Safety-net keyword rules.
    #[serde(default = "default_keyword_threshold")]
    pub keyword: f64,

    /// Arithmetic operator synonyms.
    #[serde(default = "default_operator_threshold")]
    pub operator: f64,

    /// Numeral lexicon lookup (exceed, not reach).
    #[serde(default = "default_numeral_threshold")]
    pub numeral: f64,
}

fn default_token_threshold() -> f64 {
    0.8
}

fn default_keyword_threshold() -> f64 {
    0.75
}

fn default_operator_threshold() -> f64 {
    0.6
}

fn default_numeral_threshold() -> f64 {
    0.85
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            token: default_token_threshold(),
            keyword: default_keyword_threshold(),
            operator: default_operator_threshold(),
            numeral: default_numeral_threshold(),
        }
    }
}

/// Speech synthesis sink settings (espeak-ng subprocess).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    #[serde(default = "default_speech_command")]
    pub command: String,

    /// espeak-ng voice identifier.
    #[serde(default = "default_speech_voice")]
    pub voice: String,

    /// Words per minute.
    #[serde(default = "default_speech_speed")]
    pub speed: u32,
}

fn default_speech_command() -> String {
    "espeak-ng".to_string()
}

fn default_speech_voice() -> String {
    "hi".to_string()
}

fn default_speech_speed() -> u32 {
    140
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            command: default_speech_command(),
            voice: default_speech_voice(),
            speed: default_speech_speed(),
        }
    }
}

/// Statistical intent classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Trained fastText model. Must exist at startup.
    #[serde(default = "default_model_file")]
    pub model_file: PathBuf,

    /// Command invoked as `<command> predict-prob <model> - 1`.
    #[serde(default = "default_classifier_command")]
    pub command: String,
}

fn default_model_file() -> PathBuf {
    PathBuf::from("brain_model.ftz")
}

fn default_classifier_command() -> String {
    "fasttext".to_string()
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model_file: default_model_file(),
            command: default_classifier_command(),
        }
    }
}

/// Speech-to-text transcriber settings. The transcriber runs as a
/// child process emitting one finalized utterance per stdout line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberSettings {
    #[serde(default = "default_transcriber_command")]
    pub command: String,

    /// Acoustic model directory. Must exist at startup.
    #[serde(default = "default_transcriber_model_dir")]
    pub model_dir: PathBuf,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// ALSA capture device index.
    #[serde(default = "default_input_device")]
    pub input_device: u32,
}

fn default_transcriber_command() -> String {
    "vosk-transcriber".to_string()
}

fn default_transcriber_model_dir() -> PathBuf {
    PathBuf::from("model")
}

fn default_sample_rate() -> u32 {
    44_100
}

fn default_input_device() -> u32 {
    1
}

impl Default for TranscriberSettings {
    fn default() -> Self {
        Self {
            command: default_transcriber_command(),
            model_dir: default_transcriber_model_dir(),
            sample_rate: default_sample_rate(),
            input_device: default_input_device(),
        }
    }
}

/// Two-line character display settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Characters per line.
    #[serde(default = "default_display_width")]
    pub width: usize,
}

fn default_display_width() -> usize {
    16
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            width: default_display_width(),
        }
    }
}
