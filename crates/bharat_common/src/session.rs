//! Wake-word session state machine.
//!
//! The assistant only acts while a session is awake. A wake word opens
//! (or refreshes) the session; silence past the inactivity window puts
//! it back to sleep lazily on the next utterance, with no timer task.
//! Timestamps are passed in so the transitions are testable.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Verdict for one incoming utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Admitted for classification; wake word already stripped.
    Process { text: String },
    /// Wake word alone. The dispatcher answers with an
    /// acknowledgement instead of running the classifiers.
    WakeOnly,
    /// Asleep, or the window lapsed. Dropped without processing.
    Discard,
}

pub struct Session {
    awake: bool,
    last_interaction: Option<DateTime<Utc>>,
    window: Duration,
    wake_words: Vec<String>,
}

impl Session {
    pub fn new(wake_words: Vec<String>, window_secs: i64) -> Self {
        Self {
            awake: false,
            last_interaction: None,
            window: Duration::seconds(window_secs),
            wake_words,
        }
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    /// Run one utterance through the gate.
    ///
    /// Wake words are short and distinctive, so exact substring
    /// containment is enough; the first hit is stripped from the text
    /// before further processing.
    pub fn observe(&mut self, raw: &str, now: DateTime<Utc>) -> Admission {
        let mut text = raw.to_string();
        let mut wake_heard = false;
        for word in &self.wake_words {
            if text.contains(word.as_str()) {
                wake_heard = true;
                text = text.replace(word.as_str(), "").trim().to_string();
                break;
            }
        }

        if wake_heard {
            self.awake = true;
            self.last_interaction = Some(now);
        } else if self.awake {
            let last = self.last_interaction.unwrap_or(now);
            if now - last > self.window {
                debug!("session window lapsed, going back to sleep");
                self.awake = false;
                return Admission::Discard;
            }
            self.last_interaction = Some(now);
        } else {
            debug!("asleep and no wake word, dropping utterance");
            return Admission::Discard;
        }

        if text.is_empty() && wake_heard {
            return Admission::WakeOnly;
        }
        Admission::Process { text }
    }
}
