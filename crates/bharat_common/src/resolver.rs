//! Intent resolution pipeline.
//!
//! For every utterance: the session gate first, then the rule-based
//! safety net, then the name-learning special case, and only then the
//! statistical classifier. Rule-based intents are never second-guessed
//! by the model; the model's verdict only counts above the configured
//! confidence floor.

use crate::config::AssistantConfig;
use crate::intent::Intent;
use crate::memory::{self, UserMemory};
use crate::safety_net::{SafetyNet, QUESTION_MARKERS};
use crate::session::{Admission, Session};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Phrases that introduce a name declaration. Checked in order; the
/// text after the first one present becomes the name candidate.
const NAME_TRIGGERS: &[&str] = &["मेरा नाम", "बुलाओ", "पुकारो"];

/// Trailing grammatical particles stripped from a name candidate.
const NAME_PARTICLES: &[&str] = &[" है", " हैं", " था", " को", " का"];

/// Label and confidence from the statistical classifier.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

/// External statistical classifier. Must tolerate unseen vocabulary by
/// returning a low-confidence label rather than failing.
pub trait IntentClassifier {
    fn classify(&self, text: &str) -> Prediction;
}

/// Outcome of one resolution cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Wake word alone: answer "Ji?".
    Acknowledge,
    /// A resolved intent plus the stripped utterance text (needed for
    /// math evaluation and relative-day detection downstream).
    Act { intent: Intent, text: String },
    /// A name was learned and persisted.
    NameLearned { name: String },
    /// Gated out, or the classifier was not confident enough.
    Ignored,
}

pub struct Resolver<C: IntentClassifier> {
    session: Session,
    net: SafetyNet,
    classifier: C,
    confidence_threshold: f64,
    memory_file: PathBuf,
}

impl<C: IntentClassifier> Resolver<C> {
    pub fn new(config: &AssistantConfig, classifier: C) -> Self {
        Self {
            session: Session::new(config.wake_words.clone(), config.wake_window_secs),
            net: SafetyNet::new(&config.thresholds),
            classifier,
            confidence_threshold: config.confidence_threshold,
            memory_file: config.memory_file.clone(),
        }
    }

    /// Resolve one raw transcribed utterance. Mutates `user_memory`
    /// (and its persisted file) on the name-learning path.
    pub fn resolve(
        &mut self,
        user_memory: &mut UserMemory,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Resolution {
        debug!(utterance = raw, "utterance received");

        let text = match self.session.observe(raw, now) {
            Admission::Discard => return Resolution::Ignored,
            Admission::WakeOnly => return Resolution::Acknowledge,
            Admission::Process { text } => text,
        };

        if let Some(intent) = self.net.classify(&text) {
            info!(%intent, "safety net match");
            return Resolution::Act { intent, text };
        }

        if let Some(name) = declared_name(&text) {
            user_memory.name = Some(name.clone());
            // Persist before acknowledging, so a crash after the
            // spoken confirmation cannot lose the name.
            if let Err(e) = memory::save(&self.memory_file, user_memory) {
                warn!(error = %e, "failed to persist learned name");
            }
            info!(name, "name learned");
            return Resolution::NameLearned { name };
        }

        let prediction = self.classifier.classify(&text);
        info!(
            label = prediction.label,
            confidence = prediction.confidence,
            "statistical classifier"
        );
        if prediction.confidence > self.confidence_threshold {
            Resolution::Act {
                intent: Intent::from_label(&prediction.label),
                text,
            }
        } else {
            debug!("confidence below threshold, ignoring");
            Resolution::Ignored
        }
    }
}

/// Extract a declared name, or `None` if this is not a declaration.
/// A question marker anywhere disqualifies the utterance - "मेरा नाम
/// क्या है" asks, it does not declare.
fn declared_name(text: &str) -> Option<String> {
    if !text.contains(NAME_TRIGGERS[0]) {
        return None;
    }
    if QUESTION_MARKERS.iter().any(|m| text.contains(m)) {
        return None;
    }
    let trigger = NAME_TRIGGERS.iter().find(|t| text.contains(*t))?;
    let (_, after) = text.split_once(trigger)?;
    let mut candidate = after.to_string();
    for particle in NAME_PARTICLES {
        candidate = candidate.replace(particle, "");
    }
    let name = candidate.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
