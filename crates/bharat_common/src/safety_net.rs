//! Rule-based safety net classifier.
//!
//! An ordered table of fuzzy-match rules consulted before the
//! statistical model on every utterance. It guarantees deterministic,
//! low-latency handling of the safety- and utility-critical commands
//! (above all `stop`) regardless of model drift or low confidence.
//! First matching rule wins; rule order is the priority order and is
//! visible in one place here instead of a nested conditional chain.

use crate::config::MatchThresholds;
use crate::fuzzy::{contains_fuzzy, is_similar};
use crate::intent::Intent;
use crate::numerals::ALL_OPERATOR_WORDS;

/// Exact question markers. Their presence turns a name declaration
/// into a name query, so both the name rule here and the resolver's
/// name-learning gate share this list.
pub const QUESTION_MARKERS: &[&str] = &["क्या", "बताओ", "किया"];

enum Rule {
    /// Possessive + noun token match plus an exact question marker.
    NameQuery {
        possessive: &'static [&'static str],
        noun: &'static [&'static str],
        threshold: f64,
    },
    /// Any keyword present yields the intent.
    Keywords {
        words: &'static [&'static str],
        threshold: f64,
        intent: Intent,
    },
    /// Device mention disambiguated by an on/off cue. A bare mention
    /// without a cue yields nothing and falls through to the
    /// statistical classifier (preserved source behavior).
    Device {
        device: &'static [&'static str],
        on: &'static [&'static str],
        off: &'static [&'static str],
        threshold: f64,
        on_intent: Intent,
        off_intent: Intent,
    },
}

impl Rule {
    fn apply(&self, text: &str) -> Option<Intent> {
        match self {
            Rule::NameQuery {
                possessive,
                noun,
                threshold,
            } => {
                let tokens: Vec<&str> = text.split_whitespace().collect();
                let mentioned = possessive.iter().any(|w| is_similar(w, &tokens, *threshold))
                    && noun.iter().any(|w| is_similar(w, &tokens, *threshold));
                if mentioned && QUESTION_MARKERS.iter().any(|m| text.contains(m)) {
                    Some(Intent::AskName)
                } else {
                    None
                }
            }
            Rule::Keywords {
                words,
                threshold,
                intent,
            } => contains_fuzzy(text, words, *threshold).then_some(*intent),
            Rule::Device {
                device,
                on,
                off,
                threshold,
                on_intent,
                off_intent,
            } => {
                if !contains_fuzzy(text, device, *threshold) {
                    return None;
                }
                if contains_fuzzy(text, on, *threshold) {
                    Some(*on_intent)
                } else if contains_fuzzy(text, off, *threshold) {
                    Some(*off_intent)
                } else {
                    None
                }
            }
        }
    }
}

pub struct SafetyNet {
    rules: Vec<Rule>,
}

impl SafetyNet {
    pub fn new(thresholds: &MatchThresholds) -> Self {
        let kw = thresholds.keyword;
        Self {
            rules: vec![
                Rule::NameQuery {
                    possessive: &["मेरा"],
                    noun: &["नाम"],
                    threshold: thresholds.token,
                },
                Rule::Keywords {
                    words: &["तुम", "कौन", "किसने", "बनाया"],
                    threshold: kw,
                    intent: Intent::AskIdentity,
                },
                Rule::Keywords {
                    words: &["रुक", "स्टॉप", "बस", "बंद"],
                    threshold: kw,
                    intent: Intent::Stop,
                },
                Rule::Device {
                    device: &["लाइट", "बत्ती", "बल्ब"],
                    on: &["ऑन", "चालू", "जलाओ"],
                    off: &["ऑफ", "बंद", "बुझाओ"],
                    threshold: kw,
                    on_intent: Intent::LightOn,
                    off_intent: Intent::LightOff,
                },
                Rule::Device {
                    device: &["फैन", "पंखा", "हवा"],
                    on: &["ऑन", "चालू", "चलाओ"],
                    off: &["ऑफ", "बंद", "रोको"],
                    threshold: kw,
                    on_intent: Intent::FanOn,
                    off_intent: Intent::FanOff,
                },
                Rule::Keywords {
                    words: &["टाइम", "समय", "बजे"],
                    threshold: kw,
                    intent: Intent::Time,
                },
                Rule::Keywords {
                    words: &["डेट", "तारीख", "दिन"],
                    threshold: kw,
                    intent: Intent::Date,
                },
                Rule::Keywords {
                    words: ALL_OPERATOR_WORDS,
                    threshold: kw,
                    intent: Intent::Math,
                },
            ],
        }
    }

    /// Evaluate the rule table top to bottom; first match wins.
    pub fn classify(&self, text: &str) -> Option<Intent> {
        self.rules.iter().find_map(|rule| rule.apply(text))
    }
}
