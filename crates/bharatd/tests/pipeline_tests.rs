//! End-to-end resolution and dispatch tests.
//!
//! Drives the resolver and dispatcher with recording sinks and a
//! scripted classifier, covering the contracts the daemon relies on:
//! session gating, safety-net priority over the model, idempotent
//! device dispatch, name-learning persistence and the confidence
//! floor.

use bharat_common::config::AssistantConfig;
use bharat_common::dispatcher::{DeviceSink, DeviceStatus, Dispatcher, DisplaySink, Outcome, SpeechSink};
use bharat_common::intent::Intent;
use bharat_common::memory::{self, UserMemory};
use bharat_common::resolver::{IntentClassifier, Prediction, Resolution, Resolver};
use chrono::{Duration, Utc};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Recorder {
    spoken: Rc<RefCell<Vec<String>>>,
    shown: Rc<RefCell<Vec<(String, String)>>>,
    actuated: Rc<RefCell<Vec<(String, bool)>>>,
}

impl SpeechSink for Recorder {
    fn say(&self, text: &str) -> anyhow::Result<()> {
        self.spoken.borrow_mut().push(text.to_string());
        Ok(())
    }
}

impl DisplaySink for Recorder {
    fn show(&self, line1: &str, line2: &str) -> anyhow::Result<()> {
        self.shown
            .borrow_mut()
            .push((line1.to_string(), line2.to_string()));
        Ok(())
    }
}

impl DeviceSink for Recorder {
    fn set(&self, device: &str, on: bool) -> anyhow::Result<()> {
        self.actuated.borrow_mut().push((device.to_string(), on));
        Ok(())
    }
}

/// Classifier stub with a fixed answer and a call counter, so tests
/// can assert it was never consulted.
#[derive(Clone)]
struct ScriptedClassifier {
    label: &'static str,
    confidence: f64,
    calls: Rc<RefCell<usize>>,
}

impl ScriptedClassifier {
    fn new(label: &'static str, confidence: f64) -> Self {
        Self {
            label,
            confidence,
            calls: Rc::new(RefCell::new(0)),
        }
    }

    fn call_count(&self) -> usize {
        *self.calls.borrow()
    }
}

impl IntentClassifier for ScriptedClassifier {
    fn classify(&self, _text: &str) -> Prediction {
        *self.calls.borrow_mut() += 1;
        Prediction {
            label: self.label.to_string(),
            confidence: self.confidence,
        }
    }
}

fn test_config(memory_file: &Path) -> AssistantConfig {
    AssistantConfig {
        memory_file: memory_file.to_path_buf(),
        ..AssistantConfig::default()
    }
}

fn recording_dispatcher(
    rec: &Recorder,
    config: &AssistantConfig,
) -> Dispatcher<Recorder, Recorder, Recorder> {
    Dispatcher::new(rec.clone(), rec.clone(), rec.clone(), config.thresholds)
}

#[test]
fn asleep_utterance_never_reaches_classifier_or_dispatch() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("memory.json"));
    let classifier = ScriptedClassifier::new("greet", 0.99);
    let mut resolver = Resolver::new(&config, classifier.clone());
    let rec = Recorder::default();
    let mut dispatcher = recording_dispatcher(&rec, &config);
    let mut user_memory = UserMemory::default();

    // No wake word, session asleep: gated out entirely.
    let resolution = resolver.resolve(&mut user_memory, "लाइट जलाओ", Utc::now());
    assert_eq!(resolution, Resolution::Ignored);
    assert_eq!(classifier.call_count(), 0);

    dispatcher.dispatch(resolution, &user_memory);
    assert!(rec.spoken.borrow().is_empty());
    assert!(rec.shown.borrow().is_empty());
    assert!(rec.actuated.borrow().is_empty());
}

#[test]
fn session_expiry_discards_and_sleeps() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("memory.json"));
    let mut resolver = Resolver::new(&config, ScriptedClassifier::new("greet", 0.99));
    let mut user_memory = UserMemory::default();

    let t0 = Utc::now();
    assert_eq!(
        resolver.resolve(&mut user_memory, "भारत", t0),
        Resolution::Acknowledge
    );

    // 16s later, past the 15s window: discarded, session now asleep.
    let t1 = t0 + Duration::seconds(16);
    assert_eq!(
        resolver.resolve(&mut user_memory, "समय बताओ", t1),
        Resolution::Ignored
    );

    // Still asleep: the very next utterance is discarded too.
    let t2 = t1 + Duration::seconds(1);
    assert_eq!(
        resolver.resolve(&mut user_memory, "समय बताओ", t2),
        Resolution::Ignored
    );
}

#[test]
fn wake_word_alone_is_acknowledged() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("memory.json"));
    let mut resolver = Resolver::new(&config, ScriptedClassifier::new("greet", 0.99));
    let rec = Recorder::default();
    let mut dispatcher = recording_dispatcher(&rec, &config);
    let mut user_memory = UserMemory::default();

    let resolution = resolver.resolve(&mut user_memory, "भारत", Utc::now());
    assert_eq!(resolution, Resolution::Acknowledge);
    dispatcher.dispatch(resolution, &user_memory);
    assert_eq!(rec.spoken.borrow().as_slice(), &["Ji?".to_string()]);
}

#[test]
fn safety_net_outranks_classifier_and_math() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("memory.json"));
    // The model would happily claim this is something else.
    let classifier = ScriptedClassifier::new("greet", 0.99);
    let mut resolver = Resolver::new(&config, classifier.clone());
    let mut user_memory = UserMemory::default();

    // Device rule and math-synonym tokens in one utterance: the
    // device rule is earlier in the table and wins, and the
    // statistical classifier is never consulted.
    let resolution = resolver.resolve(&mut user_memory, "भारत लाइट जलाओ प्लस", Utc::now());
    assert!(matches!(
        resolution,
        Resolution::Act {
            intent: Intent::LightOn,
            ..
        }
    ));
    assert_eq!(classifier.call_count(), 0);
}

#[test]
fn low_confidence_prediction_is_ignored() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("memory.json"));
    // Exactly at the 0.4 floor: not strictly above, so ignored.
    let classifier = ScriptedClassifier::new("greet", 0.4);
    let mut resolver = Resolver::new(&config, classifier.clone());
    let rec = Recorder::default();
    let mut dispatcher = recording_dispatcher(&rec, &config);
    let mut user_memory = UserMemory::default();

    let resolution = resolver.resolve(&mut user_memory, "भारत नमस्ते जी", Utc::now());
    assert_eq!(resolution, Resolution::Ignored);
    assert_eq!(classifier.call_count(), 1);

    dispatcher.dispatch(resolution, &user_memory);
    assert!(rec.spoken.borrow().is_empty());
    assert!(rec.shown.borrow().is_empty());
}

#[test]
fn confident_prediction_dispatches() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("memory.json"));
    let mut resolver = Resolver::new(&config, ScriptedClassifier::new("greet", 0.9));
    let rec = Recorder::default();
    let mut dispatcher = recording_dispatcher(&rec, &config);
    let mut user_memory = UserMemory::default();

    let resolution = resolver.resolve(&mut user_memory, "भारत नमस्ते जी", Utc::now());
    assert!(matches!(
        resolution,
        Resolution::Act {
            intent: Intent::Greet,
            ..
        }
    ));
    dispatcher.dispatch(resolution, &user_memory);
    assert_eq!(
        rec.shown.borrow().last().unwrap(),
        &("NAMASTE".to_string(), "".to_string())
    );
    assert_eq!(rec.spoken.borrow().last().unwrap(), "Namaste!");
}

#[test]
fn idempotent_light_dispatch_through_pipeline() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("memory.json"));
    let mut resolver = Resolver::new(&config, ScriptedClassifier::new("unknown", 0.0));
    let rec = Recorder::default();
    let mut dispatcher = recording_dispatcher(&rec, &config);
    let mut user_memory = UserMemory::default();

    let t0 = Utc::now();
    let first = resolver.resolve(&mut user_memory, "भारत लाइट जलाओ", t0);
    dispatcher.dispatch(first, &user_memory);
    assert_eq!(dispatcher.device_status("light"), DeviceStatus::On);

    let second = resolver.resolve(&mut user_memory, "लाइट जलाओ", t0 + Duration::seconds(5));
    dispatcher.dispatch(second, &user_memory);
    assert_eq!(dispatcher.device_status("light"), DeviceStatus::On);
    assert_eq!(rec.actuated.borrow().len(), 1);
    assert_eq!(
        rec.spoken.borrow().last().unwrap(),
        "Light pehle se on hai."
    );
}

#[test]
fn name_learning_round_trip_survives_reload() {
    let dir = TempDir::new().unwrap();
    let memory_file = dir.path().join("memory.json");
    let config = test_config(&memory_file);
    let classifier = ScriptedClassifier::new("unknown", 0.0);
    let mut resolver = Resolver::new(&config, classifier.clone());
    let rec = Recorder::default();
    let mut dispatcher = recording_dispatcher(&rec, &config);
    let mut user_memory = memory::load(&memory_file).unwrap();
    assert_eq!(user_memory.name, None);

    let t0 = Utc::now();
    let resolution = resolver.resolve(&mut user_memory, "भारत मेरा नाम राम है", t0);
    assert_eq!(
        resolution,
        Resolution::NameLearned {
            name: "राम".to_string()
        }
    );
    // Declarations bypass the statistical classifier entirely.
    assert_eq!(classifier.call_count(), 0);
    dispatcher.dispatch(resolution, &user_memory);
    assert_eq!(
        rec.spoken.borrow().last().unwrap(),
        "Theek hai राम, maine yaad kar liya. RAM"
    );

    // Simulate a restart: reload the store from disk.
    let reloaded = memory::load(&memory_file).unwrap();
    assert_eq!(reloaded.name.as_deref(), Some("राम"));

    // Asking for the name is a safety-net intent answered from memory.
    let ask = resolver.resolve(&mut user_memory, "मेरा नाम क्या है", t0 + Duration::seconds(5));
    assert!(matches!(
        ask,
        Resolution::Act {
            intent: Intent::AskName,
            ..
        }
    ));
    dispatcher.dispatch(ask, &reloaded);
    assert_eq!(
        rec.shown.borrow().last().unwrap(),
        &("YOUR NAME".to_string(), "राम".to_string())
    );
}

#[test]
fn stop_intent_ends_the_run() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("memory.json"));
    let mut resolver = Resolver::new(&config, ScriptedClassifier::new("unknown", 0.0));
    let rec = Recorder::default();
    let mut dispatcher = recording_dispatcher(&rec, &config);
    let mut user_memory = UserMemory::default();

    let resolution = resolver.resolve(&mut user_memory, "भारत अब रुक जाओ", Utc::now());
    let outcome = dispatcher.dispatch(resolution, &user_memory);
    assert_eq!(outcome, Outcome::Shutdown);
    assert_eq!(rec.spoken.borrow().last().unwrap(), "Alvida.");
}
