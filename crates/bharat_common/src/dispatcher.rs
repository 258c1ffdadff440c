//! Action dispatcher: resolved intent to side effects.
//!
//! Maps each resolution to a spoken sentence, a two-line display
//! update and/or a device mutation, through sink traits the daemon
//! implements. Sink failures are logged and swallowed - a dead speaker
//! must never abort intent resolution. Device toggles are idempotent:
//! asking for a state the device is already in answers "already" and
//! changes nothing.

use crate::config::MatchThresholds;
use crate::fuzzy::contains_fuzzy;
use crate::intent::Intent;
use crate::memory::UserMemory;
use crate::numerals;
use crate::resolver::Resolution;
use crate::transliterate::spell_out;
use chrono::{Duration, Local};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Speech synthesis sink. Best-effort; failures are non-fatal.
pub trait SpeechSink {
    fn say(&self, text: &str) -> anyhow::Result<()>;
}

/// Two-line character display sink. Best-effort.
pub trait DisplaySink {
    fn show(&self, line1: &str, line2: &str) -> anyhow::Result<()>;
}

/// Physical or simulated on/off actuator per device name.
pub trait DeviceSink {
    fn set(&self, device: &str, on: bool) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    On,
    Off,
}

/// Whether the run loop keeps going after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The `stop` intent: farewell already spoken, the loop pauses
    /// briefly and exits.
    Shutdown,
}

pub struct Dispatcher<S, D, A> {
    speech: S,
    display: D,
    devices: A,
    state: HashMap<&'static str, DeviceStatus>,
    thresholds: MatchThresholds,
}

impl<S: SpeechSink, D: DisplaySink, A: DeviceSink> Dispatcher<S, D, A> {
    pub fn new(speech: S, display: D, devices: A, thresholds: MatchThresholds) -> Self {
        // Every device starts off at process start; state is not
        // persisted across runs.
        let state = HashMap::from([("light", DeviceStatus::Off), ("fan", DeviceStatus::Off)]);
        Self {
            speech,
            display,
            devices,
            state,
            thresholds,
        }
    }

    pub fn device_status(&self, device: &str) -> DeviceStatus {
        self.state
            .get(device)
            .copied()
            .unwrap_or(DeviceStatus::Off)
    }

    /// Startup announcement, outside the resolution cycle.
    pub fn announce(&self, spoken: &str, line1: &str, line2: &str) {
        self.show(line1, line2);
        self.say(spoken);
    }

    pub fn dispatch(&mut self, resolution: Resolution, user_memory: &UserMemory) -> Outcome {
        match resolution {
            Resolution::Ignored => Outcome::Continue,
            Resolution::Acknowledge => {
                self.say("Ji?");
                Outcome::Continue
            }
            Resolution::NameLearned { name } => {
                self.say(&format!(
                    "Theek hai {}, maine yaad kar liya. {}",
                    name,
                    spell_out(&name)
                ));
                Outcome::Continue
            }
            Resolution::Act { intent, text } => self.execute(intent, &text, user_memory),
        }
    }

    fn execute(&mut self, intent: Intent, text: &str, user_memory: &UserMemory) -> Outcome {
        match intent {
            Intent::Greet => {
                self.show("NAMASTE", "");
                self.say("Namaste!");
            }
            Intent::Time => {
                let now = Local::now().format("%I:%M %p").to_string();
                self.show("TIME", &now);
                self.say(&format!("Abhi {} bajey hain.", now));
            }
            Intent::Date => {
                let kw = self.thresholds.keyword;
                let (offset, day_str) = if contains_fuzzy(text, &["कल"], kw) {
                    (Duration::days(1), "Kal")
                } else if contains_fuzzy(text, &["परसों"], kw) {
                    (Duration::days(2), "Parson")
                } else {
                    (Duration::days(0), "Aaj")
                };
                let date_str = (Local::now() + offset).format("%d %B %Y").to_string();
                self.show("DATE", &date_str);
                self.say(&format!("{} ki tarikh {} hai.", day_str, date_str));
            }
            Intent::Math => {
                match numerals::evaluate(text, self.thresholds.numeral, self.thresholds.operator) {
                    Some(reply) => {
                        self.show("CALCULATION", &reply.display);
                        self.say(&reply.spoken);
                    }
                    None => self.say("Maaf kijiye, number samajh nahi aaya."),
                }
            }
            Intent::LightOn => self.toggle(
                "light",
                "LIGHT",
                DeviceStatus::On,
                "Light pehle se on hai.",
                "Light on kar di hai.",
            ),
            Intent::LightOff => self.toggle(
                "light",
                "LIGHT",
                DeviceStatus::Off,
                "Light pehle se off hai.",
                "Light off kar di hai.",
            ),
            Intent::FanOn => self.toggle(
                "fan",
                "FAN",
                DeviceStatus::On,
                "Fan pehle se chalu hai.",
                "Fan chalu kar diya hai.",
            ),
            Intent::FanOff => self.toggle(
                "fan",
                "FAN",
                DeviceStatus::Off,
                "Fan pehle se band hai.",
                "Fan band kar diya hai.",
            ),
            Intent::AskName => match &user_memory.name {
                Some(name) => {
                    self.show("YOUR NAME", name);
                    self.say(&format!("Aapka naam {} hai. {}", name, spell_out(name)));
                }
                None => {
                    self.show("NAME", "NOT SET");
                    self.say("Mujhe aapka naam nahi pata.");
                }
            },
            Intent::AskIdentity => {
                self.show("I AM", "BHARAT SOC");
                self.say("Main Bharat SOC hoon.");
            }
            Intent::Stop => {
                self.show("THANK YOU", "");
                self.say("Alvida.");
                return Outcome::Shutdown;
            }
            Intent::Unknown => {
                debug!("unknown intent, nothing to do");
            }
        }
        Outcome::Continue
    }

    fn toggle(
        &mut self,
        device: &'static str,
        label: &str,
        target: DeviceStatus,
        already_msg: &str,
        done_msg: &str,
    ) {
        let state_word = match target {
            DeviceStatus::On => "ON",
            DeviceStatus::Off => "OFF",
        };
        if self.device_status(device) == target {
            self.show(label, &format!("ALREADY {}", state_word));
            self.say(already_msg);
            return;
        }
        if let Err(e) = self.devices.set(device, target == DeviceStatus::On) {
            warn!(device, error = %e, "device actuator failed");
        }
        self.state.insert(device, target);
        self.show(label, state_word);
        self.say(done_msg);
    }

    fn say(&self, text: &str) {
        if let Err(e) = self.speech.say(text) {
            warn!(error = %e, "speech sink failed");
        }
    }

    fn show(&self, line1: &str, line2: &str) {
        if let Err(e) = self.display.show(line1, line2) {
            warn!(error = %e, "display sink failed");
        }
    }
}
