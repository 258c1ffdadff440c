//! Shared logic for the Bharat voice assistant.
//!
//! Everything with real decision-making lives here so it can be unit
//! tested without audio hardware: fuzzy keyword matching, the Hindi
//! numeral and arithmetic parser, the rule-based safety net, the
//! wake-word session state machine, the persisted user memory, the
//! intent resolver and the action dispatcher. The daemon crate wires
//! these to the external collaborators (speech-to-text, the fastText
//! model, espeak-ng, the character display, device actuators).

pub mod config;
pub mod dispatcher;
pub mod fuzzy;
pub mod intent;
pub mod memory;
pub mod numerals;
pub mod resolver;
pub mod safety_net;
pub mod session;
pub mod transliterate;
