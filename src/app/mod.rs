//! Application core: port traits and the serialized event entry point.
//!
//! All interaction with hardware happens through the **port traits** in
//! [`ports`]; [`service`] wraps the state machine in the event lock so
//! any number of producers can submit events.

pub mod ports;
pub mod service;
