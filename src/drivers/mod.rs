//! Output drivers and the button gesture classifier.

pub mod button;
pub mod fan;
pub mod hw_init;
pub mod status_led;
pub mod strobe;

#[cfg(test)]
pub(crate) mod testing;
