//! GPIO pins claimed by the rest of the device configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Highest GPIO pin on the controller board
pub const MAX_GPIO_PIN: i32 = 29;

/// Answers whether a pin is already used outside the LED configuration
pub trait PinRegistry {
    fn is_claimed(&self, pin: i32) -> bool;
}

/// Set-backed registry, typically filled from the device's used-pin list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsedPins(BTreeSet<i32>);

impl UsedPins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pin: i32) {
        if pin >= 0 {
            self.0.insert(pin);
        }
    }

    /// Drop pins that belong to the LED configuration itself
    pub fn without<I: IntoIterator<Item = i32>>(mut self, own: I) -> Self {
        for pin in own {
            self.0.remove(&pin);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<i32> for UsedPins {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        let mut pins = UsedPins::new();
        for pin in iter {
            pins.insert(pin);
        }
        pins
    }
}

impl Extend<i32> for UsedPins {
    fn extend<I: IntoIterator<Item = i32>>(&mut self, iter: I) {
        for pin in iter {
            self.insert(pin);
        }
    }
}

impl PinRegistry for UsedPins {
    fn is_claimed(&self, pin: i32) -> bool {
        self.0.contains(&pin)
    }
}
