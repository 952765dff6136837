use crate::hal::gpio::{InputPin, OutputPin};
use std::vec::Vec;

#[derive(Clone, Debug, Default)]
pub struct MockPin {
    pub state: bool,
    pub changes: Vec<bool>,
    /// A stuck pin ignores writes, like a relay driver with a blown transistor.
    pub stuck: bool,
}

impl MockPin {
    pub fn high() -> Self { Self { state: true, ..Default::default() } }
}

impl OutputPin for MockPin {
    fn set_low(&mut self) {
        if !self.stuck {
            self.state = false;
        }
        self.changes.push(false);
    }

    fn set_high(&mut self) {
        if !self.stuck {
            self.state = true;
        }
        self.changes.push(true);
    }
}

impl InputPin for MockPin {
    fn is_high(&self) -> bool { self.state }
}
