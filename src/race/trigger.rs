//! Start button edge detection

/// Fires once on a press-then-release edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartTrigger {
    armed: bool,
}

impl StartTrigger {
    pub fn new() -> Self {
        StartTrigger::default()
    }

    /// Feed the current button level. True exactly when a held button is released.
    pub fn poll(&mut self, pressed: bool) -> bool {
        match (self.armed, pressed) {
            (false, true) => {
                self.armed = true;
                false
            }
            (true, false) => {
                self.armed = false;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_release_after_press() {
        let mut trigger = StartTrigger::new();
        assert!(!trigger.poll(false));
        assert!(!trigger.poll(true));
        assert!(trigger.poll(false));
    }

    #[test]
    fn holding_does_not_fire() {
        let mut trigger = StartTrigger::new();
        for _ in 0..10 {
            assert!(!trigger.poll(true));
        }
        assert!(trigger.poll(false));
        assert!(!trigger.poll(false));
    }

    #[test]
    fn release_without_press_does_not_fire() {
        let mut trigger = StartTrigger::new();
        assert!(!trigger.poll(false));
        assert!(!trigger.poll(false));
    }
}
