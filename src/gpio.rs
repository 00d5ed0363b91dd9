// GPIO input seam: the harness only ever drives input levels into the pin model.

/// One digital input transition destined for the emulated pin model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinEvent {
    pub port: u8,
    pub pin: u8,
    pub level: bool,
}

/// What the harness needs from the emulated GPIO block.
pub trait Gpio {
    /// Drives the external level of one input pin.
    fn input(&mut self, port: u8, pin: u8, level: bool);
    /// Latches the driven levels into the port registers; called once per frame.
    fn update(&mut self) {}
    fn read(&self, port: u8, pin: u8) -> bool;

    fn apply(&mut self, event: PinEvent) {
        self.input(event.port, event.pin, event.level);
    }
}

const PORTS: usize = 3;

/// Minimal pin model: external levels are driven immediately and become
/// visible to `read` on the next `update`.
#[derive(Debug, Default, Clone)]
pub struct PinBank {
    driven: [u32; PORTS],
    latched: [u32; PORTS],
}

impl PinBank {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Gpio for PinBank {
    fn input(&mut self, port: u8, pin: u8, level: bool) {
        if pin >= 32 {
            return;
        }
        let Some(word) = self.driven.get_mut(port as usize) else {
            return;
        };
        if level {
            *word |= 1 << pin;
        } else {
            *word &= !(1 << pin);
        }
    }

    fn update(&mut self) {
        self.latched = self.driven;
    }

    fn read(&self, port: u8, pin: u8) -> bool {
        pin < 32
            && self
                .latched
                .get(port as usize)
                .is_some_and(|word| word & (1 << pin) != 0)
    }
}
