use std::collections::VecDeque;

use crate::gpio::{Gpio, PinEvent};

/// Host keys the harness can see. Anything the backend cannot name is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKey {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    C,
    S,
    D,
    Other,
}

/// Host events as seen by the frame loop, already stripped of backend detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Quit,
    Key { key: HostKey, pressed: bool },
    /// Anything else the backend reported; never acted on.
    Other,
}

/// Non-blocking host event queue.
pub trait EventSource {
    /// Next queued event, or `None` once the queue is drained.
    fn poll_event(&mut self) -> Option<HostEvent>;
}

impl EventSource for VecDeque<HostEvent> {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.pop_front()
    }
}

/// Pokitto buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    C,
}

/// Host key -> button. S and D sit next to A so all three buttons fit under one hand.
const KEY_MAP: [(HostKey, Button); 9] = [
    (HostKey::Up, Button::Up),
    (HostKey::Down, Button::Down),
    (HostKey::Left, Button::Left),
    (HostKey::Right, Button::Right),
    (HostKey::A, Button::A),
    (HostKey::B, Button::B),
    (HostKey::S, Button::B),
    (HostKey::C, Button::C),
    (HostKey::D, Button::C),
];

/// Button -> (port, pin) inputs it drives.
const PIN_MAP: [(Button, &[(u8, u8)]); 7] = [
    (Button::Up, &[(1, 13)]),
    (Button::Down, &[(1, 3)]),
    (Button::Left, &[(1, 25)]),
    (Button::Right, &[(1, 7)]),
    (Button::A, &[(1, 9)]),
    (Button::B, &[(1, 4)]),
    (Button::C, &[(1, 10)]),
];

pub fn button_for(key: HostKey) -> Option<Button> {
    KEY_MAP
        .iter()
        .find(|(k, _)| *k == key)
        .map(|&(_, button)| button)
}

pub fn pins_for(button: Button) -> &'static [(u8, u8)] {
    PIN_MAP
        .iter()
        .find(|(b, _)| *b == button)
        .map(|&(_, pins)| pins)
        .unwrap_or(&[])
}

/// Folds host key transitions into level-triggered GPIO inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputBridge;

impl InputBridge {
    pub fn new() -> Self {
        Self
    }

    /// Pin events for one key transition; empty for unmapped keys.
    pub fn events_for(&self, key: HostKey, pressed: bool) -> impl Iterator<Item = PinEvent> {
        button_for(key)
            .map_or(&[][..], pins_for)
            .iter()
            .map(move |&(port, pin)| PinEvent {
                port,
                pin,
                level: pressed,
            })
    }

    pub fn on_key_transition<G: Gpio + ?Sized>(&self, key: HostKey, pressed: bool, gpio: &mut G) {
        for event in self.events_for(key, pressed) {
            gpio.apply(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingGpio {
        events: Vec<PinEvent>,
    }

    impl Gpio for RecordingGpio {
        fn input(&mut self, port: u8, pin: u8, level: bool) {
            self.events.push(PinEvent { port, pin, level });
        }

        fn read(&self, _port: u8, _pin: u8) -> bool {
            false
        }
    }

    fn ev(port: u8, pin: u8, level: bool) -> PinEvent {
        PinEvent { port, pin, level }
    }

    #[test]
    fn test_press_release_each_mapped_key() {
        let cases = [
            (HostKey::Up, (1, 13)),
            (HostKey::Down, (1, 3)),
            (HostKey::Left, (1, 25)),
            (HostKey::Right, (1, 7)),
            (HostKey::A, (1, 9)),
            (HostKey::B, (1, 4)),
            (HostKey::S, (1, 4)),
            (HostKey::C, (1, 10)),
            (HostKey::D, (1, 10)),
        ];
        let bridge = InputBridge::new();
        for (key, (port, pin)) in cases {
            let mut gpio = RecordingGpio::default();
            bridge.on_key_transition(key, true, &mut gpio);
            bridge.on_key_transition(key, false, &mut gpio);
            assert_eq!(
                gpio.events,
                vec![ev(port, pin, true), ev(port, pin, false)],
                "key {:?}",
                key
            );
        }
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let mut gpio = RecordingGpio::default();
        InputBridge::new().on_key_transition(HostKey::Other, true, &mut gpio);
        assert!(gpio.events.is_empty());
        assert_eq!(button_for(HostKey::Other), None);
    }

    #[test]
    fn test_up_and_down_held_together() {
        let bridge = InputBridge::new();
        let mut gpio = RecordingGpio::default();
        bridge.on_key_transition(HostKey::Up, true, &mut gpio);
        bridge.on_key_transition(HostKey::Down, true, &mut gpio);
        assert_eq!(gpio.events, vec![ev(1, 13, true), ev(1, 3, true)]);
    }

    #[test]
    fn test_aliases_share_a_button() {
        assert_eq!(button_for(HostKey::S), button_for(HostKey::B));
        assert_eq!(button_for(HostKey::D), button_for(HostKey::C));
    }

    #[test]
    fn test_every_button_has_pins() {
        for (_, button) in KEY_MAP {
            assert!(!pins_for(button).is_empty(), "{:?}", button);
        }
    }
}
