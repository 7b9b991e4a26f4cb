//! Controller input for the key-combo monitor.

use std::{
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use bitflags::bitflags;

bitflags! {
    /// Npad button bitmask (`HidNpadButton`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Keys: u64 {
        const A = 1 << 0;
        const B = 1 << 1;
        const X = 1 << 2;
        const Y = 1 << 3;
        const STICK_L = 1 << 4;
        const STICK_R = 1 << 5;
        const L = 1 << 6;
        const R = 1 << 7;
        const ZL = 1 << 8;
        const ZR = 1 << 9;
        const PLUS = 1 << 10;
        const MINUS = 1 << 11;
        const LEFT = 1 << 12;
        const UP = 1 << 13;
        const RIGHT = 1 << 14;
        const DOWN = 1 << 15;
    }
}

impl Keys {
    /// Parses a list of button names into a combination.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ParseKeyError> {
        names
            .iter()
            .try_fold(Self::empty(), |keys, name| Ok(keys | name.as_ref().parse()?))
    }
}

impl FromStr for Keys {
    type Err = ParseKeyError;

    /// Parses a single button name, case-insensitively (`"l"`, `"ZR"`, `"plus"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(&s.trim().to_ascii_uppercase()).ok_or_else(|| ParseKeyError(s.to_owned()))
    }
}

/// Error returned when a button name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown button name {0:?}")]
pub struct ParseKeyError(pub String);

/// A source of controller button presses.
pub trait InputSource: Send {
    /// Returns the buttons newly pressed since the previous call.
    fn keys_down(&mut self) -> Result<Keys, InputError>;
}

/// Error returned by [`InputSource::keys_down`].
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The input device went away.
    #[error("input device disconnected")]
    Disconnected,
}

/// A software controller.
///
/// Clones share the same button latch: presses made through any clone are
/// reported once by the next [`InputSource::keys_down`] call.
#[derive(Debug, Clone, Default)]
pub struct VirtualPad {
    pressed: Arc<AtomicU64>,
}

impl VirtualPad {
    /// Creates a pad with no pending presses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Presses `keys` until the next poll.
    pub fn press(&self, keys: Keys) {
        self.pressed.fetch_or(keys.bits(), Ordering::AcqRel);
    }
}

impl InputSource for VirtualPad {
    fn keys_down(&mut self) -> Result<Keys, InputError> {
        let bits = self.pressed.swap(0, Ordering::AcqRel);
        Ok(Keys::from_bits_truncate(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("l".parse::<Keys>(), Ok(Keys::L));
        assert_eq!(" ZR ".parse::<Keys>(), Ok(Keys::ZR));
        assert_eq!(Keys::from_names(&["L", "R"]), Ok(Keys::L | Keys::R));
        assert_eq!(
            Keys::from_names(&["L", "home"]),
            Err(ParseKeyError("home".to_owned()))
        );
    }

    #[test]
    fn test_virtual_pad_reports_press_once() {
        let pad = VirtualPad::new();
        let mut source = pad.clone();

        pad.press(Keys::L);
        pad.press(Keys::R);

        assert_eq!(source.keys_down().unwrap(), Keys::L | Keys::R);
        assert_eq!(source.keys_down().unwrap(), Keys::empty());
    }
}
