//! In-memory state of one D5020 channel.

use super::limits::Field;
use super::waveform::Waveform;
use crate::error::{D5020Error, D5020Result};
use std::fmt;

/// Physical output channel of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelNumber {
    One = 1,
    Two = 2,
}

impl ChannelNumber {
    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ChannelNumber {
    type Error = D5020Error;

    fn try_from(value: u8) -> D5020Result<Self> {
        match value {
            1 => Ok(ChannelNumber::One),
            2 => Ok(ChannelNumber::Two),
            other => Err(D5020Error::NoSuchChannel(other)),
        }
    }
}

impl fmt::Display for ChannelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Parameter set of one channel.
///
/// Values are always within the ranges of [`super::limits::CHANNEL_FIELDS`];
/// [`ChannelState::set`] is the only mutator for numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    pub(crate) waveform: Waveform,
    pub(crate) v1: u16,
    pub(crate) v2: u16,
    pub(crate) period: u16,
    pub(crate) phase: u16,
    pub(crate) duty_cycle: u8,
    pub(crate) tne_voltage: u16,
    pub(crate) tne_time: u8,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            waveform: Waveform::Invariant,
            v1: 0,
            v2: 0,
            period: 1000,
            phase: 0,
            duty_cycle: 0,
            tne_voltage: 0,
            tne_time: 0,
        }
    }
}

impl ChannelState {
    /// Defaults with a different initial `v2`, normalised like any write.
    pub fn with_v2(mut self, v2: i64) -> Self {
        self.set(Field::V2, v2);
        self
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn get(&self, field: Field) -> i64 {
        match field {
            Field::V1 => self.v1.into(),
            Field::V2 => self.v2.into(),
            Field::Period => self.period.into(),
            Field::Phase => self.phase.into(),
            Field::DutyCycle => self.duty_cycle.into(),
            Field::TneVoltage => self.tne_voltage.into(),
            Field::TneTime => self.tne_time.into(),
        }
    }

    /// Normalise `value` into the field's range and store it.
    ///
    /// Returns the stored value.
    pub fn set(&mut self, field: Field, value: i64) -> i64 {
        let value = field.normalize(value);
        // Every range fits the storage type, so the casts are lossless
        match field {
            Field::V1 => self.v1 = value as u16,
            Field::V2 => self.v2 = value as u16,
            Field::Period => self.period = value as u16,
            Field::Phase => self.phase = value as u16,
            Field::DutyCycle => self.duty_cycle = value as u8,
            Field::TneVoltage => self.tne_voltage = value as u16,
            Field::TneTime => self.tne_time = value as u8,
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ChannelState::default();
        assert_eq!(state.waveform(), Waveform::Invariant);
        assert_eq!(state.get(Field::V1), 0);
        assert_eq!(state.get(Field::V2), 0);
        assert_eq!(state.get(Field::Period), 1000);
        assert_eq!(state.get(Field::Phase), 0);
        assert_eq!(state.get(Field::DutyCycle), 0);
        assert_eq!(state.get(Field::TneVoltage), 0);
        assert_eq!(state.get(Field::TneTime), 0);
    }

    #[test]
    fn test_set_stores_normalized_value() {
        let mut state = ChannelState::default();
        assert_eq!(state.set(Field::Period, 1), 5);
        assert_eq!(state.get(Field::Period), 5);
        assert_eq!(state.set(Field::TneTime, 1_000), 255);
        assert_eq!(state.set(Field::Phase, -10), 350);
        assert_eq!(state.get(Field::Phase), 350);
    }

    #[test]
    fn test_with_v2() {
        assert_eq!(ChannelState::default().with_v2(1000).get(Field::V2), 1000);
        assert_eq!(ChannelState::default().with_v2(50_000).get(Field::V2), 10_000);
    }

    #[test]
    fn test_channel_number_conversion() {
        assert_eq!(ChannelNumber::try_from(1).unwrap(), ChannelNumber::One);
        assert_eq!(ChannelNumber::try_from(2).unwrap(), ChannelNumber::Two);
        assert!(matches!(
            ChannelNumber::try_from(3),
            Err(D5020Error::NoSuchChannel(3))
        ));
        assert_eq!(ChannelNumber::Two.to_string(), "2");
    }
}
