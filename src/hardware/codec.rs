//! D5020 command protocol
//!
//! The controller speaks a line-oriented ASCII protocol:
//!
//! ```text
//! <verb>:<channel>[,<arg>]*\n
//! ```
//!
//! Waveform commands carry a fixed, per-waveform list of positional
//! arguments (see [`template`]). Queries end in `?` and are answered with a
//! single line. Temperatures travel as raw 16-bit integers spanning
//! 0..500 K.
//!
//! Everything in this module is pure: it builds command strings and parses
//! reply lines, it never touches a transport.

use super::limits::{clamp_voltage, Field};
use super::limits::Field::{DutyCycle, Period, Phase, TneTime, TneVoltage, V1, V2};
use super::state::{ChannelNumber, ChannelState};
use super::waveform::Waveform;
use crate::error::{D5020Error, D5020Result};

/// Firmware version query.
pub const FIRMWARE_QUERY: &str = "ver:?";

/// Full scale of the raw temperature encoding.
pub const RAW_TEMPERATURE_MAX: f64 = 65_535.0;
/// Kelvin span covered by the raw encoding.
pub const TEMPERATURE_SPAN_K: f64 = 500.0;
pub const KELVIN_OFFSET: f64 = 273.15;

/// Bounds applied to a setpoint before encoding.
///
/// These are the raw encoding bounds, applied to the Celsius input.
pub const SETPOINT_INPUT_MIN: f64 = 0.0;
pub const SETPOINT_INPUT_MAX: f64 = 65_535.0;

/// One positional argument of a waveform command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Current value of a channel parameter
    Param(Field),
    /// Literal `?`
    Query,
}

const NO_PARAMS: &[Slot] = &[];
const PERIODIC_PARAMS: &[Slot] = &[
    Slot::Param(V1),
    Slot::Param(V2),
    Slot::Param(Period),
    Slot::Param(Phase),
    Slot::Param(DutyCycle),
];
const TNE_PARAMS: &[Slot] = &[
    Slot::Param(V1),
    Slot::Param(V2),
    Slot::Param(Period),
    Slot::Param(Phase),
    Slot::Param(DutyCycle),
    Slot::Param(TneVoltage),
    Slot::Param(TneTime),
];
const THRESHOLD_PARAMS: &[Slot] = &[Slot::Param(V1), Slot::Param(V2)];
const TRIGGER_PARAMS: &[Slot] = &[Slot::Query];

/// Argument list sent after the channel number for `waveform`.
///
/// Slot count and order are fixed per waveform; slots a waveform does not
/// use are not sent.
pub const fn template(waveform: Waveform) -> &'static [Slot] {
    match waveform {
        Waveform::Invariant => NO_PARAMS,
        Waveform::Sinusoid | Waveform::Triangle | Waveform::Square | Waveform::Sawtooth => {
            PERIODIC_PARAMS
        }
        Waveform::TransientEffect => TNE_PARAMS,
        Waveform::Threshold => THRESHOLD_PARAMS,
        Waveform::Trigger => TRIGGER_PARAMS,
        Waveform::ExternalInput => NO_PARAMS,
    }
}

fn command(verb: &str, channel: ChannelNumber) -> String {
    format!("{}:{}", verb, channel)
}

/// Render the full state of a channel with its active waveform's template.
pub fn encode_state(channel: ChannelNumber, state: &ChannelState) -> String {
    let mut line = command(state.waveform().short_code(), channel);
    for slot in template(state.waveform()) {
        line.push(',');
        match slot {
            Slot::Param(field) => line.push_str(&state.get(*field).to_string()),
            Slot::Query => line.push('?'),
        }
    }
    line
}

/// `thr:<ch>,<v1>,<v2>` with both voltages clamped to the output range.
pub fn encode_threshold(channel: ChannelNumber, v1: i64, v2: i64) -> String {
    format!(
        "{},{},{}",
        command(Waveform::Threshold.short_code(), channel),
        clamp_voltage(v1),
        clamp_voltage(v2)
    )
}

pub fn encode_trigger(channel: ChannelNumber) -> String {
    format!("{},?", command(Waveform::Trigger.short_code(), channel))
}

pub fn encode_external_input(channel: ChannelNumber) -> String {
    command(Waveform::ExternalInput.short_code(), channel)
}

/// `sync:<ch>,<phase>,<pulse_length_us>`, arguments passed through as given.
pub fn encode_sync(channel: ChannelNumber, phase: i64, pulse_length_us: i64) -> String {
    format!("{},{},{}", command("sync", channel), phase, pulse_length_us)
}

pub fn encode_temperature_query(channel: ChannelNumber) -> String {
    format!("{},?", command("tmp", channel))
}

pub fn encode_setpoint_query(channel: ChannelNumber) -> String {
    format!("{},?", command("tsp", channel))
}

/// `tsp:<ch>,<raw>` for a setpoint in degrees Celsius.
pub fn encode_setpoint(channel: ChannelNumber, celsius: f64) -> String {
    format!("{},{}", command("tsp", channel), celsius_to_raw(celsius))
}

/// Convert a raw temperature reading to degrees Celsius.
pub fn raw_to_celsius(raw: u16) -> f64 {
    f64::from(raw) * TEMPERATURE_SPAN_K / RAW_TEMPERATURE_MAX - KELVIN_OFFSET
}

/// Convert a setpoint in degrees Celsius to the raw value sent to the controller.
///
/// The input is first clamped to `[SETPOINT_INPUT_MIN, SETPOINT_INPUT_MAX]`;
/// the result is truncated toward zero. NaN encodes as 0.
pub fn celsius_to_raw(celsius: f64) -> u32 {
    let celsius = if celsius.is_nan() {
        SETPOINT_INPUT_MIN
    } else {
        celsius.clamp(SETPOINT_INPUT_MIN, SETPOINT_INPUT_MAX)
    };
    ((celsius + KELVIN_OFFSET) * RAW_TEMPERATURE_MAX / TEMPERATURE_SPAN_K) as u32
}

/// Parse a reply line holding a raw 16-bit integer.
pub fn decode_raw(reply: &[u8]) -> D5020Result<u16> {
    let text = std::str::from_utf8(reply)
        .map_err(|_| D5020Error::decode(reply, "reply is not ASCII"))?
        .trim();

    if text.is_empty() {
        return Err(D5020Error::decode(reply, "empty reply"));
    }

    text.parse::<u16>()
        .map_err(|e| D5020Error::decode(reply, format!("expected integer in 0..=65535: {}", e)))
}

/// Parse a temperature or setpoint reply into degrees Celsius.
pub fn decode_temperature(reply: &[u8]) -> D5020Result<f64> {
    decode_raw(reply).map(raw_to_celsius)
}

/// Firmware reply, returned as sent by the controller.
///
/// No trimming or case folding is applied. A reply that is not valid UTF-8
/// is rejected with [`D5020Error::Decode`] rather than lossily converted, so
/// the returned string is always the exact byte sequence received.
pub fn decode_firmware(reply: Vec<u8>) -> D5020Result<String> {
    String::from_utf8(reply)
        .map_err(|e| D5020Error::decode(e.as_bytes(), "firmware version is not valid text"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(waveform: Waveform) -> ChannelState {
        let mut state = ChannelState {
            waveform,
            ..ChannelState::default()
        };
        state.set(V1, 1000);
        state.set(V2, 2000);
        state.set(Period, 500);
        state.set(Phase, 90);
        state.set(DutyCycle, 50);
        state.set(TneVoltage, 9000);
        state.set(TneTime, 20);
        state
    }

    #[test]
    fn test_encode_each_waveform() {
        let ch = ChannelNumber::One;
        let cases = [
            (Waveform::Invariant, "inv:1"),
            (Waveform::Sinusoid, "sin:1,1000,2000,500,90,50"),
            (Waveform::Triangle, "tri:1,1000,2000,500,90,50"),
            (Waveform::Square, "sqr:1,1000,2000,500,90,50"),
            (Waveform::Sawtooth, "saw:1,1000,2000,500,90,50"),
            (Waveform::TransientEffect, "tnew:1,1000,2000,500,90,50,9000,20"),
            (Waveform::Threshold, "thr:1,1000,2000"),
            (Waveform::Trigger, "trg:1,?"),
            (Waveform::ExternalInput, "extin:1"),
        ];
        for (waveform, expected) in cases {
            assert_eq!(encode_state(ch, &state(waveform)), expected);
        }
    }

    #[test]
    fn test_template_arity() {
        assert_eq!(template(Waveform::Invariant).len(), 0);
        assert_eq!(template(Waveform::Square).len(), 5);
        assert_eq!(template(Waveform::TransientEffect).len(), 7);
    }

    #[test]
    fn test_encode_one_shot_commands() {
        let ch = ChannelNumber::Two;
        assert_eq!(encode_threshold(ch, 20_000, -5), "thr:2,10000,0");
        assert_eq!(encode_trigger(ch), "trg:2,?");
        assert_eq!(encode_external_input(ch), "extin:2");
        assert_eq!(encode_sync(ch, 400, -3), "sync:2,400,-3");
        assert_eq!(encode_temperature_query(ch), "tmp:2,?");
        assert_eq!(encode_setpoint_query(ch), "tsp:2,?");
    }

    #[test]
    fn test_temperature_decode_bounds() {
        assert!((decode_temperature(b"0").unwrap() - (-273.15)).abs() < 1e-9);
        assert!((decode_temperature(b"65535").unwrap() - 226.85).abs() < 1e-9);
        assert!((decode_temperature(b" 32768\r").unwrap() - (32768.0 * 500.0 / 65535.0 - 273.15)).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_decode_failures() {
        for reply in [&b""[..], b"   ", b"abc", b"12.5", b"-1", b"65536", b"\xff\xfe"] {
            assert!(
                matches!(decode_temperature(reply), Err(D5020Error::Decode { .. })),
                "{:?}",
                reply
            );
        }
    }

    #[test]
    fn test_setpoint_encoding() {
        // (c + 273.15) * 65535 / 500, truncated
        assert_eq!(celsius_to_raw(0.0), 35_801);
        assert_eq!(celsius_to_raw(100.0), 48_908);
        assert_eq!(celsius_to_raw(25.0), 39_078);
        assert_eq!(
            encode_setpoint(ChannelNumber::One, 100.0),
            "tsp:1,48908"
        );
    }

    #[test]
    fn test_setpoint_input_clamp() {
        // Below the lower bound the input saturates at 0 Celsius
        assert_eq!(celsius_to_raw(-50.0), celsius_to_raw(0.0));
        assert_eq!(celsius_to_raw(f64::NAN), celsius_to_raw(0.0));
        assert_eq!(celsius_to_raw(1.0e9), celsius_to_raw(65_535.0));
    }

    #[test]
    fn test_firmware_passthrough() {
        assert_eq!(decode_firmware(b" D5020 v2.1 ".to_vec()).unwrap(), " D5020 v2.1 ");
        assert!(decode_firmware(vec![0xff]).is_err());
    }
}
