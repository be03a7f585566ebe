//! Output waveform modes of a D5020 channel.

use std::fmt;
use std::str::FromStr;

/// Waveform driven on a channel output.
///
/// Selects the command verb and the parameter subset sent to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Waveform {
    /// Constant output, no modulation
    #[default]
    Invariant,
    Sinusoid,
    Triangle,
    Square,
    Sawtooth,
    /// Transient Nematic Effect drive
    TransientEffect,
    /// Output follows the I/O connector: V1 below 2.5 V, V2 above
    Threshold,
    /// Output toggles between V1 and V2 on each I/O pulse
    Trigger,
    /// Output driven from the external input
    ExternalInput,
}

impl Waveform {
    pub const ALL: [Waveform; 9] = [
        Waveform::Invariant,
        Waveform::Sinusoid,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::TransientEffect,
        Waveform::Threshold,
        Waveform::Trigger,
        Waveform::ExternalInput,
    ];

    /// Command verb used on the wire.
    pub const fn short_code(self) -> &'static str {
        match self {
            Waveform::Invariant => "inv",
            Waveform::Sinusoid => "sin",
            Waveform::Triangle => "tri",
            Waveform::Square => "sqr",
            Waveform::Sawtooth => "saw",
            Waveform::TransientEffect => "tnew",
            Waveform::Threshold => "thr",
            Waveform::Trigger => "trg",
            Waveform::ExternalInput => "extin",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Waveform::Invariant => "invariant",
            Waveform::Sinusoid => "sinusoid",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::TransientEffect => "transient_effect",
            Waveform::Threshold => "threshold",
            Waveform::Trigger => "trigger",
            Waveform::ExternalInput => "external_input",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the long name (`"square"`) or the wire code (`"sqr"`),
/// case-insensitively. `"tne"` is accepted for the transient effect.
impl FromStr for Waveform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "tne" {
            return Ok(Waveform::TransientEffect);
        }
        Self::ALL
            .into_iter()
            .find(|w| w.name() == s || w.short_code() == s)
            .ok_or_else(|| format!("unknown waveform '{}'", s))
    }
}
