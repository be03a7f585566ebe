//! Parameter limits of a D5020 channel
//!
//! Every numeric channel parameter is described once in [`CHANNEL_FIELDS`]:
//! name, label, unit and the closed range the controller accepts. Writes are
//! never rejected; they are normalised into range, either by saturating at
//! the bounds or, for the phase, by wrapping around the circle.

use std::fmt;

pub const MIN_VOLTAGE_MV: i64 = 0;
pub const MAX_VOLTAGE_MV: i64 = 10_000;

pub const MIN_PERIOD_MS: i64 = 5;
pub const MAX_PERIOD_MS: i64 = 65_535;

pub const MIN_PHASE_DEG: i64 = 0;
pub const MAX_PHASE_DEG: i64 = 359;

pub const MIN_DUTY_CYCLE: i64 = 0;
pub const MAX_DUTY_CYCLE: i64 = 100;

pub const MIN_TNE_TIME_MS: i64 = 0;
pub const MAX_TNE_TIME_MS: i64 = 255;

/// How an out-of-range value is brought back into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Saturate at the nearest bound
    Clamp,
    /// Reduce modulo the range width
    Wrap,
}

/// Numeric channel parameters.
///
/// Discriminants index [`CHANNEL_FIELDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    V1 = 0,
    V2 = 1,
    Period = 2,
    Phase = 3,
    DutyCycle = 4,
    TneVoltage = 5,
    TneTime = 6,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::V1,
        Field::V2,
        Field::Period,
        Field::Phase,
        Field::DutyCycle,
        Field::TneVoltage,
        Field::TneTime,
    ];

    pub fn spec(self) -> &'static FieldSpec {
        &CHANNEL_FIELDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look a field up by its attribute name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn normalize(self, value: i64) -> i64 {
        self.spec().normalize(value)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declarative description of one channel parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: i64,
    pub max: i64,
    pub normalize: Normalize,
}

impl FieldSpec {
    /// Bring `value` into `[min, max]`.
    pub fn normalize(&self, value: i64) -> i64 {
        match self.normalize {
            Normalize::Clamp => value.clamp(self.min, self.max),
            Normalize::Wrap => self.min + (value - self.min).rem_euclid(self.max - self.min + 1),
        }
    }
}

pub static CHANNEL_FIELDS: [FieldSpec; 7] = [
    FieldSpec {
        field: Field::V1,
        name: "v1",
        label: "Voltage 1",
        unit: "mV",
        min: MIN_VOLTAGE_MV,
        max: MAX_VOLTAGE_MV,
        normalize: Normalize::Clamp,
    },
    FieldSpec {
        field: Field::V2,
        name: "v2",
        label: "Voltage 2",
        unit: "mV",
        min: MIN_VOLTAGE_MV,
        max: MAX_VOLTAGE_MV,
        normalize: Normalize::Clamp,
    },
    FieldSpec {
        field: Field::Period,
        name: "period",
        label: "Period",
        unit: "ms",
        min: MIN_PERIOD_MS,
        max: MAX_PERIOD_MS,
        normalize: Normalize::Clamp,
    },
    FieldSpec {
        field: Field::Phase,
        name: "phase",
        label: "Phase",
        unit: "deg",
        min: MIN_PHASE_DEG,
        max: MAX_PHASE_DEG,
        normalize: Normalize::Wrap,
    },
    FieldSpec {
        field: Field::DutyCycle,
        name: "duty_cycle",
        label: "Duty cycle",
        unit: "%",
        min: MIN_DUTY_CYCLE,
        max: MAX_DUTY_CYCLE,
        normalize: Normalize::Clamp,
    },
    FieldSpec {
        field: Field::TneVoltage,
        name: "tne_voltage",
        label: "TNE voltage",
        unit: "mV",
        min: MIN_VOLTAGE_MV,
        max: MAX_VOLTAGE_MV,
        normalize: Normalize::Clamp,
    },
    FieldSpec {
        field: Field::TneTime,
        name: "tne_time",
        label: "TNE time",
        unit: "ms",
        min: MIN_TNE_TIME_MS,
        max: MAX_TNE_TIME_MS,
        normalize: Normalize::Clamp,
    },
];

/// Clamp a voltage in millivolts to the output range.
pub fn clamp_voltage(value: i64) -> i64 {
    value.clamp(MIN_VOLTAGE_MV, MAX_VOLTAGE_MV)
}
