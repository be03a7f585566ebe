//! One output channel of the D5020
//!
//! A [`Channel`] keeps the parameter set of its output and pushes the whole
//! set to the controller after every change. Numeric writes are normalised
//! (see [`super::limits`]), never rejected.
//!
//! # Example
//!
//! ```no_run
//! use meadowlark_d5020::adapters::{SerialAdapter, SharedTransport};
//! use meadowlark_d5020::hardware::{Channel, ChannelNumber, Waveform};
//!
//! # async fn example() -> meadowlark_d5020::D5020Result<()> {
//! let transport = SharedTransport::from_boxed(SerialAdapter::new("/dev/ttyUSB0", 115200).connect()?);
//! let mut channel = Channel::new(ChannelNumber::One, transport);
//!
//! channel.set_waveform(Waveform::Square).await?;   // sqr:1,0,0,1000,0,0
//! channel.set_v2(5000).await?;                     // sqr:1,0,5000,1000,0,0
//! let celsius = channel.query_lc_temperature().await?;
//! # Ok(())
//! # }
//! ```

use super::codec;
use super::external_input::{ExternalInputControl, ToggleExternalInput};
use super::limits::Field;
use super::state::{ChannelNumber, ChannelState};
use super::waveform::Waveform;
use crate::adapters::SharedTransport;
use crate::error::{D5020Error, D5020Result};
use std::fmt;

/// Value of a channel attribute addressed by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    Waveform(Waveform),
    Integer(i64),
    Bool(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Waveform(w) => write!(f, "{}", w),
            AttributeValue::Integer(v) => write!(f, "{}", v),
            AttributeValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

pub struct Channel {
    number: ChannelNumber,
    state: ChannelState,
    transport: SharedTransport,
    external_input: Box<dyn ExternalInputControl>,
}

impl Channel {
    pub fn new(number: ChannelNumber, transport: SharedTransport) -> Self {
        Self::with_state(number, transport, ChannelState::default())
    }

    /// Create a channel starting from `state`. Nothing is sent until the
    /// first write.
    pub fn with_state(number: ChannelNumber, transport: SharedTransport, state: ChannelState) -> Self {
        Self {
            number,
            state,
            transport,
            external_input: Box::new(ToggleExternalInput::default()),
        }
    }

    /// Replace the external input behaviour.
    pub fn with_external_input(mut self, control: Box<dyn ExternalInputControl>) -> Self {
        self.external_input = control;
        self
    }

    pub fn number(&self) -> ChannelNumber {
        self.number
    }

    /// Copy of the current parameter set.
    pub fn snapshot(&self) -> ChannelState {
        self.state
    }

    // ------------------------------------------------------------------
    // Waveform and numeric parameters
    // ------------------------------------------------------------------

    pub fn waveform(&self) -> Waveform {
        self.state.waveform
    }

    pub async fn set_waveform(&mut self, waveform: Waveform) -> D5020Result<()> {
        self.state.waveform = waveform;
        self.update_device().await
    }

    pub fn get(&self, field: Field) -> i64 {
        self.state.get(field)
    }

    /// Normalise and store `value`, then push the full state.
    ///
    /// The stored value is kept even if the write fails.
    pub async fn set(&mut self, field: Field, value: i64) -> D5020Result<()> {
        self.state.set(field, value);
        self.update_device().await
    }

    /// Voltage 1 in millivolts.
    pub fn v1(&self) -> u16 {
        self.state.v1
    }

    pub async fn set_v1(&mut self, millivolts: i64) -> D5020Result<()> {
        self.set(Field::V1, millivolts).await
    }

    /// Voltage 2 in millivolts.
    pub fn v2(&self) -> u16 {
        self.state.v2
    }

    pub async fn set_v2(&mut self, millivolts: i64) -> D5020Result<()> {
        self.set(Field::V2, millivolts).await
    }

    /// Waveform period in milliseconds.
    pub fn period(&self) -> u16 {
        self.state.period
    }

    pub async fn set_period(&mut self, millis: i64) -> D5020Result<()> {
        self.set(Field::Period, millis).await
    }

    /// Phase in degrees, `0..360`.
    pub fn phase(&self) -> u16 {
        self.state.phase
    }

    /// Any angle is accepted and reduced modulo 360.
    pub async fn set_phase(&mut self, degrees: i64) -> D5020Result<()> {
        self.set(Field::Phase, degrees).await
    }

    /// Duty cycle in percent.
    pub fn duty_cycle(&self) -> u8 {
        self.state.duty_cycle
    }

    pub async fn set_duty_cycle(&mut self, percent: i64) -> D5020Result<()> {
        self.set(Field::DutyCycle, percent).await
    }

    /// TNE pulse voltage in millivolts.
    pub fn tne_voltage(&self) -> u16 {
        self.state.tne_voltage
    }

    pub async fn set_tne_voltage(&mut self, millivolts: i64) -> D5020Result<()> {
        self.set(Field::TneVoltage, millivolts).await
    }

    /// TNE pulse length in milliseconds.
    pub fn tne_time(&self) -> u8 {
        self.state.tne_time
    }

    pub async fn set_tne_time(&mut self, millis: i64) -> D5020Result<()> {
        self.set(Field::TneTime, millis).await
    }

    /// Send the full parameter set using the active waveform's template.
    pub async fn update_device(&self) -> D5020Result<()> {
        self.transport
            .send(&codec::encode_state(self.number, &self.state))
            .await
    }

    // ------------------------------------------------------------------
    // One-shot commands
    // ------------------------------------------------------------------

    pub fn external_input(&self) -> bool {
        self.external_input.enabled()
    }

    pub async fn toggle_external_input(&mut self) -> D5020Result<()> {
        self.external_input.toggle(self.number, &self.transport).await
    }

    /// I/O connector is monitored: output is `v1` below 2.5 V, `v2` above.
    ///
    /// Voltages are clamped for the command only; the stored v1/v2 are left
    /// untouched.
    pub async fn threshold(&self, v1: i64, v2: i64) -> D5020Result<()> {
        self.transport
            .send(&codec::encode_threshold(self.number, v1, v2))
            .await
    }

    /// Arm trigger mode: each I/O pulse swaps the output between V1 and V2.
    pub async fn trigger(&self) -> D5020Result<()> {
        self.transport.send(&codec::encode_trigger(self.number)).await
    }

    /// Emit a sync pulse on the front-panel I/O connector at `phase`
    /// degrees, lasting `pulse_length_us` microseconds.
    pub async fn sync(&self, phase: i64, pulse_length_us: i64) -> D5020Result<()> {
        self.transport
            .send(&codec::encode_sync(self.number, phase, pulse_length_us))
            .await
    }

    // ------------------------------------------------------------------
    // Temperature control
    // ------------------------------------------------------------------

    /// Current temperature of the LC cell in degrees Celsius.
    pub async fn query_lc_temperature(&self) -> D5020Result<f64> {
        let reply = self
            .transport
            .query(&codec::encode_temperature_query(self.number))
            .await?;
        codec::decode_temperature(&reply)
    }

    pub async fn temperature_setpoint(&self) -> D5020Result<f64> {
        let reply = self
            .transport
            .query(&codec::encode_setpoint_query(self.number))
            .await?;
        codec::decode_temperature(&reply)
    }

    pub async fn set_temperature_setpoint(&self, celsius: f64) -> D5020Result<()> {
        self.transport
            .send(&codec::encode_setpoint(self.number, celsius))
            .await
    }

    // ------------------------------------------------------------------
    // Attributes by name
    // ------------------------------------------------------------------

    /// Read a local attribute: `waveform`, `external_input` or any field
    /// of [`super::limits::CHANNEL_FIELDS`].
    pub fn attribute(&self, name: &str) -> D5020Result<AttributeValue> {
        match name {
            "waveform" => Ok(AttributeValue::Waveform(self.waveform())),
            "external_input" => Ok(AttributeValue::Bool(self.external_input())),
            _ => Field::from_name(name)
                .map(|field| AttributeValue::Integer(self.get(field)))
                .ok_or_else(|| D5020Error::UnknownAttribute(name.to_string())),
        }
    }

    /// Write an attribute from its text form.
    ///
    /// `external_input` is read-only here; use
    /// [`Channel::toggle_external_input`].
    pub async fn set_attribute(&mut self, name: &str, value: &str) -> D5020Result<()> {
        let invalid = || D5020Error::InvalidAttributeValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        if name == "waveform" {
            let waveform = value.parse::<Waveform>().map_err(|_| invalid())?;
            return self.set_waveform(waveform).await;
        }

        let field =
            Field::from_name(name).ok_or_else(|| D5020Error::UnknownAttribute(name.to_string()))?;
        let value = value.trim().parse::<i64>().map_err(|_| invalid())?;
        self.set(field, value).await
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("number", &self.number)
            .field("state", &self.state)
            .field("external_input", &self.external_input())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAdapter;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn channel() -> (Channel, MockAdapter) {
        let mock = MockAdapter::new();
        let channel = Channel::new(ChannelNumber::One, SharedTransport::new(mock.clone()));
        (channel, mock)
    }

    #[tokio::test]
    async fn test_every_setter_writes_one_line() {
        let (mut channel, mock) = channel();
        channel.set_waveform(Waveform::Sinusoid).await.unwrap();
        channel.set_v1(500).await.unwrap();
        channel.set_v1(500).await.unwrap();
        channel.set_v2(700).await.unwrap();
        channel.set_period(20).await.unwrap();
        channel.set_phase(725).await.unwrap();
        channel.set_duty_cycle(30).await.unwrap();
        channel.set_tne_voltage(1).await.unwrap();
        channel.set_tne_time(2).await.unwrap();

        assert_eq!(
            mock.written(),
            vec![
                "sin:1,0,0,1000,0,0",
                "sin:1,500,0,1000,0,0",
                "sin:1,500,0,1000,0,0",
                "sin:1,500,700,1000,0,0",
                "sin:1,500,700,20,0,0",
                "sin:1,500,700,20,5,0",
                "sin:1,500,700,20,5,30",
                "sin:1,500,700,20,5,30",
                "sin:1,500,700,20,5,30",
            ]
        );
        assert_eq!(channel.v1(), 500);
        assert_eq!(channel.phase(), 5);
        assert_eq!(channel.tne_voltage(), 1);
        assert_eq!(channel.tne_time(), 2);
    }

    #[tokio::test]
    async fn test_setters_saturate() {
        let (mut channel, mock) = channel();
        channel.set_v1(-1).await.unwrap();
        assert_eq!(channel.v1(), 0);
        channel.set_v2(10_001).await.unwrap();
        assert_eq!(channel.v2(), 10_000);
        channel.set_period(4).await.unwrap();
        assert_eq!(channel.period(), 5);
        channel.set_period(65_536).await.unwrap();
        assert_eq!(channel.period(), 65_535);
        channel.set_duty_cycle(101).await.unwrap();
        assert_eq!(channel.duty_cycle(), 100);
        channel.set_tne_time(256).await.unwrap();
        assert_eq!(channel.tne_time(), 255);
        channel.set_phase(-10).await.unwrap();
        assert_eq!(channel.phase(), 350);
        assert_eq!(mock.written().len(), 7);
    }

    #[tokio::test]
    async fn test_snapshot_copies_full_state() {
        let (mut channel, _mock) = channel();
        channel.set_waveform(Waveform::Triangle).await.unwrap();
        channel.set_v1(1500).await.unwrap();
        channel.set_phase(370).await.unwrap();

        let snapshot = channel.snapshot();
        assert_eq!(snapshot.waveform(), Waveform::Triangle);
        assert_eq!(snapshot.get(Field::V1), 1500);
        assert_eq!(snapshot.get(Field::Phase), 10);
        assert_eq!(snapshot.get(Field::Period), 1000);

        // Later writes do not reach an earlier snapshot
        channel.set_v1(0).await.unwrap();
        assert_eq!(snapshot.get(Field::V1), 1500);
        assert_eq!(channel.snapshot().get(Field::V1), 0);
    }

    #[tokio::test]
    async fn test_threshold_does_not_touch_state() {
        let (mut channel, mock) = channel();
        channel.set_v1(100).await.unwrap();
        mock.clear_log();

        channel.threshold(20_000, -5).await.unwrap();
        assert_eq!(mock.written(), vec!["thr:1,10000,0"]);
        assert_eq!(channel.v1(), 100);
        assert_eq!(channel.v2(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let (mut channel, mock) = channel();
        mock.inject_next_failure();
        let err = channel.set_v1(10).await.unwrap_err();
        assert!(matches!(err, D5020Error::Transport(_)));
        // The normalised value is still stored
        assert_eq!(channel.v1(), 10);
    }

    struct CountingInput(Arc<AtomicUsize>);

    #[async_trait]
    impl ExternalInputControl for CountingInput {
        fn enabled(&self) -> bool {
            self.0.load(Ordering::SeqCst) % 2 == 1
        }

        async fn toggle(&mut self, _: ChannelNumber, _: &SharedTransport) -> D5020Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_external_input_can_be_replaced() {
        let (channel, mock) = channel();
        let count = Arc::new(AtomicUsize::new(0));
        let mut channel = channel.with_external_input(Box::new(CountingInput(count.clone())));

        channel.toggle_external_input().await.unwrap();
        assert!(channel.external_input());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(mock.written().is_empty());
    }

    #[tokio::test]
    async fn test_attributes_by_name() {
        let (mut channel, mock) = channel();
        channel.set_attribute("waveform", "tne").await.unwrap();
        channel.set_attribute("tne_voltage", "12000").await.unwrap();

        assert_eq!(
            channel.attribute("waveform").unwrap(),
            AttributeValue::Waveform(Waveform::TransientEffect)
        );
        assert_eq!(
            channel.attribute("tne_voltage").unwrap(),
            AttributeValue::Integer(10_000)
        );
        assert_eq!(
            channel.attribute("external_input").unwrap(),
            AttributeValue::Bool(false)
        );
        assert_eq!(
            mock.last_written().as_deref(),
            Some("tnew:1,0,0,1000,0,0,10000,0")
        );

        assert!(matches!(
            channel.set_attribute("gain", "1").await,
            Err(D5020Error::UnknownAttribute(_))
        ));
        assert!(matches!(
            channel.set_attribute("v1", "lots").await,
            Err(D5020Error::InvalidAttributeValue { .. })
        ));
        assert!(channel.attribute("external_input_enabled").is_err());
    }
}
