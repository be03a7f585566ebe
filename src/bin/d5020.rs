//! Command line control of a Meadowlark D5020
//!
//! ```text
//! d5020 --url tcp://moxa.lab:4001 version
//! d5020 set 1 waveform square
//! d5020 set 1 v2 5000
//! d5020 temperature 2
//! ```
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meadowlark_d5020::config::D5020Config;
use meadowlark_d5020::hardware::{Channel, CHANNEL_FIELDS};
use meadowlark_d5020::{logging, D5020};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "d5020", version, about = "Meadowlark D5020 liquid crystal controller")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config/d5020.toml")]
    config: PathBuf,

    /// Connection URL, overrides the configuration file
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the firmware version
    Version,
    /// Read the LC temperature of a channel (°C)
    Temperature { channel: u8 },
    /// Read or set the temperature setpoint of a channel (°C)
    Setpoint {
        channel: u8,
        #[arg(allow_negative_numbers = true)]
        celsius: Option<f64>,
    },
    /// Set a channel attribute (waveform, v1, v2, period, phase, duty_cycle, tne_voltage, tne_time)
    Set {
        channel: u8,
        attribute: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Threshold mode: V1 below 2.5 V on the I/O connector, V2 above (mV)
    Threshold {
        channel: u8,
        #[arg(allow_negative_numbers = true)]
        v1: i64,
        #[arg(allow_negative_numbers = true)]
        v2: i64,
    },
    /// Arm trigger mode
    Trigger { channel: u8 },
    /// Emit a sync pulse at a phase (deg) with a length (µs)
    Sync {
        channel: u8,
        #[arg(allow_negative_numbers = true)]
        phase: i64,
        pulse_us: i64,
    },
    /// Toggle the external input
    Extin { channel: u8 },
    /// Print the local parameter table of a channel
    Show { channel: u8 },
}

fn print_channel(channel: &Channel) {
    println!("channel {}", channel.number());
    println!("  {:<16} {}", "waveform", channel.waveform());
    for spec in CHANNEL_FIELDS.iter() {
        println!(
            "  {:<16} {:>6} {:<4} ({}..={})",
            spec.name,
            channel.get(spec.field),
            spec.unit,
            spec.min,
            spec.max
        );
    }
    println!("  {:<16} {}", "external_input", channel.external_input());
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = D5020Config::load_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(url) = cli.url {
        config.connection.url = url;
    }
    config.validate()?;

    logging::init(&config.logging)?;

    let mut d5020 = D5020::connect(&config).await?;

    match cli.command {
        Command::Version => println!("{}", d5020.query_firmware_version().await?),
        Command::Temperature { channel } => {
            let celsius = d5020.channel(channel)?.query_lc_temperature().await?;
            println!("{:.2}", celsius);
        }
        Command::Setpoint { channel, celsius } => {
            let channel = d5020.channel(channel)?;
            match celsius {
                Some(celsius) => channel.set_temperature_setpoint(celsius).await?,
                None => println!("{:.2}", channel.temperature_setpoint().await?),
            }
        }
        Command::Set {
            channel,
            attribute,
            value,
        } => {
            let channel = d5020.channel_mut(channel)?;
            channel.set_attribute(&attribute, &value).await?;
            info!("{} = {}", attribute, channel.attribute(&attribute)?);
        }
        Command::Threshold { channel, v1, v2 } => d5020.channel(channel)?.threshold(v1, v2).await?,
        Command::Trigger { channel } => d5020.channel(channel)?.trigger().await?,
        Command::Sync {
            channel,
            phase,
            pulse_us,
        } => d5020.channel(channel)?.sync(phase, pulse_us).await?,
        Command::Extin { channel } => d5020.channel_mut(channel)?.toggle_external_input().await?,
        Command::Show { channel } => print_channel(d5020.channel(channel)?),
    }

    Ok(())
}
