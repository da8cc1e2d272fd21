use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nmea_fsm::HarnessValue;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Feed a capture through the parser and print every fix as JSON
    Replay {
        /// NMEA capture file, `-` for stdin
        file: PathBuf,

        /// Drop sentences until the previous fix has been printed
        #[arg(long)]
        hold: bool,
    },
    /// Run the reference device loop on a serial port
    Device {
        #[command(flatten)]
        port: PortArgs,
    },
    /// Read values from a device over the harness protocol
    Query {
        #[command(flatten)]
        port: PortArgs,

        /// Set or clear test flag 9 before reading
        #[arg(long)]
        test_flag: Option<bool>,

        /// Values to read
        #[arg(value_enum, default_values_t = [Value::Flags, Value::Latitude, Value::Longitude, Value::Time, Value::Quality])]
        values: Vec<Value>,
    },
}

#[derive(Args)]
pub struct PortArgs {
    /// Serial port device
    #[arg(short, long)]
    pub port: String,

    /// Baud rate
    #[arg(short, long, default_value_t = 9600)]
    pub baud_rate: u32,

    /// Read timeout in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    pub timeout: u64,
}

impl PortArgs {
    pub fn open(&self) -> Result<Box<dyn serialport::SerialPort>> {
        serialport::new(&self.port, self.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .timeout(Duration::from_millis(self.timeout))
            .open()
            .with_context(|| format!("Failed to open serial port '{}'", self.port))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Value {
    Flags,
    Latitude,
    LatitudeHundredths,
    Longitude,
    LongitudeHundredths,
    Time,
    Quality,
}

impl From<Value> for HarnessValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Flags => HarnessValue::GpsFlags,
            Value::Latitude => HarnessValue::LatitudeDegMin,
            Value::LatitudeHundredths => HarnessValue::LatitudeHundredths,
            Value::Longitude => HarnessValue::LongitudeDegMin,
            Value::LongitudeHundredths => HarnessValue::LongitudeHundredths,
            Value::Time => HarnessValue::Time,
            Value::Quality => HarnessValue::Quality,
        }
    }
}
