use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use nmea_fsm::{Driver, FixPolicy, Flags, Harness, HarnessValue, IoPort, Receiver};

mod cli;

use cli::{Cli, Command, PortArgs, Value};

fn main() -> Result<()> {
    env_logger::Builder::new()
        .format_timestamp(None)
        .format_target(false)
        .filter_level(log::LevelFilter::Info)
        .parse_env("LOG_LEVEL")
        .init();

    match Cli::parse().command {
        Command::Replay { file, hold } => replay(&file, hold),
        Command::Device { port } => device(&port),
        Command::Query {
            port,
            test_flag,
            values,
        } => query(&port, test_flag, &values),
    }
}

fn read_capture(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        Ok(data)
    } else {
        fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))
    }
}

fn replay(path: &Path, hold: bool) -> Result<()> {
    let data = read_capture(path)?;
    let policy = if hold {
        FixPolicy::HoldUntilRead
    } else {
        FixPolicy::Overwrite
    };
    let mut receiver = Receiver::builder().fix_policy(policy).build()?;

    for byte in data {
        receiver.feed(byte);
        if !receiver.flags().contains(Flags::NEW_POSITION) {
            continue;
        }
        match receiver.fix() {
            Ok(fix) => println!("{}", serde_json::to_string(&fix)?),
            Err(e) => warn!("Stored fix does not decode: {e}"),
        }
        receiver.acknowledge_fix();
    }
    info!("{} sentences committed", receiver.store().commits());
    Ok(())
}

fn device(args: &PortArgs) -> Result<()> {
    let mut port = IoPort::patient(args.open()?);
    info!("Serving harness requests on '{}' at {} baud", args.port, args.baud_rate);
    let mut driver = Driver::default();
    match driver.run(&mut port) {
        Ok(never) => match never {},
        Err(e) => Err(e).context("Device loop stopped"),
    }
}

fn query(args: &PortArgs, test_flag: Option<bool>, values: &[Value]) -> Result<()> {
    let mut harness = Harness::new(IoPort::new(args.open()?));
    if let Some(on) = test_flag {
        debug!("Setting test flag 9 to {on}");
        harness.set_test_flag(on)?;
    }
    for value in values {
        let value = HarnessValue::from(*value);
        let bytes = harness
            .read_string(value)
            .with_context(|| format!("Failed to read {value:?}"))?;
        println!("{:?}: {}", value, String::from_utf8_lossy(&bytes));
    }
    Ok(())
}
