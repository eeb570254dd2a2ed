use clap::{Args, Subcommand};
use std::path::PathBuf;

use i2cbus_dev::{device_path, DeviceFile, I2cBus};

use crate::cmd::transfer::{parse_op, Op};
use crate::exit::{bus_error, CliResult};
use crate::output::OutputFormat;

pub mod doctor;
pub mod funcs;
pub mod transfer;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one atomic transaction of read/write messages.
    Transfer(TransferArgs),
    /// Print the adapter functionality mask.
    Funcs(FuncsArgs),
    /// Check that a bus device node is usable.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Transfer(args) => transfer::run(args, format),
        Command::Funcs(args) => funcs::run(args, format),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Which device node to operate on.
#[derive(Args, Debug)]
pub struct BusTarget {
    /// Bus number n of /dev/i2c-<n>.
    #[arg(long, short = 'b', env = "I2CBUS_BUS", default_value_t = 0)]
    pub bus: u32,
    /// Explicit device node path. Takes precedence over --bus.
    #[arg(long, value_name = "PATH")]
    pub device: Option<PathBuf>,
}

impl BusTarget {
    pub fn path(&self) -> PathBuf {
        self.device
            .clone()
            .unwrap_or_else(|| device_path(self.bus))
    }

    pub fn open(&self) -> CliResult<I2cBus<DeviceFile>> {
        I2cBus::open_path(self.path(), 0).map_err(|err| bus_error("open failed", err))
    }
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub target: BusTarget,
    /// Messages, in order: w:ADDR:BYTE[,BYTE...] or r:ADDR:LEN.
    #[arg(required = true, value_name = "OP", value_parser = parse_op)]
    pub ops: Vec<Op>,
}

#[derive(Args, Debug)]
pub struct FuncsArgs {
    #[command(flatten)]
    pub target: BusTarget,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    #[command(flatten)]
    pub target: BusTarget,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
