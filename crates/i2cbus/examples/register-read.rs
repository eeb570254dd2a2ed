//! Read a device register using a write-then-read transaction.
//!
//! Run with:
//!   cargo run --example register-read -- 1 0x48 0x00 2
//!
//! Arguments: bus number, device address, register, bytes to read.

use i2cbus::{read, write, I2cBus};

fn parse_number(input: &str) -> Result<u16, std::num::ParseIntError> {
    match input.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => input.parse(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize, default: &str| args.get(i).cloned().unwrap_or_else(|| default.to_string());

    let bus_number: u32 = arg(0, "1").parse()?;
    let address = parse_number(&arg(1, "0x48"))?;
    let register = u8::try_from(parse_number(&arg(2, "0x00"))?)?;
    let len = parse_number(&arg(3, "2"))?;

    let mut bus = I2cBus::open(bus_number)?;
    eprintln!("Opened {}", bus.path().display());

    // The register select and the read share one bus claim.
    let results = bus.transaction(&mut [write(address, [register]), read(address, len)])?;
    println!(
        "0x{address:02x}[0x{register:02x}] = {}",
        results[0]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    );

    bus.close();
    Ok(())
}
