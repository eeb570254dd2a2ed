use i2cbus_msg::{read, write, Message};
use serde::Serialize;

use crate::cmd::TransferArgs;
use crate::exit::{bus_error, CliResult, SUCCESS};
use crate::output::{hex_bytes, print_raw, OutputFormat};

/// One message of a CLI transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Write { addr: u16, bytes: Vec<u8> },
    Read { addr: u16, len: u16 },
}

impl Op {
    fn to_message(&self) -> Message<'static> {
        match self {
            Op::Write { addr, bytes } => write(*addr, bytes),
            Op::Read { addr, len } => read(*addr, *len),
        }
    }
}

/// Parse `w:ADDR:BYTE[,BYTE...]` or `r:ADDR:LEN`.
///
/// Numbers are decimal or `0x` hex. `w:ADDR:` is a zero-length write.
pub fn parse_op(input: &str) -> Result<Op, String> {
    let mut parts = input.splitn(3, ':');
    let kind = parts.next().unwrap_or_default();
    let (Some(addr), Some(rest)) = (parts.next(), parts.next()) else {
        return Err(format!("expected KIND:ADDR:DATA, got {input:?}"));
    };
    let addr = parse_number(addr, u16::MAX.into())? as u16;

    match kind {
        "w" | "write" => {
            let bytes = rest
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_number(s, u8::MAX.into()).map(|b| b as u8))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Op::Write { addr, bytes })
        }
        "r" | "read" => {
            let len = parse_number(rest, u16::MAX.into())? as u16;
            Ok(Op::Read { addr, len })
        }
        other => Err(format!("unknown message kind {other:?} (expected w or r)")),
    }
}

fn parse_number(input: &str, max: u32) -> Result<u32, String> {
    let input = input.trim();
    let value = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => input.parse(),
    }
    .map_err(|_| format!("invalid number: {input:?}"))?;

    if value > max {
        return Err(format!("{input} out of range (max {max})"));
    }
    Ok(value)
}

#[derive(Serialize)]
struct ReadOutput {
    index: usize,
    addr: u16,
    len: usize,
    data: String,
}

#[derive(Serialize)]
struct TransferOutput {
    device: String,
    messages: usize,
    reads: Vec<ReadOutput>,
}

pub fn run(args: TransferArgs, format: OutputFormat) -> CliResult<i32> {
    let mut bus = args.target.open()?;
    let mut messages: Vec<Message<'static>> = args.ops.iter().map(Op::to_message).collect();

    let results = bus
        .transaction(&mut messages)
        .map_err(|err| bus_error("transfer failed", err))?;

    let read_ops = args.ops.iter().enumerate().filter_map(|(index, op)| match op {
        Op::Read { addr, .. } => Some((index, *addr)),
        Op::Write { .. } => None,
    });
    let reads: Vec<ReadOutput> = read_ops
        .zip(&results)
        .map(|((index, addr), data)| ReadOutput {
            index,
            addr,
            len: data.len(),
            data: hex_bytes(data),
        })
        .collect();

    let out = TransferOutput {
        device: bus.path().display().to_string(),
        messages: args.ops.len(),
        reads,
    };

    match format {
        OutputFormat::Raw => print_raw(&results.concat()),
        _ => print_transfer(&out, format),
    }

    bus.close();
    Ok(SUCCESS)
}

fn print_transfer(out: &TransferOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let rows = out.reads.iter().map(|r| {
                vec![
                    r.index.to_string(),
                    format!("0x{:02x}", r.addr),
                    r.len.to_string(),
                    r.data.clone(),
                ]
            });
            crate::output::print_table(vec!["MSG", "ADDR", "LEN", "DATA"], rows);
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for r in &out.reads {
                println!("msg={} addr=0x{:02x} len={} data={}", r.index, r.addr, r.len, r.data);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_write_op() {
        assert_eq!(
            parse_op("w:0x20:0x01,0xFF").unwrap(),
            Op::Write {
                addr: 0x20,
                bytes: vec![0x01, 0xFF],
            }
        );
        assert_eq!(
            parse_op("write:32:1, 255").unwrap(),
            Op::Write {
                addr: 0x20,
                bytes: vec![1, 255],
            }
        );
    }

    #[test]
    fn parse_empty_write() {
        assert_eq!(
            parse_op("w:0x50:").unwrap(),
            Op::Write {
                addr: 0x50,
                bytes: vec![],
            }
        );
    }

    #[test]
    fn parse_read_op() {
        assert_eq!(
            parse_op("r:0x48:2").unwrap(),
            Op::Read { addr: 0x48, len: 2 }
        );
        assert_eq!(
            parse_op("read:0X48:0x10").unwrap(),
            Op::Read {
                addr: 0x48,
                len: 16,
            }
        );
    }

    #[test]
    fn parse_op_rejects_bad_input() {
        assert!(parse_op("w:0x20").is_err());
        assert!(parse_op("x:0x20:1").is_err());
        assert!(parse_op("w:0x20:0x100").is_err());
        assert!(parse_op("r:0x20:70000").is_err());
        assert!(parse_op("r:zz:1").is_err());
    }

    #[test]
    fn ops_become_messages() {
        let msg = parse_op("r:0x48:3").unwrap().to_message();
        assert!(msg.is_read());
        assert_eq!(msg.len(), 3);

        let msg = parse_op("w:0x48:1,2").unwrap().to_message();
        assert!(!msg.is_read());
        assert_eq!(msg.data(), &[1, 2]);
    }
}
