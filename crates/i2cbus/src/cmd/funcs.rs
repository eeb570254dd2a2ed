use i2cbus_dev::Functionality;
use serde::Serialize;

use crate::cmd::FuncsArgs;
use crate::exit::{bus_error, CliResult, SUCCESS};
use crate::output::{print_table, OutputFormat};

#[derive(Serialize)]
struct FuncsOutput {
    device: String,
    mask: String,
    functions: Vec<&'static str>,
}

pub fn run(args: FuncsArgs, format: OutputFormat) -> CliResult<i32> {
    let mut bus = args.target.open()?;
    let funcs = bus
        .functionality()
        .map_err(|err| bus_error("functionality query failed", err))?;

    let out = FuncsOutput {
        device: bus.path().display().to_string(),
        mask: format!("0x{:08x}", funcs.bits()),
        functions: funcs.names(),
    };
    print_funcs(&out, funcs, format);
    Ok(SUCCESS)
}

fn print_funcs(out: &FuncsOutput, funcs: Functionality, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let rows = Functionality::all().iter_names().map(|(name, flag)| {
                let supported = if funcs.contains(flag) { "yes" } else { "no" };
                vec![name.to_string(), supported.to_string()]
            });
            print_table(vec!["FUNCTION", "SUPPORTED"], rows);
        }
        OutputFormat::Pretty => {
            println!("Adapter functionality ({}):", out.device);
            println!("  Mask:      {}", out.mask);
            println!("  Supported: {}", out.functions.join(", "));
        }
        OutputFormat::Raw => {
            println!("{}", out.mask);
        }
    }
}
