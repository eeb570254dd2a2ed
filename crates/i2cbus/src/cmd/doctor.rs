use std::path::Path;

use i2cbus_dev::{DeviceFile, Functionality, I2cBus};
use serde::Serialize;

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: &'static str,
    status: CheckStatus,
    detail: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    device: String,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let path = args.target.path();
    let checks = run_checks(&path);

    let has_fail = checks.iter().any(|c| c.status == CheckStatus::Fail);
    let output = DoctorOutput {
        device: path.display().to_string(),
        checks,
        overall: if has_fail { "fail" } else { "pass" },
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

/// Each check runs only if the previous one passed; later ones are skipped.
fn run_checks(path: &Path) -> Vec<CheckResult> {
    let mut checks = vec![platform_check()];
    if checks[0].status == CheckStatus::Fail {
        return skip_rest(checks, &["device_node", "char_device", "open", "plain_i2c"]);
    }

    checks.push(device_node_check(path));
    if checks[1].status == CheckStatus::Fail {
        return skip_rest(checks, &["char_device", "open", "plain_i2c"]);
    }

    checks.push(char_device_check(path));

    let bus = match I2cBus::open_path(path, 0) {
        Ok(bus) => {
            checks.push(CheckResult::new("open", CheckStatus::Pass, "opened read-write"));
            bus
        }
        Err(err) => {
            checks.push(CheckResult::new("open", CheckStatus::Fail, err.to_string()));
            return skip_rest(checks, &["plain_i2c"]);
        }
    };

    checks.push(plain_i2c_check(bus));
    checks
}

fn skip_rest(mut checks: Vec<CheckResult>, names: &[&'static str]) -> Vec<CheckResult> {
    checks.extend(
        names
            .iter()
            .map(|&name| CheckResult::new(name, CheckStatus::Skip, "previous check failed")),
    );
    checks
}

fn platform_check() -> CheckResult {
    if cfg!(target_os = "linux") {
        CheckResult::new("platform", CheckStatus::Pass, "linux i2c-dev interface")
    } else {
        CheckResult::new(
            "platform",
            CheckStatus::Fail,
            format!("i2c-dev is linux-only (running on {})", std::env::consts::OS),
        )
    }
}

fn device_node_check(path: &Path) -> CheckResult {
    match std::fs::metadata(path) {
        Ok(_) => CheckResult::new("device_node", CheckStatus::Pass, format!("{} exists", path.display())),
        Err(err) => CheckResult::new(
            "device_node",
            CheckStatus::Fail,
            format!("{}: {err} (is the i2c-dev module loaded?)", path.display()),
        ),
    }
}

fn char_device_check(path: &Path) -> CheckResult {
    use std::os::unix::fs::FileTypeExt;

    match std::fs::metadata(path) {
        Ok(meta) if meta.file_type().is_char_device() => {
            CheckResult::new("char_device", CheckStatus::Pass, "character device")
        }
        Ok(_) => CheckResult::new(
            "char_device",
            CheckStatus::Warn,
            "not a character device; i2c ioctls will fail",
        ),
        Err(err) => CheckResult::new("char_device", CheckStatus::Fail, err.to_string()),
    }
}

fn plain_i2c_check(mut bus: I2cBus<DeviceFile>) -> CheckResult {
    let result = match bus.functionality() {
        Ok(funcs) if funcs.contains(Functionality::I2C) => CheckResult::new(
            "plain_i2c",
            CheckStatus::Pass,
            format!("I2C_RDWR supported (funcs 0x{:08x})", funcs.bits()),
        ),
        Ok(funcs) => CheckResult::new(
            "plain_i2c",
            CheckStatus::Fail,
            format!("adapter is SMBus-only (funcs 0x{:08x})", funcs.bits()),
        ),
        Err(err) => CheckResult::new("plain_i2c", CheckStatus::Fail, err.to_string()),
    };
    bus.close();
    result
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("i2cbus doctor: {}\n", output.device);
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<12} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Skip => "SKIP",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_node_fails_and_skips_rest() {
        let path = std::env::temp_dir().join(format!("i2cbus-doctor-missing-{}", std::process::id()));
        let checks = run_checks(&path);

        let names: Vec<_> = checks.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["platform", "device_node", "char_device", "open", "plain_i2c"]
        );
        assert_eq!(checks[1].status, CheckStatus::Fail);
        assert!(checks[2..].iter().all(|c| c.status == CheckStatus::Skip));
    }

    #[test]
    fn regular_file_fails_functionality_query() {
        let path = std::env::temp_dir().join(format!("i2cbus-doctor-file-{}", std::process::id()));
        std::fs::write(&path, b"").unwrap();

        let checks = run_checks(&path);
        let by_name = |name: &str| checks.iter().find(|c| c.name == name).unwrap().status;
        assert_eq!(by_name("device_node"), CheckStatus::Pass);
        assert_eq!(by_name("char_device"), CheckStatus::Warn);
        assert_eq!(by_name("open"), CheckStatus::Pass);
        assert_eq!(by_name("plain_i2c"), CheckStatus::Fail);

        let _ = std::fs::remove_file(&path);
    }
}
