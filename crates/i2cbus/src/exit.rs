use std::fmt;
use std::io;

use i2cbus_dev::BusError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DEVICE_ERROR: i32 = 3;
/// No device acknowledged its address (`ENXIO` / `EREMOTEIO`).
pub const NO_DEVICE: i32 = 4;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn io_exit_code(err: &io::Error) -> i32 {
    match err.raw_os_error() {
        Some(libc::ENXIO) | Some(libc::EREMOTEIO) => return NO_DEVICE,
        Some(libc::EACCES) | Some(libc::EPERM) => return PERMISSION_DENIED,
        _ => {}
    }
    match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        io::ErrorKind::InvalidInput => DATA_INVALID,
        _ => DEVICE_ERROR,
    }
}

pub fn bus_error(context: &str, err: BusError) -> CliError {
    let code = match &err {
        BusError::Message(_) => DATA_INVALID,
        other => other.io_error().map(io_exit_code).unwrap_or(INTERNAL),
    };
    CliError::new(code, format!("{context}: {err}"))
}
