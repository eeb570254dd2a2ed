use std::io;
use std::path::PathBuf;

use i2cbus_msg::MessageError;

/// Errors that can occur in bus operations.
///
/// OS errors are carried verbatim; the variant only records which syscall
/// produced them.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// Failed to open the bus device node.
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    /// The `I2C_RDWR` ioctl failed.
    #[error("i2c transfer failed: {0}")]
    Transfer(#[source] io::Error),

    /// The `I2C_FUNCS` ioctl failed.
    #[error("failed to query adapter functionality: {0}")]
    Functionality(#[source] io::Error),

    /// The messages could not be packed into a kernel request.
    #[error("invalid request: {0}")]
    Message(#[from] MessageError),
}

impl BusError {
    /// The underlying OS error, if this error came from a syscall.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            BusError::Open { source, .. } => Some(source),
            BusError::Transfer(source) | BusError::Functionality(source) => Some(source),
            BusError::Message(_) => None,
        }
    }

    /// The raw `errno` value, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        self.io_error().and_then(io::Error::raw_os_error)
    }
}

pub type Result<T> = std::result::Result<T, BusError>;
