/// Errors that can occur while packing messages into a kernel request.
///
/// Only limits imposed by the ABI's field widths are checked here. Kernel
/// policy limits (message count, per-message size) are left to the kernel.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// A message buffer does not fit the 16-bit `len` field of `i2c_msg`.
    #[error("message {index} too long ({len} bytes, max {max})")]
    TooLong {
        index: usize,
        len: usize,
        max: usize,
    },

    /// The message count does not fit the 32-bit `nmsgs` field.
    #[error("too many messages in one request ({count}, max {max})")]
    TooManyMessages { count: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, MessageError>;
