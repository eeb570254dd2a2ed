//! I2C message descriptors and the kernel records they are packed into.
//!
//! This is the pure half of i2cbus. A transaction is described by an ordered
//! list of [`Message`]s, each one direction of transfer against one device
//! address:
//! - [`read`] / [`read_into`] for read-direction messages
//! - [`write`] / [`write_bytes!`] for write-direction messages
//!
//! A [`Request`] packs those messages into the exact `struct i2c_msg` array
//! and `struct i2c_rdwr_ioctl_data` header the kernel's `I2C_RDWR` ioctl
//! expects. Nothing in this crate performs I/O.

pub mod abi;
pub mod error;
pub mod flags;
pub mod message;
pub mod request;

pub use abi::{RawMsg, RawRdwrData, I2C_FUNCS, I2C_RDWR, I2C_RDWR_IOCTL_MAX_MSGS, MAX_MESSAGE_LEN};
pub use error::{MessageError, Result};
pub use flags::MessageFlags;
pub use message::{read, read_into, write, Message};
pub use request::{MessageHeader, Request};
