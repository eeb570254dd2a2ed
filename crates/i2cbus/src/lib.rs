//! Atomic I2C transactions on Linux.
//!
//! i2cbus drives `/dev/i2c-<n>` through the kernel's combined `I2C_RDWR`
//! ioctl: a transaction of several read and write messages is executed as
//! one bus claim, with repeated STARTs between messages.
//!
//! ```no_run
//! use i2cbus::{read, write_bytes, I2cBus};
//!
//! let mut bus = I2cBus::open(1)?;
//! let results = bus.transaction(&mut [write_bytes!(0x20, 0x01), read(0x20, 2)])?;
//! println!("register 0x01 = {:02x?}", results[0]);
//! # Ok::<(), i2cbus::BusError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`msg`] — Message descriptors and the kernel ABI records
//! - [`dev`] — Bus handle, adapter seam and errors

/// Re-export message types.
pub mod msg {
    pub use i2cbus_msg::*;
}

/// Re-export bus types.
pub mod dev {
    pub use i2cbus_dev::*;
}

pub use i2cbus_dev::{BusConfig, BusError, I2cBus};
pub use i2cbus_msg::{read, read_into, write, write_bytes, Message, MessageFlags};
