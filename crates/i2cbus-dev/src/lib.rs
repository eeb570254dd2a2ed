//! Bus handle for Linux `i2c-dev` device nodes.
//!
//! An [`I2cBus`] owns one open `/dev/i2c-<n>` descriptor and executes
//! transactions: every message passed to [`I2cBus::transaction`] is submitted
//! in a single `I2C_RDWR` ioctl, so the kernel runs them as one bus claim
//! with repeated STARTs between segments.
//!
//! The ioctl boundary sits behind the [`Adapter`] trait. [`DeviceFile`] is the
//! kernel-backed implementation.

pub mod adapter;
pub mod bus;
pub mod config;
pub mod error;
pub mod funcs;

#[cfg(target_os = "linux")]
pub mod device;

pub use adapter::Adapter;
pub use bus::{FailingAdapter, I2cBus};
pub use config::{device_path, BusConfig};
pub use error::{BusError, Result};
pub use funcs::Functionality;

#[cfg(target_os = "linux")]
pub use device::DeviceFile;
