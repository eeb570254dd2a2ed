//! Kernel ABI for the i2c-dev combined transfer.
//!
//! Mirrors `include/uapi/linux/i2c.h` and `include/uapi/linux/i2c-dev.h`.
//! The kernel copies these records out of user memory verbatim, so field
//! order, width and padding must match exactly.

use std::mem::{align_of, offset_of, size_of};

/// Combined read/write transfer (`I2C_RDWR`).
pub const I2C_RDWR: u32 = 0x0707;

/// Query the adapter functionality mask (`I2C_FUNCS`).
pub const I2C_FUNCS: u32 = 0x0705;

/// Maximum number of messages the kernel accepts in one `I2C_RDWR` call.
///
/// Informational. Requests are not checked against it.
pub const I2C_RDWR_IOCTL_MAX_MSGS: usize = 42;

/// Maximum `len` of a single message accepted by current kernels.
///
/// Informational. Requests are not checked against it.
pub const MAX_MESSAGE_LEN: usize = 8192;

/// `struct i2c_msg`: one segment of a combined transfer.
///
/// ```text
/// ┌────────────┬────────────┬────────────┬─────────┬──────────────┐
/// │ addr (u16) │ flags (u16)│ len (u16)  │ padding │ buf (*mut u8)│
/// └────────────┴────────────┴────────────┴─────────┴──────────────┘
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawMsg {
    pub addr: u16,
    pub flags: u16,
    pub len: u16,
    pub buf: *mut u8,
}

/// `struct i2c_rdwr_ioctl_data`: the argument of `I2C_RDWR`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawRdwrData {
    pub msgs: *mut RawMsg,
    pub nmsgs: u32,
}

const _: () = {
    assert!(offset_of!(RawMsg, addr) == 0);
    assert!(offset_of!(RawMsg, flags) == 2);
    assert!(offset_of!(RawMsg, len) == 4);
    assert!(offset_of!(RawMsg, buf) == 8);
    assert!(size_of::<RawMsg>() == 8 + size_of::<usize>());
    assert!(align_of::<RawMsg>() == align_of::<*mut u8>());

    assert!(offset_of!(RawRdwrData, msgs) == 0);
    assert!(offset_of!(RawRdwrData, nmsgs) == size_of::<usize>());
    assert!(size_of::<RawRdwrData>() == 2 * size_of::<usize>());
};
