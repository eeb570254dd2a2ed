//! `i2c_msg.flags` bits.
//!
//! Only [`MessageFlags::READ`] is handled by every adapter. The remaining
//! bits are protocol mangling and require matching adapter functionality.

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MessageFlags: u16 {
        /// Read data, from device to host (`I2C_M_RD`).
        const READ = 0x0001;
        /// Ten-bit device address (`I2C_M_TEN`).
        const TEN = 0x0010;
        /// Buffer is DMA safe (`I2C_M_DMA_SAFE`).
        const DMA_SAFE = 0x0200;
        /// First received byte is the length (`I2C_M_RECV_LEN`).
        const RECV_LEN = 0x0400;
        /// Skip the ACK on reads (`I2C_M_NO_RD_ACK`).
        const NO_RD_ACK = 0x0800;
        /// Treat NAK as ACK (`I2C_M_IGNORE_NAK`).
        const IGNORE_NAK = 0x1000;
        /// Invert the R/W bit (`I2C_M_REV_DIR_ADDR`).
        const REV_DIR_ADDR = 0x2000;
        /// Do not issue a (repeated) START (`I2C_M_NOSTART`).
        const NOSTART = 0x4000;
        /// Force a STOP after this message (`I2C_M_STOP`).
        const STOP = 0x8000;
    }
}
