use std::fs::OpenOptions;
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use i2cbus_msg::{RawRdwrData, Request, I2C_FUNCS, I2C_RDWR};
use tracing::debug;

use crate::adapter::Adapter;
use crate::funcs::Functionality;

/// An open i2c-dev device node.
///
/// The descriptor is closed when the value is dropped; close errors are
/// ignored.
pub struct DeviceFile {
    fd: OwnedFd,
    path: PathBuf,
}

impl DeviceFile {
    /// Open `path` with `O_RDWR | extra_flags`.
    pub fn open(path: impl AsRef<Path>, extra_flags: i32) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(extra_flags)
            .open(&path)?;
        Ok(Self {
            fd: file.into(),
            path,
        })
    }

    /// Wrap an already-open descriptor.
    pub fn from_fd(fd: OwnedFd, path: impl Into<PathBuf>) -> Self {
        Self {
            fd,
            path: path.into(),
        }
    }

    /// The device node this descriptor was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Adapter for DeviceFile {
    fn rdwr(&mut self, request: &mut Request<'_, '_>) -> io::Result<()> {
        let mut data = request.ioctl_data();

        // SAFETY: `data` points at the request's packed `i2c_msg` array, whose
        // buffers stay mutably borrowed by `request` for the whole call, and
        // every `len` equals the size of its buffer. `fd` is owned by `self`.
        let rc = unsafe {
            libc::ioctl(
                self.fd.as_raw_fd(),
                I2C_RDWR as _,
                &mut data as *mut RawRdwrData,
            )
        };

        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn functionality(&mut self) -> io::Result<Functionality> {
        let mut funcs: libc::c_ulong = 0;

        // SAFETY: `funcs` is a valid writable `unsigned long`, the argument
        // type `I2C_FUNCS` expects, and `fd` is owned by `self`.
        let rc = unsafe {
            libc::ioctl(
                self.fd.as_raw_fd(),
                I2C_FUNCS as _,
                &mut funcs as *mut libc::c_ulong,
            )
        };

        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Functionality::from_bits_retain(u64::from(funcs)))
    }
}

impl AsFd for DeviceFile {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for DeviceFile {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl Drop for DeviceFile {
    fn drop(&mut self) {
        debug!(path = ?self.path, "closing i2c device");
    }
}

impl std::fmt::Debug for DeviceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceFile")
            .field("path", &self.path)
            .field("fd", &self.fd.as_raw_fd())
            .finish()
    }
}
