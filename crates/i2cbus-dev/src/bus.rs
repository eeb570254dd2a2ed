use std::io;
#[cfg(target_os = "linux")]
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
#[cfg(target_os = "linux")]
use std::path::Path;

use i2cbus_msg::{Message, Request};
use tracing::{debug, trace};

use crate::adapter::Adapter;
#[cfg(target_os = "linux")]
use crate::config::BusConfig;
#[cfg(target_os = "linux")]
use crate::device::DeviceFile;
use crate::error::{BusError, Result};
use crate::funcs::Functionality;

/// Performs I2C transactions on one bus.
///
/// The handle owns its adapter. For [`DeviceFile`] that is one open
/// descriptor, released when the handle is dropped or [`closed`]. Methods
/// take `&mut self`, so concurrent use of one handle from several threads
/// requires the caller's own lock.
///
/// ```no_run
/// use i2cbus_dev::I2cBus;
/// use i2cbus_msg::{read, write};
///
/// let mut bus = I2cBus::open(1)?;
/// // Select register 0x01, then read it back under one repeated START.
/// let results = bus.transaction(&mut [write(0x20, [0x01]), read(0x20, 1)])?;
/// assert_eq!(results.len(), 1);
/// # Ok::<(), i2cbus_dev::BusError>(())
/// ```
///
/// [`closed`]: I2cBus::close
#[derive(Debug)]
pub struct I2cBus<A> {
    adapter: A,
}

#[cfg(target_os = "linux")]
impl I2cBus<DeviceFile> {
    /// Open `/dev/i2c-<bus>` read-write.
    pub fn open(bus: u32) -> Result<Self> {
        Self::open_with(&BusConfig::new(bus))
    }

    /// Open the bus described by `config`.
    pub fn open_with(config: &BusConfig) -> Result<Self> {
        Self::open_path(config.device_path(), config.extra_flags)
    }

    /// Open an arbitrary i2c-dev node with `O_RDWR | extra_flags`.
    pub fn open_path(path: impl AsRef<Path>, extra_flags: i32) -> Result<Self> {
        let path = path.as_ref();
        let device = DeviceFile::open(path, extra_flags).map_err(|source| BusError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?path, extra_flags, "opened i2c bus");
        Ok(Self::with_adapter(device))
    }

    /// The device node backing this bus.
    pub fn path(&self) -> &Path {
        self.adapter.path()
    }
}

#[cfg(target_os = "linux")]
impl AsFd for I2cBus<DeviceFile> {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.adapter.as_fd()
    }
}

#[cfg(target_os = "linux")]
impl AsRawFd for I2cBus<DeviceFile> {
    fn as_raw_fd(&self) -> RawFd {
        self.adapter.as_raw_fd()
    }
}

impl<A: Adapter> I2cBus<A> {
    /// Use `adapter` as the ioctl boundary.
    pub fn with_adapter(adapter: A) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Perform one I2C transaction.
    ///
    /// All `messages` are submitted together in a single ioctl and executed
    /// in order as one bus claim. Returns the contents of every
    /// read-direction message, in message order; write messages contribute
    /// nothing. Buffers given to [`i2cbus_msg::read_into`] are filled in
    /// place as well.
    ///
    /// A failed ioctl is returned once, unretried, and yields no partial
    /// results.
    pub fn transaction(&mut self, messages: &mut [Message<'_>]) -> Result<Vec<Vec<u8>>> {
        let mut request = Request::new(messages)?;
        debug!(
            messages = request.len(),
            reads = request.read_count(),
            "i2c transaction"
        );

        self.adapter.rdwr(&mut request).map_err(|err| {
            trace!(error = %err, "i2c transfer failed");
            BusError::Transfer(err)
        })?;

        Ok(request.read_results())
    }

    /// Query the adapter's functionality mask (`I2C_FUNCS`).
    pub fn functionality(&mut self) -> Result<Functionality> {
        self.adapter
            .functionality()
            .map_err(BusError::Functionality)
    }

    /// Close the bus, releasing the adapter.
    ///
    /// Consumes the handle so it cannot be used afterwards. Close errors are
    /// not reported.
    pub fn close(self) {
        debug!("closing i2c bus");
        drop(self);
    }

    /// Unwrap the adapter without closing it.
    pub fn into_adapter(self) -> A {
        self.adapter
    }
}

/// Adapter that fails every call with `errno`.
///
/// Stands in for a descriptor the kernel no longer recognises.
#[derive(Debug, Clone, Copy)]
pub struct FailingAdapter {
    errno: i32,
}

impl FailingAdapter {
    pub fn new(errno: i32) -> Self {
        Self { errno }
    }
}

impl Adapter for FailingAdapter {
    fn rdwr(&mut self, _request: &mut Request<'_, '_>) -> io::Result<()> {
        Err(io::Error::from_raw_os_error(self.errno))
    }

    fn functionality(&mut self) -> io::Result<Functionality> {
        Err(io::Error::from_raw_os_error(self.errno))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use i2cbus_msg::{read, read_into, write, write_bytes, MessageFlags, MessageHeader};

    /// Fake device map: register pointer set by the last write, reads return
    /// consecutive bytes starting at `base + pointer`.
    #[derive(Default)]
    struct FakeAdapter {
        calls: usize,
        seen: Vec<Vec<MessageHeader>>,
        base: u8,
    }

    impl Adapter for FakeAdapter {
        fn rdwr(&mut self, request: &mut Request<'_, '_>) -> io::Result<()> {
            self.calls += 1;
            self.seen.push(request.headers());
            if request.is_empty() {
                return Err(io::Error::from_raw_os_error(22));
            }
            let mut pointer = 0u8;
            for (header, buf) in request.segments_mut() {
                if header.is_read() {
                    for (i, byte) in buf.iter_mut().enumerate() {
                        *byte = self.base.wrapping_add(pointer).wrapping_add(i as u8);
                    }
                } else if let Some(&first) = buf.first() {
                    pointer = first;
                }
            }
            Ok(())
        }

        fn functionality(&mut self) -> io::Result<Functionality> {
            Ok(Functionality::I2C | Functionality::NOSTART)
        }
    }

    #[test]
    fn test_write_then_read_single_call() {
        let mut bus = I2cBus::with_adapter(FakeAdapter {
            base: 0x40,
            ..FakeAdapter::default()
        });

        let results = bus
            .transaction(&mut [write(0x20, [0x01]), read(0x20, 1)])
            .unwrap();

        assert_eq!(results, vec![vec![0x41]]);
        assert_eq!(bus.adapter().calls, 1);
        let seen = &bus.adapter().seen[0];
        assert_eq!(seen.len(), 2);
        assert!(!seen[0].is_read());
        assert!(seen[1].is_read());
    }

    #[test]
    fn test_results_one_per_read_in_order() {
        let mut bus = I2cBus::with_adapter(FakeAdapter::default());

        let results = bus
            .transaction(&mut [
                write_bytes!(0x20, 0x10),
                read(0x20, 2),
                write_bytes!(0x21, 0x30),
                write_bytes!(0x21, 0x50),
                read(0x21, 3),
            ])
            .unwrap();

        assert_eq!(results, vec![vec![0x10, 0x11], vec![0x50, 0x51, 0x52]]);
    }

    #[test]
    fn test_write_only_returns_nothing() {
        let mut bus = I2cBus::with_adapter(FakeAdapter::default());
        let results = bus.transaction(&mut [write(0x20, [0x01, 0xFF])]).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_read_into_filled_in_place() {
        let mut bus = I2cBus::with_adapter(FakeAdapter {
            base: 0x80,
            ..FakeAdapter::default()
        });
        let mut buf = [0u8; 3];
        let results = bus
            .transaction(&mut [write(0x50, [0x02]), read_into(0x50, &mut buf)])
            .unwrap();

        assert_eq!(results, vec![vec![0x82, 0x83, 0x84]]);
        assert_eq!(buf, [0x82, 0x83, 0x84]);
    }

    #[test]
    fn test_flags_reach_adapter() {
        let mut bus = I2cBus::with_adapter(FakeAdapter::default());
        bus.transaction(&mut [read(0x50, 1).with_flags(MessageFlags::IGNORE_NAK)])
            .unwrap();
        assert_eq!(
            bus.adapter().seen[0][0].flags,
            MessageFlags::READ | MessageFlags::IGNORE_NAK
        );
    }

    #[test]
    fn test_empty_transaction_reaches_adapter() {
        let mut bus = I2cBus::with_adapter(FakeAdapter::default());
        let err = bus.transaction(&mut []).unwrap_err();
        assert!(matches!(err, BusError::Transfer(_)));
        assert_eq!(err.raw_os_error(), Some(22));
        assert_eq!(bus.adapter().calls, 1);
    }

    #[test]
    fn test_closed_descriptor_fails_deterministically() {
        const EBADF: i32 = 9;
        let mut bus = I2cBus::with_adapter(FailingAdapter::new(EBADF));

        for _ in 0..3 {
            let err = bus
                .transaction(&mut [write(0x20, [0x01]), read(0x20, 1)])
                .unwrap_err();
            assert!(matches!(err, BusError::Transfer(_)));
            assert_eq!(err.raw_os_error(), Some(EBADF));
        }

        let err = bus.functionality().unwrap_err();
        assert!(matches!(err, BusError::Functionality(_)));
        assert_eq!(err.raw_os_error(), Some(EBADF));
    }

    #[test]
    fn test_oversized_message_never_reaches_adapter() {
        let mut bus = I2cBus::with_adapter(FakeAdapter::default());
        let err = bus
            .transaction(&mut [write(0x20, vec![0u8; 65_536])])
            .unwrap_err();
        assert!(matches!(err, BusError::Message(_)));
        assert_eq!(err.raw_os_error(), None);
        assert_eq!(bus.adapter().calls, 0);
    }

    #[test]
    fn test_functionality_passthrough() {
        let mut bus = I2cBus::with_adapter(FakeAdapter::default());
        let funcs = bus.functionality().unwrap();
        assert!(funcs.contains(Functionality::I2C));
        assert!(!funcs.contains(Functionality::TEN_BIT_ADDR));
    }

    #[test]
    fn test_boxed_adapter() {
        let adapter: Box<dyn Adapter> = Box::new(FakeAdapter::default());
        let mut bus = I2cBus::with_adapter(adapter);
        let results = bus.transaction(&mut [read(0x20, 2)]).unwrap();
        assert_eq!(results, vec![vec![0x00, 0x01]]);
        bus.close();
    }
}
