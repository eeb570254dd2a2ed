use std::io;

use i2cbus_msg::Request;

use crate::funcs::Functionality;

/// The ioctl boundary of a bus.
///
/// Implementations issue exactly one combined transfer per call and report
/// failures as the OS reported them.
pub trait Adapter {
    /// Execute every message of `request` as one atomic transfer.
    ///
    /// On success, read-direction buffers of `request` hold the bytes read.
    fn rdwr(&mut self, request: &mut Request<'_, '_>) -> io::Result<()>;

    /// Report the adapter's functionality mask.
    fn functionality(&mut self) -> io::Result<Functionality>;
}

impl<A: Adapter + ?Sized> Adapter for Box<A> {
    fn rdwr(&mut self, request: &mut Request<'_, '_>) -> io::Result<()> {
        (**self).rdwr(request)
    }

    fn functionality(&mut self) -> io::Result<Functionality> {
        (**self).functionality()
    }
}
