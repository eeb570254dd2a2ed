use crate::flags::MessageFlags;

#[derive(Debug)]
enum Buffer<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

impl Buffer<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Owned(buf) => buf,
            Buffer::Borrowed(buf) => buf,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Buffer::Owned(buf) => buf,
            Buffer::Borrowed(buf) => buf,
        }
    }
}

/// One direction of transfer against one device address.
///
/// The buffer length is the message length. While a [`crate::Request`]
/// borrows the message, the buffer cannot be moved or freed, which keeps the
/// pointer handed to the kernel valid for the whole ioctl.
#[derive(Debug)]
pub struct Message<'a> {
    address: u16,
    flags: MessageFlags,
    buffer: Buffer<'a>,
}

impl<'a> Message<'a> {
    fn new(address: u16, flags: MessageFlags, buffer: Buffer<'a>) -> Self {
        Self {
            address,
            flags,
            buffer,
        }
    }

    /// OR additional kernel flags into this message.
    ///
    /// No combination is rejected; the adapter decides what it supports.
    pub fn with_flags(mut self, flags: MessageFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Target device address.
    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn flags(&self) -> MessageFlags {
        self.flags
    }

    /// True for read-direction messages.
    pub fn is_read(&self) -> bool {
        self.flags.contains(MessageFlags::READ)
    }

    /// Number of bytes transferred by this message.
    pub fn len(&self) -> usize {
        self.buffer.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The message buffer: bytes to write, or bytes read once a
    /// transaction has completed.
    pub fn data(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut_slice()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.buffer.as_mut_slice().as_mut_ptr()
    }
}

impl PartialEq for Message<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.flags == other.flags && self.data() == other.data()
    }
}

impl Eq for Message<'_> {}

/// A message that reads `len` bytes from `address` into a new zeroed buffer.
///
/// `len` is not checked against the kernel's per-message limit; an oversized
/// read fails when the transaction is issued.
pub fn read(address: u16, len: u16) -> Message<'static> {
    Message::new(
        address,
        MessageFlags::READ,
        Buffer::Owned(vec![0; usize::from(len)]),
    )
}

/// A message that reads from `address` into a caller-supplied buffer.
///
/// The whole buffer is requested. After a successful transaction it holds
/// the bytes read.
pub fn read_into(address: u16, buf: &mut [u8]) -> Message<'_> {
    Message::new(address, MessageFlags::READ, Buffer::Borrowed(buf))
}

/// A message that writes `bytes` to `address`.
///
/// The bytes are copied. An empty input yields a zero-length write, which
/// is passed to the kernel as-is.
pub fn write(address: u16, bytes: impl AsRef<[u8]>) -> Message<'static> {
    Message::new(
        address,
        MessageFlags::empty(),
        Buffer::Owned(bytes.as_ref().to_vec()),
    )
}

/// A write message built from individual byte arguments.
///
/// ```
/// use i2cbus_msg::{write, write_bytes};
///
/// assert_eq!(write_bytes!(0x20, 0x01, 0xFF), write(0x20, [0x01, 0xFF]));
/// ```
#[macro_export]
macro_rules! write_bytes {
    ($address:expr $(, $byte:expr)* $(,)?) => {
        {
            let bytes: &[u8] = &[$($byte),*];
            $crate::write($address, bytes)
        }
    };
}
