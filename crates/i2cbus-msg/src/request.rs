use tracing::trace;

use crate::abi::{RawMsg, RawRdwrData};
use crate::error::{MessageError, Result};
use crate::flags::MessageFlags;
use crate::message::Message;

/// Decoded fields of one packed `i2c_msg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub addr: u16,
    pub flags: MessageFlags,
    pub len: u16,
}

impl MessageHeader {
    pub fn is_read(&self) -> bool {
        self.flags.contains(MessageFlags::READ)
    }
}

impl From<&RawMsg> for MessageHeader {
    fn from(raw: &RawMsg) -> Self {
        Self {
            addr: raw.addr,
            flags: MessageFlags::from_bits_retain(raw.flags),
            len: raw.len,
        }
    }
}

/// An ordered set of messages packed for one `I2C_RDWR` ioctl.
///
/// The request mutably borrows its messages for its whole lifetime, so no
/// buffer can be moved or dropped while the packed array points into it.
pub struct Request<'r, 'a> {
    messages: &'r mut [Message<'a>],
    raw: Vec<RawMsg>,
}

impl<'r, 'a> Request<'r, 'a> {
    /// Pack `messages`, in order, into a contiguous `i2c_msg` array.
    ///
    /// Only the ABI field widths are enforced. An empty request, or one the
    /// kernel considers too large, is packed anyway and rejected by the
    /// kernel when issued.
    pub fn new(messages: &'r mut [Message<'a>]) -> Result<Self> {
        if u32::try_from(messages.len()).is_err() {
            return Err(MessageError::TooManyMessages {
                count: messages.len(),
                max: u32::MAX as usize,
            });
        }

        let mut raw = Vec::with_capacity(messages.len());
        for (index, msg) in messages.iter_mut().enumerate() {
            let len = u16::try_from(msg.len()).map_err(|_| MessageError::TooLong {
                index,
                len: msg.len(),
                max: u16::MAX as usize,
            })?;
            trace!(
                index,
                addr = msg.address(),
                flags = msg.flags().bits(),
                len,
                "packed i2c_msg"
            );
            raw.push(RawMsg {
                addr: msg.address(),
                flags: msg.flags().bits(),
                len,
                buf: msg.as_mut_ptr(),
            });
        }

        Ok(Self { messages, raw })
    }

    /// Number of packed messages (`nmsgs`).
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of read-direction messages.
    pub fn read_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_read()).count()
    }

    /// The packed `i2c_msg` array.
    pub fn raw_messages(&self) -> &[RawMsg] {
        &self.raw
    }

    /// Decode the packed array back into per-message fields.
    pub fn headers(&self) -> Vec<MessageHeader> {
        self.raw.iter().map(MessageHeader::from).collect()
    }

    /// Build the `i2c_rdwr_ioctl_data` argument for the ioctl.
    ///
    /// Buffer pointers are re-derived from the borrowed messages, so the
    /// result stays valid until the request is next used.
    pub fn ioctl_data(&mut self) -> RawRdwrData {
        for (raw, msg) in self.raw.iter_mut().zip(self.messages.iter_mut()) {
            raw.buf = msg.as_mut_ptr();
        }
        RawRdwrData {
            msgs: self.raw.as_mut_ptr(),
            nmsgs: self.raw.len() as u32,
        }
    }

    /// Each packed header paired with its message buffer.
    ///
    /// This is the safe view of the same memory the kernel writes read
    /// results into.
    pub fn segments_mut(&mut self) -> Vec<(MessageHeader, &mut [u8])> {
        self.raw
            .iter()
            .zip(self.messages.iter_mut())
            .map(|(raw, msg)| (MessageHeader::from(raw), msg.data_mut()))
            .collect()
    }

    /// Copy out the buffers of read-direction messages, in message order.
    ///
    /// Write-direction messages contribute nothing.
    pub fn read_results(&self) -> Vec<Vec<u8>> {
        self.messages
            .iter()
            .filter(|m| m.is_read())
            .map(|m| m.data().to_vec())
            .collect()
    }
}

impl std::fmt::Debug for Request<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("headers", &self.headers())
            .finish()
    }
}
