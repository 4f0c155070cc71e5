//! VideoCore Mailbox Interface
//!
//! The property channel is a request/response exchange with the GPU
//! firmware. A request is a 16-byte aligned buffer of little-endian words:
//!
//! ```text
//! [0]      total size in bytes
//! [1]      0 on send; 0x8000_0000 (ok) / 0x8000_0001 (error) on return
//! [2..]    tags: id, value buffer size, request/response length, values...
//! [last]   end tag (0)
//! ```
//!
//! The buffer's bus address, with the channel number in the low 4 bits, is
//! posted to the write register. The exchange completes when the same word
//! comes back on the read register.

use core::ptr::read_volatile;

use log::{trace, warn};
use spin::Mutex;
use thiserror::Error;

use crate::hal::mmio::{dsb, mmio_read, mmio_write};
use crate::hal::spin_wait::SpinBudget;

// ============================================================================
// Mailbox Registers
// ============================================================================

const MBOX_READ: usize = 0x00;
const MBOX_STATUS: usize = 0x18;
const MBOX_WRITE: usize = 0x20;

/// Status bit: write register cannot accept a message
pub const STATUS_FULL: u32 = 0x8000_0000;

/// Status bit: nothing to read
pub const STATUS_EMPTY: u32 = 0x4000_0000;

/// ARM to VideoCore property tag channel
pub const CHANNEL_PROPERTY: u8 = 8;

pub const REQUEST_CODE: u32 = 0x0000_0000;
pub const RESPONSE_SUCCESS: u32 = 0x8000_0000;
pub const RESPONSE_ERROR: u32 = 0x8000_0001;

/// Set by the firmware in a tag's length word once it has answered it
pub const TAG_RESPONSE: u32 = 0x8000_0000;

pub const END_TAG: u32 = 0;

/// Capacity of the request buffer in words
pub const BUFFER_WORDS: usize = 36;

/// Property tags
pub mod tags {
    // Framebuffer
    pub const ALLOCATE_BUFFER: u32 = 0x0004_0001;
    pub const GET_PITCH: u32 = 0x0004_0008;
    pub const SET_PHYSICAL_SIZE: u32 = 0x0004_8003;
    pub const SET_VIRTUAL_SIZE: u32 = 0x0004_8004;
    pub const SET_DEPTH: u32 = 0x0004_8005;
    pub const SET_PIXEL_ORDER: u32 = 0x0004_8006;
    pub const SET_VIRTUAL_OFFSET: u32 = 0x0004_8009;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MailboxError {
    #[error("mailbox is busy with another exchange")]
    Busy,
    #[error("mailbox has not been installed")]
    Uninitialized,
    #[error("mailbox did not answer within the spin budget")]
    Timeout,
    #[error("firmware rejected the request")]
    FirmwareError,
    #[error("unexpected response code {0:#010x}")]
    ProtocolViolation(u32),
    #[error("property message does not fit the request buffer")]
    BufferOverflow,
}

// ============================================================================
// Hardware Port
// ============================================================================

/// The four things the exchange needs from hardware.
pub trait MailboxPort {
    /// Current status register (`STATUS_FULL` / `STATUS_EMPTY` bits).
    fn read_status(&mut self) -> u32;

    fn write_data(&mut self, value: u32);

    fn read_data(&mut self) -> u32;

    /// Address of `buffer` as seen by the firmware. Must be 16-byte aligned.
    fn bus_address(&mut self, buffer: *mut u32) -> u32;
}

/// Mailbox 0 registers on the real SoC.
#[derive(Debug)]
pub struct MmioMailboxPort {
    base: usize,
}

impl MmioMailboxPort {
    /// # Safety
    ///
    /// `base` must point at the mailbox 0 register block and no other
    /// `MmioMailboxPort` may exist for it.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }
}

impl MailboxPort for MmioMailboxPort {
    fn read_status(&mut self) -> u32 {
        mmio_read(self.base + MBOX_STATUS)
    }

    fn write_data(&mut self, value: u32) {
        dsb();
        mmio_write(self.base + MBOX_WRITE, value);
    }

    fn read_data(&mut self) -> u32 {
        let value = mmio_read(self.base + MBOX_READ);
        dsb();
        value
    }

    fn bus_address(&mut self, buffer: *mut u32) -> u32 {
        // identity mapped, and the request buffer always sits below 1 GiB
        buffer as usize as u32
    }
}

// ============================================================================
// Mailbox Buffer
// ============================================================================

/// 16-byte aligned mailbox buffer for property tag interface
#[repr(C, align(16))]
pub struct PropertyBuffer {
    words: [u32; BUFFER_WORDS],
}

impl Default for PropertyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyBuffer {
    pub const fn new() -> Self {
        Self {
            words: [0; BUFFER_WORDS],
        }
    }

    /// Start a new request, discarding whatever the buffer held.
    pub fn message(&mut self) -> PropertyMessage<'_> {
        self.words = [0; BUFFER_WORDS];
        PropertyMessage {
            buffer: self,
            len: 2,
        }
    }

    /// Read one word as the firmware left it, or `None` past the buffer.
    pub fn word(&self, index: usize) -> Option<u32> {
        let word = self.words.get(index)?;
        // the firmware writes behind the compiler's back
        Some(unsafe { read_volatile(word) })
    }

    /// `index`-th value word of a tag's response, or `None` past the tag.
    pub fn value(&self, slot: TagSlot, index: usize) -> Option<u32> {
        if index >= slot.value_words {
            return None;
        }
        self.word(slot.offset + index)
    }

    /// Whether the firmware marked the tag as answered.
    pub fn acknowledged(&self, slot: TagSlot) -> bool {
        slot.offset
            .checked_sub(1)
            .and_then(|length| self.word(length))
            .is_some_and(|length| length & TAG_RESPONSE != 0)
    }

    /// Response code word.
    pub fn code(&self) -> u32 {
        unsafe { read_volatile(&self.words[1]) }
    }

    fn as_mut_ptr(&mut self) -> *mut u32 {
        self.words.as_mut_ptr()
    }
}

/// Location of a tag's value words inside a [`PropertyBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSlot {
    pub tag: u32,
    offset: usize,
    value_words: usize,
}

impl TagSlot {
    /// Word index of the first value word.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Writes tags into a [`PropertyBuffer`] in order.
pub struct PropertyMessage<'a> {
    buffer: &'a mut PropertyBuffer,
    len: usize,
}

impl PropertyMessage<'_> {
    /// Append a tag with a value buffer of `value_words` words, pre-filled
    /// with `request` and zero padded. The request length word covers the
    /// whole value buffer.
    pub fn tag(
        &mut self,
        tag: u32,
        request: &[u32],
        value_words: usize,
    ) -> Result<TagSlot, MailboxError> {
        let value_words = value_words.max(request.len());
        // header, values, and room for the end tag
        if self.len + 3 + value_words + 1 > BUFFER_WORDS {
            return Err(MailboxError::BufferOverflow);
        }

        let size = (value_words * 4) as u32;
        let words = &mut self.buffer.words;
        words[self.len] = tag;
        words[self.len + 1] = size;
        words[self.len + 2] = size;

        let offset = self.len + 3;
        words[offset..offset + request.len()].copy_from_slice(request);

        self.len = offset + value_words;
        Ok(TagSlot {
            tag,
            offset,
            value_words,
        })
    }

    /// Terminate the tag list and fill in the header. Returns the message
    /// size in bytes.
    pub fn finish(self) -> u32 {
        let words = &mut self.buffer.words;
        words[self.len] = END_TAG;
        let size = ((self.len + 1) * 4) as u32;
        words[0] = size;
        words[1] = REQUEST_CODE;
        size
    }
}

// ============================================================================
// Mailbox Channel
// ============================================================================

/// One mailbox channel. `call` borrows the channel mutably for the whole
/// exchange, so a second exchange cannot start while one is in flight.
#[derive(Debug)]
pub struct MailboxChannel<P> {
    port: P,
    channel: u8,
    budget: SpinBudget,
}

impl<P: MailboxPort> MailboxChannel<P> {
    pub fn new(port: P, channel: u8, budget: SpinBudget) -> Self {
        Self {
            port,
            channel: channel & 0xF,
            budget,
        }
    }

    /// The property tag channel.
    pub fn property(port: P, budget: SpinBudget) -> Self {
        Self::new(port, CHANNEL_PROPERTY, budget)
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Send `buffer` to the firmware and wait for the answer.
    ///
    /// Succeeds when the posted word comes back and the response code is
    /// `RESPONSE_SUCCESS`. Answers meant for other channels are dropped.
    pub fn call(&mut self, buffer: &mut PropertyBuffer) -> Result<(), MailboxError> {
        let words = buffer.as_mut_ptr();
        let message = (self.port.bus_address(words) & !0xF) | u32::from(self.channel);
        let mut spinner = self.budget.spinner();

        let port = &mut self.port;
        spinner
            .wait_until(|| port.read_status() & STATUS_FULL == 0)
            .map_err(|_| {
                warn!("mailbox stayed full, request {message:#010x} not sent");
                MailboxError::Timeout
            })?;
        port.write_data(message);

        loop {
            spinner
                .wait_until(|| port.read_status() & STATUS_EMPTY == 0)
                .map_err(|_| {
                    warn!("no mailbox response to {message:#010x}");
                    MailboxError::Timeout
                })?;

            let response = port.read_data();
            if response == message {
                break;
            }
            trace!("dropping mailbox word {response:#010x}, waiting for {message:#010x}");
            spinner.tick().map_err(|_| MailboxError::Timeout)?;
        }

        // SAFETY: `words` points into `buffer`, which is still exclusively
        // borrowed for this call.
        match unsafe { read_volatile(words.add(1)) } {
            RESPONSE_SUCCESS => Ok(()),
            RESPONSE_ERROR => Err(MailboxError::FirmwareError),
            code => Err(MailboxError::ProtocolViolation(code)),
        }
    }
}

// ============================================================================
// Global Channel
// ============================================================================

static MAILBOX: Mutex<Option<MailboxChannel<MmioMailboxPort>>> = Mutex::new(None);

/// Hand the hardware property channel to the global slot.
pub fn install(channel: MailboxChannel<MmioMailboxPort>) {
    *MAILBOX.lock() = Some(channel);
}

/// Run `f` with exclusive access to the global channel. Fails with
/// [`MailboxError::Busy`] instead of waiting if an exchange is running.
pub fn with_mailbox<R>(
    f: impl FnOnce(&mut MailboxChannel<MmioMailboxPort>) -> R,
) -> Result<R, MailboxError> {
    let mut guard = MAILBOX.try_lock().ok_or(MailboxError::Busy)?;
    let channel = guard.as_mut().ok_or(MailboxError::Uninitialized)?;
    Ok(f(channel))
}
