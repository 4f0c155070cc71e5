//! Display mode negotiation with the VideoCore firmware.
//!
//! One property exchange sets the mode and allocates the framebuffer:
//!
//! ```text
//! set physical size   w, h
//! set virtual size    w, h
//! set virtual offset  0, 0
//! set depth           32
//! set pixel order     RGB
//! allocate buffer     alignment 4096  -> base, size
//! get pitch                           -> bytes per row
//! ```

use core::ptr::NonNull;

use log::{info, warn};
use thiserror::Error;

use crate::config::DisplayMode;
use crate::framebuffer::surface::PixelSurface;
use crate::hal::mailbox::{tags, MailboxChannel, MailboxError, MailboxPort, PropertyBuffer, TagSlot};

pub const FRAMEBUFFER_ALIGNMENT: u32 = 4096;
pub const BITS_PER_PIXEL: u32 = 32;
pub const PIXEL_ORDER_RGB: u32 = 1;

/// Strips the VideoCore cache alias bits off a bus address.
pub const BUS_ADDRESS_MASK: u32 = 0x3FFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NegotiationError {
    #[error(transparent)]
    Mailbox(#[from] MailboxError),
    #[error("firmware did not allocate a framebuffer")]
    NoFramebuffer,
    #[error("pitch of {pitch} bytes cannot hold {width} pixels per row")]
    InvalidPitch { pitch: u32, width: u32 },
    #[error("no display modes configured")]
    NoModes,
}

/// Where the two answers we care about will land.
#[derive(Debug, Clone, Copy)]
pub struct NegotiationSlots {
    pub framebuffer: TagSlot,
    pub pitch: TagSlot,
}

/// Fill `buffer` with the negotiation request for `mode`.
pub fn build_request(
    buffer: &mut PropertyBuffer,
    mode: DisplayMode,
) -> Result<NegotiationSlots, MailboxError> {
    let mut msg = buffer.message();
    msg.tag(tags::SET_PHYSICAL_SIZE, &[mode.width, mode.height], 2)?;
    msg.tag(tags::SET_VIRTUAL_SIZE, &[mode.width, mode.height], 2)?;
    msg.tag(tags::SET_VIRTUAL_OFFSET, &[0, 0], 2)?;
    msg.tag(tags::SET_DEPTH, &[BITS_PER_PIXEL], 1)?;
    msg.tag(tags::SET_PIXEL_ORDER, &[PIXEL_ORDER_RGB], 1)?;
    let framebuffer = msg.tag(tags::ALLOCATE_BUFFER, &[FRAMEBUFFER_ALIGNMENT], 2)?;
    let pitch = msg.tag(tags::GET_PITCH, &[], 1)?;
    msg.finish();

    Ok(NegotiationSlots { framebuffer, pitch })
}

/// Ask the firmware for a `mode` framebuffer and wrap it in a surface.
///
/// Nothing is built unless the exchange succeeds and the answer describes
/// memory the surface can address safely.
pub fn negotiate_display<P: MailboxPort>(
    channel: &mut MailboxChannel<P>,
    buffer: &mut PropertyBuffer,
    mode: DisplayMode,
) -> Result<PixelSurface, NegotiationError> {
    let slots = build_request(buffer, mode)?;
    channel.call(buffer)?;

    for slot in [slots.framebuffer, slots.pitch] {
        if !buffer.acknowledged(slot) {
            warn!("firmware left tag {:#07x} unanswered", slot.tag);
        }
    }

    let base = buffer
        .value(slots.framebuffer, 0)
        .ok_or(NegotiationError::NoFramebuffer)?
        & BUS_ADDRESS_MASK;
    let pitch = buffer.value(slots.pitch, 0).unwrap_or(0);

    if pitch / 4 < mode.width {
        return Err(NegotiationError::InvalidPitch {
            pitch,
            width: mode.width,
        });
    }
    let base = NonNull::new(base as usize as *mut u32).ok_or(NegotiationError::NoFramebuffer)?;

    info!(
        "framebuffer {} at {:#010x}, pitch {} bytes",
        mode,
        base.as_ptr() as usize,
        pitch
    );

    // SAFETY: the firmware just handed this region to us for `mode` with
    // `pitch` bytes per row, and the pitch was checked against the width.
    Ok(unsafe { PixelSurface::from_raw_parts(base, mode.width, mode.height, pitch) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mailbox::{END_TAG, REQUEST_CODE};
    use crate::hal::sim::{Reply, SimulatedFirmware};
    use crate::hal::SpinBudget;

    fn channel(reply: Reply) -> MailboxChannel<SimulatedFirmware> {
        MailboxChannel::property(SimulatedFirmware::new(reply), SpinBudget::bounded(100))
    }

    #[test]
    fn request_is_bit_exact() {
        let mut buffer = PropertyBuffer::new();
        let mut channel = channel(Reply::default());
        negotiate_display(&mut channel, &mut buffer, DisplayMode::new(1920, 1080)).unwrap();

        let request = &channel.port().requests()[0];
        #[rustfmt::skip]
        let expected = [
            140, REQUEST_CODE,
            tags::SET_PHYSICAL_SIZE, 8, 8, 1920, 1080,
            tags::SET_VIRTUAL_SIZE, 8, 8, 1920, 1080,
            tags::SET_VIRTUAL_OFFSET, 8, 8, 0, 0,
            tags::SET_DEPTH, 4, 4, 32,
            tags::SET_PIXEL_ORDER, 4, 4, 1,
            tags::ALLOCATE_BUFFER, 8, 8, 4096, 0,
            tags::GET_PITCH, 4, 4, 0,
            END_TAG,
        ];
        assert_eq!(request.as_slice(), &expected[..]);
    }

    #[test]
    fn answer_slots_sit_where_the_firmware_writes() {
        let mut buffer = PropertyBuffer::new();
        let slots = build_request(&mut buffer, DisplayMode::HD).unwrap();
        assert_eq!(slots.framebuffer.offset(), 28);
        assert_eq!(slots.pitch.offset(), 33);
        assert_eq!(buffer.word(0), Some(140));
        assert_eq!(buffer.word(34), Some(END_TAG));
    }

    #[test]
    fn surface_uses_masked_base_and_reported_pitch() {
        let mut buffer = PropertyBuffer::new();
        let mut channel = channel(Reply::Accept {
            framebuffer: 0xC010_0000,
            pitch: Some(1280 * 4 + 64),
        });
        let surface = negotiate_display(&mut channel, &mut buffer, DisplayMode::HD).unwrap();

        assert_eq!(surface.base_address(), 0x0010_0000);
        assert_eq!(surface.stride_bytes(), 1280 * 4 + 64);
        assert_eq!((surface.width(), surface.height()), (1280, 720));
    }

    #[test]
    fn rejected_request_builds_no_surface() {
        let mut buffer = PropertyBuffer::new();
        let mut channel = channel(Reply::Reject);

        assert_eq!(
            negotiate_display(&mut channel, &mut buffer, DisplayMode::FULL_HD).err(),
            Some(NegotiationError::Mailbox(MailboxError::FirmwareError))
        );
    }

    #[test]
    fn silent_firmware_is_a_timeout() {
        let mut buffer = PropertyBuffer::new();
        let mut channel = channel(Reply::Silent);

        assert_eq!(
            negotiate_display(&mut channel, &mut buffer, DisplayMode::HD).err(),
            Some(NegotiationError::Mailbox(MailboxError::Timeout))
        );
    }

    #[test]
    fn zero_base_is_rejected() {
        let mut buffer = PropertyBuffer::new();
        // only alias bits set, nothing left after masking
        let mut channel = channel(Reply::Accept {
            framebuffer: 0xC000_0000,
            pitch: None,
        });

        assert_eq!(
            negotiate_display(&mut channel, &mut buffer, DisplayMode::HD).err(),
            Some(NegotiationError::NoFramebuffer)
        );
    }

    #[test]
    fn short_pitch_is_rejected() {
        let mut buffer = PropertyBuffer::new();
        let mut channel = channel(Reply::Accept {
            framebuffer: SimulatedFirmware::DEFAULT_FRAMEBUFFER,
            pitch: Some(640 * 4),
        });

        assert_eq!(
            negotiate_display(&mut channel, &mut buffer, DisplayMode::HD).err(),
            Some(NegotiationError::InvalidPitch {
                pitch: 2560,
                width: 1280
            })
        );
    }
}
