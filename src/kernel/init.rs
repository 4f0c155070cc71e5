//! Boot phases
use core::fmt::Display;

use log::{error, info, warn};

use crate::config::DisplayConfig;
use crate::framebuffer::negotiate::{negotiate_display, NegotiationError};
use crate::framebuffer::surface::PixelSurface;
use crate::hal::mailbox::{MailboxChannel, MailboxPort, PropertyBuffer};

/// Run one named boot phase, logging how it went.
pub fn init_phase<T, E: Display>(
    name: &'static str,
    init_fn: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    info!("initializing {}...", name);

    match init_fn() {
        Ok(value) => {
            info!("{} initialized successfully", name);
            Ok(value)
        }
        Err(e) => {
            error!("{} failed: {}", name, e);
            Err(e)
        }
    }
}

/// Negotiate the first mode in `config` the firmware accepts.
///
/// Modes are tried in order; if all fail the last failure is returned.
pub fn init_display<P: MailboxPort>(
    channel: &mut MailboxChannel<P>,
    buffer: &mut PropertyBuffer,
    config: &DisplayConfig,
) -> Result<PixelSurface, NegotiationError> {
    let mut last = NegotiationError::NoModes;

    for (attempt, &mode) in config.modes.iter().enumerate() {
        info!(
            "requesting {} framebuffer (attempt {}/{})",
            mode,
            attempt + 1,
            config.modes.len()
        );
        match negotiate_display(channel, buffer, mode) {
            Ok(surface) => return Ok(surface),
            Err(e) => {
                warn!("{} rejected: {}", mode, e);
                last = e;
            }
        }
    }

    Err(last)
}
