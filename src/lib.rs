//! # LibreDash
//!
//! Bare-metal telemetry dashboard for the Raspberry Pi.
//!
//! ## Modules
//!
//! - `hal`: registers, the VideoCore mailbox and the serial console
//! - `framebuffer`: display negotiation and the `PixelSurface` primitives
//! - `dashboard`: dashboard model, renderer and demo layout
//! - `kernel`: boot phases and display bring-up with mode fallback
//! - `config`: display modes and boot constants
//! - `logger`: `log` backend over the serial console
//!
//! ## Boot flow
//!
//! 1. console and logger
//! 2. mailbox channel installed, display negotiated (1920x1080, then 1280x720)
//! 3. render loop: update values, repaint the frame

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dashboard;
pub mod framebuffer;
pub mod hal;
pub mod kernel;
pub mod logger;

pub use config::{DisplayConfig, DisplayMode};
pub use dashboard::{Dashboard, DashboardRenderer, DashElement, ElementId, ElementKind};
pub use framebuffer::{negotiate_display, Color, NegotiationError, PixelSurface};
