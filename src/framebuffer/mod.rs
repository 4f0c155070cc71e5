//! # Framebuffer Module
//!
//! Negotiates a display with the firmware and draws into the memory it
//! hands back.
//!
//! ## Modules
//!
//! - `negotiate`: the property-channel handshake that yields a surface
//! - `surface`: `PixelSurface`, clipped pixel and rectangle primitives
//! - `color`: `Color` type with common color constants
//!
//! ## Memory layout
//!
//! 32 bits per pixel, `0x00RRGGBB`, rows `stride_bytes` apart. The stride
//! reported by the firmware may be wider than `width * 4`; the padding at
//! the end of each row is never written.

pub mod color;
pub mod negotiate;
pub mod surface;

pub use color::Color;
pub use negotiate::{negotiate_display, NegotiationError};
pub use surface::PixelSurface;
