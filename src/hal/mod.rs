//! # Hardware Abstraction Layer
//!
//! Everything that touches BCM2837 registers lives here.
//!
//! ## Modules
//!
//! - `mmio`: volatile register access and the platform register map
//! - `spin_wait`: bounded busy-polling used by every hardware handshake
//! - `mailbox`: VideoCore property channel (request buffer, tags, exchange)
//! - `serial`: PL011 UART console behind `serial_println!`
//!
//! Protocol code talks to hardware through the `MailboxPort` trait so it can
//! run against the simulated firmware in `sim` on the host.

pub mod mailbox;
pub mod mmio;
pub mod serial;
pub mod spin_wait;

#[cfg(test)]
pub(crate) mod sim;

pub use mailbox::{MailboxChannel, MailboxError, MailboxPort, MmioMailboxPort, PropertyBuffer};
pub use spin_wait::{SpinBudget, SpinTimeout};
