/// Boot sequencing
pub mod init;

pub use init::{init_display, init_phase};
