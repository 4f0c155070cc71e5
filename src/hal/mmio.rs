//! Memory-mapped register access and the platform register map.
//!
//! Addresses are for the BCM2837 (Raspberry Pi 3 / Zero 2 W), which is also
//! what QEMU's `raspi3b` machine emulates.

use core::ptr::{read_volatile, write_volatile};

/// BCM2837 peripheral base address
pub const PERIPHERAL_BASE: usize = 0x3F00_0000;

/// VideoCore mailbox 0 block
pub const MAILBOX_BASE: usize = PERIPHERAL_BASE + 0x0000_B880;

/// PL011 UART0 block
pub const UART0_BASE: usize = PERIPHERAL_BASE + 0x0020_1000;

/// Read a 32-bit value from an MMIO address
#[inline(always)]
pub fn mmio_read(addr: usize) -> u32 {
    unsafe { read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to an MMIO address
#[inline(always)]
pub fn mmio_write(addr: usize, val: u32) {
    unsafe { write_volatile(addr as *mut u32, val) }
}

/// Data synchronization barrier. The firmware reads the property buffer
/// straight from memory, so every CPU store must land before the doorbell.
#[inline(always)]
pub fn dsb() {
    #[cfg(target_arch = "aarch64")]
    unsafe {
        core::arch::asm!("dsb sy", options(nostack, preserves_flags));
    }
    #[cfg(not(target_arch = "aarch64"))]
    core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
}
