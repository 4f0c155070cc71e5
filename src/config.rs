//! Boot-time configuration.

use core::fmt;

use crate::hal::SpinBudget;

/// Status polls allowed per mailbox exchange before it counts as lost.
pub const DEFAULT_SPIN_POLLS: u32 = 10_000_000;

/// Console baud rate.
pub const CONSOLE_BAUD: u32 = 115_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
}

impl DisplayMode {
    pub const FULL_HD: DisplayMode = DisplayMode::new(1920, 1080);
    pub const HD: DisplayMode = DisplayMode::new(1280, 720);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which modes to try, in order, and how long to wait on the firmware.
#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    pub modes: &'static [DisplayMode],
    pub spin_budget: SpinBudget,
}

impl DisplayConfig {
    pub const DEFAULT: DisplayConfig = DisplayConfig {
        modes: &[DisplayMode::FULL_HD, DisplayMode::HD],
        spin_budget: SpinBudget::bounded(DEFAULT_SPIN_POLLS),
    };
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
