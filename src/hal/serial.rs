//! PL011 UART console.

use core::fmt::{self, Write};

use spin::Mutex;

use crate::hal::mmio::{mmio_read, mmio_write, UART0_BASE};

const UART_DR: usize = 0x00;
const UART_FR: usize = 0x18;
const UART_IBRD: usize = 0x24;
const UART_FBRD: usize = 0x28;
const UART_LCRH: usize = 0x2C;
const UART_CR: usize = 0x30;
const UART_ICR: usize = 0x44;

/// Transmit FIFO full
const FR_TXFF: u32 = 1 << 5;

/// FIFO enable, 8 data bits, no parity, 1 stop bit
const LCRH_8N1_FIFO: u32 = (1 << 4) | (3 << 5);

/// UART enable, TX enable, RX enable
const CR_ENABLE: u32 = (1 << 0) | (1 << 8) | (1 << 9);

/// Reference clock feeding UART0
pub const UART_CLOCK_HZ: u32 = 3_000_000;

/// Integer and fractional baud rate divisors for the PL011.
pub const fn baud_divisors(clock_hz: u32, baud: u32) -> (u32, u32) {
    let integer = clock_hz / (16 * baud);
    let fractional = ((clock_hz * 4 / baud) % 64) & 0x3F;
    (integer, fractional)
}

pub struct Pl011 {
    base: usize,
}

impl Pl011 {
    /// # Safety
    ///
    /// `base` must be the register block of a PL011 that nothing else drives.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub fn init(&mut self, baud: u32) {
        mmio_write(self.base + UART_CR, 0);
        mmio_write(self.base + UART_ICR, 0x7FF);

        let (integer, fractional) = baud_divisors(UART_CLOCK_HZ, baud);
        mmio_write(self.base + UART_IBRD, integer);
        mmio_write(self.base + UART_FBRD, fractional);

        mmio_write(self.base + UART_LCRH, LCRH_8N1_FIFO);
        mmio_write(self.base + UART_CR, CR_ENABLE);
    }

    pub fn write_byte(&mut self, byte: u8) {
        while mmio_read(self.base + UART_FR) & FR_TXFF != 0 {
            core::hint::spin_loop();
        }
        mmio_write(self.base + UART_DR, u32::from(byte));
    }
}

impl Write for Pl011 {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}

pub static SERIAL: Mutex<Option<Pl011>> = Mutex::new(None);

/// Bring up UART0 and route `serial_println!` to it.
pub fn init_serial(baud: u32) {
    let mut uart = unsafe { Pl011::new(UART0_BASE) };
    uart.init(baud);
    *SERIAL.lock() = Some(uart);
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    if let Some(uart) = SERIAL.lock().as_mut() {
        let _ = uart.write_fmt(args);
    }
}

#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::hal::serial::_print(core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! serial_println {
    () => {
        $crate::serial_print!("\n")
    };
    ($($arg:tt)*) => {
        $crate::hal::serial::_print(core::format_args!("{}\n", core::format_args!($($arg)*)))
    };
}
