#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

use libredash::dashboard::demo::{animate, demo_dashboard, next_counter};
use libredash::{DashboardRenderer, PixelSurface};

#[cfg(target_os = "none")]
mod bare_metal {
    extern crate rlibc;

    use core::arch::global_asm;
    use core::panic::PanicInfo;

    use libredash::config::{DisplayConfig, CONSOLE_BAUD};
    use libredash::hal::mailbox::{install, with_mailbox};
    use libredash::hal::mmio::MAILBOX_BASE;
    use libredash::hal::serial::init_serial;
    use libredash::hal::{MailboxChannel, MmioMailboxPort, PropertyBuffer};
    use libredash::kernel::{init_display, init_phase};
    use libredash::{logger, serial_println, NegotiationError};
    use log::LevelFilter;

    use super::{render_frames, DashboardRenderer, PixelSurface};

    /// Busy-wait iterations between frames.
    const FRAME_DELAY_SPINS: u32 = 1_000_000;

    // Core 0 runs with the stack growing down from the load address; the
    // other cores sleep.
    global_asm!(
        r#"
.section .text.boot
.global _start

_start:
    mrs     x1, mpidr_el1
    and     x1, x1, #3
    cbnz    x1, .Lpark

    ldr     x1, =_start
    mov     sp, x1

    ldr     x1, =__bss_start
    ldr     x2, =__bss_end
.Lclear_bss:
    cmp     x1, x2
    b.ge    .Lbss_done
    str     xzr, [x1], #8
    b       .Lclear_bss
.Lbss_done:

    bl      kernel_main

.Lpark:
    wfe
    b       .Lpark
"#
    );

    #[no_mangle]
    pub extern "C" fn kernel_main() -> ! {
        init_serial(CONSOLE_BAUD);
        serial_println!("LibreDash - Raspberry Pi Bare Metal Dashboard");

        if let Err(e) = logger::init(LevelFilter::Info) {
            serial_println!("logger unavailable: {}", e);
        }

        let config = DisplayConfig::DEFAULT;
        // SAFETY: the only handle to mailbox 0
        let port = unsafe { MmioMailboxPort::new(MAILBOX_BASE) };
        install(MailboxChannel::property(port, config.spin_budget));

        let mut buffer = PropertyBuffer::new();
        let surface = init_phase("display", || -> Result<PixelSurface, NegotiationError> {
            with_mailbox(|channel| init_display(channel, &mut buffer, &config))?
        });
        let Ok(mut surface) = surface else { halt() };

        render_frames(&DashboardRenderer::default(), &mut surface, None, || {
            for _ in 0..FRAME_DELAY_SPINS {
                core::hint::spin_loop();
            }
        });
        halt()
    }

    fn halt() -> ! {
        loop {
            unsafe { core::arch::asm!("wfe", options(nomem, nostack)) };
        }
    }

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        serial_println!("PANIC : {} | {:?}", info.message(), info.location());
        halt()
    }
}

/// Animate the demo dashboard on `surface`, `frames` times or forever.
fn render_frames(
    renderer: &DashboardRenderer,
    surface: &mut PixelSurface,
    frames: Option<u32>,
    mut between_frames: impl FnMut(),
) {
    let mut dashboard = demo_dashboard();
    let mut counter = 0.0;
    let mut rendered = 0;

    while frames.map_or(true, |limit| rendered < limit) {
        counter = next_counter(counter);
        animate(&mut dashboard, counter);
        renderer.render(&dashboard, surface);
        rendered += 1;
        between_frames();
    }
}

/// Hosted preview: render the demo into memory and report a checksum of
/// the final frame.
#[cfg(not(target_os = "none"))]
fn main() {
    use core::ptr::NonNull;
    use libredash::DisplayMode;

    const PREVIEW_FRAMES: u32 = 120;

    let mode = DisplayMode::HD;
    let mut memory = vec![0u32; (mode.width * mode.height) as usize];
    let base = NonNull::from(memory.as_mut_slice()).cast::<u32>();
    // SAFETY: `memory` outlives the surface and holds a packed frame
    let mut surface =
        unsafe { PixelSurface::from_raw_parts(base, mode.width, mode.height, mode.width * 4) };

    render_frames(&DashboardRenderer::default(), &mut surface, Some(PREVIEW_FRAMES), || {});
    drop(surface);

    // FNV-1a over the frame words
    let checksum = memory.iter().fold(0xcbf2_9ce4_8422_2325u64, |hash, &word| {
        (hash ^ u64::from(word)).wrapping_mul(0x0000_0100_0000_01b3)
    });
    println!(
        "rendered {} frames of the demo dashboard at {}: checksum {:#018x}",
        PREVIEW_FRAMES, mode, checksum
    );
}
