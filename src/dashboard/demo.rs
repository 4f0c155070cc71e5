//! Built-in demo layout and the sweep that animates it.

use crate::dashboard::element::{DashElement, ElementKind};
use crate::dashboard::model::{Dashboard, ElementId};
use crate::framebuffer::color::Color;

pub const SPEED: ElementId = ElementId::new(0);
pub const RPM: ElementId = ElementId::new(1);
pub const TEMP: ElementId = ElementId::new(2);

/// Counter increment per frame.
pub const SWEEP_STEP: f32 = 0.5;

/// Two gauges, a value readout, a graph and a caption, laid out for a
/// 1280x720 or larger display.
pub fn demo_dashboard() -> Dashboard {
    let mut dash = Dashboard::new("LibreDash Demo");
    let elements = [
        DashElement::new(ElementKind::Gauge, 50, 50, 400, 60, Color::GREEN)
            .with_value(75.0)
            .with_label("Speed"),
        DashElement::new(ElementKind::Gauge, 50, 130, 400, 60, Color::BLUE)
            .with_value(45.0)
            .with_label("RPM"),
        DashElement::new(ElementKind::Value, 500, 50, 200, 60, Color::CYAN)
            .with_value(65.0)
            .with_label("Temp"),
        DashElement::new(ElementKind::Graph, 50, 250, 650, 200, Color::YELLOW)
            .with_label("History"),
        DashElement::new(ElementKind::Label, 50, 500, 650, 50, Color::WHITE)
            .with_range(0.0, 0.0)
            .with_label("LibreDash - Raspberry Pi Bare Metal Dashboard"),
    ];
    for element in elements {
        // five elements always fit
        let _ = dash.add_element(element);
    }
    dash
}

/// Advance `counter` by one frame, wrapping to 0 past 100.
pub fn next_counter(counter: f32) -> f32 {
    let next = counter + SWEEP_STEP;
    if next > 100.0 {
        0.0
    } else {
        next
    }
}

/// Drive the demo elements from `counter`: speed rises, rpm falls, and
/// temperature follows at 70%.
pub fn animate(dashboard: &mut Dashboard, counter: f32) {
    for (id, value) in [(SPEED, counter), (RPM, 100.0 - counter), (TEMP, counter * 0.7)] {
        if dashboard.update_value(id, value).is_err() {
            log::warn!("demo element {} missing from '{}'", id, dashboard.name());
        }
    }
}
