//! Full-frame dashboard rendering.

use crate::dashboard::element::{DashElement, ElementKind};
use crate::dashboard::model::Dashboard;
use crate::dashboard::theme::Theme;
use crate::framebuffer::color::Color;
use crate::framebuffer::surface::PixelSurface;

/// Above this a value indicator turns to the warning color.
pub const WARNING_THRESHOLD: f32 = 0.6;
/// Above this a value indicator turns to the danger color.
pub const DANGER_THRESHOLD: f32 = 0.8;

const GAUGE_INSET: u32 = 2;
const INDICATOR_INSET: u32 = 5;
const INDICATOR_WIDTH: u32 = 20;
const GRID_DOT_SPACING: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardRenderer {
    theme: Theme,
}

impl DashboardRenderer {
    pub const fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Repaint the whole surface from `dashboard`. The output depends only
    /// on the dashboard's state, never on what the surface held before.
    pub fn render(&self, dashboard: &Dashboard, surface: &mut PixelSurface) {
        surface.clear(self.theme.background);

        for element in dashboard.elements() {
            self.draw_frame(element, surface);
            match element.kind() {
                ElementKind::Gauge => self.draw_gauge(element, surface),
                ElementKind::Label => {}
                ElementKind::Value => self.draw_value(element, surface),
                ElementKind::Graph => self.draw_graph(element, surface),
            }
        }
    }

    fn draw_frame(&self, element: &DashElement, surface: &mut PixelSurface) {
        let (x, y, w, h) = bounds(element);
        surface.draw_filled_rect(x, y, w, h, self.theme.background);
        surface.draw_rect(x, y, w, h, element.color());
    }

    fn draw_gauge(&self, element: &DashElement, surface: &mut PixelSurface) {
        let (x, y, w, h) = bounds(element);
        let track = w.saturating_sub(2 * GAUGE_INSET);
        let fill = libm::truncf(element.percentage() * track as f32) as u32;

        if fill > 0 && h > 2 * GAUGE_INSET {
            surface.draw_filled_rect(
                x.saturating_add(GAUGE_INSET),
                y.saturating_add(GAUGE_INSET),
                fill,
                h - 2 * GAUGE_INSET,
                element.color(),
            );
        }
    }

    fn draw_value(&self, element: &DashElement, surface: &mut PixelSurface) {
        let (x, y, w, h) = bounds(element);
        if w <= 2 * INDICATOR_INSET || h <= 2 * INDICATOR_INSET {
            return;
        }

        surface.draw_filled_rect(
            x.saturating_add(INDICATOR_INSET),
            y.saturating_add(INDICATOR_INSET),
            INDICATOR_WIDTH,
            h - 2 * INDICATOR_INSET,
            self.indicator_color(element.percentage()),
        );
    }

    fn indicator_color(&self, percentage: f32) -> Color {
        if percentage > DANGER_THRESHOLD {
            self.theme.danger
        } else if percentage > WARNING_THRESHOLD {
            self.theme.warning
        } else {
            self.theme.normal
        }
    }

    /// Three dotted guide lines at the quarter heights. The value itself is
    /// not plotted.
    fn draw_graph(&self, element: &DashElement, surface: &mut PixelSurface) {
        let (x, y, w, h) = bounds(element);
        let start = x.saturating_add(GAUGE_INSET);
        let end = x.saturating_add(w).saturating_sub(GAUGE_INSET);

        for quarter in 1..4u64 {
            let offset = (u64::from(h) * quarter / 4) as u32;
            let line = y.saturating_add(offset);
            for dot in (start..end).step_by(GRID_DOT_SPACING) {
                surface.draw_pixel(dot, line, self.theme.grid);
            }
        }
    }
}

fn bounds(element: &DashElement) -> (u32, u32, u32, u32) {
    (element.x(), element.y(), element.width(), element.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::ElementId;
    use crate::framebuffer::surface::tests::{surface, GUARD};

    fn single(element: DashElement) -> Dashboard {
        let mut dash = Dashboard::new("test");
        dash.add_element(element).unwrap();
        dash
    }

    #[test]
    fn gauge_end_to_end() {
        let (_memory, mut fb) = surface(200, 100);
        let dash = single(
            DashElement::new(ElementKind::Gauge, 0, 0, 100, 20, Color::GREEN)
                .with_range(0.0, 100.0)
                .with_value(50.0),
        );
        DashboardRenderer::default().render(&dash, &mut fb);

        for y in 0..100 {
            for x in 0..200 {
                let border = x < 100 && y < 20 && (x == 0 || x == 99 || y == 0 || y == 19);
                let fill = (2..50).contains(&x) && (2..18).contains(&y);
                let expected = if border || fill {
                    Color::GREEN
                } else {
                    Color::BLACK
                };
                assert_eq!(fb.read_pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn repeated_renders_are_identical() {
        let (memory, mut fb) = surface(120, 80);
        let mut dash = Dashboard::new("idempotent");
        dash.add_element(
            DashElement::new(ElementKind::Gauge, 5, 5, 100, 20, Color::BLUE).with_value(33.0),
        )
        .unwrap();
        dash.add_element(DashElement::new(ElementKind::Graph, 5, 30, 100, 40, Color::YELLOW))
            .unwrap();

        let renderer = DashboardRenderer::default();
        renderer.render(&dash, &mut fb);
        let first = memory.clone();
        renderer.render(&dash, &mut fb);
        assert_eq!(memory, first);
    }

    #[test]
    fn later_elements_draw_over_earlier_ones() {
        let (_memory, mut fb) = surface(100, 40);
        let mut dash = Dashboard::new("overlap");
        dash.add_element(
            DashElement::new(ElementKind::Gauge, 0, 0, 50, 20, Color::RED).with_value(100.0),
        )
        .unwrap();
        dash.add_element(DashElement::new(ElementKind::Label, 25, 0, 50, 20, Color::WHITE))
            .unwrap();
        DashboardRenderer::default().render(&dash, &mut fb);

        assert_eq!(fb.read_pixel(10, 10), Some(Color::RED));
        assert_eq!(fb.read_pixel(25, 10), Some(Color::WHITE));
        assert_eq!(fb.read_pixel(30, 10), Some(Color::BLACK));
    }

    #[test]
    fn value_indicator_follows_thresholds() {
        let renderer = DashboardRenderer::default();
        for (value, expected) in [
            (50.0, Color::GREEN),
            (70.0, Color::YELLOW),
            (90.0, Color::RED),
            (500.0, Color::RED),
        ] {
            let (_memory, mut fb) = surface(60, 40);
            let dash = single(
                DashElement::new(ElementKind::Value, 0, 0, 60, 40, Color::CYAN).with_value(value),
            );
            renderer.render(&dash, &mut fb);

            assert_eq!(fb.read_pixel(5, 5), Some(expected), "value {value}");
            assert_eq!(fb.read_pixel(24, 34), Some(expected));
            assert_eq!(fb.read_pixel(25, 5), Some(Color::BLACK));
            assert_eq!(fb.read_pixel(0, 0), Some(Color::CYAN));
        }
    }

    fn indicator_at(element: DashElement) -> Option<Color> {
        let (_memory, mut fb) = surface(60, 40);
        DashboardRenderer::default().render(&single(element), &mut fb);
        fb.read_pixel(5, 5)
    }

    #[test]
    fn indicator_thresholds_are_exclusive() {
        let value = |value: f32, max: f32| {
            DashElement::new(ElementKind::Value, 0, 0, 60, 40, Color::CYAN)
                .with_range(0.0, max)
                .with_value(value)
        };

        assert_eq!(indicator_at(value(60.0, 100.0)), Some(Color::GREEN));
        assert_eq!(indicator_at(value(0.6, 1.0)), Some(Color::GREEN));
        assert_eq!(indicator_at(value(80.0, 100.0)), Some(Color::YELLOW));
        assert_eq!(indicator_at(value(0.8, 1.0)), Some(Color::YELLOW));
        assert_eq!(indicator_at(value(81.0, 100.0)), Some(Color::RED));
    }

    #[test]
    fn degenerate_value_range_shows_normal() {
        let element = DashElement::new(ElementKind::Value, 0, 0, 60, 40, Color::CYAN)
            .with_range(5.0, 5.0)
            .with_value(9.0);
        assert_eq!(indicator_at(element), Some(Color::GREEN));
    }

    #[test]
    fn small_value_box_has_no_indicator() {
        let (_memory, mut fb) = surface(20, 20);
        let dash = single(
            DashElement::new(ElementKind::Value, 0, 0, 10, 10, Color::CYAN).with_value(90.0),
        );
        DashboardRenderer::default().render(&dash, &mut fb);
        assert_eq!(fb.read_pixel(5, 5), Some(Color::BLACK));
    }

    #[test]
    fn graph_draws_dotted_quarter_lines() {
        let (memory, mut fb) = surface(40, 20);
        let dash = single(DashElement::new(ElementKind::Graph, 0, 0, 40, 20, Color::YELLOW));
        DashboardRenderer::default().render(&dash, &mut fb);

        for line in [5, 10, 15] {
            assert_eq!(fb.read_pixel(2, line), Some(Color::GRAY));
            assert_eq!(fb.read_pixel(3, line), Some(Color::BLACK));
            assert_eq!(fb.read_pixel(34, line), Some(Color::GRAY));
            assert_eq!(fb.read_pixel(38, line), Some(Color::BLACK));
        }
        let dots = memory.iter().filter(|&&w| w == Color::GRAY.to_u32()).count();
        assert_eq!(dots, 3 * 9);
    }

    #[test]
    fn degenerate_range_draws_an_empty_gauge() {
        let (_memory, mut fb) = surface(100, 30);
        let dash = single(
            DashElement::new(ElementKind::Gauge, 0, 0, 100, 20, Color::GREEN)
                .with_range(5.0, 5.0)
                .with_value(5.0),
        );
        DashboardRenderer::default().render(&dash, &mut fb);
        assert_eq!(fb.read_pixel(2, 2), Some(Color::BLACK));
    }

    #[test]
    fn updated_value_shows_on_next_frame() {
        let (_memory, mut fb) = surface(100, 30);
        let mut dash = single(DashElement::new(ElementKind::Gauge, 0, 0, 100, 20, Color::GREEN));
        let renderer = DashboardRenderer::default();

        renderer.render(&dash, &mut fb);
        assert_eq!(fb.read_pixel(2, 2), Some(Color::BLACK));

        dash.update_value(ElementId::new(0), 100.0).unwrap();
        renderer.render(&dash, &mut fb);
        assert_eq!(fb.read_pixel(2, 2), Some(Color::GREEN));
        assert_eq!(fb.read_pixel(97, 17), Some(Color::GREEN));
    }

    #[test]
    fn theme_colors_are_used() {
        let theme = Theme::night();
        let (_memory, mut fb) = surface(60, 40);
        let dash = single(
            DashElement::new(ElementKind::Value, 0, 0, 60, 40, Color::CYAN).with_value(70.0),
        );
        DashboardRenderer::new(theme).render(&dash, &mut fb);

        assert_eq!(fb.read_pixel(30, 20), Some(theme.background));
        assert_eq!(fb.read_pixel(5, 5), Some(theme.warning));
    }

    #[test]
    fn elements_off_screen_are_clipped() {
        let (memory, mut fb) = surface(50, 50);
        let dash = single(
            DashElement::new(ElementKind::Graph, 40, 40, 100, 100, Color::WHITE).with_value(1.0),
        );
        DashboardRenderer::default().render(&dash, &mut fb);

        assert_eq!(fb.read_pixel(40, 49), Some(Color::WHITE));
        // spare row past the surface untouched
        assert!(memory[50 * 50..].iter().all(|&w| w == GUARD));
    }
}
