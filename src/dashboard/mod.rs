//! # Dashboard Module
//!
//! A fixed set of typed elements and the renderer that paints them.
//!
//! ## Modules
//!
//! - `model`: `Dashboard`, up to 32 elements addressed by `ElementId`
//! - `element`: `DashElement` and its value-to-fraction mapping
//! - `render`: `DashboardRenderer`, full-frame repaint onto a `PixelSurface`
//! - `theme`: renderer colors
//! - `loader`: textual definitions (not yet understood)
//! - `demo`: built-in layout and sweep animation
//!
//! ## Frame cycle
//!
//! ```ignore
//! let renderer = DashboardRenderer::default();
//! dashboard.update_value(id, reading)?;
//! renderer.render(&dashboard, &mut surface);
//! ```

pub mod demo;
pub mod element;
pub mod loader;
pub mod model;
pub mod render;
pub mod theme;

pub use element::{DashElement, ElementKind};
pub use loader::{load_dashboard, LoadError};
pub use model::{Dashboard, DashboardError, ElementId};
pub use render::DashboardRenderer;
pub use theme::Theme;
