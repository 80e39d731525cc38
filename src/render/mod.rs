//! # Rendering
//!
//! Turns a [`crate::dashboard::DashboardView`] into something a browser can show: one inline SVG
//! per chart ([`svg`]) and the full HTML page ([`page`]).

pub mod page;
pub mod svg;

pub use page::render_page;
pub use svg::render_chart;
