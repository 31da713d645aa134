//! Time-series chart geometry and rendering. The geometry (coordinate
//! mapping, tick placement, curve smoothing, hit-testing) is pure and
//! testable without a drawing surface; `RateChart` is the thin stateful
//! adapter that replays computed geometry onto a [`Surface`].

mod config;
mod hit;
mod layout;
mod render;
mod smooth;
mod ticks;

pub use config::{ChartOptions, XAxisMode, MAX_MARKER_POINTS, PADDING, TARGET_TICKS, Y_GUTTER};
pub use hit::nearest_index;
pub use layout::{compute_layout, padded_y_range, x_domain, Layout, LinearScale, PlotArea};
pub use render::{RateChart, Surface};
pub use smooth::{area_path, curve_path, PathCmd};
pub use ticks::{nice_step, nice_ticks, time_label, time_ticks};

/// One chart sample in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
