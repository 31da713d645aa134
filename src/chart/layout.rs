use crate::chart::config::{ChartOptions, PADDING, Y_GUTTER};
use crate::chart::Point;

/// Plot rectangle in CSS pixels: x0/y0 top-left, x1/y1 bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PlotArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x0: PADDING + Y_GUTTER,
            y0: PADDING,
            x1: width - PADDING,
            y1: height - PADDING,
        }
    }
}

/// Linear data-to-pixel mapping. A degenerate domain maps as if its span
/// were one unit, so single-point datasets still land inside the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn map(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        let span = if span == 0.0 { 1.0 } else { span };
        self.range.0 + (self.range.1 - self.range.0) * ((value - self.domain.0) / span)
    }
}

/// The x domain: explicit override wins; otherwise the data's own extent;
/// with neither, a degenerate one-millisecond window at `now_ms`.
pub fn x_domain(xs: &[f64], override_domain: Option<(f64, f64)>, now_ms: i64) -> (f64, f64) {
    if let Some(domain) = override_domain {
        return domain;
    }
    if xs.is_empty() {
        return (now_ms as f64, now_ms as f64 + 1.0);
    }
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

/// Pad the y extent so the curve never hugs the plot edge: a flat series
/// pads by 10% of the value (at least one unit); otherwise by 10% of the
/// range, rounded outward to integers.
pub fn padded_y_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        let pad = (min.abs() * 0.1).max(1.0);
        return (min - pad, max + pad);
    }
    let pad = (max - min) * 0.1;
    ((min - pad).floor(), (max + pad).ceil())
}

/// Fully computed chart geometry for one dataset and surface size.
#[derive(Debug, Clone)]
pub struct Layout {
    pub area: PlotArea,
    pub x: LinearScale,
    pub y: LinearScale,
    /// Dataset mapped into pixel space, same order as the input points.
    pub px: Vec<(f64, f64)>,
}

pub fn compute_layout(
    points: &[Point],
    opts: &ChartOptions,
    width: f64,
    height: f64,
    now_ms: i64,
) -> Layout {
    let area = PlotArea::new(width, height);

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let (min_x, max_x) = x_domain(&xs, opts.x_domain, now_ms);

    let (min_y, max_y) = if points.is_empty() {
        (0.0, 1.0)
    } else {
        let min = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    };
    let (y_lo, y_hi) = padded_y_range(min_y, max_y);

    let x = LinearScale::new((min_x, max_x), (area.x0, area.x1));
    // y grows downward in pixel space, so the range is flipped
    let y = LinearScale::new((y_lo, y_hi), (area.y1, area.y0));

    let px = points.iter().map(|p| (x.map(p.x), y.map(p.y))).collect();

    Layout { area, x, y, px }
}
