use chrono::Utc;

use crate::chart::config::{ChartOptions, XAxisMode, MAX_MARKER_POINTS, TARGET_TICKS};
use crate::chart::hit::nearest_index;
use crate::chart::layout::{compute_layout, Layout};
use crate::chart::smooth::{area_path, curve_path, PathCmd};
use crate::chart::ticks::{nice_ticks, time_label, time_ticks};
use crate::chart::Point;

/// Drawing primitives the host shell implements (a canvas 2D context, a
/// test recorder, ...). Coordinates are CSS pixels; the surface applies
/// its own device-pixel-ratio transform in `begin_frame`.
pub trait Surface {
    /// Current size in CSS pixels.
    fn size(&self) -> (f64, f64);

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Resize the backing store to physical pixels and clear it. Called at
    /// the start of every draw; the backing store is never cached across
    /// frames.
    fn begin_frame(&mut self, pixel_width: u32, pixel_height: u32, scale: f64);

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: &str, width: f64);
    fn stroke_path(&mut self, path: &[PathCmd], color: &str, width: f64);
    fn fill_path(&mut self, path: &[PathCmd], color: &str);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str);
}

/// Stateful chart bound to one surface. `update` replaces the dataset and
/// redraws synchronously; pointer and resize events redraw the current
/// dataset. Nothing here suspends, so a frame never observes a
/// half-updated dataset.
pub struct RateChart<S: Surface> {
    surface: S,
    points: Vec<Point>,
    opts: ChartOptions,
    layout: Option<Layout>,
    hover: Option<usize>,
}

impl<S: Surface> RateChart<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            points: Vec::new(),
            opts: ChartOptions::default(),
            layout: None,
            hover: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn update(&mut self, points: Vec<Point>, opts: ChartOptions) {
        self.points = points;
        self.opts = opts;
        self.hover = None;
        self.redraw();
    }

    /// Re-render at the surface's current dimensions.
    pub fn resize(&mut self) {
        self.redraw();
    }

    pub fn pointer_move(&mut self, pointer_x: f64) {
        let Some(layout) = &self.layout else {
            return;
        };
        let hit = nearest_index(&layout.px, pointer_x);
        if hit != self.hover {
            self.hover = hit;
            self.redraw();
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.hover.is_some() {
            self.hover = None;
            self.redraw();
        }
    }

    fn redraw(&mut self) {
        let (width, height) = self.surface.size();
        let scale = self.surface.device_pixel_ratio();
        self.surface.begin_frame(
            (width * scale).round() as u32,
            (height * scale).round() as u32,
            scale,
        );

        if self.points.is_empty() {
            self.surface.fill_text("no data", 10.0, 20.0, &self.opts.axis);
            self.layout = None;
            return;
        }

        let layout = compute_layout(
            &self.points,
            &self.opts,
            width,
            height,
            Utc::now().timestamp_millis(),
        );
        let area = layout.area;

        // horizontal grid + y labels on nice ticks
        let (y_lo, y_hi) = layout.y.domain();
        for tick in nice_ticks(y_lo, y_hi, TARGET_TICKS) {
            let y = layout.y.map(tick);
            self.surface
                .stroke_line(area.x0, y, area.x1, y, &self.opts.grid, 1.0);
            self.surface
                .fill_text(&format_value(tick), 4.0, y + 4.0, &self.opts.axis);
        }

        // vertical grid + x labels
        let (x_lo, x_hi) = layout.x.domain();
        match self.opts.x_mode {
            XAxisMode::Time => {
                let span = x_hi - x_lo;
                for tick in time_ticks(x_lo, x_hi, TARGET_TICKS) {
                    let x = layout.x.map(tick);
                    self.surface
                        .stroke_line(x, area.y0, x, area.y1, &self.opts.grid, 1.0);
                    self.surface.fill_text(
                        &time_label(tick as i64, span),
                        x - 18.0,
                        area.y1 + 14.0,
                        &self.opts.axis,
                    );
                }
            }
            XAxisMode::Count => {
                for tick in nice_ticks(x_lo, x_hi, TARGET_TICKS) {
                    let x = layout.x.map(tick);
                    self.surface
                        .stroke_line(x, area.y0, x, area.y1, &self.opts.grid, 1.0);
                    self.surface.fill_text(
                        &format_value(tick),
                        x - 4.0,
                        area.y1 + 14.0,
                        &self.opts.axis,
                    );
                }
            }
        }

        if let Some(fill) = &self.opts.fill {
            let path = area_path(&layout.px, area.y1);
            if !path.is_empty() {
                self.surface.fill_path(&path, fill);
            }
        }

        self.surface
            .stroke_path(&curve_path(&layout.px), &self.opts.stroke, 2.0);

        if layout.px.len() <= MAX_MARKER_POINTS {
            for (x, y) in &layout.px {
                self.surface.fill_circle(*x, *y, 2.5, &self.opts.stroke);
            }
        }

        if let Some(i) = self.hover {
            if let Some((x, y)) = layout.px.get(i).copied() {
                self.surface
                    .stroke_line(x, area.y0, x, area.y1, &self.opts.axis, 1.0);
                self.surface.fill_circle(x, y, 4.0, &self.opts.stroke);

                let point = self.points[i];
                let label = match self.opts.x_mode {
                    XAxisMode::Time => {
                        // always day+time in the tooltip, regardless of span
                        format!(
                            "{}  {}",
                            time_label(point.x as i64, 0.0),
                            format_value(point.y)
                        )
                    }
                    XAxisMode::Count => format!("#{}  {}", i + 1, format_value(point.y)),
                };
                let tx = x.min(area.x1 - 80.0).max(area.x0);
                self.surface
                    .fill_text(&label, tx, area.y0 - 6.0, &self.opts.axis);
            }
        }

        self.layout = Some(layout);
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records draw calls so geometry decisions can be asserted without a
    /// real canvas.
    #[derive(Default)]
    struct Recorder {
        width: f64,
        height: f64,
        frames: usize,
        paths: Vec<usize>,
        circles: usize,
        texts: Vec<String>,
        lines: usize,
    }

    impl Recorder {
        fn new(width: f64, height: f64) -> Self {
            Self {
                width,
                height,
                ..Default::default()
            }
        }
    }

    impl Surface for Recorder {
        fn size(&self) -> (f64, f64) {
            (self.width, self.height)
        }

        fn begin_frame(&mut self, _pixel_width: u32, _pixel_height: u32, _scale: f64) {
            self.frames += 1;
            self.paths.clear();
            self.circles = 0;
            self.texts.clear();
            self.lines = 0;
        }

        fn stroke_line(&mut self, _: f64, _: f64, _: f64, _: f64, _: &str, _: f64) {
            self.lines += 1;
        }

        fn stroke_path(&mut self, path: &[PathCmd], _: &str, _: f64) {
            self.paths.push(path.len());
        }

        fn fill_path(&mut self, path: &[PathCmd], _: &str) {
            self.paths.push(path.len());
        }

        fn fill_circle(&mut self, _: f64, _: f64, _: f64, _: &str) {
            self.circles += 1;
        }

        fn fill_text(&mut self, text: &str, _: f64, _: f64, _: &str) {
            self.texts.push(text.to_string());
        }
    }

    fn points(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point {
                x: i as f64 * 1000.0,
                y: 1400.0 + i as f64,
            })
            .collect()
    }

    #[test]
    fn empty_dataset_draws_placeholder_only() {
        let mut chart = RateChart::new(Recorder::new(600.0, 200.0));
        chart.update(Vec::new(), ChartOptions::default());
        assert_eq!(chart.surface().frames, 1);
        assert_eq!(chart.surface().texts, vec!["no data"]);
        assert_eq!(chart.surface().circles, 0);
    }

    #[test]
    fn small_dataset_gets_markers_dense_does_not() {
        let mut chart = RateChart::new(Recorder::new(600.0, 200.0));
        chart.update(points(10), ChartOptions::default());
        assert_eq!(chart.surface().circles, 10);

        chart.update(points(41), ChartOptions::default());
        assert_eq!(chart.surface().circles, 0);
    }

    #[test]
    fn pointer_move_adds_guide_and_tooltip() {
        let mut chart = RateChart::new(Recorder::new(600.0, 200.0));
        let opts = ChartOptions {
            x_mode: XAxisMode::Count,
            ..ChartOptions::default()
        };
        chart.update(
            vec![
                Point { x: 1.0, y: 1400.0 },
                Point { x: 2.0, y: 1450.0 },
                Point { x: 3.0, y: 1500.0 },
            ],
            opts,
        );
        let baseline_circles = chart.surface().circles;

        chart.pointer_move(48.0); // left edge of the plot -> first sample
        assert_eq!(chart.surface().circles, baseline_circles + 1);
        assert!(chart
            .surface()
            .texts
            .iter()
            .any(|t| t.starts_with("#1")));

        chart.pointer_leave();
        assert!(!chart.surface().texts.iter().any(|t| t.starts_with('#')));
    }

    #[test]
    fn resize_redraws_at_new_dimensions() {
        let mut chart = RateChart::new(Recorder::new(600.0, 200.0));
        chart.update(points(3), ChartOptions::default());
        let frames = chart.surface().frames;
        chart.resize();
        assert_eq!(chart.surface().frames, frames + 1);
    }
}
