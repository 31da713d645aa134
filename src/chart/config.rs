/// Inset between the surface edge and the plot area, in CSS pixels.
pub const PADDING: f64 = 24.0;

/// Extra left margin reserved for y-axis labels.
pub const Y_GUTTER: f64 = 24.0;

/// Target tick count for both axes.
pub const TARGET_TICKS: usize = 5;

/// Point markers are skipped above this dataset size; dense series render
/// curve-only for legibility.
pub const MAX_MARKER_POINTS: usize = 40;

/// What the x values mean: instants in milliseconds, or ordinal indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxisMode {
    Time,
    Count,
}

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub stroke: String,
    pub grid: String,
    pub axis: String,
    /// Fill under the curve down to the plot baseline, when set.
    pub fill: Option<String>,
    /// Fixed x-domain override, e.g. a project's configured period. Takes
    /// precedence over the data's own min/max and clamps the axis even
    /// when no data falls at the edges.
    pub x_domain: Option<(f64, f64)>,
    pub x_mode: XAxisMode,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            stroke: "#7aa2f7".to_string(),
            grid: "#273048".to_string(),
            axis: "#99a0b0".to_string(),
            fill: None,
            x_domain: None,
            x_mode: XAxisMode::Time,
        }
    }
}
