/// Drawing commands in pixel space, consumed by a [`Surface`].
///
/// [`Surface`]: crate::chart::Surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CubicTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    Close,
}

/// Smooth curve through the mapped points. Three or more points get cubic
/// Bezier segments: each interior point's tangent is the average of its
/// two adjacent segment slopes (endpoints use their single slope), and the
/// control points sit at one sixth of the local x-span along the tangent.
/// Two points get a straight segment.
pub fn curve_path(points: &[(f64, f64)]) -> Vec<PathCmd> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![PathCmd::MoveTo {
            x: points[0].0,
            y: points[0].1,
        }],
        2 => vec![
            PathCmd::MoveTo {
                x: points[0].0,
                y: points[0].1,
            },
            PathCmd::LineTo {
                x: points[1].0,
                y: points[1].1,
            },
        ],
        n => {
            let slopes: Vec<f64> = points
                .windows(2)
                .map(|w| {
                    let dx = w[1].0 - w[0].0;
                    if dx == 0.0 {
                        0.0
                    } else {
                        (w[1].1 - w[0].1) / dx
                    }
                })
                .collect();

            let tangents: Vec<f64> = (0..n)
                .map(|i| {
                    if i == 0 {
                        slopes[0]
                    } else if i == n - 1 {
                        slopes[n - 2]
                    } else {
                        (slopes[i - 1] + slopes[i]) / 2.0
                    }
                })
                .collect();

            let mut path = Vec::with_capacity(n);
            path.push(PathCmd::MoveTo {
                x: points[0].0,
                y: points[0].1,
            });
            for i in 0..n - 1 {
                let (x0, y0) = points[i];
                let (x1, y1) = points[i + 1];
                let dx = x1 - x0;
                path.push(PathCmd::CubicTo {
                    x1: x0 + dx / 6.0,
                    y1: y0 + tangents[i] * dx / 6.0,
                    x2: x1 - dx / 6.0,
                    y2: y1 - tangents[i + 1] * dx / 6.0,
                    x: x1,
                    y: y1,
                });
            }
            path
        }
    }
}

/// Curve plus a closed drop to the baseline, for fill-under-curve.
pub fn area_path(points: &[(f64, f64)], baseline_y: f64) -> Vec<PathCmd> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut path = curve_path(points);
    let last = points[points.len() - 1];
    let first = points[0];
    path.push(PathCmd::LineTo {
        x: last.0,
        y: baseline_y,
    });
    path.push(PathCmd::LineTo {
        x: first.0,
        y: baseline_y,
    });
    path.push(PathCmd::Close);
    path
}
