use chrono::{DateTime, Utc};

const TWO_DAYS_MS: f64 = 2.0 * 24.0 * 3600.0 * 1000.0;

/// Snap `span / count` up to a human-friendly step: {1, 2, 5, 10} times
/// the power of ten just below the raw step.
pub fn nice_step(span: f64, count: usize) -> f64 {
    if span <= 0.0 || count == 0 {
        return 1.0;
    }
    let raw = span / count as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;

    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Tick values at every step multiple from the first one >= min up to max.
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let step = nice_step(max - min, count);
    let first = (min / step).ceil() * step;

    let mut ticks = Vec::new();
    let mut i = 0usize;
    loop {
        let tick = first + step * i as f64;
        // small epsilon so the top tick survives float accumulation
        if tick > max + step * 1e-9 {
            break;
        }
        ticks.push(tick);
        i += 1;
    }
    ticks
}

/// Time-mode x ticks: a fixed count of evenly spaced instants across the
/// visible span, no nice-number snapping.
pub fn time_ticks(min_ms: f64, max_ms: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 || max_ms <= min_ms {
        return vec![min_ms];
    }
    (0..count)
        .map(|i| min_ms + (max_ms - min_ms) * i as f64 / (count - 1) as f64)
        .collect()
}

/// Day+time inside a short window, date only for longer spans.
pub fn time_label(ms: i64, span_ms: f64) -> String {
    let dt: Option<DateTime<Utc>> = DateTime::from_timestamp_millis(ms);
    let Some(dt) = dt else {
        return String::new();
    };
    if span_ms <= TWO_DAYS_MS {
        dt.format("%m/%d %H:%M").to_string()
    } else {
        dt.format("%m/%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_thresholds_snap_to_1_2_5_10() {
        // raw = span / 5
        assert_eq!(nice_step(5.0, 5), 1.0); // raw 1.0 -> 1
        assert_eq!(nice_step(7.0, 5), 1.0); // raw 1.4 -> 1
        assert_eq!(nice_step(10.0, 5), 2.0); // raw 2.0 -> 2
        assert_eq!(nice_step(25.0, 5), 5.0); // raw 5.0 -> 5
        assert_eq!(nice_step(40.0, 5), 10.0); // raw 8.0 -> 10
        assert_eq!(nice_step(500.0, 5), 100.0); // raw 100 -> 1 x 10^2
    }

    #[test]
    fn ticks_cover_range_from_first_multiple() {
        let ticks = nice_ticks(0.0, 10.0, 5);
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn ticks_start_at_first_multiple_above_min() {
        let ticks = nice_ticks(1.0, 11.0, 5);
        assert_eq!(ticks.first().copied(), Some(2.0));
        assert!(ticks.iter().all(|t| *t >= 1.0 && *t <= 11.0));
    }

    #[test]
    fn time_ticks_are_evenly_spaced_and_fixed_count() {
        let ticks = time_ticks(0.0, 1000.0, 5);
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[4], 1000.0);
        let gaps: Vec<f64> = ticks.windows(2).map(|w| w[1] - w[0]).collect();
        for gap in &gaps {
            assert!((gap - 250.0).abs() < 1e-9);
        }
    }

    #[test]
    fn short_spans_label_with_time_long_spans_with_date() {
        let ms = 1_700_000_000_000; // 2023-11-14 22:13:20 UTC
        let short = time_label(ms, 3600.0 * 1000.0);
        assert!(short.contains(':'));
        let long = time_label(ms, 30.0 * 24.0 * 3600.0 * 1000.0);
        assert!(!long.contains(':'));
    }
}
