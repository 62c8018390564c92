// ── Traffic graph geometry ──
//
// Pure mapping from telemetry samples to surface coordinates. Screen space:
// origin top-left, y grows downward, a fixed margin top and bottom. The
// renderer redraws from a fresh `Plot` every frame.

use crate::telemetry::TelemetrySample;

/// Vertical margin kept free above the highest and below the lowest point.
pub const PLOT_MARGIN: f64 = 10.0;

/// Projected polylines for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plot {
    pub download: Vec<(f64, f64)>,
    pub upload: Vec<(f64, f64)>,
    pub scale_max: f64,
    pub width: f64,
    pub height: f64,
}

/// Largest value in either direction, floored at 1 so an empty or idle
/// window never divides by zero.
pub fn scale_max<'a, I>(samples: I) -> f64
where
    I: IntoIterator<Item = &'a TelemetrySample>,
{
    samples
        .into_iter()
        .map(TelemetrySample::peak)
        .fold(1.0, f64::max)
}

/// Horizontal position of sample `index`. Spacing is fixed by capacity, so a
/// partly filled window grows from the left edge.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn x_at(index: usize, capacity: usize, width: f64) -> f64 {
    let steps = capacity.saturating_sub(1).max(1) as f64;
    index as f64 * (width / steps)
}

/// Vertical position of `value` for a surface of `height`.
pub fn y_at(value: f64, scale_max: f64, height: f64) -> f64 {
    height - (value / scale_max) * (height - 2.0 * PLOT_MARGIN) - PLOT_MARGIN
}

/// Project a window of samples onto a `width` x `height` surface.
pub fn project(samples: &[TelemetrySample], capacity: usize, width: f64, height: f64) -> Plot {
    let scale = scale_max(samples);
    let point = |i: usize, v: f64| (x_at(i, capacity, width), y_at(v, scale, height));

    Plot {
        download: samples
            .iter()
            .enumerate()
            .map(|(i, s)| point(i, s.download_bps))
            .collect(),
        upload: samples
            .iter()
            .enumerate()
            .map(|(i, s)| point(i, s.upload_bps))
            .collect(),
        scale_max: scale,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_window_scales_to_one() {
        assert!(approx(scale_max(&Vec::<TelemetrySample>::new()), 1.0));
    }

    #[test]
    fn all_zero_window_scales_to_one() {
        let samples = vec![TelemetrySample::default(); 10];
        assert!(approx(scale_max(&samples), 1.0));

        let plot = project(&samples, 60, 300.0, 120.0);
        // Zero sits on the bottom margin.
        assert!(plot.download.iter().all(|&(_, y)| approx(y, 110.0)));
    }

    #[test]
    fn maximum_renders_at_top_margin() {
        let samples = vec![
            TelemetrySample::new(100.0, 20.0),
            TelemetrySample::new(400.0, 50.0),
            TelemetrySample::new(10.0, 400.0),
        ];
        let plot = project(&samples, 60, 300.0, 120.0);

        assert!(approx(plot.scale_max, 400.0));
        assert!(approx(plot.download[1].1, PLOT_MARGIN));
        assert!(approx(plot.upload[2].1, PLOT_MARGIN));
        assert!(plot.download[0].1 > PLOT_MARGIN);
    }

    #[test]
    fn x_spacing_uses_capacity() {
        assert!(approx(x_at(0, 60, 590.0), 0.0));
        assert!(approx(x_at(1, 60, 590.0), 10.0));
        assert!(approx(x_at(59, 60, 590.0), 590.0));
    }

    #[test]
    fn single_slot_capacity_does_not_divide_by_zero() {
        assert!(approx(x_at(0, 1, 100.0), 0.0));
        assert!(approx(x_at(1, 1, 100.0), 100.0));
    }

    #[test]
    fn both_series_have_one_point_per_sample() {
        let samples = vec![TelemetrySample::new(1.0, 2.0); 5];
        let plot = project(&samples, 60, 100.0, 50.0);
        assert_eq!(plot.download.len(), 5);
        assert_eq!(plot.upload.len(), 5);
    }
}
