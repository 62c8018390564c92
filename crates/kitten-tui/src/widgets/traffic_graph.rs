//! Traffic graph: download and upload polylines over the telemetry window.
//!
//! Points come from [`kitten_core::plot::project`] on a fixed logical
//! surface; the canvas stretches that surface over whatever cells it gets.
//! Every render starts from a blank canvas.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Paragraph, Widget};

use kitten_core::TelemetryRing;
use kitten_core::plot::{self, Plot};

use crate::theme;

/// Logical drawing surface, in plot units.
pub const SURFACE_WIDTH: f64 = 600.0;
pub const SURFACE_HEIGHT: f64 = 150.0;

pub struct TrafficGraph<'a> {
    ring: &'a TelemetryRing,
    block: Option<Block<'a>>,
}

impl<'a> TrafficGraph<'a> {
    pub fn new(ring: &'a TelemetryRing) -> Self {
        Self { ring, block: None }
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn plot(&self) -> Plot {
        plot::project(
            &self.ring.to_vec(),
            self.ring.capacity(),
            SURFACE_WIDTH,
            SURFACE_HEIGHT,
        )
    }
}

/// Draw one series. Plot space has y growing downward, the canvas upward.
fn draw_series(ctx: &mut Context<'_>, points: &[(f64, f64)], color: Color) {
    let flip = |(x, y): (f64, f64)| (x, SURFACE_HEIGHT - y);

    if let [only] = points {
        let (x, y) = flip(*only);
        ctx.draw(&Points {
            coords: &[(x, y)],
            color,
        });
        return;
    }

    for pair in points.windows(2) {
        let (x1, y1) = flip(pair[0]);
        let (x2, y2) = flip(pair[1]);
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }
}

impl Widget for TrafficGraph<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.ring.is_empty() {
            Paragraph::new("  Waiting for traffic…")
                .style(Style::default().fg(theme::BORDER_GRAY))
                .render(inner, buf);
            return;
        }

        let plot = self.plot();
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, SURFACE_WIDTH])
            .y_bounds([0.0, SURFACE_HEIGHT])
            .paint(|ctx| {
                draw_series(ctx, &plot.download, theme::DOWNLOAD);
                draw_series(ctx, &plot.upload, theme::UPLOAD);
            })
            .render(inner, buf);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kitten_core::TelemetrySample;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn ring_of(values: &[(f64, f64)]) -> TelemetryRing {
        let mut ring = TelemetryRing::with_capacity(60);
        for &(down, up) in values {
            ring.push(TelemetrySample::new(down, up));
        }
        ring
    }

    fn draw(ring: &TelemetryRing, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(TrafficGraph::new(ring), frame.area()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_has_ink(buf: &Buffer, y: u16) -> bool {
        (0..buf.area.width).any(|x| {
            let symbol = buf[(x, y)].symbol();
            symbol != " " && symbol != "\u{2800}"
        })
    }

    #[test]
    fn empty_ring_shows_placeholder() {
        let buf = draw(&TelemetryRing::default(), 40, 5);
        let first_row: String = (0..40).map(|x| buf[(x, 0)].symbol()).collect();
        assert!(first_row.contains("Waiting for traffic"));
    }

    #[test]
    fn peak_reaches_the_top_row() {
        let ring = ring_of(&[(0.0, 0.0), (5_000.0, 100.0), (0.0, 0.0)]);
        let buf = draw(&ring, 30, 10);
        assert!(row_has_ink(&buf, 0));
        assert!(row_has_ink(&buf, 9));
    }

    #[test]
    fn idle_traffic_stays_on_the_bottom_row() {
        let ring = ring_of(&[(0.0, 0.0); 20]);
        let buf = draw(&ring, 30, 10);
        assert!(!row_has_ink(&buf, 0));
        assert!(row_has_ink(&buf, 9));
    }

    #[test]
    fn single_sample_draws_a_point() {
        let ring = ring_of(&[(10.0, 10.0)]);
        let buf = draw(&ring, 30, 10);
        assert!((0..10).any(|y| row_has_ink(&buf, y)));
    }

    #[test]
    fn zero_sized_area_is_a_no_op() {
        let ring = ring_of(&[(1.0, 2.0)]);
        let mut buf = Buffer::empty(Rect::new(0, 0, 0, 0));
        TrafficGraph::new(&ring).render(Rect::new(0, 0, 0, 0), &mut buf);
    }
}
