use std::f64::consts::{FRAC_PI_2, TAU};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use tokio::time::Instant;

use super::MaterialLoader;

/// Quadrant glyphs for areas too small to hold a ring, indexed by the
/// quadrant of the arc head (clockwise from three o'clock)
const SMALL_FRAMES: [&str; 4] = ["◞", "◟", "◜", "◝"];

const LIT: &str = "●";
const TRACK: &str = "·";

/// Draws a [`MaterialLoader`] as a ring of cells
///
/// The ring fills the area's height; its width is doubled to make up for
/// the cell aspect ratio, limited by the area's width.
pub struct LoaderRing<'a> {
    loader: &'a MaterialLoader,
    now: Instant,
    track_style: Option<Style>,
}

impl<'a> LoaderRing<'a> {
    pub fn new(loader: &'a MaterialLoader, now: Instant) -> Self {
        Self {
            loader,
            now,
            track_style: None,
        }
    }

    /// Also draw the unlit part of the ring
    pub fn track(mut self, style: Style) -> Self {
        self.track_style = Some(style);
        self
    }
}

impl Widget for LoaderRing<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let arc = self.loader.arc_at(self.now);
        let lit_style = Style::default()
            .fg(self.loader.color())
            .add_modifier(Modifier::BOLD);

        if area.width < 5 || area.height < 3 {
            if arc.length() > 0.0 {
                let quadrant = ((arc.head() / FRAC_PI_2) as usize).min(3);
                if let Some(cell) = buf.cell_mut((area.x, area.y)) {
                    cell.set_symbol(SMALL_FRAMES[quadrant]).set_style(lit_style);
                }
            }
            return;
        }

        let cx = area.x as f64 + area.width as f64 / 2.0;
        let cy = area.y as f64 + area.height as f64 / 2.0;
        let ry = (area.height as f64 - 1.0) / 2.0;
        let rx = (ry * 2.0).min((area.width as f64 - 1.0) / 2.0);
        let samples = ((rx + ry) * 8.0).max(48.0) as usize;

        let mut lit = Vec::new();
        for i in 0..samples {
            let angle = TAU * i as f64 / samples as f64;
            let x = (cx + rx * angle.cos()).floor() as u16;
            let y = (cy + ry * angle.sin()).floor() as u16;
            let (x, y) = (
                x.clamp(area.left(), area.right() - 1),
                y.clamp(area.top(), area.bottom() - 1),
            );

            if arc.contains(angle) {
                lit.push((x, y));
            } else if let Some(style) = self.track_style {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol(TRACK).set_style(style);
                }
            }
        }

        // Lit cells win over track cells sharing the same position
        for (x, y) in lit {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(LIT).set_style(lit_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use loader_core::{RefreshAnimator, State};

    use super::*;

    fn lit_cells(buf: &Buffer) -> usize {
        buf.content().iter().filter(|cell| cell.symbol() == LIT).count()
    }

    fn render(loader: &MaterialLoader, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        LoaderRing::new(loader, Instant::now())
            .track(Style::default())
            .render(area, &mut buf);
        buf
    }

    #[test]
    fn test_zero_progress_draws_only_track() {
        let loader = MaterialLoader::default();
        let buf = render(&loader, Rect::new(0, 0, 11, 5));
        assert_eq!(lit_cells(&buf), 0);
        assert!(buf.content().iter().any(|cell| cell.symbol() == TRACK));
    }

    #[test]
    fn test_more_progress_lights_more_cells() {
        let area = Rect::new(0, 0, 11, 5);
        let mut loader = MaterialLoader::default();
        loader.render(State::releasing(0.3));
        let partial = lit_cells(&render(&loader, area));
        loader.render(State::releasing(1.0));
        let full = lit_cells(&render(&loader, area));

        assert!(partial > 0);
        assert!(full > partial);
    }

    #[test]
    fn test_ring_stays_inside_area() {
        let area = Rect::new(3, 2, 9, 4);
        let mut loader = MaterialLoader::default();
        loader.render(State::releasing(1.0));
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 10));
        LoaderRing::new(&loader, Instant::now()).render(area, &mut buf);

        for y in 0..10 {
            for x in 0..20 {
                if buf[(x, y)].symbol() == LIT {
                    assert!(area.contains((x, y).into()), "lit cell outside at {},{}", x, y);
                }
            }
        }
    }

    #[test]
    fn test_lit_cells_follow_the_arc() {
        // A quarter pull covers roughly 1.18..2.74 rad: the lower left of
        // the ring lights up while three o'clock stays dark
        let area = Rect::new(0, 0, 21, 9);
        let mut loader = MaterialLoader::default();
        loader.render(State::releasing(0.25));
        let buf = render(&loader, area);

        assert!(!loader.arc_at(Instant::now()).contains(0.0));
        assert_eq!(buf[(18, 4)].symbol(), TRACK);
        assert_eq!(buf[(7, 8)].symbol(), LIT);
    }

    #[test]
    fn test_small_area_draws_single_glyph() {
        let area = Rect::new(0, 0, 2, 1);
        let mut loader = MaterialLoader::default();
        loader.render(State::releasing(1.0));
        let buf = render(&loader, area);
        assert!(SMALL_FRAMES.contains(&buf[(0, 0)].symbol()));
        assert_eq!(buf[(1, 0)].symbol(), " ");
    }
}
