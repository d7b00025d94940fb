//! Braille line rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use torus_core::StrokeColor;

/// First code point of the Unicode braille block; the low byte is the dot mask.
const BRAILLE_BASE: u32 = 0x2800;

/// Dot bit for each (row, column) inside a 2 x 4 braille cell
const BRAILLE_DOTS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Sub-cell resolution: each terminal cell holds 2 x 4 dots.
const DOTS_PER_COL: usize = 2;
const DOTS_PER_ROW: usize = 4;

/// A canvas of `width` x `height` logical pixels fitted into a grid of
/// terminal cells, scaled uniformly and centred.
pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    width: u32,
    height: u32,
    dots: Vec<u8>,
    text: Vec<Option<char>>,
    color: StrokeColor,
    subpaths: Vec<Vec<(f64, f64)>>,
}

impl BrailleCanvas {
    pub fn new(cols: usize, rows: usize, width: u32, height: u32) -> Self {
        let size = cols * rows;
        Self {
            cols,
            rows,
            width,
            height,
            dots: vec![0; size],
            text: vec![None; size],
            color: StrokeColor::default(),
            subpaths: Vec::new(),
        }
    }

    /// Logical size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn grid(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Refit to a new terminal size, discarding the current contents.
    pub fn fit(&mut self, cols: usize, rows: usize) {
        if (cols, rows) == (self.cols, self.rows) {
            return;
        }
        *self = Self {
            color: self.color,
            ..Self::new(cols, rows, self.width, self.height)
        };
    }

    pub fn clear(&mut self) {
        self.dots.fill(0);
        self.text.fill(None);
        self.subpaths.clear();
    }

    pub fn set_color(&mut self, color: StrokeColor) {
        self.color = color;
    }

    pub fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push(vec![(x, y)]);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        match self.subpaths.last_mut() {
            Some(points) => points.push((x, y)),
            None => self.move_to(x, y),
        }
    }

    pub fn close_path(&mut self) {
        let Some(points) = self.subpaths.last_mut() else {
            return;
        };
        if let Some(&start) = points.first() {
            points.push(start);
            // Drawing continues from the start point, as on a canvas
            self.subpaths.push(vec![start]);
        }
    }

    /// Rasterize every segment of the current path.
    pub fn stroke(&mut self) {
        let subpaths = std::mem::take(&mut self.subpaths);
        for points in &subpaths {
            for pair in points.windows(2) {
                self.draw_line(pair[0], pair[1]);
            }
        }
        self.subpaths = subpaths;
    }

    /// Write text starting at the cell containing `(x, y)`; clipped at the edge.
    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let (dx, dy) = self.to_dots(x, y);
        if dx < 0.0 || dy < 0.0 {
            return;
        }
        let col = dx as usize / DOTS_PER_COL;
        let row = dy as usize / DOTS_PER_ROW;
        if row >= self.rows {
            return;
        }
        for (offset, c) in text.chars().enumerate() {
            let col = col + offset;
            if col >= self.cols {
                break;
            }
            self.text[row * self.cols + col] = Some(c);
        }
    }

    /// Character shown in a cell: text wins over dots.
    pub fn cell(&self, col: usize, row: usize) -> char {
        let idx = row * self.cols + col;
        match self.text[idx] {
            Some(c) => c,
            None if self.dots[idx] == 0 => ' ',
            None => char::from_u32(BRAILLE_BASE + u32::from(self.dots[idx])).unwrap_or(' '),
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let StrokeColor { red, green, blue } = self.color;
        writer.queue(SetForegroundColor(Color::Rgb {
            r: red,
            g: green,
            b: blue,
        }))?;

        let mut line = String::with_capacity(self.cols * 3);
        for row in 0..self.rows {
            line.clear();
            line.extend((0..self.cols).map(|col| self.cell(col, row)));
            // Raw mode: '\n' would not return the carriage, so position each row
            writer.queue(cursor::MoveTo(0, row as u16))?;
            writer.queue(Print(&line))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// Uniform scale and centring offset from logical pixels to dots.
    fn transform(&self) -> (f64, f64, f64) {
        let dot_w = (self.cols * DOTS_PER_COL) as f64;
        let dot_h = (self.rows * DOTS_PER_ROW) as f64;
        let scale =
            (dot_w / f64::from(self.width.max(1))).min(dot_h / f64::from(self.height.max(1)));
        let offset_x = (dot_w - f64::from(self.width) * scale) / 2.0;
        let offset_y = (dot_h - f64::from(self.height) * scale) / 2.0;
        (scale, offset_x, offset_y)
    }

    fn to_dots(&self, x: f64, y: f64) -> (f64, f64) {
        let (scale, offset_x, offset_y) = self.transform();
        (x * scale + offset_x, y * scale + offset_y)
    }

    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64)) {
        let (x0, y0) = self.to_dots(from.0, from.1);
        let (x1, y1) = self.to_dots(to.0, to.1);
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return;
        }
        let bounds = (
            (self.cols * DOTS_PER_COL) as f64,
            (self.rows * DOTS_PER_ROW) as f64,
        );
        let Some(((x0, y0), (x1, y1))) = clip_segment((x0, y0), (x1, y1), bounds) else {
            return;
        };

        // DDA: one plot per dot along the longer axis
        let (dx, dy) = (x1 - x0, y1 - y0);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        let count = steps as usize;
        for k in 0..=count {
            let t = k as f64 / steps;
            self.plot(x0 + dx * t, y0 + dy * t);
        }
    }

    fn plot(&mut self, x: f64, y: f64) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (dot_x, dot_y) = (x as usize, y as usize);
        let (col, row) = (dot_x / DOTS_PER_COL, dot_y / DOTS_PER_ROW);
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.dots[row * self.cols + col] |=
            BRAILLE_DOTS[dot_y % DOTS_PER_ROW][dot_x % DOTS_PER_COL];
    }
}

/// Liang-Barsky clip of a segment to `[0, width] x [0, height]`.
///
/// Returns `None` when the segment misses the rectangle entirely.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    (width, height): (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [
        (-dx, from.0),
        (dx, width - from.0),
        (-dy, from.1),
        (dy, height - from.1),
    ] {
        if p == 0.0 {
            // Parallel to this edge: entirely outside or irrelevant
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (from.0 + dx * t0, from.1 + dy * t0),
        (from.0 + dx * t1, from.1 + dy * t1),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::{Duration, Instant};

    fn lit_cells(canvas: &BrailleCanvas) -> usize {
        let (cols, rows) = canvas.grid();
        (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (col, row)))
            .filter(|&(col, row)| canvas.cell(col, row) != ' ')
            .count()
    }

    #[test]
    fn test_fit_scales_uniformly() {
        // 40 x 15 cells = 80 x 60 dots: exactly a tenth of 800 x 600
        let canvas = BrailleCanvas::new(40, 15, 800, 600);
        let (x, y) = canvas.to_dots(400.0, 300.0);
        assert_relative_eq!(x, 40.0, epsilon = 1e-9);
        assert_relative_eq!(y, 30.0, epsilon = 1e-9);

        // Wider terminal: height limits the scale, x is centred
        let canvas = BrailleCanvas::new(80, 15, 800, 600);
        let (x, y) = canvas.to_dots(0.0, 0.0);
        assert_relative_eq!(x, 40.0, epsilon = 1e-9);
        assert_relative_eq!(y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_dot() {
        let mut canvas = BrailleCanvas::new(40, 15, 800, 600);
        canvas.begin_path();
        canvas.move_to(0.0, 0.0);
        canvas.line_to(0.0, 0.0);
        canvas.stroke();
        assert_eq!(canvas.cell(0, 0), '\u{2801}');
        assert_eq!(lit_cells(&canvas), 1);
    }

    #[test]
    fn test_horizontal_line_fills_row() {
        let mut canvas = BrailleCanvas::new(40, 15, 800, 600);
        canvas.begin_path();
        canvas.move_to(0.0, 0.0);
        canvas.line_to(799.0, 0.0);
        canvas.stroke();
        // Top dots of both columns in every cell of row 0
        for col in 0..40 {
            assert_eq!(canvas.cell(col, 0), '\u{2809}');
        }
        assert_eq!(lit_cells(&canvas), 40);
    }

    #[test]
    fn test_close_path_draws_last_edge() {
        let mut open = BrailleCanvas::new(40, 15, 800, 600);
        open.begin_path();
        open.move_to(100.0, 100.0);
        open.line_to(500.0, 100.0);
        open.line_to(500.0, 400.0);
        open.stroke();

        let mut closed = BrailleCanvas::new(40, 15, 800, 600);
        closed.begin_path();
        closed.move_to(100.0, 100.0);
        closed.line_to(500.0, 100.0);
        closed.line_to(500.0, 400.0);
        closed.close_path();
        closed.stroke();

        assert!(lit_cells(&closed) > lit_cells(&open));
    }

    #[test]
    fn test_offscreen_points_are_clipped() {
        let mut canvas = BrailleCanvas::new(40, 15, 800, 600);
        canvas.begin_path();
        canvas.move_to(-500.0, 300.0);
        canvas.line_to(1500.0, 300.0);
        canvas.stroke();
        assert_eq!(lit_cells(&canvas), 40);
    }

    #[test]
    fn test_huge_line_is_clipped_before_stepping() {
        let mut canvas = BrailleCanvas::new(40, 15, 800, 600);
        let start = Instant::now();
        canvas.begin_path();
        canvas.move_to(-1e12, 300.0);
        canvas.line_to(1e12, 300.0);
        canvas.stroke();
        assert!(start.elapsed() < Duration::from_secs(1));

        // Every lit cell is in row 7, the one holding y = 300
        for col in 0..40 {
            assert_ne!(canvas.cell(col, 7), ' ');
        }
        assert_eq!(lit_cells(&canvas), 40);
    }

    #[test]
    fn test_clip_segment() {
        let bounds = (80.0, 60.0);
        let ((x0, y0), (x1, y1)) = clip_segment((-10.0, 30.0), (90.0, 30.0), bounds).unwrap();
        assert_relative_eq!(x0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(x1, 80.0, epsilon = 1e-9);
        assert_relative_eq!(y0, 30.0);
        assert_relative_eq!(y1, 30.0);
        // Inside segments are untouched
        assert_eq!(
            clip_segment((10.0, 10.0), (20.0, 50.0), bounds),
            Some(((10.0, 10.0), (20.0, 50.0)))
        );
        assert_eq!(clip_segment((-10.0, -5.0), (100.0, -1.0), bounds), None);
        assert_eq!(clip_segment((90.0, 10.0), (90.0, 10.0), bounds), None);
    }

    #[test]
    fn test_text_overrides_dots() {
        let mut canvas = BrailleCanvas::new(40, 15, 800, 600);
        canvas.begin_path();
        canvas.move_to(0.0, 0.0);
        canvas.line_to(799.0, 0.0);
        canvas.stroke();
        canvas.fill_text("Hi", 0.0, 0.0);
        assert_eq!(canvas.cell(0, 0), 'H');
        assert_eq!(canvas.cell(1, 0), 'i');
        assert_eq!(canvas.cell(2, 0), '\u{2809}');

        canvas.clear();
        assert_eq!(lit_cells(&canvas), 0);
    }

    #[test]
    fn test_draw_positions_every_row() {
        let mut canvas = BrailleCanvas::new(4, 2, 8, 8);
        canvas.fill_text("ab", 0.0, 0.0);
        let mut out = Vec::new();
        canvas.draw(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("ab  "));
        assert!(out.contains("\x1b[2;1H"));
    }
}
