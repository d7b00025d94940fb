//! The drawing surface the frame loop strokes into.
//!
//! Modelled on a 2D canvas path API: a frame is a `clear`, then any number of
//! `begin_path` / `move_to` / `line_to` / `close_path` / `stroke` sequences,
//! then `present`.

use crate::color::StrokeColor;
use crate::error::Result;

pub trait Surface {
    /// Current size in pixels.
    ///
    /// Fails with [`TorusError::SurfaceUnavailable`](crate::TorusError::SurfaceUnavailable)
    /// once the surface is detached; the frame loop stops on that error.
    fn dimensions(&self) -> Result<(u32, u32)>;

    fn clear(&mut self, width: u32, height: u32);

    fn set_stroke_color(&mut self, color: StrokeColor);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    /// Join the current point back to the start of the subpath.
    fn close_path(&mut self);

    /// Draw the current path with the stroke colour.
    fn stroke(&mut self);

    /// Place a line of text with its top-left corner at `(x, y)`.
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64) {}

    /// Make the finished frame visible.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}
