//! Drawing surface abstraction.
//!
//! The render system only ever needs "clear" and "draw a filled rectangle".
//! A real backend would wrap a window; the headless demo draws into the
//! log at trace level so a run can be inspected with `RUST_LOG=trace`.

use log::trace;

use crate::components::Color;

pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
}

/// Headless surface: fixed dimensions, rectangles go to the trace log.
pub struct LogSurface {
    width: f32,
    height: f32,
    frame: u64,
    rects_this_frame: u32,
}

impl LogSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            frame: 0,
            rects_this_frame: 0,
        }
    }
}

impl Surface for LogSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        if self.rects_this_frame > 0 {
            trace!("frame {}: {} rects", self.frame, self.rects_this_frame);
        }
        self.frame += 1;
        self.rects_this_frame = 0;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.rects_this_frame += 1;
        trace!("rect {color} at ({x:.0},{y:.0}) size {w:.0}x{h:.0}");
    }
}
