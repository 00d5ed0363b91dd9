use crate::error::PresentError;
use crate::framebuffer::{BufferState, FrameBuffer, LCD_HEIGHT, LCD_WIDTH, Pixels};

/// Destination of the upscaled frame inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

/// Largest whole-number upscale of a `src_w` x `src_h` frame that fits the
/// window, centred. Never below 1x; a zero source dimension counts as 1.
pub fn integer_scale(win_w: u32, win_h: u32, src_w: u32, src_h: u32) -> ScaledRect {
    let (src_w, src_h) = (src_w.max(1), src_h.max(1));
    let sx = (win_w / src_w).max(1);
    let sy = (win_h / src_h).max(1);
    let scale = sx.min(sy);
    let w = src_w * scale;
    let h = src_h * scale;
    ScaledRect {
        x: (win_w.saturating_sub(w) / 2) as i32,
        y: (win_h.saturating_sub(h) / 2) as i32,
        w,
        h,
    }
}

/// Backend primitives the sink needs from the windowing layer.
pub trait Surface {
    /// Physical size of the visible surface.
    fn size(&self) -> (u32, u32);
    /// Copies an RGB565 frame into `dst` of the back buffer, nearest-neighbour.
    fn blit_scaled(
        &mut self,
        pixels: &[u16],
        width: usize,
        height: usize,
        dst: ScaledRect,
    ) -> Result<(), PresentError>;
    /// Makes the back buffer visible.
    fn present(&mut self);
}

/// Owns the logical LCD and moves it to the screen once per frame.
#[derive(Debug)]
pub struct FrameSink<S> {
    buffer: FrameBuffer,
    surface: S,
}

impl<S: Surface> FrameSink<S> {
    pub fn new(surface: S) -> Self {
        Self::with_resolution(surface, LCD_WIDTH, LCD_HEIGHT)
    }

    pub fn with_resolution(surface: S, width: usize, height: usize) -> Self {
        FrameSink {
            buffer: FrameBuffer::new(width, height),
            surface,
        }
    }

    pub fn state(&self) -> BufferState {
        self.buffer.state()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn begin_hardware_write(&mut self) -> Result<Pixels<'_>, PresentError> {
        self.buffer.begin_hardware_write()
    }

    /// Blits the logical buffer to the surface, shows it, and hands the buffer
    /// back to the hardware for the next frame.
    pub fn present(&mut self) -> Result<(), PresentError> {
        let (win_w, win_h) = self.surface.size();
        let dst = integer_scale(
            win_w,
            win_h,
            self.buffer.width() as u32,
            self.buffer.height() as u32,
        );
        let surface = &mut self.surface;
        self.buffer.present_with(|pixels, w, h| {
            surface.blit_scaled(pixels, w, h, dst)?;
            surface.present();
            Ok(())
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Surface that records what it was asked to draw.
    #[derive(Debug, Default)]
    pub(crate) struct FakeSurface {
        pub size: (u32, u32),
        pub blits: Vec<(Vec<u16>, ScaledRect)>,
        pub presents: usize,
        pub fail: bool,
    }

    impl Surface for FakeSurface {
        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn blit_scaled(
            &mut self,
            pixels: &[u16],
            _width: usize,
            _height: usize,
            dst: ScaledRect,
        ) -> Result<(), PresentError> {
            if self.fail {
                return Err(PresentError::Backend("blit failed".into()));
            }
            self.blits.push((pixels.to_vec(), dst));
            Ok(())
        }

        fn present(&mut self) {
            self.presents += 1;
        }
    }

    #[test]
    fn test_integer_scale_exact_fit() {
        assert_eq!(
            integer_scale(440, 352, 220, 176),
            ScaledRect { x: 0, y: 0, w: 440, h: 352 }
        );
    }

    #[test]
    fn test_integer_scale_letterboxes() {
        // 3x fits horizontally, 2x vertically: take 2x and centre.
        assert_eq!(
            integer_scale(700, 400, 220, 176),
            ScaledRect { x: 130, y: 24, w: 440, h: 352 }
        );
    }

    #[test]
    fn test_integer_scale_small_window() {
        assert_eq!(
            integer_scale(100, 100, 220, 176),
            ScaledRect { x: 0, y: 0, w: 220, h: 176 }
        );
    }

    #[test]
    fn test_integer_scale_zero_source() {
        assert_eq!(
            integer_scale(8, 4, 0, 0),
            ScaledRect { x: 2, y: 0, w: 4, h: 4 }
        );
    }

    #[test]
    fn test_zero_resolution_sink_presents() {
        let surface = FakeSurface {
            size: (8, 4),
            ..Default::default()
        };
        let mut sink = FrameSink::with_resolution(surface, 0, 0);
        sink.present().unwrap();
        let (pixels, dst) = &sink.surface().blits[0];
        assert_eq!(pixels.len(), 1);
        assert_eq!(*dst, ScaledRect { x: 2, y: 0, w: 4, h: 4 });
    }

    #[test]
    fn test_present_blits_and_returns_buffer() {
        let surface = FakeSurface {
            size: (8, 4),
            ..Default::default()
        };
        let mut sink = FrameSink::with_resolution(surface, 4, 2);
        sink.begin_hardware_write().unwrap().set(1, 0, 0x07E0);

        sink.present().unwrap();
        assert_eq!(sink.state(), BufferState::HardwareWritable);
        assert_eq!(sink.surface().presents, 1);
        let (pixels, dst) = &sink.surface().blits[0];
        assert_eq!(pixels[1], 0x07E0);
        assert_eq!(*dst, ScaledRect { x: 0, y: 0, w: 8, h: 4 });
    }

    #[test]
    fn test_blit_failure_skips_present() {
        let surface = FakeSurface {
            size: (8, 4),
            fail: true,
            ..Default::default()
        };
        let mut sink = FrameSink::with_resolution(surface, 4, 2);
        assert!(sink.present().is_err());
        assert_eq!(sink.surface().presents, 0);
        assert_eq!(sink.state(), BufferState::Presenting);
    }
}
