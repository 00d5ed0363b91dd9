// Logical LCD memory. The emulated hardware and the presentation pipeline take
// turns owning it; `BufferState` records whose turn it is.

use crate::error::PresentError;

pub const LCD_WIDTH: usize = 220;
pub const LCD_HEIGHT: usize = 176;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    HardwareWritable,
    Presenting,
}

/// RGB565, row-major. Never smaller than 1x1.
#[derive(Debug)]
pub struct FrameBuffer {
    pixels: Box<[u16]>,
    width: usize,
    height: usize,
    state: BufferState,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        FrameBuffer {
            pixels: vec![0; width * height].into_boxed_slice(),
            width,
            height,
            state: BufferState::HardwareWritable,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn state(&self) -> BufferState {
        self.state
    }

    /// Hands the pixels to the emulated hardware. Refused while a present is
    /// still outstanding.
    pub fn begin_hardware_write(&mut self) -> Result<Pixels<'_>, PresentError> {
        if self.state == BufferState::Presenting {
            return Err(PresentError::Busy);
        }
        Ok(Pixels {
            data: &mut self.pixels,
            width: self.width,
        })
    }

    /// Runs `blit` with the buffer owned by the presentation pipeline. The
    /// buffer returns to the hardware only if `blit` succeeds.
    pub fn present_with<F>(&mut self, blit: F) -> Result<(), PresentError>
    where
        F: FnOnce(&[u16], usize, usize) -> Result<(), PresentError>,
    {
        if self.state == BufferState::Presenting {
            return Err(PresentError::Busy);
        }
        self.state = BufferState::Presenting;
        blit(&self.pixels, self.width, self.height)?;
        self.state = BufferState::HardwareWritable;
        Ok(())
    }
}

/// Hardware-side view of the frame buffer, valid until the next present.
#[derive(Debug)]
pub struct Pixels<'a> {
    data: &'a mut [u16],
    width: usize,
}

impl Pixels<'_> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.data.len() / self.width
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        if x >= self.width {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Out-of-range writes are dropped, like writes past the end of the LCD.
    pub fn set(&mut self, x: usize, y: usize, color: u16) {
        if x >= self.width {
            return;
        }
        if let Some(px) = self.data.get_mut(y * self.width + x) {
            *px = color;
        }
    }

    pub fn fill(&mut self, color: u16) {
        self.data.fill(color);
    }

    pub fn as_mut_slice(&mut self) -> &mut [u16] {
        &mut *self.data
    }
}
