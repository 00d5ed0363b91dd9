// SDL3 backend: window, streaming texture and keyboard events.

use log::info;
use sdl3::event::Event;
use sdl3::keyboard::Keycode;
use sdl3::pixels::{Color, PixelFormat};
use sdl3::rect::Rect;
use sdl3::render::{Canvas, ScaleMode};
use sdl3::video::Window;
use sdl3::{EventPump, Sdl};

use crate::display::{ScaledRect, Surface};
use crate::error::{InitError, PresentError};
use crate::framebuffer::{LCD_HEIGHT, LCD_WIDTH};
use crate::input::{EventSource, HostEvent, HostKey};

/// Window plus renderer. The logical frame is uploaded as RGB565.
pub struct SdlSurface {
    _sdl: Sdl,
    canvas: Canvas<Window>,
}

pub struct SdlEvents {
    event_pump: EventPump,
}

impl std::fmt::Debug for SdlSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdlSurface")
            .field("size", &self.canvas.window().size())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SdlEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdlEvents").finish_non_exhaustive()
    }
}

/// Opens a `scale`-times window over the LCD resolution. Every failure here
/// carries SDL's own message.
pub fn init(title: &str, scale: u32) -> Result<(SdlSurface, SdlEvents), InitError> {
    let sdl = sdl3::init().map_err(|e| InitError::Sdl(format!("{:?}", e)))?;
    let video = sdl
        .video()
        .map_err(|e| InitError::Sdl(format!("video: {:?}", e)))?;

    let (win_w, win_h) = window_size(scale)?;
    let window = video
        .window(title, win_w, win_h)
        .position_centered()
        .build()
        .map_err(|e| InitError::Window(format!("{:?}", e)))?;

    let mut canvas = window.into_canvas();
    canvas.set_draw_color(Color::RGB(0, 0, 0));
    canvas.clear();
    canvas.present();

    // Fail now rather than on the first frame if the renderer cannot take RGB565.
    let texture_creator = canvas.texture_creator();
    texture_creator
        .create_texture_streaming(PixelFormat::RGB565, LCD_WIDTH as u32, LCD_HEIGHT as u32)
        .map_err(|e| InitError::Surface(format!("{:?}", e)))?;

    let event_pump = sdl
        .event_pump()
        .map_err(|e| InitError::Sdl(format!("event pump: {:?}", e)))?;

    let (w, h) = canvas.window().size();
    info!("opened {}x{} window \"{}\"", w, h, title);

    Ok((
        SdlSurface { _sdl: sdl, canvas },
        SdlEvents { event_pump },
    ))
}

/// Window size for a given scale; at least 1x, and an error rather than a
/// wrap-around when the product does not fit.
fn window_size(scale: u32) -> Result<(u32, u32), InitError> {
    let scale = scale.max(1);
    match (
        (LCD_WIDTH as u32).checked_mul(scale),
        (LCD_HEIGHT as u32).checked_mul(scale),
    ) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(InitError::Window(format!("scale {} is too large", scale))),
    }
}

impl Surface for SdlSurface {
    fn size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }

    fn blit_scaled(
        &mut self,
        pixels: &[u16],
        width: usize,
        height: usize,
        dst: ScaledRect,
    ) -> Result<(), PresentError> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(PixelFormat::RGB565, width as u32, height as u32)
            .map_err(|e| PresentError::Backend(format!("SDL texture error: {:?}", e)))?;
        texture.set_scale_mode(ScaleMode::Nearest);

        texture
            .with_lock(None, |buf: &mut [u8], pitch: usize| {
                for (y, row) in pixels.chunks_exact(width).enumerate() {
                    let line = &mut buf[y * pitch..y * pitch + width * 2];
                    for (out, &px) in line.chunks_exact_mut(2).zip(row) {
                        out.copy_from_slice(&px.to_ne_bytes());
                    }
                }
            })
            .map_err(|e| PresentError::Backend(format!("lock texture error: {:?}", e)))?;

        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        self.canvas.clear();
        self.canvas
            .copy(&texture, None, Rect::new(dst.x, dst.y, dst.w, dst.h))
            .map_err(|e| PresentError::Backend(format!("copy texture error: {:?}", e)))?;
        Ok(())
    }

    fn present(&mut self) {
        self.canvas.present();
    }
}

impl EventSource for SdlEvents {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.event_pump.poll_event().map(translate)
    }
}

fn translate(event: Event) -> HostEvent {
    match event {
        Event::Quit { .. } => HostEvent::Quit,
        Event::KeyDown {
            keycode: Some(key), ..
        } => key_event(key, true),
        Event::KeyUp {
            keycode: Some(key), ..
        } => key_event(key, false),
        _ => HostEvent::Other,
    }
}

/// Escape going down quits; every other key becomes a level transition.
fn key_event(key: Keycode, pressed: bool) -> HostEvent {
    if pressed && key == Keycode::Escape {
        return HostEvent::Quit;
    }
    HostEvent::Key {
        key: host_key(key),
        pressed,
    }
}

fn host_key(key: Keycode) -> HostKey {
    match key {
        Keycode::Up => HostKey::Up,
        Keycode::Down => HostKey::Down,
        Keycode::Left => HostKey::Left,
        Keycode::Right => HostKey::Right,
        Keycode::A => HostKey::A,
        Keycode::B => HostKey::B,
        Keycode::C => HostKey::C,
        Keycode::S => HostKey::S,
        Keycode::D => HostKey::D,
        _ => HostKey::Other,
    }
}
