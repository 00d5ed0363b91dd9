//! Host harness for a Pokitto (LPC11U68) emulator: frame loop, keyboard to
//! GPIO bridge, LCD presentation and EEPROM persistence.

pub mod config;
pub mod context;
pub mod display;
pub mod driver;
pub mod eeprom;
pub mod error;
pub mod framebuffer;
pub mod gpio;
pub mod input;
pub mod machine;
pub mod rom;
pub mod sdl;
