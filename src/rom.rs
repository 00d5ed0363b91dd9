use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{info, warn};

use crate::error::InitError;

/// Copies the flash image at `path` into `flash`.
///
/// Bytes past `flash.len()` are ignored and a short image is accepted as is;
/// only a file that cannot be opened or read is an error. Returns the number
/// of bytes copied.
pub fn load_flash(path: &Path, flash: &mut [u8]) -> Result<usize, InitError> {
    let rom_err = |source| InitError::Rom {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(rom_err)?;
    let mut rom_data = Vec::with_capacity(flash.len());
    file.take(flash.len() as u64)
        .read_to_end(&mut rom_data)
        .map_err(rom_err)?;

    flash[..rom_data.len()].copy_from_slice(&rom_data);

    if rom_data.len() < flash.len() {
        warn!(
            "flash image {} is only {} of {} bytes",
            path.display(),
            rom_data.len(),
            flash.len()
        );
    }
    info!("loaded flash image {} ({} bytes)", path.display(), rom_data.len());
    Ok(rom_data.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pokitto_emu_rom_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_oversized_image_is_truncated() {
        let path = temp_path("big");
        let image: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
        fs::write(&path, &image).unwrap();

        let mut flash = vec![0u8; 256];
        let n = load_flash(&path, &mut flash).unwrap();
        assert_eq!(n, 256);
        assert_eq!(flash, image[..256]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_short_image_still_loads() {
        let path = temp_path("short");
        fs::write(&path, [1u8, 2, 3]).unwrap();

        let mut flash = vec![0xFFu8; 8];
        let n = load_flash(&path, &mut flash).unwrap();
        assert_eq!(n, 3);
        assert_eq!(flash, [1, 2, 3, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_image_is_init_error() {
        let path = temp_path("missing");
        let mut flash = vec![0u8; 8];
        match load_flash(&path, &mut flash) {
            Err(InitError::Rom { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
