// EEPROM persistence: a raw dump of the emulated EEPROM, no header, no checksum.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// In-memory EEPROM contents plus the "differs from disk" flag.
#[derive(Debug, Clone)]
pub struct PersistentBlock {
    data: Box<[u8]>,
    dirty: bool,
}

impl PersistentBlock {
    pub fn new(capacity: usize) -> Self {
        PersistentBlock {
            data: vec![0; capacity].into_boxed_slice(),
            dirty: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn write(&mut self, offset: usize, value: u8) {
        if let Some(slot) = self.data.get_mut(offset) {
            *slot = value;
            self.dirty = true;
        }
    }
}

/// Loads and flushes a [`PersistentBlock`] from one backing file.
#[derive(Debug, Clone)]
pub struct NonVolatileStore {
    path: PathBuf,
}

impl NonVolatileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        NonVolatileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the whole block with the file contents. Returns false and
    /// leaves the block untouched unless a full `capacity` bytes were read.
    pub fn load(&self, block: &mut PersistentBlock) -> bool {
        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                debug!("no EEPROM image at {}: {}", self.path.display(), e);
                return false;
            }
        };

        let mut staging = vec![0u8; block.capacity()];
        if let Err(e) = file.read_exact(&mut staging) {
            warn!(
                "ignoring EEPROM image {}: expected {} bytes ({})",
                self.path.display(),
                block.capacity(),
                e
            );
            return false;
        }

        block.data.copy_from_slice(&staging);
        debug!("loaded EEPROM image {} ({} bytes)", self.path.display(), staging.len());
        true
    }

    /// Flushes the block if it is dirty. Failures are swallowed and leave the
    /// block dirty; read-only media must not stop the emulator from exiting.
    pub fn save(&self, block: &mut PersistentBlock) {
        if !block.dirty {
            return;
        }

        let mut file = match File::create(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!("cannot open {} for writing: {}", self.path.display(), e);
                return;
            }
        };

        if let Err(e) = file.write_all(&block.data) {
            warn!("EEPROM write to {} failed: {}", self.path.display(), e);
            return;
        }

        block.dirty = false;
        debug!("saved EEPROM image {}", self.path.display());
    }
}
