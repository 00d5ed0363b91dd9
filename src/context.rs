// Emulation state shared by the harness components: flash, EEPROM and the cycle clock.
// Constructed once in main and handed by reference to whoever needs it.

use crate::eeprom::PersistentBlock;

/// LPC11U68 on-chip flash.
pub const FLASH_SIZE: usize = 256 * 1024;
/// LPC11U68 on-chip EEPROM.
pub const EEPROM_SIZE: usize = 4 * 1024;

/// Cycle bookkeeping shared between the driver, the CPU and the timers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    /// Deadline the CPU runs up to; advanced by the driver before every step.
    pub next_event: u64,
    /// Cycles actually consumed by the CPU.
    pub total_ticks: u64,
}

#[derive(Debug)]
pub struct EmuContext {
    pub flash: Box<[u8]>,
    pub eeprom: PersistentBlock,
    pub clock: Clock,
}

impl EmuContext {
    pub fn new() -> Self {
        Self::with_capacity(FLASH_SIZE, EEPROM_SIZE)
    }

    pub fn with_capacity(flash_size: usize, eeprom_size: usize) -> Self {
        EmuContext {
            flash: vec![0; flash_size].into_boxed_slice(),
            eeprom: PersistentBlock::new(eeprom_size),
            clock: Clock::default(),
        }
    }

    pub fn read_eeprom(&self, offset: usize) -> u8 {
        self.eeprom.bytes().get(offset).copied().unwrap_or(0xFF)
    }

    /// Store path for the emulated memory unit. Marks the block dirty on any
    /// in-range write, even if the value does not change.
    pub fn write_eeprom(&mut self, offset: usize, value: u8) {
        self.eeprom.write(offset, value);
    }
}

impl Default for EmuContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_uses_device_sizes() {
        let ctx = EmuContext::new();
        assert_eq!(ctx.flash.len(), FLASH_SIZE);
        assert_eq!(ctx.eeprom.capacity(), EEPROM_SIZE);
        assert_eq!(ctx.clock, Clock::default());
    }

    #[test]
    fn test_eeprom_write_sets_dirty() {
        let mut ctx = EmuContext::with_capacity(16, 8);
        assert!(!ctx.eeprom.is_dirty());
        ctx.write_eeprom(3, 0x5A);
        assert!(ctx.eeprom.is_dirty());
        assert_eq!(ctx.read_eeprom(3), 0x5A);
    }

    #[test]
    fn test_eeprom_out_of_range() {
        let mut ctx = EmuContext::with_capacity(16, 8);
        ctx.write_eeprom(8, 0x12);
        assert!(!ctx.eeprom.is_dirty());
        assert_eq!(ctx.read_eeprom(8), 0xFF);
    }
}
