//! # Memory Bus
//!
//! The CPU sees a flat 16-bit address space. Mirroring and banking belong to
//! whatever implements [`Bus`]; the core only ever calls `read` and `write`,
//! and both are total over the whole address space.

use crate::error::{CpuError, Result};

/// Size of the 6502 address space.
pub const ADDRESS_SPACE: usize = 0x10000;

pub trait Bus {
    fn read(&mut self, address: u16) -> u8;

    fn write(&mut self, address: u16, value: u8);

    /// Little-endian word from two independent addresses. Used wherever the
    /// high byte does not live at `a + 1` (zero-page and indirect wraps).
    fn read_noncontinuous_word(&mut self, a: u16, b: u16) -> u16 {
        (self.read(a) as u16) | (self.read(b) as u16) << 8
    }

    fn read_word(&mut self, address: u16) -> u16 {
        self.read_noncontinuous_word(address, address.wrapping_add(1))
    }
}

/// 64KB of plain RAM with no mirroring.
pub struct FlatBus {
    ram: Box<[u8]>,
}

impl FlatBus {
    pub fn new() -> Self {
        FlatBus {
            ram: vec![0; ADDRESS_SPACE].into_boxed_slice(),
        }
    }

    /// Copy `data` into memory starting at `address`.
    pub fn load(&mut self, address: u16, data: &[u8]) -> Result<()> {
        let start = address as usize;
        let end = start + data.len();
        if end > ADDRESS_SPACE {
            return Err(CpuError::ProgramTooLarge {
                address,
                len: data.len(),
            });
        }
        self.ram[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Side-effect free read for debuggers and tracing.
    pub fn peek(&self, address: u16) -> u8 {
        self.ram[address as usize]
    }

    pub fn poke(&mut self, address: u16, value: u8) {
        self.ram[address as usize] = value;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.ram
    }
}

impl Bus for FlatBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[address as usize] = value;
    }
}

impl Default for FlatBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ram_access() {
        let mut bus = FlatBus::new();
        bus.write(0x0000, 0x42);
        bus.write(0xFFFF, 0x24);
        assert_eq!(bus.read(0x0000), 0x42);
        assert_eq!(bus.read(0xFFFF), 0x24);
    }

    #[test]
    fn test_no_mirroring() {
        let mut bus = FlatBus::new();
        bus.write(0x0000, 0x42);
        assert_eq!(bus.read(0x0800), 0x00);
    }

    #[test]
    fn test_read_word_wraps_at_top_of_memory() {
        let mut bus = FlatBus::new();
        bus.write(0xFFFF, 0x34);
        bus.write(0x0000, 0x12);
        assert_eq!(bus.read_word(0xFFFF), 0x1234);
    }

    #[test]
    fn test_load_program() {
        let mut bus = FlatBus::new();
        bus.load(0xFFFC, &[0x00, 0x80, 0x00, 0x90]).unwrap();
        assert_eq!(bus.peek(0xFFFD), 0x80);
        assert_eq!(bus.read_word(0xFFFE), 0x9000);
    }

    #[test]
    fn test_load_past_end_fails() {
        let mut bus = FlatBus::new();
        let err = bus.load(0xFFFE, &[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            CpuError::ProgramTooLarge {
                address: 0xFFFE,
                len: 3
            }
        ));
        assert_eq!(bus.peek(0xFFFE), 0);
    }
}
