use super::header::CartridgeHeader;
use crate::error::LoadError;

/// A cartridge with no bank switching: up to 32 KiB ROM, optionally 8 KiB RAM.
#[derive(Debug, Clone)]
pub struct NoMapper {
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl NoMapper {
    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => *self.rom.get(addr as usize).unwrap_or(&0xFF),
            0xA000..=0xBFFF => {
                let idx = (addr - 0xA000) as usize;
                *self.ram.get(idx).unwrap_or(&0xFF)
            }
            _ => 0xFF,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let 0xA000..=0xBFFF = addr {
            let idx = (addr - 0xA000) as usize;
            if idx < self.ram.len() {
                self.ram[idx] = value;
            }
        }
        // Writes into [0x0000, 0x8000) have no mapper registers to hit.
    }
}

/// MBC1: 5-bit low-bank register, 2-bit high-bank register, a bank-mode
/// flag, and a RAM-enable latch.
///
/// Grounded on `original_source/include/gb/memory/cartridge/mappers/mbc1.h`:
/// the low-bank register corrects a written value of 0 up to 1, and both
/// ROM and RAM bank-select math mirror the original's indexing exactly.
#[derive(Debug, Clone)]
pub struct Mbc1 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    bank_select_lo: u8,
    bank_select_hi: u8,
    bank_mode: bool,
    ram_enabled: bool,
}

impl Mbc1 {
    fn rom_offset_lo(&self) -> usize {
        let bank = if self.bank_mode {
            (self.bank_select_hi as usize) << 5
        } else {
            0
        };
        bank * 0x4000
    }

    fn rom_offset_hi(&self) -> usize {
        let bank = ((self.bank_select_hi as usize) << 5) | self.bank_select_lo as usize;
        bank * 0x4000
    }

    fn ram_offset(&self) -> usize {
        let bank = if self.bank_mode {
            self.bank_select_hi as usize
        } else {
            0
        };
        bank * 0x2000
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x3FFF => {
                let idx = (self.rom_offset_lo() + addr as usize) % self.rom.len();
                self.rom[idx]
            }
            0x4000..=0x7FFF => {
                let idx = (self.rom_offset_hi() + (addr - 0x4000) as usize) % self.rom.len();
                self.rom[idx]
            }
            0xA000..=0xBFFF => {
                if !self.ram_enabled || self.ram.is_empty() {
                    return 0xFF;
                }
                let idx = (self.ram_offset() + (addr - 0xA000) as usize) % self.ram.len();
                self.ram[idx]
            }
            _ => 0xFF,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = (value & 0x0F) == 0x0A,
            0x2000..=0x3FFF => self.bank_select_lo = (value & 0x1F).max(1),
            0x4000..=0x5FFF => self.bank_select_hi = value & 0x03,
            0x6000..=0x7FFF => self.bank_mode = value & 1 != 0,
            0xA000..=0xBFFF => {
                if self.ram_enabled && !self.ram.is_empty() {
                    let idx = (self.ram_offset() + (addr - 0xA000) as usize) % self.ram.len();
                    self.ram[idx] = value;
                }
            }
            _ => {}
        }
    }
}

/// A tagged union over the cartridge mapper kinds this core supports.
///
/// Per the design note on cartridge mapper polymorphism, this is a closed
/// enum rather than a trait object: the set of variants is small and fixed,
/// and exhaustive matching catches missing cases at compile time.
#[derive(Debug, Clone)]
pub enum Mapper {
    NoMapper(NoMapper),
    Mbc1(Mbc1),
}

impl Mapper {
    /// Build a mapper for `rom`, given its already-parsed header and an
    /// optional save RAM image loaded by the host.
    pub fn from_rom(
        header: &CartridgeHeader,
        rom: Vec<u8>,
        save_ram: Option<Vec<u8>>,
    ) -> Result<Mapper, LoadError> {
        if rom.len() != header.rom_size {
            return Err(LoadError::BadRomSize {
                expected: header.rom_size,
                actual: rom.len(),
            });
        }
        let ram = match save_ram {
            Some(bytes) => {
                if bytes.len() != header.ram_size {
                    return Err(LoadError::BadSaveRamSize {
                        expected: header.ram_size,
                        actual: bytes.len(),
                    });
                }
                bytes
            }
            None => vec![0; header.ram_size],
        };

        match header.cartridge_type {
            0x00 => Ok(Mapper::NoMapper(NoMapper { rom, ram })),
            0x01..=0x03 => Ok(Mapper::Mbc1(Mbc1 {
                rom,
                ram,
                bank_select_lo: 1,
                bank_select_hi: 0,
                bank_mode: false,
                ram_enabled: false,
            })),
            other => Err(LoadError::UnrecognisedCartridgeType(other)),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        match self {
            Mapper::NoMapper(m) => m.read(addr),
            Mapper::Mbc1(m) => m.read(addr),
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match self {
            Mapper::NoMapper(m) => m.write(addr, value),
            Mapper::Mbc1(m) => m.write(addr, value),
        }
    }

    /// The cartridge's battery-backed RAM, for the host to persist between
    /// runs. Empty for cartridges with no RAM.
    pub fn save_ram(&self) -> &[u8] {
        match self {
            Mapper::NoMapper(m) => &m.ram,
            Mapper::Mbc1(m) => &m.ram,
        }
    }
}
