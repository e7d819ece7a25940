mod header;
mod mapper;

pub use header::CartridgeHeader;
pub use mapper::Mapper;

use crate::error::LoadError;

/// Parse a cartridge ROM buffer and build the mapper it declares.
pub fn from_rom(rom: Vec<u8>, save_ram: Option<Vec<u8>>) -> Result<(CartridgeHeader, Mapper), LoadError> {
    if rom.len() < 0x150 {
        return Err(LoadError::BadRomSize {
            expected: 0x150,
            actual: rom.len(),
        });
    }
    let header = CartridgeHeader::parse(&rom);
    log::debug!(
        "loaded cartridge '{}' (type 0x{:02X}, {} KiB ROM, {} KiB RAM)",
        header.title,
        header.cartridge_type,
        header.rom_size / 1024,
        header.ram_size / 1024
    );
    let mapper = Mapper::from_rom(&header, rom, save_ram)?;
    Ok((header, mapper))
}
