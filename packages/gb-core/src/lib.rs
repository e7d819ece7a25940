#[macro_use]
extern crate bitflags;

pub mod devices;
pub mod error;
pub mod joypad;

pub use devices::cartridge::CartridgeHeader;
pub use devices::cpu::Cpu;
pub use devices::mmu::Mmu;
pub use devices::ppu::{Ppu, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use error::LoadError;
pub use joypad::Button;

/// The Game Boy as a whole unit: CPU, PPU, and the MMU that ties them (and
/// the cartridge, timer, serial engine, and joypad) together.
///
/// Grounded on the teacher's `Nes` struct (`devices/nes.rs`): same
/// "component fields + `run_frame`-style driver" shape, generalized from the
/// NES's PPU-cycle-driven clock to the fixed CPU-instruction/MMU/PPU
/// ordering spec.md §5 requires.
pub struct GameBoy {
    cpu: Cpu,
    mmu: Mmu,
    ppu: Ppu,
    header: CartridgeHeader,
}

impl GameBoy {
    /// Construct an emulator from a 256-byte boot ROM and a cartridge image,
    /// optionally seeded with a previously-saved battery RAM image.
    pub fn new(
        boot_rom: &[u8],
        cart_rom: Vec<u8>,
        save_data: Option<Vec<u8>>,
    ) -> Result<GameBoy, LoadError> {
        if boot_rom.len() != 256 {
            return Err(LoadError::BadBootRomSize(boot_rom.len()));
        }
        let mut boot = [0u8; 256];
        boot.copy_from_slice(boot_rom);

        let (header, mapper) = devices::cartridge::from_rom(cart_rom, save_data)?;
        let mmu = Mmu::new(Some(boot), mapper);

        Ok(GameBoy {
            cpu: Cpu::new(),
            mmu,
            ppu: Ppu::new(),
            header,
        })
    }

    /// The cartridge title read out of its header (`0x0134-0x0143`).
    pub fn cartridge_title(&self) -> &str {
        &self.header.title
    }

    /// Whether the cartridge header's CGB flag (`0x0143` bit 7) is set.
    /// Metadata only — this core implements the monochrome variant, per
    /// spec.md's Non-goals.
    pub fn supports_cgb(&self) -> bool {
        self.header.supports_cgb
    }

    /// Run until the PPU completes one full frame (V-blank entered for the
    /// first time since the last frame), per spec.md §5's fixed ordering:
    /// one CPU instruction, then the MMU's timer/serial by that many
    /// M-cycles, then the PPU that many T-cycles.
    pub fn run_frame(&mut self) {
        loop {
            let m_cycles = self.cpu.step(&mut self.mmu);
            self.mmu.step(m_cycles);
            self.ppu.step(&mut self.mmu, m_cycles * 4);
            if self.ppu.take_frame_ready() {
                break;
            }
        }
    }

    pub fn press(&mut self, button: Button) {
        self.mmu.press(button);
    }

    pub fn release(&mut self, button: Button) {
        self.mmu.release(button);
    }

    /// 144x160 palette-resolved shades (0=lightest..3=darkest), row-major.
    pub fn current_frame(&self) -> &[u8] {
        self.ppu.frame_buffer()
    }

    /// Wire up the external serial collaborator: called with the outgoing
    /// byte and a nominal baud rate each time a transfer starts, returning
    /// the byte to shift in. Leave unconnected to read a disconnected cable
    /// (shifts in `0xFF`).
    pub fn connect_serial(&mut self, callback: Box<dyn FnMut(u8, u32) -> u8>) {
        self.mmu.connect_serial(callback);
    }

    /// The cartridge's battery-backed RAM, for the host to persist between
    /// runs. Empty for cartridges with no RAM.
    pub fn cartridge_ram(&self) -> &[u8] {
        self.mmu.cartridge_ram()
    }

    pub fn dump_state(&self) -> String {
        self.cpu.dump_state(&self.mmu)
    }
}
