use thiserror::Error;

/// Failures that can occur while constructing a [`crate::GameBoy`].
///
/// Everything here is a load-time problem; once a `GameBoy` exists it cannot
/// fail to run a step (decode is total, bus access is masked-and-logged, see
/// `devices::bus`).
#[derive(Debug, Error, Eq, PartialEq)]
pub enum LoadError {
    #[error("boot ROM must be exactly 256 bytes, got {0}")]
    BadBootRomSize(usize),

    #[error("cartridge ROM size {actual} does not match header-declared size {expected}")]
    BadRomSize { expected: usize, actual: usize },

    #[error("cartridge header declares an unrecognised mapper type 0x{0:02X}")]
    UnrecognisedCartridgeType(u8),

    #[error("save RAM size {actual} does not match header-declared size {expected}")]
    BadSaveRamSize { expected: usize, actual: usize },
}
