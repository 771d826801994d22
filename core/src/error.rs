use thiserror::Error;

#[derive(Debug, Error)]
pub enum PocsagError {
    #[error("invalid WAV file: too short ({len} bytes, header alone is 44)")]
    WavTooShort { len: usize },

    #[error("frame sync word not found")]
    SyncNotFound,

    #[error("unsupported baud rate {0} (supported: 512, 1200, 2400)")]
    UnsupportedBaudRate(u32),

    #[error("invalid function code {0} (must be 0-3)")]
    InvalidFunctionCode(u8),

    #[error("tone-only function code {0} is not supported")]
    ToneOnlyUnsupported(u8),

    #[error("address {address} with function {function} encodes to a reserved sync/idle codeword")]
    ReservedAddress { address: u32, function: u8 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PocsagError>;
