use std::io;

use thiserror::Error;

use crate::nufx::ThreadFormat;

/// Specialized [`Result`] type for decoding NuFX archives.
pub type NufxResult<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
/// A fatal error that may occur while decoding a NuFX archive.
pub enum Error {
    /// Tried to read after the end of the stream while decoding.
    #[error("expected more data")]
    UnexpectedEof,

    /// The master header does not start with the NuFile signature.
    #[error("master header signature mismatch")]
    BadMasterSignature,

    /// The master header declares a version this reader does not understand.
    #[error("unsupported master version {0}")]
    UnsupportedMasterVersion(u16),

    /// A record header does not start with the NuFX signature.
    #[error("record header signature mismatch")]
    BadRecordSignature,

    /// A record declares an attribute section smaller than its own header
    /// block, or one that disagrees with the bytes actually present.
    #[error("record attribute count {0} is inconsistent with the header")]
    BadAttribCount(u16),

    /// A record's thread payloads extend past the end of the stream.
    #[error("header reported sizes exceed the EOF")]
    CorruptHeader,

    /// A GS/OS option list declares a buffer size below the documented
    /// minimum or beyond the bytes stored in the record.
    #[error("option list buffer size {0:#06x} out of range")]
    BadOptionList(u16),

    /// The accumulated LZW/1 stream CRC does not match the stored one.
    #[error("crc mismatch: expected {expected:#06x}, computed {actual:#06x}")]
    CrcMismatch { expected: u16, actual: u16 },

    /// An LZW/2 block consumed a different number of input bytes than its
    /// header declared.
    #[error("lzw/2 input length mismatch: declared {declared}, consumed {consumed}")]
    LengthMismatch { declared: u16, consumed: u16 },

    /// The first code of an LZW stream (or of a post-clear restart) must be
    /// a literal.
    #[error("invalid initial lzw symbol {0:#06x}")]
    InvalidInitialSymbol(u16),

    /// An LZW code referenced a string table entry that has not been
    /// assigned yet.
    #[error("lzw code {code:#06x} exceeds next free entry {entry:#06x}")]
    BadCode { code: u16, entry: u16 },

    /// The LZW string table ran out of slots without an intervening clear.
    #[error("lzw string table overflow")]
    TableOverflow,

    /// A decoded LZW string ran past the end of its 4 KiB block.
    #[error("lzw output overran the block")]
    BlockOverrun,

    /// The LZW/1 per-block flag byte must be 0 or 1.
    #[error("invalid lzw flag {0:#04x}")]
    BadLzwFlag(u8),

    /// A block header declares a run-length size larger than a block.
    #[error("block run-length size {0} exceeds the block size")]
    BadRleLength(u16),

    /// The thread is stored in a format this reader does not decompress.
    #[error("compression format {0:?} is not supported")]
    UnsupportedFormat(ThreadFormat),

    /// Unknown I/O error.
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        match value.kind() {
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            _ => Self::Io(value),
        }
    }
}
