use std::io;

use crate::{
    error::{Error, NufxResult},
    read::*,
    signature::Signature,
};

use super::helpers::read_prodos_datetime;

#[derive(Debug, Clone)]
/// The 48-byte header at the start of every NuFX archive.
pub struct MasterHeader {
    /// CRC16 of the rest of the master header; exposed, not validated.
    pub crc: u16,

    /// Number of records in the archive.
    pub total_records: u32,

    /// When the archive was created.
    pub created: Result<Option<time::PrimitiveDateTime>, [u8; 8]>,

    /// When the archive was last modified.
    pub modified: Result<Option<time::PrimitiveDateTime>, [u8; 8]>,

    /// Master format version.
    pub version: u16,

    /// Declared length of the whole archive in bytes.
    pub total_size: u32,
}

impl MasterHeader {
    /// Byte size of the master header.
    pub const SIZE: u64 = 48;

    /// Highest master version this reader accepts.
    pub const MAX_VERSION: u16 = 2;

    pub fn read<R: io::Read>(reader: &mut R) -> NufxResult<Self> {
        let signature: [u8; 6] = read_const_bytes(reader)?;
        if signature != *Signature::NUFILE {
            return Err(Error::BadMasterSignature);
        }

        let crc = read_u16(reader)?;
        let total_records = read_u32(reader)?;
        let created = read_prodos_datetime(reader)?;
        let modified = read_prodos_datetime(reader)?;

        let version = read_u16(reader)?;
        if version > Self::MAX_VERSION {
            return Err(Error::UnsupportedMasterVersion(version));
        }

        let _reserved: [u8; 8] = read_const_bytes(reader)?;

        // Stored big-endian, unlike every other integer in the format.
        let total_size = read_u32_be(reader)?;

        let _reserved: [u8; 6] = read_const_bytes(reader)?;

        Ok(MasterHeader {
            crc,
            total_records,
            created,
            modified,
            version,
            total_size,
        })
    }
}
