use std::io;

use crate::read::*;

int_enum! {
    /// What a thread's byte stream represents.
    pub enum ThreadClass : u16 {
        /// Free-form text attached to the record.
        Message = 0,

        /// Control information for the archiving tool.
        Control = 1,

        /// File contents: data fork, disk image, or resource fork,
        /// distinguished by the thread kind.
        Data = 2,

        /// The record's filename, overriding the header's filename field.
        FileName = 3,
    }
}

int_enum! {
    /// Compression format of a thread's payload.
    pub enum ThreadFormat : u16 {
        /// Stored as-is, possibly with trailing slack.
        Uncompressed = 0,

        /// Huffman Squeeze (declared by the format, never decompressed here).
        HuffmanSqueeze = 1,

        /// ShrinkIt dynamic LZW, original variant.
        DynamicLzw1 = 2,

        /// ShrinkIt dynamic LZW, revised variant with persistent table.
        DynamicLzw2 = 3,

        /// 12-bit Unix compress (declared by the format, never decompressed
        /// here).
        Unix12 = 4,

        /// 16-bit Unix compress (declared by the format, never decompressed
        /// here).
        Unix16 = 5,
    }
}

#[derive(Debug, Clone)]
/// One entry of a record's thread table.
pub struct ThreadEntry {
    /// Classification of the byte stream.
    pub class: ThreadClass,

    /// Compression format of the payload.
    pub format: ThreadFormat,

    /// Subtype within the classification, see the `KIND_*` constants.
    pub kind: u16,

    /// CRC16 of the thread data in version 3 records; not validated here.
    pub crc: u16,

    /// Size of the stream after decompression.
    pub uncompressed_size: u32,

    /// Size of the payload as stored in the archive.
    pub compressed_size: u32,
}

impl ThreadEntry {
    /// Byte size of a thread table entry.
    pub const SIZE: u64 = 16;

    /// Data-class kind for the file's data fork.
    pub const KIND_DATA_FORK: u16 = 0;
    /// Data-class kind for a whole-volume disk image.
    pub const KIND_DISK_IMAGE: u16 = 1;
    /// Data-class kind for the file's resource fork.
    pub const KIND_RESOURCE_FORK: u16 = 2;
    /// Filename-class kind for the record's name.
    pub const KIND_FILE_NAME: u16 = 0;

    pub fn read<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let class = read_u16(reader)?.into();
        let format = read_u16(reader)?.into();
        let kind = read_u16(reader)?;
        let crc = read_u16(reader)?;
        let uncompressed_size = read_u32(reader)?;
        let compressed_size = read_u32(reader)?;

        Ok(ThreadEntry {
            class,
            format,
            kind,
            crc,
            uncompressed_size,
            compressed_size,
        })
    }

    pub fn is_data_fork(&self) -> bool {
        self.class == ThreadClass::Data && self.kind == Self::KIND_DATA_FORK
    }

    pub fn is_disk_image(&self) -> bool {
        self.class == ThreadClass::Data && self.kind == Self::KIND_DISK_IMAGE
    }

    pub fn is_resource_fork(&self) -> bool {
        self.class == ThreadClass::Data && self.kind == Self::KIND_RESOURCE_FORK
    }

    pub fn is_file_name(&self) -> bool {
        self.class == ThreadClass::FileName && self.kind == Self::KIND_FILE_NAME
    }
}
