use std::io;

use crate::{
    error::{Error, NufxResult},
    read::*,
};

use super::{
    helpers::read_prodos_datetime,
    thread::{ThreadClass, ThreadEntry},
};

int_enum! {
    /// Filesystem the file lived on before it was archived.
    pub enum FileSystemId : u16 {
        /// ProDOS or SOS.
        ProDos = 1,

        /// DOS 3.3
        Dos33 = 2,

        /// DOS 3.2
        Dos32 = 3,

        /// Apple II Pascal
        Pascal = 4,

        /// Macintosh HFS
        MacHfs = 5,

        /// Macintosh MFS
        MacMfs = 6,

        /// Lisa filesystem
        LisaFs = 7,

        /// Apple CP/M
        Cpm = 8,

        /// MS-DOS (FAT)
        MsDos = 10,

        /// High Sierra
        HighSierra = 11,

        /// ISO 9660
        Iso9660 = 12,

        /// AppleShare
        AppleShare = 13,
    }
}

flags! {
    /// GS/OS-style access permissions of the archived file.
    pub struct AccessFlags(u32) {
        /// File may be read.
        pub may_read = 0x01;

        /// File may be written to.
        pub may_write = 0x02;

        /// File is hidden from directory listings.
        pub invisible = 0x04;

        /// File changed since the last backup.
        pub backup_needed = 0x20;

        /// File may be renamed.
        pub may_rename = 0x40;

        /// File may be deleted.
        pub may_destroy = 0x80;
    }
}

#[derive(Debug, Clone)]
/// One archived file or disk image: header attributes, thread table, and the
/// location of the payload area.
pub struct Record {
    /// Offset of this record from the start of the stream.
    pub offset: u64,

    /// CRC16 of the record header; exposed, not validated.
    pub header_crc: u16,

    /// Length of the attribute section, from the record signature through
    /// the filename length word.
    pub attrib_count: u16,

    /// Record format version (0 to 3).
    pub version: u16,

    /// Filesystem the file was archived from.
    pub file_sys_id: FileSystemId,

    /// Filesystem info word; the low byte is the pathname separator.
    pub file_sys_info: u16,

    /// Access permissions.
    pub access: AccessFlags,

    /// File type.
    pub file_type: u32,

    /// Auxiliary type.
    pub aux_type: u32,

    /// Storage type for files, or the block size for disk image records.
    pub storage_type: u16,

    /// When the file was created.
    pub created: Result<Option<time::PrimitiveDateTime>, [u8; 8]>,

    /// When the file was last modified.
    pub modified: Result<Option<time::PrimitiveDateTime>, [u8; 8]>,

    /// When the file was added to or updated in the archive.
    pub archived: Result<Option<time::PrimitiveDateTime>, [u8; 8]>,

    /// GS/OS option list bytes, present in version 1+ records.
    pub option_list: Option<Vec<u8>>,

    /// Attribute bytes between the known fields and the filename length
    /// word, written by newer versions of the format.
    pub extra_attributes: Vec<u8>,

    /// Filename from the header field. Usually empty in later archives,
    /// which carry the name in a filename thread instead.
    pub file_name: Option<String>,

    /// Thread table, in storage order.
    pub threads: Vec<ThreadEntry>,

    /// Offset of the payload area from the start of the stream.
    pub data_offset: u64,

    /// Total payload length: the sum of the threads' compressed sizes.
    pub data_size: u64,
}

impl Record {
    /// "NuFX" in alternating low/high ASCII.
    pub const SIGNATURE: &[u8; 4] = b"N\xf5F\xd8";

    /// Byte size of the fixed header block.
    pub const HEADER_SIZE: u16 = 56;

    pub fn read<R: io::Read + io::Seek>(reader: &mut R) -> NufxResult<Self> {
        let offset = reader.stream_position()?;

        let signature: [u8; 4] = read_const_bytes(reader)?;
        if signature != *Self::SIGNATURE {
            return Err(Error::BadRecordSignature);
        }

        let header_crc = read_u16(reader)?;
        let attrib_count = read_u16(reader)?;
        if attrib_count < Self::HEADER_SIZE {
            return Err(Error::BadAttribCount(attrib_count));
        }

        let version = read_u16(reader)?;
        let total_threads = read_u32(reader)?;
        let file_sys_id = read_u16(reader)?.into();
        let file_sys_info = read_u16(reader)?;
        let access = AccessFlags::new(read_u32(reader)?);
        let file_type = read_u32(reader)?;
        let aux_type = read_u32(reader)?;
        let storage_type = read_u16(reader)?;
        let created = read_prodos_datetime(reader)?;
        let modified = read_prodos_datetime(reader)?;
        let archived = read_prodos_datetime(reader)?;

        // attrib_count covers everything up to and including the filename
        // length word; whatever the known fields don't account for is option
        // list and extra attribute bytes.
        let mut consumed = Self::HEADER_SIZE as u32;

        let option_list = if version >= 1 {
            let size = read_u16(reader)?;
            consumed += 2 + size as u32;
            Some(read_vec(reader, size as usize)?)
        } else {
            None
        };

        let attrib_end = attrib_count as u32 - 2;
        if consumed > attrib_end {
            return Err(Error::BadAttribCount(attrib_count));
        }
        let extra_attributes = read_vec(reader, (attrib_end - consumed) as usize)?;

        let name_size = read_u16(reader)? as usize;
        let file_name = if name_size == 0 {
            None
        } else {
            let name = read_vec(reader, name_size)?;
            Some(String::from_utf8_lossy(&name).into_owned())
        };

        let mut threads = Vec::new();
        let mut data_size = 0u64;
        for _ in 0..total_threads {
            let thread = ThreadEntry::read(reader)?;
            data_size += thread.compressed_size as u64;
            threads.push(thread);
        }

        let data_offset = reader.stream_position()?;

        Ok(Record {
            offset,
            header_crc,
            attrib_count,
            version,
            file_sys_id,
            file_sys_info,
            access,
            file_type,
            aux_type,
            storage_type,
            created,
            modified,
            archived,
            option_list,
            extra_attributes,
            file_name,
            threads,
            data_offset,
            data_size,
        })
    }

    /// Pathname separator character, from the low byte of the filesystem
    /// info word.
    pub fn separator(&self) -> u8 {
        (self.file_sys_info & 0xff) as u8
    }

    /// Find the first thread matching (classification, kind) and the offset
    /// of its payload relative to [`Record::data_offset`].
    ///
    /// Thread payloads are stored back-to-back in table order, so the offset
    /// is the sum of the compressed sizes of the preceding threads.
    pub fn find_thread(&self, class: ThreadClass, kind: u16) -> Option<(&ThreadEntry, u64)> {
        let mut offset = 0;

        for thread in &self.threads {
            if thread.class == class && thread.kind == kind {
                return Some((thread, offset));
            }
            offset += thread.compressed_size as u64;
        }

        None
    }

    /// Interpret the option list as a GS/OS option list, when present.
    pub fn gsos_option_list(&self) -> Option<NufxResult<GsosOptionList>> {
        self.option_list.as_deref().map(GsosOptionList::from_bytes)
    }
}

#[derive(Debug, Clone)]
/// GS/OS option list stored with records archived from foreign filesystems,
/// carrying FST-specific attributes such as HFS Finder info.
pub struct GsosOptionList {
    /// Declared buffer size, including the size word itself.
    pub buffer_size: u16,

    /// Filesystem the option list came from.
    pub file_sys_id: u16,

    /// FST-specific payload.
    pub data: Vec<u8>,
}

impl GsosOptionList {
    /// Smallest buffer a GS/OS option list can legally declare.
    pub const MIN_BUFFER_SIZE: u16 = 0x2e;

    const FINDER_INFO_SIZE: usize = 32;

    pub fn from_bytes(bytes: &[u8]) -> NufxResult<Self> {
        if bytes.len() < 4 {
            return Err(Error::BadOptionList(bytes.len() as u16));
        }

        let buffer_size = u16::from_le_bytes([bytes[0], bytes[1]]);
        if buffer_size < Self::MIN_BUFFER_SIZE || buffer_size as usize > bytes.len() {
            return Err(Error::BadOptionList(buffer_size));
        }

        let file_sys_id = u16::from_le_bytes([bytes[2], bytes[3]]);
        let data = bytes[4..buffer_size as usize].to_vec();

        Ok(GsosOptionList {
            buffer_size,
            file_sys_id,
            data,
        })
    }

    /// The 32-byte Finder info region (FInfo + FXInfo) for HFS files.
    pub fn finder_info(&self) -> Option<&[u8]> {
        self.data.get(..Self::FINDER_INFO_SIZE)
    }
}
