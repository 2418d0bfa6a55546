//! Helpers that assemble NuFX archives in memory, so the tests carry no
//! binary fixtures.

use crc::{Crc, CRC_16_XMODEM};

/// Run-length escape byte ShrinkIt uses by default.
pub const ESCAPE: u8 = 0xdb;

pub const CLASS_DATA: u16 = 2;
pub const CLASS_FILE_NAME: u16 = 3;

pub const KIND_DATA_FORK: u16 = 0;
pub const KIND_DISK_IMAGE: u16 = 1;
pub const KIND_RESOURCE_FORK: u16 = 2;

pub const FORMAT_UNCOMPRESSED: u16 = 0;
pub const FORMAT_HUFFMAN_SQUEEZE: u16 = 1;
pub const FORMAT_LZW1: u16 = 2;
pub const FORMAT_LZW2: u16 = 3;

pub struct ThreadSpec {
    pub class: u16,
    pub format: u16,
    pub kind: u16,
    pub crc: u16,
    pub uncompressed_size: u32,
    pub payload: Vec<u8>,
}

impl ThreadSpec {
    pub fn uncompressed(class: u16, kind: u16, data: &[u8]) -> Self {
        Self {
            class,
            format: FORMAT_UNCOMPRESSED,
            kind,
            crc: 0,
            uncompressed_size: data.len() as u32,
            payload: data.to_vec(),
        }
    }

    /// An uncompressed thread whose stored bytes fall short of the declared
    /// size; the reader must supply the difference as zeros.
    pub fn uncompressed_padded(class: u16, kind: u16, data: &[u8], uncompressed_size: u32) -> Self {
        Self {
            uncompressed_size,
            ..Self::uncompressed(class, kind, data)
        }
    }

    pub fn file_name(name: &str) -> Self {
        Self::uncompressed(CLASS_FILE_NAME, 0, name.as_bytes())
    }
}

pub struct RecordSpec {
    pub file_name: String,
    pub version: u16,
    pub option_list: Vec<u8>,
    pub created: [u8; 8],
    pub threads: Vec<ThreadSpec>,
}

impl RecordSpec {
    pub fn new(threads: Vec<ThreadSpec>) -> Self {
        Self {
            file_name: String::new(),
            version: 0,
            option_list: Vec::new(),
            created: [0; 8],
            threads,
        }
    }

    pub fn named(name: &str, threads: Vec<ThreadSpec>) -> Self {
        Self {
            file_name: name.to_owned(),
            ..Self::new(threads)
        }
    }
}

/// Serialize a whole archive: master header plus records.
pub fn build_archive(records: &[RecordSpec]) -> Vec<u8> {
    let mut out = Vec::new();

    out.extend(b"N\xf5F\xe9l\xe5");
    out.extend(0u16.to_le_bytes()); // master CRC, not validated on read
    out.extend((records.len() as u32).to_le_bytes());
    out.extend([0; 8]); // created: unknown
    out.extend([0; 8]); // modified: unknown
    out.extend(2u16.to_le_bytes()); // master version
    out.extend([0; 8]); // reserved
    out.extend([0; 4]); // total size, patched below
    out.extend([0; 6]); // reserved

    for record in records {
        append_record(&mut out, record);
    }

    // The one big-endian integer in the format.
    let total_size = (out.len() as u32).to_be_bytes();
    out[38..42].copy_from_slice(&total_size);

    out
}

fn append_record(out: &mut Vec<u8>, record: &RecordSpec) {
    let option_section = if record.version >= 1 {
        2 + record.option_list.len()
    } else {
        0
    };
    let attrib_count = (56 + option_section + 2) as u16;

    out.extend(b"N\xf5F\xd8");
    out.extend(0u16.to_le_bytes()); // header CRC, not validated on read
    out.extend(attrib_count.to_le_bytes());
    out.extend(record.version.to_le_bytes());
    out.extend((record.threads.len() as u32).to_le_bytes());
    out.extend(1u16.to_le_bytes()); // ProDOS
    out.extend(0x002fu16.to_le_bytes()); // separator '/'
    out.extend(0x00e3u32.to_le_bytes()); // access: unlocked
    out.extend(0x04u32.to_le_bytes()); // file type: TXT
    out.extend(0u32.to_le_bytes()); // aux type
    out.extend(1u16.to_le_bytes()); // storage type: seedling
    out.extend(record.created);
    out.extend([0; 8]); // modified: unknown
    out.extend([0; 8]); // archived: unknown

    if record.version >= 1 {
        out.extend((record.option_list.len() as u16).to_le_bytes());
        out.extend(&record.option_list);
    }

    out.extend((record.file_name.len() as u16).to_le_bytes());
    out.extend(record.file_name.as_bytes());

    for thread in &record.threads {
        out.extend(thread.class.to_le_bytes());
        out.extend(thread.format.to_le_bytes());
        out.extend(thread.kind.to_le_bytes());
        out.extend(thread.crc.to_le_bytes());
        out.extend(thread.uncompressed_size.to_le_bytes());
        out.extend((thread.payload.len() as u32).to_le_bytes());
    }

    for thread in &record.threads {
        out.extend(&thread.payload);
    }
}

/// Wrap archive bytes in a Binary II envelope.
pub fn wrap_in_binary2(file_name: &str, archive: &[u8]) -> Vec<u8> {
    let mut envelope = [0u8; 128];

    envelope[0] = 0x0a;
    envelope[1] = b'G';
    envelope[2] = b'L';
    envelope[3] = 0xe3; // access
    envelope[4] = 0xe0; // file type: packed archive
    envelope[5..7].copy_from_slice(&0x8002u16.to_le_bytes()); // aux type: ShrinkIt
    envelope[7] = 0x01; // storage type
    envelope[0x12] = 0x02; // envelope id

    let eof = archive.len() as u32;
    envelope[20..23].copy_from_slice(&eof.to_le_bytes()[..3]);
    envelope[116] = eof.to_le_bytes()[3];

    envelope[23] = file_name.len() as u8;
    envelope[24..24 + file_name.len()].copy_from_slice(file_name.as_bytes());

    envelope[121] = 0x01; // OS type: ProDOS
    envelope[126] = 0x01; // Binary II version

    let mut out = envelope.to_vec();
    out.extend(archive);
    out
}

pub fn crc16(data: &[u8]) -> u16 {
    Crc::<u16>::new(&CRC_16_XMODEM).checksum(data)
}

/// Pack 9-bit literal codes LSB-first, the way ShrinkIt's compressor lays
/// codes out. Valid while the string table stays below entry 0x1fe, which
/// holds for every stream short enough to be built by hand.
pub fn pack_literal_codes(stream: &[u8]) -> Vec<u8> {
    assert!(stream.len() <= 0xfd, "stream would outgrow 9-bit codes");

    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut bits = 0u8;

    for &byte in stream {
        acc |= (byte as u32) << bits;
        bits += 9;
        while bits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            bits -= 8;
        }
    }

    if bits > 0 {
        out.push(acc as u8);
    }

    out
}

/// Payload of an LZW/1 thread holding one run-length-coded block.
/// `expanded` is the full 4 KiB the stream expands to, which is what the
/// stream CRC covers.
pub fn lzw1_rle_payload(rle_stream: &[u8], expanded: &[u8]) -> Vec<u8> {
    assert_eq!(expanded.len(), 4096);

    let mut payload = crc16(expanded).to_le_bytes().to_vec();
    payload.extend([0x00, ESCAPE]); // volume, escape
    payload.extend((rle_stream.len() as u16).to_le_bytes());
    payload.push(0x00); // no LZW
    payload.extend(rle_stream);
    payload
}

/// Payload of an LZW/2 thread holding one LZW+RLE block whose codes encode
/// `rle_stream` as bare literals. `length_skew` offsets the declared block
/// length to fabricate corrupt streams.
pub fn lzw2_literal_payload(rle_stream: &[u8], length_skew: u16) -> Vec<u8> {
    let packed = pack_literal_codes(rle_stream);

    let mut payload = vec![0x00, ESCAPE]; // volume, escape
    payload.extend((0x8000 | rle_stream.len() as u16).to_le_bytes());
    payload.extend((packed.len() as u16 + 4 + length_skew).to_le_bytes());
    payload.extend(&packed);
    payload
}
