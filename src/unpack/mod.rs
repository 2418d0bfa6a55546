//! Thread payload decompression.
//!
//! ShrinkIt compresses a thread as a sequence of 4 KiB logical blocks. Each
//! block is optionally run-length encoded and the result optionally LZW
//! compressed, per block. LZW/1 threads additionally carry a CRC over the
//! fully padded block stream.

mod codes;
mod lzw;
mod rle;

use std::io;

use crc::{Crc, CRC_16_XMODEM};

use crate::{
    error::{Error, NufxResult},
    nufx::{ThreadEntry, ThreadFormat},
    read::*,
};

use self::codes::CodeReader;

/// Size of one logical decompression block.
pub(crate) const BLOCK_SIZE: usize = 4096;

/// Decompress one thread's payload into `sink`.
///
/// The reader must be positioned at the start of the thread's payload. On
/// success exactly `uncompressed_size` bytes have been written, at block
/// granularity except possibly the last write.
pub(crate) fn unpack_thread<R, W>(
    reader: &mut R,
    thread: &ThreadEntry,
    sink: &mut W,
) -> NufxResult<()>
where
    R: io::Read,
    W: io::Write,
{
    match thread.format {
        ThreadFormat::Uncompressed => unpack_stored(reader, thread, sink),
        ThreadFormat::DynamicLzw1 => unpack_lzw(reader, thread, sink, false),
        ThreadFormat::DynamicLzw2 => unpack_lzw(reader, thread, sink, true),
        format => Err(Error::UnsupportedFormat(format)),
    }
}

/// Copy a stored thread through, zero-padding when the uncompressed size
/// exceeds the bytes present.
fn unpack_stored<R, W>(reader: &mut R, thread: &ThreadEntry, sink: &mut W) -> NufxResult<()>
where
    R: io::Read,
    W: io::Write,
{
    let stored = thread.uncompressed_size.min(thread.compressed_size) as usize;
    let mut buf = [0; BLOCK_SIZE];

    let mut remaining = stored;
    while remaining > 0 {
        let chunk = remaining.min(BLOCK_SIZE);
        reader.read_exact(&mut buf[..chunk])?;
        sink.write_all(&buf[..chunk])?;
        remaining -= chunk;
    }

    let mut padding = thread.uncompressed_size as usize - stored;
    buf.fill(0);
    while padding > 0 {
        let chunk = padding.min(BLOCK_SIZE);
        sink.write_all(&buf[..chunk])?;
        padding -= chunk;
    }

    Ok(())
}

/// Block loop shared by the two dynamic LZW variants; `two` selects the
/// LZW/2 header layout, persistent table, and clear-code handling.
fn unpack_lzw<R, W>(reader: &mut R, thread: &ThreadEntry, sink: &mut W, two: bool) -> NufxResult<()>
where
    R: io::Read,
    W: io::Write,
{
    // LZW/1 prefixes the stream with the CRC of the padded output blocks.
    let stream_crc = if two { None } else { Some(read_u16(reader)?) };
    let _volume = read_u8(reader)?;
    let escape = read_u8(reader)?;

    let crc16 = Crc::<u16>::new(&CRC_16_XMODEM);
    let mut digest = crc16.digest();

    let mut decoder = lzw::Decoder::new();
    let mut scratch = vec![0; BLOCK_SIZE];
    let mut block = vec![0; BLOCK_SIZE];
    let mut remaining = thread.uncompressed_size as usize;

    while remaining > 0 {
        let (rle_len, lzw_used, lzw_length) = if two {
            let word = read_u16(reader)?;
            let lzw_used = word & 0x8000 != 0;
            let lzw_length = if lzw_used {
                // Total block length, counting these four header bytes.
                Some(read_u16(reader)?)
            } else {
                None
            };
            (word & 0x1fff, lzw_used, lzw_length)
        } else {
            let rle_len = read_u16(reader)?;
            let flag = read_u8(reader)?;
            if flag > 1 {
                return Err(Error::BadLzwFlag(flag));
            }
            (rle_len, flag == 1, None)
        };

        if rle_len as usize > BLOCK_SIZE {
            return Err(Error::BadRleLength(rle_len));
        }
        let rle_len = rle_len as usize;
        let rle_used = rle_len != BLOCK_SIZE;
        let write_len = remaining.min(BLOCK_SIZE);

        block.fill(0);

        if lzw_used {
            if !two {
                decoder.reset();
            }

            let mut codes = CodeReader::new(reader);
            decoder.decode_block(&mut codes, &mut scratch[..rle_len], two)?;

            if let Some(declared) = lzw_length {
                let consumed = codes.consumed() + 4;
                if consumed != declared {
                    return Err(Error::LengthMismatch { declared, consumed });
                }
            }

            if rle_used {
                rle::expand(&scratch[..rle_len], escape, &mut block)?;
            } else {
                block.copy_from_slice(&scratch);
            }
        } else {
            // A block that skipped LZW leaves the LZW/2 table forgotten.
            if two {
                decoder.reset();
            }

            if rle_used {
                reader.read_exact(&mut scratch[..rle_len])?;
                rle::expand(&scratch[..rle_len], escape, &mut block)?;
            } else {
                reader.read_exact(&mut block)?;
            }
        }

        if stream_crc.is_some() {
            digest.update(&block);
        }

        sink.write_all(&block[..write_len])?;
        remaining -= write_len;
    }

    if let Some(expected) = stream_crc {
        let actual = digest.finalize();
        if actual != expected {
            return Err(Error::CrcMismatch { expected, actual });
        }
    }

    Ok(())
}
