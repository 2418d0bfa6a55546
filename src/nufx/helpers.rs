use std::io;

use crate::{read::read_const_bytes, time_conv};

/// Read an 8-byte ProDOS timestamp field.
///
/// Out-of-range timestamps occur in archives written by buggy tools; they
/// are preserved as the raw bytes rather than failing the whole header.
/// `Ok(None)` is the all-zero "no date recorded" sentinel.
pub fn read_prodos_datetime<R: io::Read>(
    reader: &mut R,
) -> io::Result<Result<Option<time::PrimitiveDateTime>, [u8; 8]>> {
    let raw = read_const_bytes(reader)?;
    Ok(time_conv::parse_prodos_datetime(&raw).map_err(|_| raw))
}
