use std::io;

use crate::error::{Error, NufxResult};

use super::Record;

#[derive(Debug)]
/// Iterator over the records of an archive, driven by the master header's
/// record count.
///
/// Each step parses one record's headers and seeks past its payload area;
/// payloads themselves are never read here.
pub struct RecordIterator<R: io::Read + io::Seek> {
    reader: R,
    stream_size: u64,
    next_record_position: u64,
    remaining: u32,
}

impl<R: io::Read + io::Seek> RecordIterator<R> {
    /// The reader must be positioned at the first record, right after the
    /// master header.
    pub fn new(mut reader: R, total_records: u32) -> io::Result<Self> {
        let next_record_position = reader.stream_position()?;
        let stream_size = reader.seek(io::SeekFrom::End(0))?;

        Ok(Self {
            reader,
            stream_size,
            next_record_position,
            remaining: total_records,
        })
    }

    fn read_record(&mut self) -> NufxResult<Record> {
        self.reader
            .seek(io::SeekFrom::Start(self.next_record_position))?;

        let record = Record::read(&mut self.reader)?;

        self.next_record_position = record.data_offset + record.data_size;

        if self.next_record_position > self.stream_size {
            return Err(Error::CorruptHeader);
        }

        Ok(record)
    }
}

impl<R: io::Read + io::Seek> Iterator for RecordIterator<R> {
    type Item = NufxResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;

        Some(self.read_record())
    }
}
