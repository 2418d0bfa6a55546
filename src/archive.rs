use std::io;

use tracing::debug;

use crate::{
    binary2::Binary2Header,
    error::NufxResult,
    nufx::{MasterHeader, Record, RecordIterator, ThreadClass, ThreadEntry},
    unpack,
};

#[derive(Debug)]
/// A NuFX archive opened for reading.
///
/// Construction parses every header eagerly and keeps the record index in
/// memory; thread payloads are decompressed lazily, per request. The archive
/// owns its byte source — open an in-memory archive by wrapping the bytes in
/// an [`io::Cursor`].
///
/// Extraction seeks against the underlying source, so it takes `&mut self`;
/// a failed extraction leaves the archive usable for its other records.
pub struct Archive<R: io::Read + io::Seek> {
    reader: R,
    binary2: Option<Binary2Header>,
    master: MasterHeader,
    records: Vec<Record>,
}

impl<R: io::Read + io::Seek> Archive<R> {
    /// Open the archive found at the reader's current position, sniffing and
    /// skipping a Binary II envelope when one is present.
    pub fn open(mut reader: R) -> NufxResult<Self> {
        let binary2 = Binary2Header::detect(&mut reader)?;
        let master = MasterHeader::read(&mut reader)?;

        let mut records = Vec::new();
        for record in RecordIterator::new(&mut reader, master.total_records)? {
            records.push(record?);
        }

        debug!(
            records = records.len(),
            wrapped = binary2.is_some(),
            "opened NuFX archive"
        );

        Ok(Archive {
            reader,
            binary2,
            master,
            records,
        })
    }

    /// The Binary II envelope the archive was wrapped in, if any.
    pub fn binary2_header(&self) -> Option<&Binary2Header> {
        self.binary2.as_ref()
    }

    pub fn master_header(&self) -> &MasterHeader {
        &self.master
    }

    /// Parsed records, in archive order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Consume the archive and hand back the underlying byte source.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Filename of the record at `index`.
    ///
    /// A filename thread, when present, overrides the header's filename
    /// field.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; see [`Archive::record_count`].
    pub fn file_name(&mut self, index: usize) -> NufxResult<Option<String>> {
        let name = self.read_thread(index, ThreadClass::FileName, ThreadEntry::KIND_FILE_NAME)?;

        if let Some(bytes) = name {
            return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
        }

        Ok(self.records[index].file_name.clone())
    }

    /// Decompressed data fork of the record at `index`, or `None` when the
    /// record has no data fork.
    pub fn read_data_fork(&mut self, index: usize) -> NufxResult<Option<Vec<u8>>> {
        self.read_thread(index, ThreadClass::Data, ThreadEntry::KIND_DATA_FORK)
    }

    /// Decompressed resource fork of the record at `index`.
    pub fn read_resource_fork(&mut self, index: usize) -> NufxResult<Option<Vec<u8>>> {
        self.read_thread(index, ThreadClass::Data, ThreadEntry::KIND_RESOURCE_FORK)
    }

    /// Decompressed disk image stored in the record at `index`.
    pub fn read_disk_image(&mut self, index: usize) -> NufxResult<Option<Vec<u8>>> {
        self.read_thread(index, ThreadClass::Data, ThreadEntry::KIND_DISK_IMAGE)
    }

    /// Stream the record's data fork into `sink`; returns whether the record
    /// had one.
    pub fn extract_data_fork_to<W: io::Write>(
        &mut self,
        index: usize,
        sink: &mut W,
    ) -> NufxResult<bool> {
        self.extract_thread_to(index, ThreadClass::Data, ThreadEntry::KIND_DATA_FORK, sink)
    }

    /// Stream the record's resource fork into `sink`; returns whether the
    /// record had one.
    pub fn extract_resource_fork_to<W: io::Write>(
        &mut self,
        index: usize,
        sink: &mut W,
    ) -> NufxResult<bool> {
        self.extract_thread_to(
            index,
            ThreadClass::Data,
            ThreadEntry::KIND_RESOURCE_FORK,
            sink,
        )
    }

    /// Stream the record's disk image into `sink`; returns whether the
    /// record had one.
    pub fn extract_disk_image_to<W: io::Write>(
        &mut self,
        index: usize,
        sink: &mut W,
    ) -> NufxResult<bool> {
        self.extract_thread_to(index, ThreadClass::Data, ThreadEntry::KIND_DISK_IMAGE, sink)
    }

    fn read_thread(
        &mut self,
        index: usize,
        class: ThreadClass,
        kind: u16,
    ) -> NufxResult<Option<Vec<u8>>> {
        let mut output = Vec::new();

        if self.extract_thread_to(index, class, kind, &mut output)? {
            Ok(Some(output))
        } else {
            Ok(None)
        }
    }

    fn extract_thread_to<W: io::Write>(
        &mut self,
        index: usize,
        class: ThreadClass,
        kind: u16,
        sink: &mut W,
    ) -> NufxResult<bool> {
        let record = &self.records[index];

        let Some((thread, offset)) = record.find_thread(class, kind) else {
            return Ok(false);
        };

        debug!(
            index,
            ?class,
            kind,
            format = ?thread.format,
            size = thread.uncompressed_size,
            "extracting thread"
        );

        self.reader
            .seek(io::SeekFrom::Start(record.data_offset + offset))?;
        unpack::unpack_thread(&mut self.reader, thread, sink)?;

        Ok(true)
    }
}
