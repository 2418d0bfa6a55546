use std::io;

use aho_corasick::AhoCorasick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// File signatures or "magic numbers" that can open a ShrinkIt file.
pub enum Signature {
    /// 128-byte Binary II transport envelope, usually wrapping a NuFX
    /// archive (`.bxy`).
    Binary2,

    /// Bare NuFX archive master header (`.shk`, `.sdk`).
    NuFile,
}

impl Signature {
    /// First three bytes of a Binary II envelope.
    ///
    /// A real envelope also carries the id byte `0x02` at offset 0x12;
    /// byte-level detection checks both.
    pub const BINARY2: &[u8; 3] = b"\x0aGL";

    /// "NuFile" in alternating low/high ASCII.
    pub const NUFILE: &[u8; 6] = b"N\xf5F\xe9l\xe5";

    /// Byte size of the signature.
    pub const fn size(&self) -> u64 {
        self.signature().len() as u64
    }

    /// The byte signature corresponding to the format.
    pub const fn signature(&self) -> &'static [u8] {
        match self {
            Self::Binary2 => Self::BINARY2,
            Self::NuFile => Self::NUFILE,
        }
    }

    /// Parse the signature from the start of a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(Self::BINARY2) {
            Some(Self::Binary2)
        } else if bytes.starts_with(Self::NUFILE) {
            Some(Self::NuFile)
        } else {
            None
        }
    }

    /// The maximum amount of leading junk tolerated before the archive
    /// signature, including the signature size.
    ///
    /// Wrappers seen in the wild (MacBinary headers, self-extracting stubs)
    /// are well below this.
    pub const MAX_LEADING_JUNK: u64 = 0x10000;

    /// Search for an archive signature in the stream up to
    /// [`Signature::MAX_LEADING_JUNK`] and return the format and the offset
    /// of the signature in the stream.
    ///
    /// The archive itself starts at `offset` — the signature bytes are part
    /// of the structure they announce, so callers seek to `offset` and hand
    /// the stream to [`crate::Archive::open`].
    ///
    /// Uses [`aho_corasick`](https://docs.rs/aho-corasick/latest/aho_corasick/)
    /// under the hood to search for the signatures efficiently.
    pub fn search_stream<R: io::Read>(reader: R) -> Result<Option<(Self, u64)>, io::Error> {
        let patterns = [&Self::BINARY2[..], &Self::NUFILE[..]];

        let Ok(ac) = AhoCorasick::new(patterns) else {
            unreachable!("Aho-Corasick pattern not constructed correctly")
        };

        // Avoid reading the whole file in case we don't find the signature
        // within MAX_LEADING_JUNK.
        let bounded_reader = &mut reader.take(Self::MAX_LEADING_JUNK);

        match ac.stream_find_iter(bounded_reader).next() {
            None => Ok(None),
            Some(Err(e)) => Err(e),
            Some(Ok(m)) => {
                let start = m.start();

                let format = match m.pattern().as_i32() {
                    0 => Self::Binary2,
                    1 => Self::NuFile,
                    i => unreachable!("invalid Aho-Corasick pattern ID: {i}"),
                };

                Ok(Some((format, start as u64)))
            }
        }
    }
}
