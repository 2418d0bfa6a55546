use std::io;

use crate::error::{Error, NufxResult};

use super::{codes::CodeReader, BLOCK_SIZE};

/// Explicit table reset, emitted by LZW/2 streams only.
const CLEAR_CODE: u16 = 0x0100;

/// First assignable string code.
const FIRST_FREE: u16 = 0x0101;

/// String table capacity, covering codes 0x0101 through 0x0fff.
const TABLE_SIZE: usize = BLOCK_SIZE - 256;

#[derive(Debug)]
/// Dynamic LZW string-table decoder shared by both ShrinkIt variants.
///
/// LZW/1 resets the table at every block boundary. LZW/2 keeps it alive
/// across blocks, resets on explicit clear codes, and resets whenever a
/// block skips LZW entirely.
///
/// Strings are held as a trie: entry `i` pairs a terminal byte with the code
/// of its prefix string, and reconstruction walks parents onto a stack until
/// it reaches a literal.
pub struct Decoder {
    trie_ch: Vec<u8>,
    trie_prefix: Vec<u16>,
    stack: Vec<u8>,
    entry: u16,
    old_code: u16,
    final_byte: u8,
    reset_fix: bool,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            trie_ch: vec![0; TABLE_SIZE],
            trie_prefix: vec![0; TABLE_SIZE],
            stack: Vec::with_capacity(TABLE_SIZE),
            entry: FIRST_FREE,
            old_code: 0,
            final_byte: 0,
            reset_fix: false,
        }
    }

    /// Forget all assigned strings. Called before every LZW/1 block and for
    /// LZW/2 blocks that skipped LZW.
    pub fn reset(&mut self) {
        self.entry = FIRST_FREE;
        self.reset_fix = false;
    }

    /// Decode codes until `output` is full.
    ///
    /// `clear_codes` enables the explicit 0x0100 reset handling of LZW/2.
    pub fn decode_block<R: io::Read>(
        &mut self,
        codes: &mut CodeReader<'_, R>,
        output: &mut [u8],
        clear_codes: bool,
    ) -> NufxResult<()> {
        if output.is_empty() {
            return Ok(());
        }

        let mut pos = 0;

        // A fresh table means the stream restarts with a bare literal,
        // unless the previous block already consumed it (reset-fix).
        if self.entry == FIRST_FREE && !self.reset_fix {
            pos = self.restart_with_literal(codes, output, pos)?;
        }
        self.reset_fix = false;

        while pos < output.len() {
            let code = codes.read_code(self.entry)?;

            if clear_codes && code == CLEAR_CODE {
                self.entry = FIRST_FREE;
                pos = self.restart_with_literal(codes, output, pos)?;
                if pos == output.len() {
                    // The clear was the penultimate code of this block; the
                    // next block must not treat the table as fresh again.
                    self.reset_fix = true;
                }
                continue;
            }

            if code > self.entry {
                return Err(Error::BadCode {
                    code,
                    entry: self.entry,
                });
            }

            let mut ptr = code;
            if code == self.entry {
                // KwKwK: the code refers to the string being defined.
                self.stack.push(self.final_byte);
                ptr = self.old_code;
            }

            while ptr > 0xff {
                let i = (ptr - 256) as usize;
                self.stack.push(self.trie_ch[i]);
                ptr = self.trie_prefix[i];
            }

            self.final_byte = ptr as u8;
            output[pos] = ptr as u8;
            pos += 1;

            while let Some(byte) = self.stack.pop() {
                if pos == output.len() {
                    self.stack.clear();
                    return Err(Error::BlockOverrun);
                }
                output[pos] = byte;
                pos += 1;
            }

            let i = (self.entry - 256) as usize;
            if i >= TABLE_SIZE {
                return Err(Error::TableOverflow);
            }
            self.trie_ch[i] = self.final_byte;
            self.trie_prefix[i] = self.old_code;
            self.entry += 1;
            self.old_code = code;
        }

        Ok(())
    }

    /// Consume the literal that (re)starts a stream after a table reset.
    /// The literal is emitted verbatim and assigns no table entry.
    fn restart_with_literal<R: io::Read>(
        &mut self,
        codes: &mut CodeReader<'_, R>,
        output: &mut [u8],
        pos: usize,
    ) -> NufxResult<usize> {
        let code = codes.read_code(self.entry)?;
        if code > 0xff {
            return Err(Error::InvalidInitialSymbol(code));
        }

        output[pos] = code as u8;
        self.old_code = code;
        self.final_byte = code as u8;

        Ok(pos + 1)
    }
}
