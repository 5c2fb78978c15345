use std::io::Read;

use decoder::{Decodable, Error, Reader};

use crate::{Decoder, Instruction};

/// An instruction together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Offset of the first byte from the start of the stream.
    pub offset: usize,
    pub instruction: Instruction,
    /// Number of bytes the instruction spans.
    pub width: usize,
}

/// Decodes instructions back to back until the source runs dry.
///
/// A failed decode stops the iteration, since the reader is left somewhere inside the bad
/// instruction. [`Stream::resync`] skips the first byte of that instruction and resumes.
pub struct Stream<S> {
    decoder: Decoder,
    reader: Reader<S>,
    poisoned: bool,
}

impl<S: Read> Stream<S> {
    pub fn new(decoder: Decoder, source: S) -> Self {
        Self {
            decoder,
            reader: Reader::new(source),
            poisoned: false,
        }
    }

    /// Offset of the next instruction to decode.
    pub fn offset(&self) -> usize {
        self.reader.total_offset() - self.reader.offset()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Give up on the instruction that failed to decode, skipping its first byte.
    ///
    /// Returns the skipped byte, or `None` if there was nothing left to skip.
    pub fn resync(&mut self) -> Option<u8> {
        self.reader.rewind();
        let byte = self.reader.next().ok()?;
        self.reader.commit();
        self.poisoned = false;
        log::trace!("skipped byte {byte:#04x} at offset {:#x}", self.offset() - 1);
        Some(byte)
    }
}

impl<S: Read> Iterator for Stream<S> {
    type Item = Result<Decoded, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return None;
        }

        let offset = self.offset();
        match self.decoder.decode(&mut self.reader) {
            Ok((instruction, width)) => Some(Ok(Decoded {
                offset,
                instruction,
                width,
            })),
            Err(err) if err.is_end_of_stream() => None,
            Err(err) => {
                log::trace!("failed to decode at offset {offset:#x}: {err}");
                self.poisoned = true;
                Some(Err(err))
            }
        }
    }
}
