//! Shared behaviour required between decoder crates.

use std::collections::VecDeque;
use std::fmt;
use std::io::Read;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Error {
    /// What kind of error happened in decoding an instruction.
    pub kind: ErrorKind,

    /// How many bytes in the stream did the invalid instruction consume.
    size: u8,
}

impl Error {
    pub fn new(kind: ErrorKind, size: usize) -> Self {
        Self {
            kind,
            size: size.min(u8::MAX as usize) as u8,
        }
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Whether the source ran dry before a single byte of the instruction was read.
    ///
    /// This is how a stream of instructions ends cleanly.
    pub fn is_end_of_stream(&self) -> bool {
        self.kind == ErrorKind::ExhaustedInput && self.size == 0
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    /// No path through the opcode tables matched the bytes read.
    UnrecognizedOpcode,

    /// There weren't any bytes left in the stream to decode.
    ExhaustedInput,

    /// The underlying byte source failed.
    Io(std::io::ErrorKind),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnrecognizedOpcode => f.write_str("unrecognized opcode"),
            ErrorKind::ExhaustedInput => f.write_str("ran out of bytes to decode"),
            ErrorKind::Io(kind) => write!(f, "failed to read from source: {kind}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after {} byte(s))", self.kind, self.size)
    }
}

impl std::error::Error for Error {}

pub trait Decodable {
    type Instruction;

    /// Decode a single instruction, returning it together with the number of bytes it spans.
    fn decode<S: Read>(&self, reader: &mut Reader<S>) -> Result<(Self::Instruction, usize), Error>;

    fn max_width(&self) -> usize;
}

/// A peek buffer over a byte source.
///
/// Bytes are pulled from the source one at a time as the cursor reaches the end of the buffer.
/// Speculative reads are undone with [`Reader::unread`], and a finished instruction is dropped
/// from the front of the buffer with [`Reader::commit`].
pub struct Reader<S> {
    source: S,
    buffer: VecDeque<u8>,
    cursor: usize,
    committed: usize,
}

impl<S: Read> Reader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: VecDeque::with_capacity(16),
            cursor: 0,
            committed: 0,
        }
    }

    fn fill(&mut self) -> Result<u8, ErrorKind> {
        let mut byte = [0u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Err(ErrorKind::ExhaustedInput),
                Ok(_) => {
                    self.buffer.push_back(byte[0]);
                    return Ok(byte[0]);
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(ErrorKind::Io(err.kind())),
            }
        }
    }

    /// Read the byte at the cursor and advance past it.
    #[inline]
    pub fn next(&mut self) -> Result<u8, ErrorKind> {
        let byte = match self.buffer.get(self.cursor) {
            Some(&byte) => byte,
            None => self.fill()?,
        };

        self.cursor += 1;
        Ok(byte)
    }

    /// Read `buf`-many bytes from this reader in bulk. If the source runs dry part way, the
    /// bytes that were read stay buffered and `ExhaustedInput` is returned.
    #[inline]
    pub fn next_n(&mut self, buf: &mut [u8]) -> Result<(), ErrorKind> {
        for slot in buf.iter_mut() {
            *slot = self.next()?;
        }

        Ok(())
    }

    /// Step the cursor back by one byte. The byte stays buffered and is returned by the next
    /// call to [`Reader::next`].
    #[inline]
    pub fn unread(&mut self) {
        debug_assert!(self.cursor > 0, "unread past the last commit");
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Drop every byte before the cursor, returning how many there were.
    pub fn commit(&mut self) -> usize {
        let consumed = self.cursor;
        self.buffer.drain(..consumed);
        self.cursor = 0;
        self.committed += consumed;
        consumed
    }

    /// Move the cursor back to the last commit point, keeping everything buffered.
    #[inline]
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// The number of bytes read since the last commit.
    #[inline]
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// The number of bytes read since this reader was constructed.
    #[inline]
    pub fn total_offset(&self) -> usize {
        self.committed + self.cursor
    }

    /// Number of bytes pulled from the source but not yet committed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

/// Encode bytes as 2 digit hex number separated by a space with a leading space.
pub fn encode_hex_bytes(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut buffer = String::with_capacity(bytes.len() * 3);
    for byte in bytes {
        let _ = write!(buffer, "{byte:02x} ");
    }

    buffer
}

/// Truncates string past the max width with a '..'.
pub fn encode_hex_bytes_truncated(bytes: &[u8], max_width: usize) -> String {
    assert!(max_width > 2, "max width most be at least 2");

    // truncation has to occur
    if bytes.len() * 3 > max_width {
        let mut buffer = encode_hex_bytes(&bytes[..max_width / 3 - 1]);
        buffer.push_str("..  ");
        return buffer;
    }

    let mut buffer = encode_hex_bytes(bytes);
    let pad = max_width.saturating_sub(bytes.len() * 3);
    buffer.extend(std::iter::repeat(' ').take(pad));
    buffer
}

/// Parse hex text such as `"01 c8 66 50"` or `"01c86650"` into bytes.
///
/// Whitespace is ignored; an odd number of digits or a non-hex character fails.
pub fn decode_hex(text: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| (b as char).to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;

    if digits.len() % 2 != 0 {
        return None;
    }

    Some(digits.chunks(2).map(|pair| pair[0] << 4 | pair[1]).collect())
}
