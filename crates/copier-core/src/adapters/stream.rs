//! UTF-8 adapters over the standard I/O traits.

use std::io::{BufRead, ErrorKind, Write};

use anyhow::{Context, Result, bail};

use crate::io::{Destination, Source};
use crate::unit::NO_DATA;

/// A source that decodes UTF-8 characters from a buffered reader.
///
/// End of stream reads as [`NO_DATA`] (or a short batch). Malformed UTF-8 is
/// an error; the offending sequence is consumed only up to the first byte
/// that cannot continue it, so decoding resumes at that byte.
///
/// A batch read that fails after decoding some units returns those units,
/// and the error is reported by the next read.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    pending: Option<anyhow::Error>,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Look at the next byte without consuming it, or `None` at end of stream.
    fn peek_byte(&mut self) -> Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("failed to read input"),
            }
        }
    }

    /// Decode the next character, or `None` at end of stream.
    fn next_char(&mut self) -> Result<Option<char>> {
        let Some(lead) = self.peek_byte()? else {
            return Ok(None);
        };
        self.reader.consume(1);

        let width = utf8_width(lead)
            .with_context(|| format!("invalid UTF-8 lead byte 0x{lead:02x}"))?;
        let mut code = u32::from(lead) & lead_mask(width);

        for i in 1..width {
            let Some(byte) = self.peek_byte()? else {
                bail!("truncated UTF-8 sequence");
            };
            let (lo, hi) = continuation_range(lead, i);
            if !(lo..=hi).contains(&byte) {
                bail!("invalid UTF-8 sequence: byte 0x{byte:02x} after lead byte 0x{lead:02x}");
            }
            self.reader.consume(1);
            code = (code << 6) | u32::from(byte & 0x3f);
        }

        let c = char::from_u32(code)
            .with_context(|| format!("invalid UTF-8 scalar value 0x{code:x}"))?;
        Ok(Some(c))
    }
}

/// Encoded length of a UTF-8 sequence, from its lead byte.
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

/// Payload bits of a lead byte for a sequence of `width` bytes.
fn lead_mask(width: usize) -> u32 {
    match width {
        1 => 0x7f,
        2 => 0x1f,
        3 => 0x0f,
        _ => 0x07,
    }
}

/// Allowed range of the continuation byte at `index` (1-based) after `lead`.
///
/// The second byte is narrowed for overlong forms, surrogates and values
/// above U+10FFFF.
fn continuation_range(lead: u8, index: usize) -> (u8, u8) {
    match (lead, index) {
        (0xe0, 1) => (0xa0, 0xbf),
        (0xed, 1) => (0x80, 0x9f),
        (0xf0, 1) => (0x90, 0xbf),
        (0xf4, 1) => (0x80, 0x8f),
        _ => (0x80, 0xbf),
    }
}

impl<R: BufRead> Source for ReaderSource<R> {
    fn read_one(&mut self) -> Result<char> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        Ok(self.next_char()?.unwrap_or(NO_DATA))
    }

    fn read_many(&mut self, count: usize) -> Result<Vec<char>> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }

        let mut batch = Vec::with_capacity(count.min(4096));
        while batch.len() < count {
            match self.next_char() {
                Ok(Some(c)) => batch.push(c),
                Ok(None) => break,
                Err(err) if batch.is_empty() => return Err(err),
                Err(err) => {
                    self.pending = Some(err);
                    break;
                }
            }
        }
        Ok(batch)
    }
}

/// A destination that UTF-8 encodes characters into a writer.
#[derive(Debug)]
pub struct WriterDestination<W> {
    writer: W,
}

impl<W: Write> WriterDestination<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush output")
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Destination for WriterDestination<W> {
    fn write_one(&mut self, c: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.writer
            .write_all(c.encode_utf8(&mut buf).as_bytes())
            .context("failed to write output")
    }

    fn write_many(&mut self, batch: &[char]) -> Result<()> {
        let encoded: String = batch.iter().collect();
        self.writer
            .write_all(encoded.as_bytes())
            .context("failed to write output")
    }
}
