// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cursor-based byte buffers with big-endian length fields.

use crate::config::{LENGTH_FIELD_SIZE, NULL_LENGTH};
use crate::error::{CodecError, Result};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

/// Read cursor over one encoded value.
///
/// One reader per decode call; the cursor only moves forward.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Whether a full length/count field is still available.
    ///
    /// `false` marks a clean end of value for sequences whose trailing
    /// elements may be elided.
    pub fn has_length_field(&self) -> bool {
        self.remaining() >= LENGTH_FIELD_SIZE
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(CodecError::malformed(format!(
                "need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.read_bytes(4)?))
    }

    /// Element/field count; negative counts are malformed.
    pub fn read_count(&mut self) -> Result<usize> {
        let count = self.read_i32()?;
        usize::try_from(count)
            .map_err(|_| CodecError::malformed(format!("negative count {}", count)))
    }

    /// Next length-prefixed payload; `None` when the length is negative.
    pub fn read_value(&mut self) -> Result<Option<&'a [u8]>> {
        let len = self.read_i32()?;
        if len < 0 {
            return Ok(None);
        }
        self.read_bytes(len as usize).map(Some)
    }

    /// Everything not yet consumed.
    pub fn rest(&mut self) -> &'a [u8] {
        let out = &self.buf[self.pos..];
        self.pos = self.buf.len();
        out
    }
}

/// Growable output buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.buf.write_u8(v)?;
        Ok(())
    }

    pub fn write_i8(&mut self, v: i8) -> Result<()> {
        self.buf.write_i8(v)?;
        Ok(())
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        self.buf.write_i16::<BigEndian>(v)?;
        Ok(())
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.buf.write_i32::<BigEndian>(v)?;
        Ok(())
    }

    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.buf.write_u32::<BigEndian>(v)?;
        Ok(())
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.buf.write_i64::<BigEndian>(v)?;
        Ok(())
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        self.buf.write_f32::<BigEndian>(v)?;
        Ok(())
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        self.buf.write_f64::<BigEndian>(v)?;
        Ok(())
    }

    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = i32::try_from(count)
            .map_err(|_| CodecError::malformed(format!("count {} exceeds i32", count)))?;
        self.write_i32(count)
    }

    /// Length-prefixed payload, or the null marker for `None`.
    pub fn write_value(&mut self, payload: Option<&[u8]>) -> Result<()> {
        match payload {
            Some(bytes) => {
                let len = i32::try_from(bytes.len()).map_err(|_| {
                    CodecError::malformed(format!("value of {} bytes exceeds i32", bytes.len()))
                })?;
                self.write_i32(len)?;
                self.write_bytes(bytes);
                Ok(())
            }
            None => self.write_i32(NULL_LENGTH),
        }
    }
}
