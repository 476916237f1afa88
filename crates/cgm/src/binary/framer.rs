// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Command framing for the binary encoding (ISO 8632-3 Clause 5.4).
//!
//! Every command starts with a 16-bit big-endian header word:
//!
//! ```text
//! | class (4 bits) | element id (7 bits) | parameter length (5 bits) |
//! ```
//!
//! A parameter length of 31 selects the long form: one or more 16-bit
//! partition words follow, each with a continuation flag in bit 15 and a
//! 15-bit octet count. Partition data is concatenated into a single
//! argument buffer. Commands whose argument length is odd are padded with a
//! zero octet so the next header is word-aligned.

use std::fmt;

/// Long-form marker in the 5-bit parameter length field.
const LONG_FORM: u16 = 31;
/// Continuation flag in a long-form partition word.
const PARTITION_CONTINUES: u16 = 0x8000;

/// One framed command: `(class, id, argument bytes)` plus the offset of its
/// header, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub element_class: u8,
    pub element_id: u8,
    pub args: Vec<u8>,
    pub offset: usize,
}

/// Framing failure. All variants are fatal: the framer cannot resynchronize
/// past a corrupt header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Input ended inside a command header or partition word.
    TruncatedHeader { offset: usize },
    /// Input ended inside a command's argument bytes.
    TruncatedArgs { offset: usize, needed: usize },
}

impl FrameError {
    pub fn offset(&self) -> usize {
        match self {
            FrameError::TruncatedHeader { offset } => *offset,
            FrameError::TruncatedArgs { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::TruncatedHeader { offset } => {
                write!(f, "truncated command header at offset {}", offset)
            }
            FrameError::TruncatedArgs { offset, needed } => {
                write!(
                    f,
                    "truncated command arguments at offset {}: {} more byte(s) needed",
                    offset, needed
                )
            }
        }
    }
}

impl std::error::Error for FrameError {}

/// Pull-based framer over a binary CGM byte stream.
pub struct Framer<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Framer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Framer { buf, offset: 0 }
    }

    /// Current read position.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    fn read_word(&mut self) -> Option<u16> {
        if self.offset + 2 > self.buf.len() {
            return None;
        }
        let word = u16::from_be_bytes([self.buf[self.offset], self.buf[self.offset + 1]]);
        self.offset += 2;
        Some(word)
    }

    fn read_chunk(&mut self, len: usize) -> Result<&'a [u8], FrameError> {
        if self.offset + len > self.buf.len() {
            return Err(FrameError::TruncatedArgs {
                offset: self.offset,
                needed: self.offset + len - self.buf.len(),
            });
        }
        let chunk = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        // Word alignment: odd-length data is followed by a pad octet.
        if len % 2 == 1 && self.offset < self.buf.len() {
            self.offset += 1;
        }
        Ok(chunk)
    }

    /// Frame the next command. `Ok(None)` at a clean end of input; a lone
    /// trailing zero word (padding) also ends the stream.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        if self.offset >= self.buf.len() {
            return Ok(None);
        }
        // A single odd byte left over can only be padding.
        if self.remaining() == 1 {
            self.offset = self.buf.len();
            return Ok(None);
        }

        let header_offset = self.offset;
        let word = self.read_word().ok_or(FrameError::TruncatedHeader {
            offset: header_offset,
        })?;

        let element_class = (word >> 12) as u8;
        let element_id = ((word >> 5) & 0x7F) as u8;
        let short_len = word & 0x1F;

        let args = if short_len != LONG_FORM {
            self.read_chunk(usize::from(short_len))?.to_vec()
        } else {
            let mut data = Vec::new();
            loop {
                let part_offset = self.offset;
                let part = self.read_word().ok_or(FrameError::TruncatedHeader {
                    offset: part_offset,
                })?;
                let continues = part & PARTITION_CONTINUES != 0;
                let len = usize::from(part & 0x7FFF);
                data.extend_from_slice(self.read_chunk(len)?);
                if !continues {
                    break;
                }
            }
            data
        };

        log::trace!(
            "[framer] class={} id={} len={} at offset {}",
            element_class,
            element_id,
            args.len(),
            header_offset
        );

        Ok(Some(Frame {
            element_class,
            element_id,
            args,
            offset: header_offset,
        }))
    }
}
