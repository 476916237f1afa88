// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Precision-aware primitive reader over a command's argument bytes.
//!
//! All multi-octet values in the binary encoding are big-endian
//! (ISO 8632-3 Clause 5). Which width a value occupies depends on the
//! precision fields of [`MetafileState`], so every composite read takes the
//! state as a parameter. The cursor borrows the argument slice for the
//! duration of a single command and never retains it.

use crate::state::{ColourModel, ColourMode, MetafileState, RealPrecision, VdcType};
use crate::types::{Colour, Point};
use std::fmt;

/// Error from a primitive read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Fewer bytes remain than the active precision requires.
    Truncated { offset: usize, needed: usize },
    /// The arguments use an encoding the reader cannot interpret
    /// (e.g. an SDR data type outside Table 7).
    Unsupported { offset: usize, message: String },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Truncated { offset, needed } => {
                write!(f, "truncated arguments at offset {}: {} more byte(s) needed", offset, needed)
            }
            ReadError::Unsupported { offset, message } => {
                write!(f, "unsupported encoding at offset {}: {}", offset, message)
            }
        }
    }
}

impl std::error::Error for ReadError {}

pub type ReadResult<T> = Result<T, ReadError>;

/// Generate fixed-width big-endian read methods.
///
/// Each generated method bounds-checks, copies the octets, converts via
/// `from_be_bytes()` and advances the cursor.
macro_rules! impl_read_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> ReadResult<$type> {
            if self.offset + $size > self.buf.len() {
                return Err(ReadError::Truncated {
                    offset: self.offset,
                    needed: self.offset + $size - self.buf.len(),
                });
            }
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(&self.buf[self.offset..self.offset + $size]);
            self.offset += $size;
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

/// Bounds-checked read cursor over one command's argument buffer.
pub struct ArgCursor<'a> {
    buf: &'a [u8],
    offset: usize,
    /// Fallback reads for uninterpretable precisions, drained by the
    /// factory into `Unsupported` diagnostics.
    notes: Vec<String>,
}

impl<'a> ArgCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ArgCursor {
            buf,
            offset: 0,
            notes: Vec::new(),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buf.len()
    }

    /// Drain the fallback notes recorded during reads.
    pub fn take_notes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notes)
    }

    /// Re-record a note from a nested cursor (SDR envelopes).
    pub(crate) fn push_note(&mut self, note: String) {
        self.notes.push(note);
    }

    fn note(&mut self, message: String) {
        log::debug!("[cursor] {}", message);
        self.notes.push(message);
    }

    // Generated big-endian primitive reads.
    impl_read_be!(read_u8, u8, 1);
    impl_read_be!(read_i8, i8, 1);
    impl_read_be!(read_u16, u16, 2);
    impl_read_be!(read_i16, i16, 2);
    impl_read_be!(read_u32, u32, 4);
    impl_read_be!(read_i32, i32, 4);
    impl_read_be!(read_f32, f32, 4);
    impl_read_be!(read_f64, f64, 8);

    pub fn read_bytes(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if self.offset + len > self.buf.len() {
            return Err(ReadError::Truncated {
                offset: self.offset,
                needed: self.offset + len - self.buf.len(),
            });
        }
        let slice = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Signed 24-bit big-endian with sign extension.
    pub fn read_i24(&mut self) -> ReadResult<i32> {
        let bytes = self.read_bytes(3)?;
        let raw = (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2]);
        let value = if raw & 0x0080_0000 != 0 {
            (raw | 0xFF00_0000) as i32
        } else {
            raw as i32
        };
        Ok(value)
    }

    /// Unsigned 24-bit big-endian.
    pub fn read_u24(&mut self) -> ReadResult<u32> {
        let bytes = self.read_bytes(3)?;
        Ok((u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2]))
    }

    /// Signed integer of the given bit width. Falls back to 16 bits for
    /// widths outside {8, 16, 24, 32} (recorded as a note).
    pub fn read_int_bits(&mut self, bits: u8) -> ReadResult<i32> {
        match bits {
            8 => Ok(i32::from(self.read_i8()?)),
            16 => Ok(i32::from(self.read_i16()?)),
            24 => self.read_i24(),
            32 => self.read_i32(),
            other => {
                self.note(format!("unsupported integer precision {}", other));
                Ok(i32::from(self.read_i16()?))
            }
        }
    }

    /// Unsigned integer of the given bit width. Falls back to 8 bits for
    /// widths outside {8, 16, 24, 32} (recorded as a note).
    pub fn read_uint_bits(&mut self, bits: u8) -> ReadResult<u32> {
        match bits {
            8 => Ok(u32::from(self.read_u8()?)),
            16 => Ok(u32::from(self.read_u16()?)),
            24 => self.read_u24(),
            32 => self.read_u32(),
            other => {
                self.note(format!("unsupported unsigned precision {}", other));
                Ok(u32::from(self.read_u8()?))
            }
        }
    }

    /// Signed integer at the stream's INTEGER PRECISION.
    pub fn read_int(&mut self, state: &MetafileState) -> ReadResult<i32> {
        self.read_int_bits(state.integer_precision)
    }

    /// Index at the stream's INDEX PRECISION.
    pub fn read_index(&mut self, state: &MetafileState) -> ReadResult<i32> {
        self.read_int_bits(state.index_precision)
    }

    /// Name at the stream's NAME PRECISION.
    pub fn read_name(&mut self, state: &MetafileState) -> ReadResult<i32> {
        self.read_int_bits(state.name_precision)
    }

    /// Enumerated value: always a signed 16-bit word.
    pub fn read_enum(&mut self) -> ReadResult<i16> {
        self.read_i16()
    }

    /// Boolean: an enumerated value where any non-zero word is true.
    pub fn read_bool(&mut self) -> ReadResult<bool> {
        Ok(self.read_enum()? != 0)
    }

    /// Real in the given layout.
    pub fn read_real_form(&mut self, form: RealPrecision) -> ReadResult<f64> {
        match form {
            RealPrecision::Fixed32 => {
                let whole = self.read_i16()?;
                let fraction = self.read_u16()?;
                Ok(f64::from(whole) + f64::from(fraction) / 65_536.0)
            }
            RealPrecision::Fixed64 => {
                let whole = self.read_i32()?;
                let fraction = self.read_u32()?;
                Ok(f64::from(whole) + f64::from(fraction) / 4_294_967_296.0)
            }
            RealPrecision::Floating32 => {
                let value = f64::from(self.read_f32()?);
                // Interop: some encoders emit denormal noise for zero.
                if value.abs() < 1e-10 {
                    Ok(0.0)
                } else {
                    Ok(value)
                }
            }
            RealPrecision::Floating64 => self.read_f64(),
        }
    }

    /// Real at the stream's REAL PRECISION.
    pub fn read_real(&mut self, state: &MetafileState) -> ReadResult<f64> {
        self.read_real_form(state.real_precision)
    }

    /// One VDC: integer or real per VDC TYPE and its precision.
    pub fn read_vdc(&mut self, state: &MetafileState) -> ReadResult<f64> {
        match state.vdc_type {
            VdcType::Integer => {
                let bits = state.vdc_integer_precision;
                let value = match bits {
                    16 => i32::from(self.read_i16()?),
                    24 => self.read_i24()?,
                    32 => self.read_i32()?,
                    other => {
                        self.note(format!("unsupported VDC integer precision {}", other));
                        i32::from(self.read_i16()?)
                    }
                };
                Ok(f64::from(value))
            }
            VdcType::Real => self.read_real_form(state.vdc_real_precision),
        }
    }

    /// Two VDCs in (x, y) order.
    pub fn read_point(&mut self, state: &MetafileState) -> ReadResult<Point> {
        let x = self.read_vdc(state)?;
        let y = self.read_vdc(state)?;
        Ok(Point::new(x, y))
    }

    /// A size specification: VDC when absolute, real when scaled.
    pub fn read_size(
        &mut self,
        state: &MetafileState,
        mode: crate::state::SpecificationMode,
    ) -> ReadResult<f64> {
        match mode {
            crate::state::SpecificationMode::Absolute => self.read_vdc(state),
            crate::state::SpecificationMode::Scaled => self.read_real(state),
        }
    }

    /// String length: one octet, or 255 followed by 16-bit words whose high
    /// bit flags a further segment (low 15 bits are the segment length).
    fn read_string_segments(&mut self) -> ReadResult<Vec<u8>> {
        let first = self.read_u8()?;
        if first < 255 {
            return Ok(self.read_bytes(usize::from(first))?.to_vec());
        }
        let mut data = Vec::new();
        loop {
            let word = self.read_u16()?;
            let more = word & 0x8000 != 0;
            let len = usize::from(word & 0x7FFF);
            data.extend_from_slice(self.read_bytes(len)?);
            if !more {
                break;
            }
        }
        Ok(data)
    }

    /// String: octets are opaque; no transcoding beyond a 1:1 widening so
    /// the emitter can filter printables later.
    pub fn read_string(&mut self) -> ReadResult<String> {
        let bytes = self.read_string_segments()?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    /// Raw string envelope, for nested parsers (SDR).
    pub fn read_string_bytes(&mut self) -> ReadResult<Vec<u8>> {
        self.read_string_segments()
    }

    /// Colour index at COLOUR INDEX PRECISION (or a command-local width).
    pub fn read_colour_index(
        &mut self,
        state: &MetafileState,
        local_precision: Option<u8>,
    ) -> ReadResult<u32> {
        let bits = local_precision.unwrap_or(state.colour_index_precision);
        self.read_uint_bits(bits)
    }

    /// A direct colour: components at COLOUR PRECISION, clamped and scaled
    /// through COLOUR VALUE EXTENT to 0-255 RGB. CMYK is converted; the CIE
    /// models are consumed but replaced by a sentinel colour.
    pub fn read_direct_rgb(&mut self, state: &MetafileState) -> ReadResult<(u8, u8, u8)> {
        let bits = state.colour_precision;
        match state.colour_model {
            ColourModel::Rgb => {
                let r = self.read_uint_bits(bits)?;
                let g = self.read_uint_bits(bits)?;
                let b = self.read_uint_bits(bits)?;
                Ok(scale_rgb(
                    [r, g, b],
                    state.colour_extent_min,
                    state.colour_extent_max,
                ))
            }
            ColourModel::Cmyk => {
                let c = self.read_uint_bits(bits)?;
                let m = self.read_uint_bits(bits)?;
                let y = self.read_uint_bits(bits)?;
                let k = self.read_uint_bits(bits)?;
                Ok(cmyk_to_rgb(c, m, y, k))
            }
            other => {
                self.note(format!("unsupported colour model {:?}", other));
                self.read_uint_bits(bits)?;
                self.read_uint_bits(bits)?;
                self.read_uint_bits(bits)?;
                Ok((0, 255, 255))
            }
        }
    }

    /// A colour argument per COLOUR SELECTION MODE.
    pub fn read_colour(&mut self, state: &MetafileState) -> ReadResult<Colour> {
        match state.colour_mode {
            ColourMode::Indexed => Ok(Colour::Index(self.read_colour_index(state, None)?)),
            ColourMode::Direct => {
                let (r, g, b) = self.read_direct_rgb(state)?;
                Ok(Colour::Rgb { r, g, b })
            }
        }
    }
}

/// Clamp components into the colour value extent and rescale to 0-255.
fn scale_rgb(value: [u32; 3], min: [u32; 3], max: [u32; 3]) -> (u8, u8, u8) {
    let scale = |v: u32, lo: u32, hi: u32| -> u8 {
        if lo >= hi {
            return 0;
        }
        let v = v.clamp(lo, hi);
        ((255 * u64::from(v - lo)) / u64::from(hi - lo)) as u8
    };
    (
        scale(value[0], min[0], max[0]),
        scale(value[1], min[1], max[1]),
        scale(value[2], min[2], max[2]),
    )
}

/// CMYK to RGB, assuming 8-bit components as the reference decoder does.
fn cmyk_to_rgb(c: u32, m: u32, y: u32, k: u32) -> (u8, u8, u8) {
    let channel = |ink: u32| -> u8 {
        let v = 255.0 * (1.0 - f64::from(ink) / 255.0) * (1.0 - f64::from(k) / 255.0);
        v.clamp(0.0, 255.0) as u8
    };
    (channel(c), channel(m), channel(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SpecificationMode;

    #[test]
    fn test_read_overflow_reports_offset_and_needed() {
        let buf = [0u8; 1];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(cur.read_u8().expect("one byte available"), 0);

        let err = cur.read_u16().unwrap_err();
        assert_eq!(
            err,
            ReadError::Truncated {
                offset: 1,
                needed: 2
            }
        );
    }

    #[test]
    fn test_read_i24_sign_extension() {
        let buf = [0xFF, 0xFF, 0xFF, 0x7F, 0xFF, 0xFF];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(cur.read_i24().expect("3 bytes"), -1);
        assert_eq!(cur.read_i24().expect("3 bytes"), 0x7F_FFFF);
    }

    #[test]
    fn test_read_int_bits_all_widths() {
        let buf = [
            0x80, // i8: -128
            0x80, 0x00, // i16: -32768
            0x80, 0x00, 0x00, // i24: -8388608
            0x80, 0x00, 0x00, 0x00, // i32: -2147483648
        ];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(cur.read_int_bits(8).expect("i8"), -128);
        assert_eq!(cur.read_int_bits(16).expect("i16"), -32768);
        assert_eq!(cur.read_int_bits(24).expect("i24"), -8_388_608);
        assert_eq!(cur.read_int_bits(32).expect("i32"), i32::MIN);
    }

    #[test]
    fn test_read_int_bits_fallback_notes() {
        let buf = [0x00, 0x10];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(cur.read_int_bits(12).expect("fallback i16"), 16);
        let notes = cur.take_notes();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("12"));
    }

    #[test]
    fn test_read_fixed_point_32() {
        // 16.5 = whole 16, fraction 0x8000 (32768 / 65536)
        let buf = [0x00, 0x10, 0x80, 0x00];
        let mut cur = ArgCursor::new(&buf);
        let v = cur.read_real_form(RealPrecision::Fixed32).expect("4 bytes");
        assert!((v - 16.5).abs() < 1e-12);
    }

    #[test]
    fn test_read_fixed_point_32_negative_whole() {
        let buf = [0xFF, 0xFF, 0x00, 0x00]; // whole -1, fraction 0
        let mut cur = ArgCursor::new(&buf);
        let v = cur.read_real_form(RealPrecision::Fixed32).expect("4 bytes");
        assert!((v + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_read_fixed_point_64() {
        // 2.25 = whole 2, fraction 0x4000_0000 (2^30 / 2^32)
        let buf = [0x00, 0x00, 0x00, 0x02, 0x40, 0x00, 0x00, 0x00];
        let mut cur = ArgCursor::new(&buf);
        let v = cur.read_real_form(RealPrecision::Fixed64).expect("8 bytes");
        assert!((v - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_read_floating_point_32_flushes_noise_to_zero() {
        let buf = 1.0e-20_f32.to_be_bytes();
        let mut cur = ArgCursor::new(&buf);
        let v = cur
            .read_real_form(RealPrecision::Floating32)
            .expect("4 bytes");
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_read_floating_point_64() {
        let buf = (-12.75_f64).to_be_bytes();
        let mut cur = ArgCursor::new(&buf);
        let v = cur
            .read_real_form(RealPrecision::Floating64)
            .expect("8 bytes");
        assert_eq!(v, -12.75);
    }

    #[test]
    fn test_read_vdc_integer_and_real() {
        let mut state = MetafileState::default();
        let buf = [0x00, 0x10, 0x00, 0x20];
        let mut cur = ArgCursor::new(&buf);
        let p = cur.read_point(&state).expect("two 16-bit VDCs");
        assert_eq!(p, Point::new(16.0, 32.0));

        state.vdc_type = VdcType::Real;
        let buf = [0x00, 0x01, 0x80, 0x00]; // fixed32 1.5
        let mut cur = ArgCursor::new(&buf);
        let v = cur.read_vdc(&state).expect("fixed32 VDC");
        assert!((v - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_read_string_short_form() {
        let buf = [0x05, b'h', b'e', b'l', b'l', b'o'];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(cur.read_string().expect("short string"), "hello");
        assert!(cur.is_eof());
    }

    #[test]
    fn test_read_string_empty() {
        let buf = [0x00];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(cur.read_string().expect("empty string"), "");
    }

    #[test]
    fn test_read_string_long_form_single_segment() {
        // 260 'A's: marker 255, word 0x0104 (no continuation), then data.
        let mut buf = vec![0xFF, 0x01, 0x04];
        buf.extend(std::iter::repeat(b'A').take(260));
        let mut cur = ArgCursor::new(&buf);
        let s = cur.read_string().expect("long string");
        assert_eq!(s.len(), 260);
        assert!(s.bytes().all(|b| b == b'A'));
    }

    #[test]
    fn test_read_string_long_form_continuation() {
        // Two segments: 3 bytes (continuation set) + 2 bytes.
        let buf = [
            0xFF, 0x80, 0x03, b'a', b'b', b'c', 0x00, 0x02, b'd', b'e',
        ];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(cur.read_string().expect("segmented string"), "abcde");
    }

    #[test]
    fn test_read_colour_indexed_vs_direct() {
        let mut state = MetafileState::default();
        let buf = [0x07];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(
            cur.read_colour(&state).expect("indexed colour"),
            Colour::Index(7)
        );

        state.colour_mode = ColourMode::Direct;
        let buf = [0xFF, 0x00, 0x80];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(
            cur.read_colour(&state).expect("direct colour"),
            Colour::Rgb { r: 255, g: 0, b: 128 }
        );
    }

    #[test]
    fn test_direct_colour_scaled_by_extent() {
        let mut state = MetafileState::default();
        state.colour_extent_min = [0, 0, 0];
        state.colour_extent_max = [127, 127, 127];
        let buf = [127, 0, 64];
        let mut cur = ArgCursor::new(&buf);
        let (r, g, b) = cur.read_direct_rgb(&state).expect("scaled colour");
        assert_eq!((r, g), (255, 0));
        assert_eq!(b, 128); // 255 * 64 / 127
    }

    #[test]
    fn test_direct_colour_degenerate_extent() {
        let mut state = MetafileState::default();
        state.colour_extent_min = [10, 10, 10];
        state.colour_extent_max = [10, 10, 10];
        let buf = [10, 10, 10];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(
            cur.read_direct_rgb(&state).expect("degenerate extent"),
            (0, 0, 0)
        );
    }

    #[test]
    fn test_cmyk_conversion() {
        let mut state = MetafileState::default();
        state.colour_model = ColourModel::Cmyk;
        let buf = [0, 0, 0, 0]; // no ink = white
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(cur.read_direct_rgb(&state).expect("cmyk"), (255, 255, 255));

        let buf = [0, 0, 0, 255]; // full key = black
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(cur.read_direct_rgb(&state).expect("cmyk"), (0, 0, 0));
    }

    #[test]
    fn test_unsupported_colour_model_sentinel() {
        let mut state = MetafileState::default();
        state.colour_model = ColourModel::Cielab;
        let buf = [1, 2, 3];
        let mut cur = ArgCursor::new(&buf);
        assert_eq!(
            cur.read_direct_rgb(&state).expect("sentinel"),
            (0, 255, 255)
        );
        assert_eq!(cur.take_notes().len(), 1);
    }

    #[test]
    fn test_read_size_specification() {
        let state = MetafileState::default();
        // Absolute: 16-bit integer VDC
        let buf = [0x00, 0x05];
        let mut cur = ArgCursor::new(&buf);
        let v = cur
            .read_size(&state, SpecificationMode::Absolute)
            .expect("abs size");
        assert_eq!(v, 5.0);

        // Scaled: fixed32 real
        let buf = [0x00, 0x02, 0x00, 0x00];
        let mut cur = ArgCursor::new(&buf);
        let v = cur
            .read_size(&state, SpecificationMode::Scaled)
            .expect("scaled size");
        assert_eq!(v, 2.0);
    }
}
