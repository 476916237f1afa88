// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value types shared by the command model: points, colours and structured
//! data records.

/// A 2D point in virtual device coordinates.
///
/// VDC values are stored as `f64` regardless of the stream's VDC TYPE; the
/// clear-text emitter decides integer vs real formatting from the state
/// active at emit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// A colour argument, resolved at decode time by COLOUR SELECTION MODE.
///
/// Direct colours are clamped and scaled through COLOUR VALUE EXTENT (and
/// CMYK converted) as they are read, so the stored components are always
/// 0-255 RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Index(u32),
    Rgb { r: u8, g: u8, b: u8 },
}

/// Data type codes inside a Structured Data Record (ISO 8632-3 Table 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdrDataType {
    Sdr,
    ColourIndex,
    ColourDirect,
    Name,
    Enumerated,
    Integer,
    Reserved,
    IntegerF8,
    IntegerF16,
    IntegerF32,
    Index,
    Real,
    String,
    StringF,
    ViewportCoordinate,
    Vdc,
    ColourComponent,
    UnsignedF8,
    UnsignedF32,
    BitStream,
    ColourList,
    UnsignedF16,
}

impl SdrDataType {
    /// Map a Table 7 type code; `None` for codes outside the table.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => SdrDataType::Sdr,
            1 => SdrDataType::ColourIndex,
            2 => SdrDataType::ColourDirect,
            3 => SdrDataType::Name,
            4 => SdrDataType::Enumerated,
            5 => SdrDataType::Integer,
            6 => SdrDataType::Reserved,
            7 => SdrDataType::IntegerF8,
            8 => SdrDataType::IntegerF16,
            9 => SdrDataType::IntegerF32,
            10 => SdrDataType::Index,
            11 => SdrDataType::Real,
            12 => SdrDataType::String,
            13 => SdrDataType::StringF,
            14 => SdrDataType::ViewportCoordinate,
            15 => SdrDataType::Vdc,
            16 => SdrDataType::ColourComponent,
            17 => SdrDataType::UnsignedF8,
            18 => SdrDataType::UnsignedF32,
            19 => SdrDataType::BitStream,
            20 => SdrDataType::ColourList,
            21 => SdrDataType::UnsignedF16,
            _ => return None,
        })
    }

    /// The numeric Table 7 code, used by the clear-text form.
    pub fn code(self) -> i32 {
        match self {
            SdrDataType::Sdr => 0,
            SdrDataType::ColourIndex => 1,
            SdrDataType::ColourDirect => 2,
            SdrDataType::Name => 3,
            SdrDataType::Enumerated => 4,
            SdrDataType::Integer => 5,
            SdrDataType::Reserved => 6,
            SdrDataType::IntegerF8 => 7,
            SdrDataType::IntegerF16 => 8,
            SdrDataType::IntegerF32 => 9,
            SdrDataType::Index => 10,
            SdrDataType::Real => 11,
            SdrDataType::String => 12,
            SdrDataType::StringF => 13,
            SdrDataType::ViewportCoordinate => 14,
            SdrDataType::Vdc => 15,
            SdrDataType::ColourComponent => 16,
            SdrDataType::UnsignedF8 => 17,
            SdrDataType::UnsignedF32 => 18,
            SdrDataType::BitStream => 19,
            SdrDataType::ColourList => 20,
            SdrDataType::UnsignedF16 => 21,
        }
    }
}

/// One decoded SDR value.
#[derive(Debug, Clone, PartialEq)]
pub enum SdrValue {
    Record(Sdr),
    ColourIndex(u32),
    Colour { r: u8, g: u8, b: u8 },
    Name(i32),
    Enumerated(i16),
    Integer(i32),
    Index(i32),
    Real(f64),
    String(String),
    Vdc(f64),
    ViewportCoordinate(f64),
    Unsigned8(u8),
    Unsigned16(u16),
    Unsigned32(u32),
}

/// One `(type, count, values)` member of a structured data record.
#[derive(Debug, Clone, PartialEq)]
pub struct SdrMember {
    pub data_type: SdrDataType,
    pub values: Vec<SdrValue>,
}

/// A Structured Data Record: a self-describing nested parameter block
/// embedded in FONT PROPERTIES, APPLICATION STRUCTURE ATTRIBUTE and
/// similar commands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sdr {
    pub members: Vec<SdrMember>,
}
