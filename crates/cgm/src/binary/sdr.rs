// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structured Data Record parser (ISO 8632-3 Clause 5.4, Table 7).
//!
//! An SDR travels inside a string envelope; its bytes are a nested
//! `(type, count, values...)` stream read with the same metafile precisions
//! active at parse time. Records may nest (type code 0).

use super::cursor::{ArgCursor, ReadError, ReadResult};
use crate::state::MetafileState;
use crate::types::{Sdr, SdrDataType, SdrMember, SdrValue};

/// Read the string envelope and parse its contents as an SDR.
pub fn read_sdr(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Sdr> {
    let envelope = cur.read_string_bytes()?;
    let mut inner = ArgCursor::new(&envelope);
    let record = parse_members(&mut inner, state);
    // Fallback notes from the nested cursor belong to the outer command.
    for note in inner.take_notes() {
        cur.push_note(note);
    }
    record
}

fn parse_members(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Sdr> {
    let mut sdr = Sdr::default();
    while !cur.is_eof() {
        let type_code = cur.read_index(state)?;
        let data_type = SdrDataType::from_code(type_code).ok_or(ReadError::Unsupported {
            offset: cur.offset(),
            message: format!("SDR data type {} outside Table 7", type_code),
        })?;
        let count = cur.read_int(state)?;
        if count < 0 {
            return Err(ReadError::Unsupported {
                offset: cur.offset(),
                message: format!("negative SDR member count {}", count),
            });
        }
        let mut values = Vec::with_capacity(count as usize);
        for _ in 0..count {
            values.push(read_value(cur, state, data_type)?);
        }
        sdr.members.push(SdrMember { data_type, values });
    }
    Ok(sdr)
}

fn read_value(
    cur: &mut ArgCursor<'_>,
    state: &MetafileState,
    data_type: SdrDataType,
) -> ReadResult<SdrValue> {
    Ok(match data_type {
        SdrDataType::Sdr => {
            let envelope = cur.read_string_bytes()?;
            let mut inner = ArgCursor::new(&envelope);
            let nested = parse_members(&mut inner, state)?;
            for note in inner.take_notes() {
                cur.push_note(note);
            }
            SdrValue::Record(nested)
        }
        SdrDataType::ColourIndex => SdrValue::ColourIndex(cur.read_colour_index(state, None)?),
        SdrDataType::ColourDirect => {
            let (r, g, b) = cur.read_direct_rgb(state)?;
            SdrValue::Colour { r, g, b }
        }
        SdrDataType::Name => SdrValue::Name(cur.read_name(state)?),
        SdrDataType::Enumerated => SdrValue::Enumerated(cur.read_enum()?),
        SdrDataType::Integer => SdrValue::Integer(cur.read_int(state)?),
        SdrDataType::IntegerF8 => SdrValue::Integer(i32::from(cur.read_i8()?)),
        SdrDataType::IntegerF16 => SdrValue::Integer(i32::from(cur.read_i16()?)),
        SdrDataType::IntegerF32 => SdrValue::Integer(cur.read_i32()?),
        SdrDataType::Index => SdrValue::Index(cur.read_index(state)?),
        SdrDataType::Real => SdrValue::Real(cur.read_real(state)?),
        SdrDataType::String | SdrDataType::StringF => SdrValue::String(cur.read_string()?),
        // Device viewport mode defaults to fraction, so a VC is a real.
        SdrDataType::ViewportCoordinate => SdrValue::ViewportCoordinate(cur.read_real(state)?),
        SdrDataType::Vdc => SdrValue::Vdc(cur.read_vdc(state)?),
        SdrDataType::UnsignedF8 => SdrValue::Unsigned8(cur.read_u8()?),
        SdrDataType::UnsignedF16 => SdrValue::Unsigned16(cur.read_u16()?),
        SdrDataType::UnsignedF32 => SdrValue::Unsigned32(cur.read_u32()?),
        SdrDataType::Reserved
        | SdrDataType::ColourComponent
        | SdrDataType::BitStream
        | SdrDataType::ColourList => {
            return Err(ReadError::Unsupported {
                offset: cur.offset(),
                message: format!("SDR data type {:?} not decodable", data_type),
            });
        }
    })
}
