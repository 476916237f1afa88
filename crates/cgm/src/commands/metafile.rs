// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class 1: metafile descriptor elements.
//!
//! Most of this class is precision commands: their decoders are the only
//! writers of the metafile state fields they own. The clear-text forms of
//! the precision commands print value extents, not bit widths, with the
//! width recorded in a trailing `% N binary bits %` comment.

use crate::binary::cursor::{ArgCursor, ReadResult};
use crate::binary::sdr::read_sdr;
use crate::state::{CharCoding, MetafileState, RealPrecision, VdcType};
use crate::text::writer::ClearTextWriter;
use crate::text::{quote_str, EmitState, INDENT_DESCRIPTOR};
use crate::types::Sdr;
use std::io;

use super::Command;

/// MFELEMLIST entry: a named shorthand set or a raw `(class, id)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MfElement {
    Named(&'static str),
    Pair(i32, i32),
}

impl MfElement {
    fn text(&self) -> String {
        match self {
            MfElement::Named(name) => (*name).to_string(),
            MfElement::Pair(class, id) => format!("({},{})", class, id),
        }
    }
}

/// Shorthand set names for MFELEMLIST pairs with class index -1
/// (ISO 8632-3 Table 4).
const ELEMENT_SET_NAMES: [&str; 7] = [
    "DRAWINGSET",
    "DRAWINGPLUS",
    "VERSION2",
    "EXTDPRIM",
    "VERSION2GKSM",
    "VERSION3",
    "VERSION4",
];

/// One FONT PROPERTIES entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FontProperty {
    pub indicator: i32,
    pub priority: i32,
    pub record: Sdr,
}

pub(crate) fn decode(
    id: u8,
    cur: &mut ArgCursor<'_>,
    state: &mut MetafileState,
) -> Option<ReadResult<Command>> {
    Some(match id {
        1 => cur.read_int(state).map(|version| Command::MetafileVersion { version }),
        2 => optional_string(cur).map(|description| Command::MetafileDescription { description }),
        3 => vdc_type(cur, state),
        4 => integer_precision(cur, state),
        5 => real_precision(cur, state).map(|precision| {
            state.real_precision = precision;
            Command::RealPrecision { precision }
        }),
        6 => index_precision(cur, state),
        7 => colour_precision(cur, state),
        8 => colour_index_precision(cur, state),
        9 => cur
            .read_colour_index(state, None)
            .map(|index| Command::MaximumColourIndex { index }),
        10 => colour_value_extent(cur, state),
        11 => element_list(cur, state),
        12 => Ok(Command::MetafileDefaultsReplacement),
        13 => font_list(cur),
        14 => character_set_list(cur),
        15 => cur.read_enum().map(|coding| {
            state.char_coding = match coding {
                1 => CharCoding::Basic8Bit,
                2 => CharCoding::Extended7Bit,
                3 => CharCoding::Extended8Bit,
                _ => CharCoding::Basic7Bit,
            };
            Command::CharacterCodingAnnouncer { coding }
        }),
        16 => name_precision(cur, state),
        17 => max_vdc_extent(cur, state),
        19 => colour_model(cur, state),
        21 => font_properties(cur, state),
        _ => return None,
    })
}

fn optional_string(cur: &mut ArgCursor<'_>) -> ReadResult<String> {
    if cur.is_eof() {
        Ok(String::new())
    } else {
        cur.read_string()
    }
}

fn vdc_type(cur: &mut ArgCursor<'_>, state: &mut MetafileState) -> ReadResult<Command> {
    let value = cur.read_enum()?;
    let vdc_type = match value {
        0 => VdcType::Integer,
        1 => VdcType::Real,
        other => {
            cur.push_note(format!("VDC type {} outside the enumeration", other));
            VdcType::Integer
        }
    };
    state.vdc_type = vdc_type;
    Ok(Command::VdcType { vdc_type })
}

fn integer_precision(cur: &mut ArgCursor<'_>, state: &mut MetafileState) -> ReadResult<Command> {
    let bits = cur.read_int(state)?;
    if !state.set_integer_precision(bits) {
        cur.push_note(format!("integer precision {} not supported", bits));
    }
    Ok(Command::IntegerPrecision { bits })
}

fn index_precision(cur: &mut ArgCursor<'_>, state: &mut MetafileState) -> ReadResult<Command> {
    let bits = cur.read_int(state)?;
    if !state.set_index_precision(bits) {
        cur.push_note(format!("index precision {} not supported", bits));
    }
    Ok(Command::IndexPrecision { bits })
}

fn colour_precision(cur: &mut ArgCursor<'_>, state: &mut MetafileState) -> ReadResult<Command> {
    let bits = cur.read_int(state)?;
    if !state.set_colour_precision(bits) {
        cur.push_note(format!("colour precision {} not supported", bits));
    }
    Ok(Command::ColourPrecision { bits })
}

fn colour_index_precision(
    cur: &mut ArgCursor<'_>,
    state: &mut MetafileState,
) -> ReadResult<Command> {
    let bits = cur.read_int(state)?;
    if !state.set_colour_index_precision(bits) {
        cur.push_note(format!("colour index precision {} not supported", bits));
    }
    Ok(Command::ColourIndexPrecision { bits })
}

fn name_precision(cur: &mut ArgCursor<'_>, state: &mut MetafileState) -> ReadResult<Command> {
    let bits = cur.read_int(state)?;
    if !state.set_name_precision(bits) {
        cur.push_note(format!("name precision {} not supported", bits));
    }
    Ok(Command::NamePrecision { bits })
}

/// REAL PRECISION / VDC REAL PRECISION argument triple: representation
/// enum, exponent-or-whole width, fraction width. Unrecognized triples fall
/// back to fixed 32-bit (ISO 8632-3 6.4).
pub(crate) fn real_precision(
    cur: &mut ArgCursor<'_>,
    state: &MetafileState,
) -> ReadResult<RealPrecision> {
    let representation = cur.read_enum()?;
    let first = cur.read_int(state)?;
    let second = cur.read_int(state)?;
    let precision = match (representation, first, second) {
        (0, 9, 23) => RealPrecision::Floating32,
        (0, 12, 52) => RealPrecision::Floating64,
        (1, 16, 16) => RealPrecision::Fixed32,
        (1, 32, 32) => RealPrecision::Fixed64,
        _ => {
            cur.push_note(format!(
                "real precision ({}, {}, {}) not supported",
                representation, first, second
            ));
            RealPrecision::Fixed32
        }
    };
    Ok(precision)
}

fn colour_value_extent(cur: &mut ArgCursor<'_>, state: &mut MetafileState) -> ReadResult<Command> {
    if state.colour_model != crate::state::ColourModel::Rgb {
        cur.push_note(format!(
            "colour value extent for model {:?} not supported",
            state.colour_model
        ));
        return Ok(Command::ColourValueExtent {
            min: state.colour_extent_min,
            max: state.colour_extent_max,
        });
    }
    let bits = state.colour_precision;
    let mut min = [0u32; 3];
    let mut max = [0u32; 3];
    for slot in &mut min {
        *slot = cur.read_uint_bits(bits)?;
    }
    for slot in &mut max {
        *slot = cur.read_uint_bits(bits)?;
    }
    state.colour_extent_min = min;
    state.colour_extent_max = max;
    Ok(Command::ColourValueExtent { min, max })
}

fn element_list(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let count = cur.read_int(state)?;
    let mut elements = Vec::new();
    for _ in 0..count.max(0) {
        let class = cur.read_index(state)?;
        let id = cur.read_index(state)?;
        let entry = if class == -1 {
            match usize::try_from(id)
                .ok()
                .and_then(|i| ELEMENT_SET_NAMES.get(i).copied())
            {
                Some(name) => MfElement::Named(name),
                None => MfElement::Pair(class, id),
            }
        } else {
            MfElement::Pair(class, id)
        };
        elements.push(entry);
    }
    Ok(Command::MetafileElementList { elements })
}

fn font_list(cur: &mut ArgCursor<'_>) -> ReadResult<Command> {
    let mut fonts = Vec::new();
    while !cur.is_eof() {
        let name = cur.read_string()?;
        if !name.is_empty() {
            fonts.push(name);
        }
    }
    Ok(Command::FontList { fonts })
}

fn character_set_list(cur: &mut ArgCursor<'_>) -> ReadResult<Command> {
    let mut sets = Vec::new();
    while !cur.is_eof() {
        let set_type = cur.read_enum()?;
        let designation = cur.read_string()?;
        sets.push((set_type, designation));
    }
    Ok(Command::CharacterSetList { sets })
}

fn max_vdc_extent(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let first = cur.read_point(state)?;
    let second = cur.read_point(state)?;
    Ok(Command::MaximumVdcExtent { first, second })
}

fn colour_model(cur: &mut ArgCursor<'_>, state: &mut MetafileState) -> ReadResult<Command> {
    use crate::state::ColourModel;
    let model = cur.read_index(state)?;
    match model {
        1 => state.colour_model = ColourModel::Rgb,
        2 => state.colour_model = ColourModel::Cielab,
        3 => state.colour_model = ColourModel::Cieluv,
        4 => state.colour_model = ColourModel::Cmyk,
        5 => state.colour_model = ColourModel::RgbRelated,
        other => cur.push_note(format!("colour model {} outside the index range", other)),
    }
    Ok(Command::ColourModel { model })
}

fn font_properties(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let mut properties = Vec::new();
    while !cur.is_eof() {
        let indicator = cur.read_index(state)?;
        let priority = cur.read_int(state)?;
        let record = read_sdr(cur, state)?;
        properties.push(FontProperty {
            indicator,
            priority,
            record,
        });
    }
    Ok(Command::FontProperties { properties })
}

/// Signed two's-complement extent for a bit width: `[-2^(P-1), 2^(P-1)-1]`.
pub(crate) fn signed_extent(bits: i32) -> (i64, i64) {
    let shift = bits.clamp(1, 62) as u32 - 1;
    (-(1i64 << shift), (1i64 << shift) - 1)
}

/// Clear-text body of a real-precision statement (shared with class 3).
pub(crate) fn real_precision_body(keyword: &str, precision: RealPrecision) -> String {
    let extents = match precision {
        RealPrecision::Fixed32 => "-32768.0000, 32767.0000, 16 % 16 binary bits %",
        RealPrecision::Fixed64 => "-2147483648.0000, 2147483647.0000, 32 % 32 binary bits %",
        RealPrecision::Floating32 => "-511.0000, 511.0000, 7 % 10 binary bits %",
        RealPrecision::Floating64 => "-1023.0000, 1023.0000, 15 % 13 binary bits %",
    };
    format!("{} {};", keyword, extents)
}

pub(crate) fn emit(
    cmd: &Command,
    w: &mut ClearTextWriter<'_>,
    es: &mut EmitState,
) -> io::Result<()> {
    let d = INDENT_DESCRIPTOR;
    match cmd {
        Command::MetafileVersion { version } => {
            w.statement(d, &format!("mfversion {};", version))
        }
        Command::MetafileDescription { description } => {
            w.statement(d, &format!("mfdesc {};", quote_str(description)))
        }
        Command::VdcType { vdc_type } => {
            let printed = es.apply_vdc_type(*vdc_type);
            let keyword = match printed {
                VdcType::Integer => "integer",
                VdcType::Real => "real",
            };
            w.statement(d, &format!("vdctype {};", keyword))
        }
        Command::IntegerPrecision { bits } => {
            let (lo, hi) = signed_extent(*bits);
            w.statement(
                d,
                &format!("integerprec {}, {} % {} binary bits %;", lo, hi, bits),
            )
        }
        Command::RealPrecision { precision } => {
            w.statement(d, &real_precision_body("realprec", *precision))
        }
        Command::IndexPrecision { bits } => {
            let (lo, hi) = signed_extent(*bits);
            w.statement(
                d,
                &format!("indexprec {}, {} % {} binary bits %;", lo, hi, bits),
            )
        }
        Command::ColourPrecision { bits } => {
            let max = (1u64 << (*bits).clamp(1, 32)) - 1;
            w.statement(d, &format!("colrprec {};", max))
        }
        Command::ColourIndexPrecision { bits } => {
            let (_, hi) = signed_extent(*bits);
            w.statement(d, &format!("colrindexprec {};", hi))
        }
        Command::MaximumColourIndex { index } => {
            w.statement(d, &format!("maxcolrindex {};", index))
        }
        Command::ColourValueExtent { min, max } => w.statement(
            d,
            &format!(
                "colrvalueext {} {} {}, {} {} {};",
                min[0], min[1], min[2], max[0], max[1], max[2]
            ),
        ),
        Command::MetafileElementList { elements } => {
            let joined = elements
                .iter()
                .map(MfElement::text)
                .collect::<Vec<_>>()
                .join("', '");
            w.statement(d, &format!("mfelemlist '{}';", joined))
        }
        Command::MetafileDefaultsReplacement => w.statement(d, "begmfdefaults;"),
        Command::ColourModel { model } => {
            let keyword = match model {
                1 => "rgb".to_string(),
                2 => "cielab".to_string(),
                3 => "cieluv".to_string(),
                4 => "cmyk".to_string(),
                5 => "rgbrelated".to_string(),
                other => other.to_string(),
            };
            w.statement(d, &format!("colrmodel {};", keyword))
        }
        Command::FontList { fonts } => {
            if fonts.is_empty() {
                w.statement(d, "fontlist;")
            } else {
                let joined = fonts
                    .iter()
                    .map(|f| quote_str(f))
                    .collect::<Vec<_>>()
                    .join(", ");
                w.statement(d, &format!("fontlist {};", joined))
            }
        }
        Command::CharacterSetList { sets } => {
            let mut body = String::from("charsetlist");
            for (set_type, designation) in sets {
                body.push(' ');
                body.push_str(&charset_type_keyword(*set_type));
                body.push(' ');
                body.push_str(&quote_str(designation));
            }
            body.push(';');
            w.statement(d, &body)
        }
        Command::CharacterCodingAnnouncer { coding } => {
            let keyword = match coding {
                0 => "basic7bit".to_string(),
                1 => "basic8bit".to_string(),
                2 => "extd7bit".to_string(),
                3 => "extd8bit".to_string(),
                other => other.to_string(),
            };
            w.statement(d, &format!("charcoding {};", keyword))
        }
        Command::NamePrecision { bits } => {
            let (lo, hi) = signed_extent(*bits);
            w.statement(
                d,
                &format!("nameprec {}, {} % {} binary bits %;", lo, hi, bits),
            )
        }
        Command::MaximumVdcExtent { first, second } => {
            w.statement(
                d,
                &format!("MAXVDCEXT {} {};", es.fmt_point(*first), es.fmt_point(*second)),
            )?;
            w.blank_line()
        }
        Command::FontProperties { properties } => {
            let mut body = String::from("fontprop");
            for property in properties {
                body.push_str(&format!(
                    " {} {} {}",
                    property.indicator,
                    property.priority,
                    crate::text::fmt_sdr(&property.record)
                ));
            }
            body.push(';');
            w.statement(d, &body)
        }
        _ => Ok(()),
    }
}

fn charset_type_keyword(set_type: i16) -> String {
    match set_type {
        0 => "STD94".to_string(),
        1 => "STD96".to_string(),
        2 => "STD94MULTIBYTE".to_string(),
        3 => "STD96MULTIBYTE".to_string(),
        4 => "COMPLETECODE".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::types::Point;

    fn emit_one(cmd: &Command) -> String {
        let mut out = Vec::new();
        let mut w = ClearTextWriter::new(&mut out, 80);
        let mut es = EmitState::new(&CodecConfig::default());
        emit(cmd, &mut w, &mut es).expect("vec sink");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_integer_precision_decode_updates_state() {
        let args = [0x00, 0x20]; // 32, read at the default 16-bit width
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(4, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(cmd, Command::IntegerPrecision { bits: 32 });
        assert_eq!(state.integer_precision, 32);
    }

    #[test]
    fn test_integer_precision_extent_boundaries() {
        assert_eq!(
            emit_one(&Command::IntegerPrecision { bits: 8 }),
            " integerprec -128, 127 % 8 binary bits %;\n"
        );
        assert_eq!(
            emit_one(&Command::IntegerPrecision { bits: 32 }),
            " integerprec -2147483648, 2147483647 % 32 binary bits %;\n"
        );
    }

    #[test]
    fn test_real_precision_decode_variants() {
        let mut state = MetafileState::default();
        // floating, 9 exponent bits, 23 fraction bits
        let args = [0x00, 0x00, 0x00, 0x09, 0x00, 0x17];
        let mut cur = ArgCursor::new(&args);
        let cmd = decode(5, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(
            cmd,
            Command::RealPrecision {
                precision: RealPrecision::Floating32
            }
        );

        // unknown triple falls back to fixed 32
        let args = [0x00, 0x01, 0x00, 0x08, 0x00, 0x08];
        let mut cur = ArgCursor::new(&args);
        let cmd = decode(5, &mut cur, &mut state)
            .expect("known id")
            .expect("fallback");
        assert_eq!(
            cmd,
            Command::RealPrecision {
                precision: RealPrecision::Fixed32
            }
        );
        assert_eq!(cur.take_notes().len(), 1);
    }

    #[test]
    fn test_real_precision_emit_forms() {
        assert_eq!(
            emit_one(&Command::RealPrecision {
                precision: RealPrecision::Floating32
            }),
            " realprec -511.0000, 511.0000, 7 % 10 binary bits %;\n"
        );
        assert_eq!(
            emit_one(&Command::RealPrecision {
                precision: RealPrecision::Fixed32
            }),
            " realprec -32768.0000, 32767.0000, 16 % 16 binary bits %;\n"
        );
    }

    #[test]
    fn test_colour_precision_emit_unsigned_max() {
        assert_eq!(
            emit_one(&Command::ColourPrecision { bits: 8 }),
            " colrprec 255;\n"
        );
        assert_eq!(
            emit_one(&Command::ColourPrecision { bits: 16 }),
            " colrprec 65535;\n"
        );
    }

    #[test]
    fn test_colour_index_precision_emit_signed_max() {
        assert_eq!(
            emit_one(&Command::ColourIndexPrecision { bits: 8 }),
            " colrindexprec 127;\n"
        );
        assert_eq!(
            emit_one(&Command::ColourIndexPrecision { bits: 16 }),
            " colrindexprec 32767;\n"
        );
    }

    #[test]
    fn test_colour_value_extent_decode_and_emit() {
        let args = [0, 0, 0, 255, 255, 255];
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(10, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(state.colour_extent_max, [255, 255, 255]);
        assert_eq!(
            emit_one(&cmd),
            " colrvalueext 0 0 0, 255 255 255;\n"
        );
    }

    #[test]
    fn test_element_list_named_and_pair() {
        // count=2, (-1, 6) => VERSION4, (4, 1) => raw pair
        let args = [
            0x00, 0x02, 0xFF, 0xFF, 0x00, 0x06, 0x00, 0x04, 0x00, 0x01,
        ];
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(11, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(
            cmd,
            Command::MetafileElementList {
                elements: vec![MfElement::Named("VERSION4"), MfElement::Pair(4, 1)]
            }
        );
        assert_eq!(emit_one(&cmd), " mfelemlist 'VERSION4', '(4,1)';\n");
    }

    #[test]
    fn test_font_list_decode_and_emit() {
        let args = [
            0x05, b'T', b'I', b'M', b'E', b'S', 0x05, b'A', b'R', b'I', b'A', b'L',
        ];
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(13, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(emit_one(&cmd), " fontlist 'TIMES', 'ARIAL';\n");
    }

    #[test]
    fn test_character_set_list_emit() {
        let cmd = Command::CharacterSetList {
            sets: vec![(0, "B".into()), (1, "A".into())],
        };
        assert_eq!(emit_one(&cmd), " charsetlist STD94 'B' STD96 'A';\n");
    }

    #[test]
    fn test_colour_model_updates_state() {
        let args = [0x00, 0x04]; // CMYK
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(19, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(state.colour_model, crate::state::ColourModel::Cmyk);
        assert_eq!(emit_one(&cmd), " colrmodel cmyk;\n");
    }

    #[test]
    fn test_vdc_type_emit_override() {
        let cmd = Command::VdcType {
            vdc_type: VdcType::Integer,
        };
        assert_eq!(emit_one(&cmd), " vdctype real;\n");
    }

    #[test]
    fn test_max_vdc_extent_emit_trailing_blank() {
        let cmd = Command::MaximumVdcExtent {
            first: Point::new(0.0, 0.0),
            second: Point::new(32767.0, 32767.0),
        };
        assert_eq!(emit_one(&cmd), " MAXVDCEXT (0,0) (32767,32767);\n\n");
    }
}
