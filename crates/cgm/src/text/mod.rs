// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Clear-text emission (ISO 8632-4).
//!
//! One statement per command, terminated by `;`. Lexical rules are applied
//! uniformly: delimiter keywords are UPPERCASE and flush-left (picture and
//! application-structure delimiters carry one leading space), metafile
//! descriptor statements are lowercase with one space, everything from the
//! picture descriptor down is lowercase with two spaces. `MAXVDCEXT` and
//! `MESSAGE` keep their historical uppercase one-space form.
//!
//! The emitter replays the VDC-type portion of the metafile state so that
//! coordinate formatting matches what the decoder saw, including the
//! integer-VDC compatibility override.

pub mod writer;

use crate::commands::{attribute, control, delimiter, external, metafile, picture, primitive};
use crate::commands::Command;
use crate::config::{CodecConfig, VdcMode};
use crate::diag::{Diagnostic, Severity};
use crate::state::VdcType;
use crate::types::{Point, Sdr, SdrValue};
use self::writer::ClearTextWriter;
use std::io;

/// Indent for metafile descriptor statements.
pub(crate) const INDENT_DESCRIPTOR: &str = " ";
/// Indent for picture descriptor, control, primitive and attribute
/// statements.
pub(crate) const INDENT_BODY: &str = "  ";

/// Emit-side state: the formatting-relevant slice of the metafile state,
/// replayed command by command.
pub(crate) struct EmitState {
    /// VDC values print as reals (either the stream declared real VDCs or
    /// the compatibility override is active).
    pub vdc_real_out: bool,
    pub vdc_mode: VdcMode,
    pub emit_unknown_as_comment: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl EmitState {
    pub(crate) fn new(config: &CodecConfig) -> Self {
        EmitState {
            vdc_real_out: false,
            vdc_mode: config.vdc_mode,
            emit_unknown_as_comment: config.emit_unknown_as_comment,
            diagnostics: Vec::new(),
        }
    }

    /// Record the VDC type declared by the stream, applying the override.
    /// Returns the type to print.
    pub(crate) fn apply_vdc_type(&mut self, declared: VdcType) -> VdcType {
        match (declared, self.vdc_mode) {
            (VdcType::Integer, VdcMode::ForceRealVdcOnEmit) => {
                self.vdc_real_out = true;
                self.diagnostics.push(Diagnostic::new(
                    Severity::Info,
                    1,
                    3,
                    0,
                    "emitting vdctype real instead of integer (as decoded) for viewer \
                     compatibility; subsequent VDC values are formatted as reals",
                ));
                log::debug!("[emit] integer VDC type rewritten as real");
                VdcType::Real
            }
            (VdcType::Integer, VdcMode::PreserveVdcType) => {
                self.vdc_real_out = false;
                VdcType::Integer
            }
            (VdcType::Real, _) => {
                self.vdc_real_out = true;
                VdcType::Real
            }
        }
    }

    /// Format one VDC value: real with four decimals, or a bare integer
    /// when the stream's VDCs are integral and the override is off.
    pub(crate) fn fmt_vdc(&self, value: f64) -> String {
        if self.vdc_real_out {
            fmt_real(value)
        } else {
            format!("{}", value as i64)
        }
    }

    /// Format a point as `(x,y)`. When y is zero and x negative, y keeps a
    /// minus sign (reference-writer interop quirk).
    pub(crate) fn fmt_point(&self, p: Point) -> String {
        let x = self.fmt_vdc(p.x);
        let y = self.fmt_vdc(p.y);
        let sign = if y == self.fmt_vdc(0.0) && p.x < 0.0 {
            "-"
        } else {
            ""
        };
        format!("({},{}{})", x, sign, y)
    }
}

/// Four digits after the decimal point, no scientific notation.
pub(crate) fn fmt_real(value: f64) -> String {
    format!("{:.4}", value)
}

/// Single-quoted string literal: inner quotes doubled, control characters
/// other than CR/LF/TAB dropped.
pub(crate) fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("''");
        } else if c as u32 >= 32 || matches!(c, '\r' | '\n' | '\t') {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

pub(crate) fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Clear-text form of an SDR: `type count value...` per member, nested
/// records parenthesized.
pub(crate) fn fmt_sdr(sdr: &Sdr) -> String {
    let mut parts = Vec::new();
    for member in &sdr.members {
        parts.push(member.data_type.code().to_string());
        parts.push(member.values.len().to_string());
        for value in &member.values {
            parts.push(fmt_sdr_value(value));
        }
    }
    parts.join(" ")
}

fn fmt_sdr_value(value: &SdrValue) -> String {
    match value {
        SdrValue::Record(nested) => format!("({})", fmt_sdr(nested)),
        SdrValue::ColourIndex(i) => i.to_string(),
        SdrValue::Colour { r, g, b } => format!("{} {} {}", r, g, b),
        SdrValue::Name(v) | SdrValue::Integer(v) | SdrValue::Index(v) => v.to_string(),
        SdrValue::Enumerated(v) => v.to_string(),
        SdrValue::Real(v) | SdrValue::Vdc(v) | SdrValue::ViewportCoordinate(v) => fmt_real(*v),
        SdrValue::String(s) => quote_str(s),
        SdrValue::Unsigned8(v) => v.to_string(),
        SdrValue::Unsigned16(v) => v.to_string(),
        SdrValue::Unsigned32(v) => v.to_string(),
    }
}

/// Emit the command list as clear text. Returns the emit-side diagnostics;
/// sink errors surface unchanged.
pub(crate) fn emit_with(
    config: &CodecConfig,
    commands: &[Command],
    sink: &mut dyn io::Write,
) -> io::Result<Vec<Diagnostic>> {
    let mut w = ClearTextWriter::new(sink, config.wrap_column);
    let mut es = EmitState::new(config);
    for command in commands {
        emit_command(command, &mut w, &mut es)?;
    }
    Ok(es.diagnostics)
}

fn emit_command(
    cmd: &Command,
    w: &mut ClearTextWriter<'_>,
    es: &mut EmitState,
) -> io::Result<()> {
    if let Command::Unknown {
        element_class,
        element_id,
        ..
    } = cmd
    {
        if es.emit_unknown_as_comment {
            return w.statement(
                "",
                &format!(
                    "% Unknown command: Class={}, ID={} %;",
                    element_class, element_id
                ),
            );
        }
        return Ok(());
    }

    match cmd.element_class() {
        0 => delimiter::emit(cmd, w, es),
        1 => metafile::emit(cmd, w, es),
        2 => picture::emit(cmd, w, es),
        3 => control::emit(cmd, w, es),
        4 => primitive::emit(cmd, w, es),
        5 => attribute::emit(cmd, w, es),
        7 | 9 => external::emit(cmd, w, es),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SdrDataType, SdrMember};

    #[test]
    fn test_fmt_real_keeps_four_decimals() {
        assert_eq!(fmt_real(1.0), "1.0000");
        assert_eq!(fmt_real(-0.5), "-0.5000");
        assert_eq!(fmt_real(32767.0), "32767.0000");
    }

    #[test]
    fn test_quote_str_doubles_inner_quotes() {
        assert_eq!(quote_str("it's"), "'it''s'");
        assert_eq!(quote_str(""), "''");
    }

    #[test]
    fn test_quote_str_drops_control_characters() {
        assert_eq!(quote_str("a\u{0}b\u{7}c"), "'abc'");
        assert_eq!(quote_str("a\tb"), "'a\tb'");
    }

    #[test]
    fn test_vdc_formatting_follows_override() {
        let mut es = EmitState::new(&CodecConfig::default());
        assert_eq!(es.fmt_vdc(16.0), "16");
        assert_eq!(es.apply_vdc_type(VdcType::Integer), VdcType::Real);
        assert_eq!(es.fmt_vdc(16.0), "16.0000");
        assert_eq!(es.diagnostics.len(), 1);
        assert_eq!(es.diagnostics[0].severity, Severity::Info);
    }

    #[test]
    fn test_vdc_type_preserved_when_configured() {
        let config = CodecConfig {
            vdc_mode: VdcMode::PreserveVdcType,
            ..CodecConfig::default()
        };
        let mut es = EmitState::new(&config);
        assert_eq!(es.apply_vdc_type(VdcType::Integer), VdcType::Integer);
        assert_eq!(es.fmt_vdc(16.0), "16");
        assert!(es.diagnostics.is_empty());
    }

    #[test]
    fn test_point_negative_zero_quirk() {
        let mut es = EmitState::new(&CodecConfig::default());
        es.vdc_real_out = true;
        assert_eq!(es.fmt_point(Point::new(-5.0, 0.0)), "(-5.0000,-0.0000)");
        assert_eq!(es.fmt_point(Point::new(5.0, 0.0)), "(5.0000,0.0000)");
    }

    #[test]
    fn test_fmt_sdr_members() {
        let sdr = Sdr {
            members: vec![SdrMember {
                data_type: SdrDataType::Integer,
                values: vec![SdrValue::Integer(3), SdrValue::Integer(-1)],
            }],
        };
        assert_eq!(fmt_sdr(&sdr), "5 2 3 -1");
    }
}
