// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary decode pipeline (ISO 8632-3).
//!
//! `bytes -> framer -> factory (threaded through the metafile state) ->
//! command list`. Decoding is total: malformed input produces diagnostics,
//! never a panic or an error return. Only a framing violation stops the
//! pass, and even then every previously decoded command is preserved.

pub mod cursor;
pub(crate) mod factory;
pub mod framer;
pub mod sdr;

use crate::diag::{Diagnostic, Severity};
use crate::state::MetafileState;
use crate::Decoded;
use self::framer::Framer;

/// Outer stream phases (ISO 8632-1 metafile structure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    MetafileBody,
    PictureDescriptor,
    PictureBody,
    Eof,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Header => "header",
            Phase::MetafileBody => "metafile body",
            Phase::PictureDescriptor => "picture descriptor",
            Phase::PictureBody => "picture body",
            Phase::Eof => "end of metafile",
        }
    }
}

/// Decode a complete binary stream into commands plus diagnostics.
pub(crate) fn decode(bytes: &[u8]) -> Decoded {
    let mut state = MetafileState::default();
    let mut commands = Vec::new();
    let mut diagnostics = Vec::new();
    let mut framer = Framer::new(bytes);
    let mut phase = Phase::Header;

    loop {
        match framer.next_frame() {
            Ok(None) => {
                if phase != Phase::Eof && !commands.is_empty() {
                    diagnostics.push(Diagnostic::new(
                        Severity::Info,
                        0,
                        0,
                        framer.offset(),
                        "input ended before END METAFILE",
                    ));
                }
                break;
            }
            Ok(Some(frame)) => {
                track_phase(&mut phase, frame.element_class, frame.element_id,
                    frame.offset, &mut diagnostics);
                let is_end = frame.element_class == 0 && frame.element_id == 2;
                let command = factory::decode_frame(&frame, &mut state, &mut diagnostics);
                commands.push(command);
                if is_end {
                    if framer.remaining() > 0 {
                        diagnostics.push(Diagnostic::new(
                            Severity::Info,
                            0,
                            2,
                            framer.offset(),
                            format!(
                                "{} byte(s) after END METAFILE ignored",
                                framer.remaining()
                            ),
                        ));
                    }
                    break;
                }
            }
            Err(err) => {
                diagnostics.push(Diagnostic::new(
                    Severity::Fatal,
                    0,
                    0,
                    err.offset(),
                    err.to_string(),
                ));
                log::warn!("[decode] halted: {}", err);
                break;
            }
        }
    }

    Decoded {
        commands,
        diagnostics,
    }
}

/// Apply a delimiter's phase transition, logging unexpected ones. The
/// decoder never aborts on a bad transition: real-world files are loose.
fn track_phase(
    phase: &mut Phase,
    element_class: u8,
    element_id: u8,
    offset: usize,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if element_class != 0 {
        return;
    }
    let (expected, next, keyword) = match element_id {
        1 => (Phase::Header, Phase::MetafileBody, "BEGIN METAFILE"),
        2 => (Phase::MetafileBody, Phase::Eof, "END METAFILE"),
        3 => (Phase::MetafileBody, Phase::PictureDescriptor, "BEGIN PICTURE"),
        4 => (Phase::PictureDescriptor, Phase::PictureBody, "BEGIN PICTURE BODY"),
        5 => (Phase::PictureBody, Phase::MetafileBody, "END PICTURE"),
        _ => return,
    };
    if *phase != expected {
        diagnostics.push(Diagnostic::new(
            Severity::Info,
            element_class,
            element_id,
            offset,
            format!("{} while in {}", keyword, phase.name()),
        ));
        log::debug!("[decode] {} while in {}", keyword, phase.name());
    }
    *phase = next;
}
