// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Routing from framed `(class, id, args)` tuples to typed commands.
//!
//! This is the single registration point: adding a command means adding its
//! enum variant, its decoder in the class module, and its clear-text form.
//! Unknown `(class, id)` pairs and decode failures both materialize as
//! `Command::Unknown` carrying the argument bytes verbatim; the difference
//! is the diagnostic severity.

use crate::commands::{
    attribute, control, delimiter, external, metafile, picture, primitive, Command,
};
use crate::diag::{Diagnostic, Severity};
use crate::state::MetafileState;

use super::cursor::ArgCursor;
use super::framer::Frame;

/// Decode one framed command, pushing any diagnostics it produced.
pub(crate) fn decode_frame(
    frame: &Frame,
    state: &mut MetafileState,
    diagnostics: &mut Vec<Diagnostic>,
) -> Command {
    let mut cur = ArgCursor::new(&frame.args);

    let decoded = match frame.element_class {
        0 => delimiter::decode(frame.element_id, &mut cur, state),
        1 => metafile::decode(frame.element_id, &mut cur, state),
        2 => picture::decode(frame.element_id, &mut cur, state),
        3 => control::decode(frame.element_id, &mut cur, state),
        4 => primitive::decode(frame.element_id, &mut cur, state),
        5 => attribute::decode(frame.element_id, &mut cur, state),
        7 => external::decode_external(frame.element_id, &mut cur, state),
        9 => external::decode_application(frame.element_id, &mut cur, state),
        _ => None,
    };

    for note in cur.take_notes() {
        diagnostics.push(Diagnostic::new(
            Severity::Unsupported,
            frame.element_class,
            frame.element_id,
            frame.offset,
            note,
        ));
    }

    match decoded {
        Some(Ok(command)) => command,
        Some(Err(err)) => {
            diagnostics.push(Diagnostic::new(
                Severity::Unsupported,
                frame.element_class,
                frame.element_id,
                frame.offset,
                err.to_string(),
            ));
            log::debug!(
                "[factory] class={} id={} kept as unknown: {}",
                frame.element_class,
                frame.element_id,
                err
            );
            unknown(frame)
        }
        None => {
            diagnostics.push(Diagnostic::new(
                Severity::Unimplemented,
                frame.element_class,
                frame.element_id,
                frame.offset,
                format!(
                    "no decoder for class {} id {}",
                    frame.element_class, frame.element_id
                ),
            ));
            log::debug!(
                "[factory] no decoder for class={} id={}",
                frame.element_class,
                frame.element_id
            );
            unknown(frame)
        }
    }
}

fn unknown(frame: &Frame) -> Command {
    Command::Unknown {
        element_class: frame.element_class,
        element_id: frame.element_id,
        bytes: frame.args.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(class: u8, id: u8, args: &[u8]) -> Frame {
        Frame {
            element_class: class,
            element_id: id,
            args: args.to_vec(),
            offset: 0,
        }
    }

    #[test]
    fn test_known_command_decodes() {
        let mut state = MetafileState::default();
        let mut diagnostics = Vec::new();
        let cmd = decode_frame(&frame(1, 1, &[0x00, 0x04]), &mut state, &mut diagnostics);
        assert_eq!(cmd, Command::MetafileVersion { version: 4 });
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_pair_preserves_bytes() {
        let mut state = MetafileState::default();
        let mut diagnostics = Vec::new();
        let cmd = decode_frame(&frame(9, 42, &[0xAB, 0xCD]), &mut state, &mut diagnostics);
        assert_eq!(
            cmd,
            Command::Unknown {
                element_class: 9,
                element_id: 42,
                bytes: vec![0xAB, 0xCD]
            }
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Unimplemented);
    }

    #[test]
    fn test_truncated_args_become_unknown() {
        let mut state = MetafileState::default();
        let mut diagnostics = Vec::new();
        // MFVERSION wants a 16-bit integer; give it one byte.
        let cmd = decode_frame(&frame(1, 1, &[0x00]), &mut state, &mut diagnostics);
        assert_eq!(
            cmd,
            Command::Unknown {
                element_class: 1,
                element_id: 1,
                bytes: vec![0x00]
            }
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Unsupported);
    }

    #[test]
    fn test_escape_class_is_unknown() {
        let mut state = MetafileState::default();
        let mut diagnostics = Vec::new();
        let cmd = decode_frame(&frame(6, 1, &[]), &mut state, &mut diagnostics);
        assert!(matches!(cmd, Command::Unknown { element_class: 6, .. }));
    }
}
