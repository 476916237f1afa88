// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class 7 (external) and class 9 (application structure descriptor)
//! elements.

use crate::binary::cursor::{ArgCursor, ReadResult};
use crate::binary::sdr::read_sdr;
use crate::state::MetafileState;
use crate::text::writer::ClearTextWriter;
use crate::text::{fmt_sdr, quote_str, yes_no, EmitState};
use std::io;

use super::Command;

pub(crate) fn decode_external(
    id: u8,
    cur: &mut ArgCursor<'_>,
    _state: &mut MetafileState,
) -> Option<ReadResult<Command>> {
    Some(match id {
        1 => message(cur),
        _ => return None,
    })
}

pub(crate) fn decode_application(
    id: u8,
    cur: &mut ArgCursor<'_>,
    state: &mut MetafileState,
) -> Option<ReadResult<Command>> {
    Some(match id {
        1 => attribute(cur, state),
        _ => return None,
    })
}

fn message(cur: &mut ArgCursor<'_>) -> ReadResult<Command> {
    let action_required = cur.read_enum()? != 0;
    let text = cur.read_string()?;
    Ok(Command::Message {
        action_required,
        text,
    })
}

fn attribute(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let attribute_type = cur.read_string()?;
    let record = read_sdr(cur, state)?;
    Ok(Command::ApplicationStructureAttribute {
        attribute_type,
        record,
    })
}

pub(crate) fn emit(
    cmd: &Command,
    w: &mut ClearTextWriter<'_>,
    _es: &mut EmitState,
) -> io::Result<()> {
    match cmd {
        Command::Message {
            action_required,
            text,
        } => w.statement(
            " ",
            &format!("MESSAGE {} {};", yes_no(*action_required), quote_str(text)),
        ),
        Command::ApplicationStructureAttribute {
            attribute_type,
            record,
        } => {
            let sdr_text = fmt_sdr(record);
            let body = if sdr_text.is_empty() {
                format!("APSATTR {};", quote_str(attribute_type))
            } else {
                format!("APSATTR {} {};", quote_str(attribute_type), sdr_text)
            };
            w.statement(" ", &body)
        }
        _ => Ok(()),
    }
}
