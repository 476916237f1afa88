// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class 0: delimiter elements.

use crate::binary::cursor::{ArgCursor, ReadResult};
use crate::state::MetafileState;
use crate::text::writer::ClearTextWriter;
use crate::text::{quote_str, EmitState};
use std::io;

use super::Command;

pub(crate) fn decode(
    id: u8,
    cur: &mut ArgCursor<'_>,
    _state: &mut MetafileState,
) -> Option<ReadResult<Command>> {
    Some(match id {
        0 => Ok(Command::NoOp),
        1 => optional_name(cur).map(|name| Command::BeginMetafile { name }),
        2 => Ok(Command::EndMetafile),
        3 => optional_name(cur).map(|name| Command::BeginPicture { name }),
        4 => Ok(Command::BeginPictureBody),
        5 => Ok(Command::EndPicture),
        8 => Ok(Command::BeginFigure),
        9 => Ok(Command::EndFigure),
        21 => begin_application_structure(cur),
        22 => Ok(Command::BeginApplicationStructureBody),
        23 => Ok(Command::EndApplicationStructure),
        _ => return None,
    })
}

/// BEGMF and BEGPIC may legally carry no arguments at all.
fn optional_name(cur: &mut ArgCursor<'_>) -> ReadResult<String> {
    if cur.is_eof() {
        Ok(String::new())
    } else {
        cur.read_string()
    }
}

fn begin_application_structure(cur: &mut ArgCursor<'_>) -> ReadResult<Command> {
    let identifier = cur.read_string()?;
    let kind = cur.read_string()?;
    let inheritance = cur.read_enum()?;
    Ok(Command::BeginApplicationStructure {
        identifier,
        kind,
        inheritance,
    })
}

pub(crate) fn emit(
    cmd: &Command,
    w: &mut ClearTextWriter<'_>,
    _es: &mut EmitState,
) -> io::Result<()> {
    match cmd {
        Command::NoOp => Ok(()),
        Command::BeginMetafile { name } => {
            w.statement("", &format!("BEGMF {};", quote_str(name)))
        }
        Command::EndMetafile => w.statement("", "ENDMF;"),
        Command::BeginPicture { name } => {
            w.statement(" ", &format!("BEGPIC {};", quote_str(name)))
        }
        Command::BeginPictureBody => w.statement(" ", "BEGPICBODY;"),
        Command::EndPicture => w.statement("", "ENDPIC;"),
        Command::BeginFigure => w.statement("", "BEGFIG;"),
        Command::EndFigure => w.statement("", "ENDFIG;"),
        Command::BeginApplicationStructure {
            identifier,
            kind,
            inheritance,
        } => {
            let flag = if *inheritance == 0 { "stlist" } else { "aps" };
            w.statement(
                " ",
                &format!(
                    "BEGAPS {} {} {};",
                    quote_str(identifier),
                    quote_str(kind),
                    flag
                ),
            )
        }
        Command::BeginApplicationStructureBody => w.statement(" ", "BEGAPSBODY;"),
        Command::EndApplicationStructure => w.statement(" ", "ENDAPS;"),
        _ => Ok(()),
    }
}
