// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class 3: control elements.
//!
//! The two VDC precision commands mirror their class 1 counterparts but
//! scope to VDC reads only.

use crate::binary::cursor::{ArgCursor, ReadResult};
use crate::state::MetafileState;
use crate::text::writer::ClearTextWriter;
use crate::text::{on_off, EmitState, INDENT_BODY};
use std::io;

use super::metafile::{real_precision, real_precision_body, signed_extent};
use super::Command;

pub(crate) fn decode(
    id: u8,
    cur: &mut ArgCursor<'_>,
    state: &mut MetafileState,
) -> Option<ReadResult<Command>> {
    Some(match id {
        1 => vdc_integer_precision(cur, state),
        2 => real_precision(cur, state).map(|precision| {
            state.vdc_real_precision = precision;
            Command::VdcRealPrecision { precision }
        }),
        4 => cur.read_bool().map(|on| Command::Transparency { on }),
        6 => cur.read_bool().map(|on| Command::ClipIndicator { on }),
        _ => return None,
    })
}

fn vdc_integer_precision(
    cur: &mut ArgCursor<'_>,
    state: &mut MetafileState,
) -> ReadResult<Command> {
    let bits = cur.read_int(state)?;
    if !state.set_vdc_integer_precision(bits) {
        cur.push_note(format!("VDC integer precision {} not supported", bits));
    }
    Ok(Command::VdcIntegerPrecision { bits })
}

pub(crate) fn emit(
    cmd: &Command,
    w: &mut ClearTextWriter<'_>,
    _es: &mut EmitState,
) -> io::Result<()> {
    let d = INDENT_BODY;
    match cmd {
        Command::VdcIntegerPrecision { bits } => {
            let (lo, hi) = signed_extent(*bits);
            w.statement(
                d,
                &format!("vdcintegerprec {}, {} % {} binary bits %;", lo, hi, bits),
            )
        }
        Command::VdcRealPrecision { precision } => {
            w.statement(d, &real_precision_body("vdcrealprec", *precision))
        }
        Command::Transparency { on } => {
            w.statement(d, &format!("transparency {};", on_off(*on)))
        }
        Command::ClipIndicator { on } => w.statement(d, &format!("clip {};", on_off(*on))),
        _ => Ok(()),
    }
}
