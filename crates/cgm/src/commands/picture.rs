// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class 2: picture descriptor elements.

use crate::binary::cursor::{ArgCursor, ReadResult};
use crate::state::{ColourMode, MetafileState, SpecificationMode};
use crate::text::writer::ClearTextWriter;
use crate::text::{fmt_real, EmitState, INDENT_BODY};
use std::io;

use super::Command;

pub(crate) fn decode(
    id: u8,
    cur: &mut ArgCursor<'_>,
    state: &mut MetafileState,
) -> Option<ReadResult<Command>> {
    Some(match id {
        1 => scaling_mode(cur, state),
        2 => colour_selection_mode(cur, state),
        3 => {
            specification_mode(cur).map(|mode| {
                state.line_width_mode = to_spec_mode(mode);
                Command::LineWidthSpecificationMode { mode }
            })
        }
        4 => {
            specification_mode(cur).map(|mode| {
                state.marker_size_mode = to_spec_mode(mode);
                Command::MarkerSizeSpecificationMode { mode }
            })
        }
        5 => {
            specification_mode(cur).map(|mode| {
                state.edge_width_mode = to_spec_mode(mode);
                Command::EdgeWidthSpecificationMode { mode }
            })
        }
        6 => vdc_extent(cur, state),
        7 => cur
            .read_direct_rgb(state)
            .map(|(r, g, b)| Command::BackgroundColour { r, g, b }),
        _ => return None,
    })
}

fn scaling_mode(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let mode = cur.read_enum()?;
    // The scale factor is present only in metric mode.
    let factor = if mode == 1 { cur.read_real(state)? } else { 1.0 };
    Ok(Command::ScalingMode { mode, factor })
}

fn colour_selection_mode(
    cur: &mut ArgCursor<'_>,
    state: &mut MetafileState,
) -> ReadResult<Command> {
    let mode = cur.read_enum()?;
    state.colour_mode = match mode {
        0 => ColourMode::Indexed,
        1 => ColourMode::Direct,
        other => {
            cur.push_note(format!("colour selection mode {} outside the enumeration", other));
            ColourMode::Indexed
        }
    };
    Ok(Command::ColourSelectionMode { mode })
}

fn specification_mode(cur: &mut ArgCursor<'_>) -> ReadResult<i16> {
    cur.read_enum()
}

fn to_spec_mode(mode: i16) -> SpecificationMode {
    if mode == 1 {
        SpecificationMode::Scaled
    } else {
        SpecificationMode::Absolute
    }
}

fn vdc_extent(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let lower_left = cur.read_point(state)?;
    let upper_right = cur.read_point(state)?;
    Ok(Command::VdcExtent {
        lower_left,
        upper_right,
    })
}

fn spec_mode_keyword(mode: i16) -> String {
    match mode {
        0 => "abs".to_string(),
        1 => "scaled".to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn emit(
    cmd: &Command,
    w: &mut ClearTextWriter<'_>,
    es: &mut EmitState,
) -> io::Result<()> {
    let d = INDENT_BODY;
    match cmd {
        Command::ScalingMode { mode, factor } => match mode {
            0 => w.statement(d, "scalemode abstract;"),
            1 => w.statement(d, &format!("scalemode metric, {};", fmt_real(*factor))),
            other => w.statement(d, &format!("scalemode {};", other)),
        },
        Command::ColourSelectionMode { mode } => {
            let keyword = match mode {
                0 => "indexed".to_string(),
                1 => "direct".to_string(),
                other => other.to_string(),
            };
            w.statement(d, &format!("colrmode {};", keyword))
        }
        Command::LineWidthSpecificationMode { mode } => {
            w.statement(d, &format!("linewidthmode {};", spec_mode_keyword(*mode)))
        }
        Command::MarkerSizeSpecificationMode { mode } => {
            w.statement(d, &format!("markersizemode {};", spec_mode_keyword(*mode)))
        }
        Command::EdgeWidthSpecificationMode { mode } => {
            w.statement(d, &format!("edgewidthmode {};", spec_mode_keyword(*mode)))
        }
        Command::VdcExtent {
            lower_left,
            upper_right,
        } => w.statement(
            d,
            &format!(
                "vdcext {} {};",
                es.fmt_point(*lower_left),
                es.fmt_point(*upper_right)
            ),
        ),
        Command::BackgroundColour { r, g, b } => {
            w.statement(d, &format!("backcolr {} {} {};", r, g, b))
        }
        _ => Ok(()),
    }
}
