// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class 5: attribute elements.
//!
//! Line and edge widths honour the picture descriptor's specification
//! modes (absolute VDC vs scaled real). Version-4 definition elements with
//! no reliable argument grammar (interpolated interior, hatch style and
//! geometric pattern definitions) intentionally have no decoder here and
//! surface through the `Unknown` path.

use crate::binary::cursor::{ArgCursor, ReadResult};
use crate::state::MetafileState;
use crate::text::writer::ClearTextWriter;
use crate::text::{fmt_real, on_off, EmitState, INDENT_BODY};
use crate::types::Colour;
use std::io;

use super::Command;

pub(crate) fn decode(
    id: u8,
    cur: &mut ArgCursor<'_>,
    state: &mut MetafileState,
) -> Option<ReadResult<Command>> {
    Some(match id {
        2 => cur.read_index(state).map(|index| Command::LineType { index }),
        3 => cur
            .read_size(state, state.line_width_mode)
            .map(|width| Command::LineWidth { width }),
        4 => cur.read_colour(state).map(|colour| Command::LineColour { colour }),
        10 => cur
            .read_index(state)
            .map(|index| Command::TextFontIndex { index }),
        12 => cur
            .read_real(state)
            .map(|factor| Command::CharacterExpansionFactor { factor }),
        14 => cur.read_colour(state).map(|colour| Command::TextColour { colour }),
        15 => cur
            .read_vdc(state)
            .map(|height| Command::CharacterHeight { height }),
        16 => character_orientation(cur, state),
        18 => text_alignment(cur, state),
        19 => cur
            .read_index(state)
            .map(|index| Command::CharacterSetIndex { index }),
        20 => cur
            .read_index(state)
            .map(|index| Command::AlternateCharacterSetIndex { index }),
        22 => cur.read_enum().map(|style| Command::InteriorStyle { style }),
        23 => cur.read_colour(state).map(|colour| Command::FillColour { colour }),
        27 => cur.read_index(state).map(|index| Command::EdgeType { index }),
        28 => cur
            .read_size(state, state.edge_width_mode)
            .map(|width| Command::EdgeWidth { width }),
        29 => cur.read_colour(state).map(|colour| Command::EdgeColour { colour }),
        30 => cur.read_bool().map(|on| Command::EdgeVisibility { on }),
        34 => colour_table(cur, state),
        37 => line_cap(cur, state),
        38 => cur.read_index(state).map(|join| Command::LineJoin { join }),
        39 => cur
            .read_index(state)
            .map(|mode| Command::LineTypeContinuation { mode }),
        42 => cur
            .read_index(state)
            .map(|index| Command::RestrictedTextType { index }),
        _ => return None,
    })
}

fn character_orientation(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let x_up = cur.read_vdc(state)?;
    let y_up = cur.read_vdc(state)?;
    let x_base = cur.read_vdc(state)?;
    let y_base = cur.read_vdc(state)?;
    Ok(Command::CharacterOrientation {
        x_up,
        y_up,
        x_base,
        y_base,
    })
}

fn text_alignment(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let horizontal = cur.read_enum()?;
    let vertical = cur.read_enum()?;
    let continuous_horizontal = cur.read_real(state)?;
    let continuous_vertical = cur.read_real(state)?;
    Ok(Command::TextAlignment {
        horizontal,
        vertical,
        continuous_horizontal,
        continuous_vertical,
    })
}

fn colour_table(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let start_index = cur.read_colour_index(state, None)?;
    let mut colours = Vec::new();
    while !cur.is_eof() {
        colours.push(cur.read_direct_rgb(state)?);
    }
    Ok(Command::ColourTable {
        start_index,
        colours,
    })
}

fn line_cap(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let cap = cur.read_index(state)?;
    let dash_cap = cur.read_index(state)?;
    Ok(Command::LineCap { cap, dash_cap })
}

fn fmt_colour(colour: &Colour) -> String {
    match colour {
        Colour::Index(i) => i.to_string(),
        Colour::Rgb { r, g, b } => format!("{} {} {}", r, g, b),
    }
}

fn interior_style_keyword(style: i16) -> String {
    match style {
        0 => "hollow".to_string(),
        1 => "solid".to_string(),
        2 => "pattern".to_string(),
        3 => "hatch".to_string(),
        4 => "empty".to_string(),
        other => other.to_string(),
    }
}

fn horizontal_alignment_keyword(value: i16) -> String {
    match value {
        0 => "normhoriz".to_string(),
        1 => "left".to_string(),
        2 => "ctr".to_string(),
        3 => "right".to_string(),
        4 => "conthoriz".to_string(),
        other => other.to_string(),
    }
}

fn vertical_alignment_keyword(value: i16) -> String {
    match value {
        0 => "normvert".to_string(),
        1 => "top".to_string(),
        2 => "cap".to_string(),
        3 => "half".to_string(),
        4 => "base".to_string(),
        5 => "bottom".to_string(),
        6 => "contvert".to_string(),
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
        Command::LineType { index } => w.statement(d, &format!("linetype {};", index)),
        Command::LineWidth { width } => {
            w.statement(d, &format!("linewidth {};", fmt_real(*width)))
        }
        Command::LineColour { colour } => {
            w.statement(d, &format!("linecolr {};", fmt_colour(colour)))
        }
        Command::TextFontIndex { index } => {
            w.statement(d, &format!("textfontindex {};", index))
        }
        Command::CharacterExpansionFactor { factor } => {
            w.statement(d, &format!("charexpan {};", fmt_real(*factor)))
        }
        Command::TextColour { colour } => {
            w.statement(d, &format!("textcolr {};", fmt_colour(colour)))
        }
        Command::CharacterHeight { height } => {
            w.statement(d, &format!("charheight {};", es.fmt_vdc(*height)))
        }
        Command::CharacterOrientation {
            x_up,
            y_up,
            x_base,
            y_base,
        } => w.statement(
            d,
            &format!(
                "charori {},{} {},{};",
                es.fmt_vdc(*x_up),
                es.fmt_vdc(*y_up),
                es.fmt_vdc(*x_base),
                es.fmt_vdc(*y_base)
            ),
        ),
        Command::TextAlignment {
            horizontal,
            vertical,
            continuous_horizontal,
            continuous_vertical,
        } => w.statement(
            d,
            &format!(
                "textalign {} {} {} {};",
                horizontal_alignment_keyword(*horizontal),
                vertical_alignment_keyword(*vertical),
                fmt_real(*continuous_horizontal),
                fmt_real(*continuous_vertical)
            ),
        ),
        Command::CharacterSetIndex { index } => {
            w.statement(d, &format!("charsetindex {};", index))
        }
        Command::AlternateCharacterSetIndex { index } => {
            w.statement(d, &format!("altcharsetindex {};", index))
        }
        Command::InteriorStyle { style } => {
            w.statement(d, &format!("intstyle {};", interior_style_keyword(*style)))
        }
        Command::FillColour { colour } => {
            w.statement(d, &format!("fillcolr {};", fmt_colour(colour)))
        }
        Command::EdgeType { index } => w.statement(d, &format!("edgetype {};", index)),
        Command::EdgeWidth { width } => {
            w.statement(d, &format!("edgewidth {};", fmt_real(*width)))
        }
        Command::EdgeColour { colour } => {
            w.statement(d, &format!("edgecolr {};", fmt_colour(colour)))
        }
        Command::EdgeVisibility { on } => {
            w.statement(d, &format!("edgevis {};", on_off(*on)))
        }
        Command::ColourTable {
            start_index,
            colours,
        } => {
            let mut body = format!("colrtable {}", start_index);
            for (r, g, b) in colours {
                body.push_str(&format!(" {} {} {}", r, g, b));
            }
            body.push(';');
            w.statement(d, &body)
        }
        Command::LineCap { cap, dash_cap } => {
            w.statement(d, &format!("linecap {} {};", cap, dash_cap))
        }
        Command::LineJoin { join } => w.statement(d, &format!("linejoin {};", join)),
        Command::LineTypeContinuation { mode } => {
            w.statement(d, &format!("linetypecont {};", mode))
        }
        Command::RestrictedTextType { index } => {
            w.statement(d, &format!("restrtexttype {};", index))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::state::{ColourMode, SpecificationMode};

    fn emit_one(cmd: &Command) -> String {
        let mut out = Vec::new();
        let mut w = ClearTextWriter::new(&mut out, 80);
        let mut es = EmitState::new(&CodecConfig::default());
        emit(cmd, &mut w, &mut es).expect("vec sink");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_line_colour_indexed() {
        let args = [0x03];
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(4, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(cmd, Command::LineColour { colour: Colour::Index(3) });
        assert_eq!(emit_one(&cmd), "  linecolr 3;\n");
    }

    #[test]
    fn test_fill_colour_direct() {
        let mut state = MetafileState::default();
        state.colour_mode = ColourMode::Direct;
        let args = [0xFF, 0x00, 0x00];
        let mut cur = ArgCursor::new(&args);
        let cmd = decode(23, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(emit_one(&cmd), "  fillcolr 255 0 0;\n");
    }

    #[test]
    fn test_line_width_scaled_reads_real() {
        let mut state = MetafileState::default();
        state.line_width_mode = SpecificationMode::Scaled;
        // fixed32 real 2.0
        let args = [0x00, 0x02, 0x00, 0x00];
        let mut cur = ArgCursor::new(&args);
        let cmd = decode(3, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(cmd, Command::LineWidth { width: 2.0 });
        assert_eq!(emit_one(&cmd), "  linewidth 2.0000;\n");
    }

    #[test]
    fn test_line_width_absolute_reads_vdc() {
        let state_args = [0x00, 0x05]; // 16-bit integer VDC
        let mut cur = ArgCursor::new(&state_args);
        let mut state = MetafileState::default();
        let cmd = decode(3, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(cmd, Command::LineWidth { width: 5.0 });
    }

    #[test]
    fn test_interior_style_keywords() {
        assert_eq!(emit_one(&Command::InteriorStyle { style: 1 }), "  intstyle solid;\n");
        assert_eq!(emit_one(&Command::InteriorStyle { style: 4 }), "  intstyle empty;\n");
        assert_eq!(emit_one(&Command::InteriorStyle { style: 9 }), "  intstyle 9;\n");
    }

    #[test]
    fn test_edge_visibility_on_off() {
        let args = [0x00, 0x00];
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(30, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(emit_one(&cmd), "  edgevis off;\n");
    }

    #[test]
    fn test_colour_table_decode_and_emit() {
        let args = [0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF];
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(34, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(
            cmd,
            Command::ColourTable {
                start_index: 0,
                colours: vec![(0, 0, 0), (255, 255, 255)]
            }
        );
        assert_eq!(emit_one(&cmd), "  colrtable 0 0 0 0 255 255 255;\n");
    }

    #[test]
    fn test_text_alignment_keywords() {
        let cmd = Command::TextAlignment {
            horizontal: 0,
            vertical: 0,
            continuous_horizontal: 0.0,
            continuous_vertical: 0.0,
        };
        assert_eq!(
            emit_one(&cmd),
            "  textalign normhoriz normvert 0.0000 0.0000;\n"
        );
    }

    #[test]
    fn test_character_orientation_pairs() {
        let cmd = Command::CharacterOrientation {
            x_up: 0.0,
            y_up: 1.0,
            x_base: 1.0,
            y_base: 0.0,
        };
        assert_eq!(emit_one(&cmd), "  charori 0,1 1,0;\n");
    }

    #[test]
    fn test_line_cap_and_join() {
        assert_eq!(
            emit_one(&Command::LineCap { cap: 3, dash_cap: 1 }),
            "  linecap 3 1;\n"
        );
        assert_eq!(emit_one(&Command::LineJoin { join: 2 }), "  linejoin 2;\n");
        assert_eq!(
            emit_one(&Command::LineTypeContinuation { mode: 1 }),
            "  linetypecont 1;\n"
        );
    }

    #[test]
    fn test_version4_definition_elements_have_no_decoder() {
        let mut state = MetafileState::default();
        for id in [43, 44, 45] {
            let mut cur = ArgCursor::new(&[]);
            assert!(decode(id, &mut cur, &mut state).is_none(), "id {}", id);
        }
    }
}
