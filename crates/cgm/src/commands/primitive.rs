// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class 4: graphical primitive elements.
//!
//! Point-list primitives carry no count in the binary encoding; the point
//! total is the argument length divided by the active VDC width.

use crate::binary::cursor::{ArgCursor, ReadResult};
use crate::state::{MetafileState, RealPrecision, VdcType};
use crate::text::writer::ClearTextWriter;
use crate::text::{quote_str, EmitState, INDENT_BODY};
use crate::types::Point;
use std::io;

use super::Command;

pub(crate) fn decode(
    id: u8,
    cur: &mut ArgCursor<'_>,
    state: &mut MetafileState,
) -> Option<ReadResult<Command>> {
    Some(match id {
        1 => read_points(cur, state).map(|points| Command::Polyline { points }),
        2 => read_points(cur, state).map(|points| Command::DisjointPolyline { points }),
        4 => text(cur, state),
        5 => restricted_text(cur, state),
        7 => read_points(cur, state).map(|points| Command::Polygon { points }),
        11 => rectangle(cur, state),
        12 => circle(cur, state),
        15 => circular_arc_centre(cur, state),
        17 => ellipse(cur, state),
        18 => elliptical_arc(cur, state),
        26 => polybezier(cur, state),
        _ => return None,
    })
}

/// Octets one VDC occupies under the current state.
fn vdc_octets(state: &MetafileState) -> usize {
    match state.vdc_type {
        VdcType::Integer => usize::from(state.vdc_integer_precision / 8),
        VdcType::Real => match state.vdc_real_precision {
            RealPrecision::Fixed32 | RealPrecision::Floating32 => 4,
            RealPrecision::Fixed64 | RealPrecision::Floating64 => 8,
        },
    }
}

/// Points until the argument bytes run out; stragglers shorter than one
/// point are ignored.
fn read_points(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Vec<Point>> {
    let width = 2 * vdc_octets(state);
    let count = if width == 0 { 0 } else { cur.remaining() / width };
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        points.push(cur.read_point(state)?);
    }
    Ok(points)
}

fn text(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let position = cur.read_point(state)?;
    let is_final = cur.read_enum()? != 0;
    let text = cur.read_string()?;
    Ok(Command::Text {
        position,
        is_final,
        text,
    })
}

fn restricted_text(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let delta_width = cur.read_vdc(state)?;
    let delta_height = cur.read_vdc(state)?;
    let position = cur.read_point(state)?;
    let is_final = cur.read_enum()? != 0;
    let text = cur.read_string()?;
    Ok(Command::RestrictedText {
        delta_width,
        delta_height,
        position,
        is_final,
        text,
    })
}

fn rectangle(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let first = cur.read_point(state)?;
    let second = cur.read_point(state)?;
    Ok(Command::Rectangle { first, second })
}

fn circle(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let centre = cur.read_point(state)?;
    let radius = cur.read_vdc(state)?;
    Ok(Command::Circle { centre, radius })
}

fn circular_arc_centre(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let centre = cur.read_point(state)?;
    let start_dx = cur.read_vdc(state)?;
    let start_dy = cur.read_vdc(state)?;
    let end_dx = cur.read_vdc(state)?;
    let end_dy = cur.read_vdc(state)?;
    let radius = cur.read_vdc(state)?;
    Ok(Command::CircularArcCentre {
        centre,
        start_dx,
        start_dy,
        end_dx,
        end_dy,
        radius,
    })
}

fn ellipse(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let centre = cur.read_point(state)?;
    let first_diameter = cur.read_point(state)?;
    let second_diameter = cur.read_point(state)?;
    Ok(Command::Ellipse {
        centre,
        first_diameter,
        second_diameter,
    })
}

fn elliptical_arc(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let centre = cur.read_point(state)?;
    let first_diameter = cur.read_point(state)?;
    let second_diameter = cur.read_point(state)?;
    let start_dx = cur.read_vdc(state)?;
    let start_dy = cur.read_vdc(state)?;
    let end_dx = cur.read_vdc(state)?;
    let end_dy = cur.read_vdc(state)?;
    Ok(Command::EllipticalArc {
        centre,
        first_diameter,
        second_diameter,
        start_dx,
        start_dy,
        end_dx,
        end_dy,
    })
}

fn polybezier(cur: &mut ArgCursor<'_>, state: &MetafileState) -> ReadResult<Command> {
    let continuity = cur.read_index(state)?;
    let points = read_points(cur, state)?;
    Ok(Command::Polybezier { continuity, points })
}

fn point_list(es: &EmitState, points: &[Point]) -> String {
    points
        .iter()
        .map(|p| es.fmt_point(*p))
        .collect::<Vec<_>>()
        .join(" ")
}

fn points_statement(keyword: &str, es: &EmitState, points: &[Point]) -> String {
    if points.is_empty() {
        format!("{};", keyword)
    } else {
        format!("{} {};", keyword, point_list(es, points))
    }
}

pub(crate) fn emit(
    cmd: &Command,
    w: &mut ClearTextWriter<'_>,
    es: &mut EmitState,
) -> io::Result<()> {
    let d = INDENT_BODY;
    match cmd {
        Command::Polyline { points } => {
            w.statement(d, &points_statement("line", es, points))
        }
        Command::DisjointPolyline { points } => {
            w.statement(d, &points_statement("disjtline", es, points))
        }
        Command::Text {
            position,
            is_final,
            text,
        } => {
            let flag = if *is_final { "final" } else { "notfinal" };
            w.statement(
                d,
                &format!("text {} {} {};", es.fmt_point(*position), flag, quote_str(text)),
            )
        }
        Command::RestrictedText {
            delta_width,
            delta_height,
            position,
            is_final,
            text,
        } => {
            let flag = if *is_final { "final" } else { "notfinal" };
            w.statement(
                d,
                &format!(
                    "restrtext {} {} {} {} {} {};",
                    es.fmt_vdc(*delta_width),
                    es.fmt_vdc(*delta_height),
                    es.fmt_vdc(position.x),
                    es.fmt_vdc(position.y),
                    flag,
                    quote_str(text)
                ),
            )
        }
        Command::Polygon { points } => {
            w.statement(d, &points_statement("polygon", es, points))
        }
        Command::Rectangle { first, second } => w.statement(
            d,
            &format!("rect {} {};", es.fmt_point(*first), es.fmt_point(*second)),
        ),
        Command::Circle { centre, radius } => w.statement(
            d,
            &format!(
                "circle {} {} {};",
                es.fmt_vdc(centre.x),
                es.fmt_vdc(centre.y),
                es.fmt_vdc(*radius)
            ),
        ),
        Command::CircularArcCentre {
            centre,
            start_dx,
            start_dy,
            end_dx,
            end_dy,
            radius,
        } => w.statement(
            d,
            &format!(
                "arcctr {} {} {} {} {} {} {};",
                es.fmt_vdc(centre.x),
                es.fmt_vdc(centre.y),
                es.fmt_vdc(*start_dx),
                es.fmt_vdc(*start_dy),
                es.fmt_vdc(*end_dx),
                es.fmt_vdc(*end_dy),
                es.fmt_vdc(*radius)
            ),
        ),
        Command::Ellipse {
            centre,
            first_diameter,
            second_diameter,
        } => w.statement(
            d,
            &format!(
                "ellipse {} {} {} {} {} {};",
                es.fmt_vdc(centre.x),
                es.fmt_vdc(centre.y),
                es.fmt_vdc(first_diameter.x),
                es.fmt_vdc(first_diameter.y),
                es.fmt_vdc(second_diameter.x),
                es.fmt_vdc(second_diameter.y)
            ),
        ),
        Command::EllipticalArc {
            centre,
            first_diameter,
            second_diameter,
            start_dx,
            start_dy,
            end_dx,
            end_dy,
        } => w.statement(
            d,
            &format!(
                "elliparc {} {} {} {} {} {} {} {} {} {};",
                es.fmt_vdc(centre.x),
                es.fmt_vdc(centre.y),
                es.fmt_vdc(first_diameter.x),
                es.fmt_vdc(first_diameter.y),
                es.fmt_vdc(second_diameter.x),
                es.fmt_vdc(second_diameter.y),
                es.fmt_vdc(*start_dx),
                es.fmt_vdc(*start_dy),
                es.fmt_vdc(*end_dx),
                es.fmt_vdc(*end_dy)
            ),
        ),
        Command::Polybezier { continuity, points } => {
            let body = if points.is_empty() {
                format!("polybezier {};", continuity)
            } else {
                format!("polybezier {} {};", continuity, point_list(es, points))
            };
            w.statement(d, &body)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::state::VdcType;

    fn emit_real(cmd: &Command) -> String {
        let mut out = Vec::new();
        let mut w = ClearTextWriter::new(&mut out, 80);
        let mut es = EmitState::new(&CodecConfig::default());
        es.apply_vdc_type(VdcType::Integer); // override: format as reals
        emit(cmd, &mut w, &mut es).expect("vec sink");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_polyline_decode_counts_points() {
        // Default state: 16-bit integer VDCs, 4 octets per point.
        let args = [0x00, 0x10, 0x00, 0x20, 0x00, 0x30, 0x00, 0x40];
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(1, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(
            cmd,
            Command::Polyline {
                points: vec![Point::new(16.0, 32.0), Point::new(48.0, 64.0)]
            }
        );
    }

    #[test]
    fn test_polyline_emit_under_override() {
        let cmd = Command::Polyline {
            points: vec![Point::new(16.0, 32.0), Point::new(48.0, 64.0)],
        };
        assert_eq!(
            emit_real(&cmd),
            "  line (16.0000,32.0000) (48.0000,64.0000);\n"
        );
    }

    #[test]
    fn test_circle_bare_coordinates() {
        let cmd = Command::Circle {
            centre: Point::new(10.0, 20.0),
            radius: 5.0,
        };
        assert_eq!(emit_real(&cmd), "  circle 10.0000 20.0000 5.0000;\n");
    }

    #[test]
    fn test_arcctr_seven_values() {
        let cmd = Command::CircularArcCentre {
            centre: Point::new(0.0, 0.0),
            start_dx: 1.0,
            start_dy: 0.0,
            end_dx: 0.0,
            end_dy: 1.0,
            radius: 2.0,
        };
        assert_eq!(
            emit_real(&cmd),
            "  arcctr 0.0000 0.0000 1.0000 0.0000 0.0000 1.0000 2.0000;\n"
        );
    }

    #[test]
    fn test_restricted_text_decode_and_emit() {
        // dw=4, dh=2, position (1,1), final, 'ok'
        let args = [
            0x00, 0x04, 0x00, 0x02, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x02, b'o', b'k',
        ];
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(5, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(
            emit_real(&cmd),
            "  restrtext 4.0000 2.0000 1.0000 1.0000 final 'ok';\n"
        );
    }

    #[test]
    fn test_text_notfinal_flag() {
        let cmd = Command::Text {
            position: Point::new(3.0, 4.0),
            is_final: false,
            text: "hi".into(),
        };
        assert_eq!(emit_real(&cmd), "  text (3.0000,4.0000) notfinal 'hi';\n");
    }

    #[test]
    fn test_polybezier_decode() {
        // continuity index 1, then one point
        let args = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03];
        let mut cur = ArgCursor::new(&args);
        let mut state = MetafileState::default();
        let cmd = decode(26, &mut cur, &mut state)
            .expect("known id")
            .expect("valid args");
        assert_eq!(
            cmd,
            Command::Polybezier {
                continuity: 1,
                points: vec![Point::new(2.0, 3.0)]
            }
        );
        assert_eq!(emit_real(&cmd), "  polybezier 1 (2.0000,3.0000);\n");
    }

    #[test]
    fn test_points_with_real_vdcs() {
        let mut state = MetafileState::default();
        state.vdc_type = VdcType::Real;
        // Two fixed32 values: 1.5, 2.5 (one point, 8 octets)
        let args = [0x00, 0x01, 0x80, 0x00, 0x00, 0x02, 0x80, 0x00];
        let mut cur = ArgCursor::new(&args);
        let points = read_points(&mut cur, &state).expect("one point");
        assert_eq!(points, vec![Point::new(1.5, 2.5)]);
    }
}
