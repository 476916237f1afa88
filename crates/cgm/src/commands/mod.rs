// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The command model: one tagged sum over every element the codec decodes.
//!
//! Commands are created by the factory during decode, never mutated
//! afterwards, and consumed by the clear-text emitter. Dispatch is a plain
//! match on `(class, id)` — no virtual dispatch, no registries. Unknown
//! `(class, id)` pairs keep their raw argument bytes verbatim.
//!
//! Module layout mirrors the element classes of ISO 8632 Table 1: one
//! submodule per class, each owning the decoders and the clear-text forms
//! for its elements.

pub mod attribute;
pub mod control;
pub mod delimiter;
pub mod external;
pub mod metafile;
pub mod picture;
pub mod primitive;

use crate::state::{RealPrecision, VdcType};
use crate::types::{Colour, Point, Sdr};
use std::fmt;

pub use metafile::{FontProperty, MfElement};

/// Element classes (ISO 8632-3 Table 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClass {
    Delimiter,
    MetafileDescriptor,
    PictureDescriptor,
    Control,
    GraphicalPrimitive,
    Attribute,
    Escape,
    External,
    Segment,
    ApplicationStructure,
}

impl ElementClass {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => ElementClass::Delimiter,
            1 => ElementClass::MetafileDescriptor,
            2 => ElementClass::PictureDescriptor,
            3 => ElementClass::Control,
            4 => ElementClass::GraphicalPrimitive,
            5 => ElementClass::Attribute,
            6 => ElementClass::Escape,
            7 => ElementClass::External,
            8 => ElementClass::Segment,
            9 => ElementClass::ApplicationStructure,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        match self {
            ElementClass::Delimiter => 0,
            ElementClass::MetafileDescriptor => 1,
            ElementClass::PictureDescriptor => 2,
            ElementClass::Control => 3,
            ElementClass::GraphicalPrimitive => 4,
            ElementClass::Attribute => 5,
            ElementClass::Escape => 6,
            ElementClass::External => 7,
            ElementClass::Segment => 8,
            ElementClass::ApplicationStructure => 9,
        }
    }
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementClass::Delimiter => "delimiter",
            ElementClass::MetafileDescriptor => "metafile descriptor",
            ElementClass::PictureDescriptor => "picture descriptor",
            ElementClass::Control => "control",
            ElementClass::GraphicalPrimitive => "graphical primitive",
            ElementClass::Attribute => "attribute",
            ElementClass::Escape => "escape",
            ElementClass::External => "external",
            ElementClass::Segment => "segment",
            ElementClass::ApplicationStructure => "application structure",
        };
        f.write_str(name)
    }
}

/// A decoded command. One variant per `(class, id)` the codec knows, plus
/// `Unknown` preserving raw argument bytes for everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // -- Class 0: delimiter elements ------------------------------------
    NoOp,
    BeginMetafile { name: String },
    EndMetafile,
    BeginPicture { name: String },
    BeginPictureBody,
    EndPicture,
    BeginFigure,
    EndFigure,
    BeginApplicationStructure { identifier: String, kind: String, inheritance: i16 },
    BeginApplicationStructureBody,
    EndApplicationStructure,

    // -- Class 1: metafile descriptor elements --------------------------
    MetafileVersion { version: i32 },
    MetafileDescription { description: String },
    VdcType { vdc_type: VdcType },
    IntegerPrecision { bits: i32 },
    RealPrecision { precision: RealPrecision },
    IndexPrecision { bits: i32 },
    ColourPrecision { bits: i32 },
    ColourIndexPrecision { bits: i32 },
    MaximumColourIndex { index: u32 },
    ColourValueExtent { min: [u32; 3], max: [u32; 3] },
    MetafileElementList { elements: Vec<MfElement> },
    MetafileDefaultsReplacement,
    ColourModel { model: i32 },
    FontList { fonts: Vec<String> },
    CharacterSetList { sets: Vec<(i16, String)> },
    CharacterCodingAnnouncer { coding: i16 },
    NamePrecision { bits: i32 },
    MaximumVdcExtent { first: Point, second: Point },
    FontProperties { properties: Vec<FontProperty> },

    // -- Class 2: picture descriptor elements ---------------------------
    ScalingMode { mode: i16, factor: f64 },
    ColourSelectionMode { mode: i16 },
    LineWidthSpecificationMode { mode: i16 },
    MarkerSizeSpecificationMode { mode: i16 },
    EdgeWidthSpecificationMode { mode: i16 },
    VdcExtent { lower_left: Point, upper_right: Point },
    BackgroundColour { r: u8, g: u8, b: u8 },

    // -- Class 3: control elements --------------------------------------
    VdcIntegerPrecision { bits: i32 },
    VdcRealPrecision { precision: RealPrecision },
    Transparency { on: bool },
    ClipIndicator { on: bool },

    // -- Class 4: graphical primitive elements --------------------------
    Polyline { points: Vec<Point> },
    DisjointPolyline { points: Vec<Point> },
    Text { position: Point, is_final: bool, text: String },
    RestrictedText {
        delta_width: f64,
        delta_height: f64,
        position: Point,
        is_final: bool,
        text: String,
    },
    Polygon { points: Vec<Point> },
    Rectangle { first: Point, second: Point },
    Circle { centre: Point, radius: f64 },
    CircularArcCentre {
        centre: Point,
        start_dx: f64,
        start_dy: f64,
        end_dx: f64,
        end_dy: f64,
        radius: f64,
    },
    Ellipse { centre: Point, first_diameter: Point, second_diameter: Point },
    EllipticalArc {
        centre: Point,
        first_diameter: Point,
        second_diameter: Point,
        start_dx: f64,
        start_dy: f64,
        end_dx: f64,
        end_dy: f64,
    },
    Polybezier { continuity: i32, points: Vec<Point> },

    // -- Class 5: attribute elements ------------------------------------
    LineType { index: i32 },
    LineWidth { width: f64 },
    LineColour { colour: Colour },
    TextFontIndex { index: i32 },
    TextColour { colour: Colour },
    CharacterHeight { height: f64 },
    CharacterOrientation { x_up: f64, y_up: f64, x_base: f64, y_base: f64 },
    TextAlignment {
        horizontal: i16,
        vertical: i16,
        continuous_horizontal: f64,
        continuous_vertical: f64,
    },
    CharacterExpansionFactor { factor: f64 },
    CharacterSetIndex { index: i32 },
    AlternateCharacterSetIndex { index: i32 },
    InteriorStyle { style: i16 },
    FillColour { colour: Colour },
    EdgeType { index: i32 },
    EdgeWidth { width: f64 },
    EdgeColour { colour: Colour },
    EdgeVisibility { on: bool },
    ColourTable { start_index: u32, colours: Vec<(u8, u8, u8)> },
    LineCap { cap: i32, dash_cap: i32 },
    LineJoin { join: i32 },
    LineTypeContinuation { mode: i32 },
    RestrictedTextType { index: i32 },

    // -- Class 7: external / Class 9: application structure -------------
    Message { action_required: bool, text: String },
    ApplicationStructureAttribute { attribute_type: String, record: Sdr },

    // -- Fallback --------------------------------------------------------
    Unknown { element_class: u8, element_id: u8, bytes: Vec<u8> },
}

impl Command {
    /// The element class code of this command.
    pub fn element_class(&self) -> u8 {
        use Command::*;
        match self {
            NoOp | BeginMetafile { .. } | EndMetafile | BeginPicture { .. }
            | BeginPictureBody | EndPicture | BeginFigure | EndFigure
            | BeginApplicationStructure { .. } | BeginApplicationStructureBody
            | EndApplicationStructure => 0,

            MetafileVersion { .. } | MetafileDescription { .. } | VdcType { .. }
            | IntegerPrecision { .. } | RealPrecision { .. } | IndexPrecision { .. }
            | ColourPrecision { .. } | ColourIndexPrecision { .. }
            | MaximumColourIndex { .. } | ColourValueExtent { .. }
            | MetafileElementList { .. } | MetafileDefaultsReplacement
            | FontList { .. } | CharacterSetList { .. } | CharacterCodingAnnouncer { .. }
            | NamePrecision { .. } | MaximumVdcExtent { .. } | ColourModel { .. }
            | FontProperties { .. } => 1,

            ScalingMode { .. } | ColourSelectionMode { .. }
            | LineWidthSpecificationMode { .. } | MarkerSizeSpecificationMode { .. }
            | EdgeWidthSpecificationMode { .. } | VdcExtent { .. }
            | BackgroundColour { .. } => 2,

            VdcIntegerPrecision { .. } | VdcRealPrecision { .. } | Transparency { .. }
            | ClipIndicator { .. } => 3,

            Polyline { .. } | DisjointPolyline { .. } | Text { .. }
            | RestrictedText { .. } | Polygon { .. } | Rectangle { .. } | Circle { .. }
            | CircularArcCentre { .. } | Ellipse { .. } | EllipticalArc { .. }
            | Polybezier { .. } => 4,

            LineType { .. } | LineWidth { .. } | LineColour { .. } | TextFontIndex { .. }
            | TextColour { .. } | CharacterHeight { .. } | CharacterOrientation { .. }
            | TextAlignment { .. } | CharacterExpansionFactor { .. }
            | CharacterSetIndex { .. } | AlternateCharacterSetIndex { .. }
            | InteriorStyle { .. } | FillColour { .. } | EdgeType { .. }
            | EdgeWidth { .. } | EdgeColour { .. } | EdgeVisibility { .. }
            | ColourTable { .. } | LineCap { .. } | LineJoin { .. }
            | LineTypeContinuation { .. } | RestrictedTextType { .. } => 5,

            Message { .. } => 7,
            ApplicationStructureAttribute { .. } => 9,

            Unknown { element_class, .. } => *element_class,
        }
    }

    /// The element id of this command within its class.
    pub fn element_id(&self) -> u8 {
        use Command::*;
        match self {
            NoOp => 0,
            BeginMetafile { .. } => 1,
            EndMetafile => 2,
            BeginPicture { .. } => 3,
            BeginPictureBody => 4,
            EndPicture => 5,
            BeginFigure => 8,
            EndFigure => 9,
            BeginApplicationStructure { .. } => 21,
            BeginApplicationStructureBody => 22,
            EndApplicationStructure => 23,

            MetafileVersion { .. } => 1,
            MetafileDescription { .. } => 2,
            VdcType { .. } => 3,
            IntegerPrecision { .. } => 4,
            RealPrecision { .. } => 5,
            IndexPrecision { .. } => 6,
            ColourPrecision { .. } => 7,
            ColourIndexPrecision { .. } => 8,
            MaximumColourIndex { .. } => 9,
            ColourValueExtent { .. } => 10,
            MetafileElementList { .. } => 11,
            MetafileDefaultsReplacement => 12,
            FontList { .. } => 13,
            CharacterSetList { .. } => 14,
            CharacterCodingAnnouncer { .. } => 15,
            NamePrecision { .. } => 16,
            MaximumVdcExtent { .. } => 17,
            ColourModel { .. } => 19,
            FontProperties { .. } => 21,

            ScalingMode { .. } => 1,
            ColourSelectionMode { .. } => 2,
            LineWidthSpecificationMode { .. } => 3,
            MarkerSizeSpecificationMode { .. } => 4,
            EdgeWidthSpecificationMode { .. } => 5,
            VdcExtent { .. } => 6,
            BackgroundColour { .. } => 7,

            VdcIntegerPrecision { .. } => 1,
            VdcRealPrecision { .. } => 2,
            Transparency { .. } => 4,
            ClipIndicator { .. } => 6,

            Polyline { .. } => 1,
            DisjointPolyline { .. } => 2,
            Text { .. } => 4,
            RestrictedText { .. } => 5,
            Polygon { .. } => 7,
            Rectangle { .. } => 11,
            Circle { .. } => 12,
            CircularArcCentre { .. } => 15,
            Ellipse { .. } => 17,
            EllipticalArc { .. } => 18,
            Polybezier { .. } => 26,

            LineType { .. } => 2,
            LineWidth { .. } => 3,
            LineColour { .. } => 4,
            TextFontIndex { .. } => 10,
            CharacterExpansionFactor { .. } => 12,
            TextColour { .. } => 14,
            CharacterHeight { .. } => 15,
            CharacterOrientation { .. } => 16,
            TextAlignment { .. } => 18,
            CharacterSetIndex { .. } => 19,
            AlternateCharacterSetIndex { .. } => 20,
            InteriorStyle { .. } => 22,
            FillColour { .. } => 23,
            EdgeType { .. } => 27,
            EdgeWidth { .. } => 28,
            EdgeColour { .. } => 29,
            EdgeVisibility { .. } => 30,
            ColourTable { .. } => 34,
            LineCap { .. } => 37,
            LineJoin { .. } => 38,
            LineTypeContinuation { .. } => 39,
            RestrictedTextType { .. } => 42,

            Message { .. } => 1,
            ApplicationStructureAttribute { .. } => 1,

            Unknown { element_id, .. } => *element_id,
        }
    }
}
