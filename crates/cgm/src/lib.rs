// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # CGM - Computer Graphics Metafile codec
//!
//! A pure Rust codec for ISO/IEC 8632 metafiles: decodes the binary
//! encoding (Part 3) into a typed command list and serializes it as the
//! human-readable clear-text encoding (Part 4).
//!
//! ## Quick Start
//!
//! ```rust
//! use cgm::convert;
//!
//! // BEGMF 'myfile'; ENDMF;
//! let bytes = [
//!     0x00, 0x27, 0x06, b'm', b'y', b'f', b'i', b'l', b'e', 0x00,
//!     0x00, 0x40,
//! ];
//! let mut text = Vec::new();
//! let diagnostics = convert(&bytes, &mut text).expect("writing to a Vec");
//! assert!(diagnostics.is_empty());
//! assert_eq!(text, b"BEGMF 'myfile';\nENDMF;\n");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------------+
//! |                         Byte-stream API                            |
//! |          decode() | emit_clear_text() | convert() | Codec          |
//! +--------------------------------------------------------------------+
//! |                         Binary decode                              |
//! |   Framer (headers, partitions) -> factory -> per-class decoders    |
//! |   ArgCursor primitive reads, threaded through MetafileState        |
//! +--------------------------------------------------------------------+
//! |                        Clear-text emit                             |
//! |   per-variant statement forms -> wrapping statement writer         |
//! +--------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Codec`] | A configured decode/emit instance |
//! | [`Command`] | Tagged sum over every decoded element |
//! | [`MetafileState`] | Per-stream precision and mode context |
//! | [`Diagnostic`] | Severity-tagged decode/emit message |
//! | [`CodecConfig`] | Settings (VDC override, wrap column) |
//!
//! Decoding is total: `decode` never fails, all anomalies surface as
//! diagnostics. A `Codec` owns its state exclusively; decode independent
//! streams in parallel with independent instances.
//!
//! ## See Also
//!
//! - ISO/IEC 8632-3:1999 (binary encoding)
//! - ISO/IEC 8632-4:1999 (clear-text encoding)

pub mod binary;
pub mod commands;
pub mod config;
pub mod diag;
pub mod state;
pub mod text;
pub mod types;

pub use commands::{Command, ElementClass, FontProperty, MfElement};
pub use config::{CodecConfig, VdcMode};
pub use diag::{Diagnostic, Severity};
pub use state::{
    CharCoding, ColourMode, ColourModel, MetafileState, RealPrecision, SpecificationMode, VdcType,
};
pub use types::{Colour, Point, Sdr, SdrDataType, SdrMember, SdrValue};

use std::io;

/// Result of a binary decode pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Commands in framed order.
    pub commands: Vec<Command>,
    /// Everything the decoder had to say about the input.
    pub diagnostics: Vec<Diagnostic>,
}

/// A configured codec instance. Owns its metafile state exclusively for
/// the duration of each call; not shareable across threads.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Codec { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode a binary CGM stream. Total: all failures surface as
    /// diagnostics on the result.
    pub fn decode(&self, bytes: &[u8]) -> Decoded {
        binary::decode(bytes)
    }

    /// Emit a command list as clear text. Only sink errors fail; they
    /// surface unchanged.
    pub fn emit_clear_text(
        &self,
        commands: &[Command],
        sink: &mut dyn io::Write,
    ) -> io::Result<Vec<Diagnostic>> {
        text::emit_with(&self.config, commands, sink)
    }

    /// Decode then emit; returns the combined diagnostics of both passes.
    pub fn convert(
        &self,
        bytes: &[u8],
        sink: &mut dyn io::Write,
    ) -> io::Result<Vec<Diagnostic>> {
        let mut decoded = self.decode(bytes);
        let emit_diagnostics = self.emit_clear_text(&decoded.commands, sink)?;
        decoded.diagnostics.extend(emit_diagnostics);
        Ok(decoded.diagnostics)
    }
}

/// Decode with the default configuration.
pub fn decode(bytes: &[u8]) -> Decoded {
    Codec::default().decode(bytes)
}

/// Emit clear text with the default configuration.
pub fn emit_clear_text(
    commands: &[Command],
    sink: &mut dyn io::Write,
) -> io::Result<Vec<Diagnostic>> {
    Codec::default().emit_clear_text(commands, sink)
}

/// Convert binary to clear text with the default configuration.
pub fn convert(bytes: &[u8], sink: &mut dyn io::Write) -> io::Result<Vec<Diagnostic>> {
    Codec::default().convert(bytes, sink)
}
