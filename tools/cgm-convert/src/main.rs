// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use anyhow::Context;
use cgm::{Codec, CodecConfig, Severity, VdcMode};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cgm-convert")]
#[command(about = "ISO/IEC 8632 converter: binary CGM (Part 3) -> clear text (Part 4)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a binary CGM file to clear text
    Convert {
        /// Input binary CGM file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output clear-text file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Emit the VDC type exactly as decoded instead of forcing real
        #[arg(long)]
        preserve_vdc_type: bool,

        /// Soft-wrap column for the clear-text output
        #[arg(long, default_value_t = 80)]
        wrap: u16,

        /// Drop unknown commands instead of emitting % comments
        #[arg(long)]
        skip_unknown: bool,
    },

    /// Decode a binary CGM file and list its commands and diagnostics
    Inspect {
        /// Input binary CGM file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Also print commands, not only diagnostics
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            preserve_vdc_type,
            wrap,
            skip_unknown,
        } => cmd_convert(&input, output.as_deref(), preserve_vdc_type, wrap, skip_unknown),
        Commands::Inspect { input, verbose } => cmd_inspect(&input, verbose),
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    preserve_vdc_type: bool,
    wrap: u16,
    skip_unknown: bool,
) -> anyhow::Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("reading {}", input.display()))?;
    log::debug!("[convert] {}: {} input byte(s)", input.display(), bytes.len());

    let codec = Codec::new(CodecConfig {
        vdc_mode: if preserve_vdc_type {
            VdcMode::PreserveVdcType
        } else {
            VdcMode::ForceRealVdcOnEmit
        },
        wrap_column: wrap,
        emit_unknown_as_comment: !skip_unknown,
    });

    let diagnostics = match output {
        Some(path) => {
            let mut sink = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let diagnostics = codec.convert(&bytes, &mut sink)?;
            sink.flush()?;
            diagnostics
        }
        None => {
            let stdout = std::io::stdout();
            let mut sink = stdout.lock();
            codec.convert(&bytes, &mut sink)?
        }
    };

    report(&diagnostics);
    if diagnostics.iter().any(|d| d.severity == Severity::Fatal) {
        anyhow::bail!("decode halted on a framing error (output is partial)");
    }
    Ok(())
}

fn cmd_inspect(input: &Path, verbose: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let decoded = cgm::decode(&bytes);
    println!(
        "{}: {} command(s), {} diagnostic(s)",
        input.display(),
        decoded.commands.len(),
        decoded.diagnostics.len()
    );

    if verbose {
        for command in &decoded.commands {
            println!(
                "  class={} id={} {:?}",
                command.element_class(),
                command.element_id(),
                command
            );
        }
    }
    report(&decoded.diagnostics);
    Ok(())
}

fn report(diagnostics: &[cgm::Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
}
