//! External SVG rasterization.
//!
//! Vector-to-raster conversion is delegated to whichever supported
//! command-line converter is installed; nothing here decodes SVG itself.

use crate::error::GenerationError;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Renders a vector source to a square PNG at the requested pixel size.
///
/// The production implementation shells out to an external converter; unit
/// tests substitute their own.
pub trait Rasterizer {
    fn render(&self, source: &Path, pixel_size: u32, dest: &Path) -> Result<()>;
}

/// Supported external converters, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    RsvgConvert,
    CairoSvg,
}

impl ToolKind {
    pub fn program(&self) -> &'static str {
        match self {
            ToolKind::RsvgConvert => "rsvg-convert",
            ToolKind::CairoSvg => "cairosvg",
        }
    }
}

/// An SVG converter found on PATH.
pub struct SvgTool {
    kind: ToolKind,
}

impl SvgTool {
    /// Probes PATH for a supported converter, preferring `rsvg-convert`.
    /// Runs before any rendering so a missing tool is reported up front,
    /// not halfway through a set.
    pub fn detect() -> Result<Self, GenerationError> {
        for kind in [ToolKind::RsvgConvert, ToolKind::CairoSvg] {
            if probe(kind.program()) {
                return Ok(Self { kind });
            }
        }
        Err(GenerationError::MissingExternalTool(
            "rsvg-convert or cairosvg (install with: brew install librsvg)".to_string(),
        ))
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    fn command(&self, source: &Path, pixel_size: u32, dest: &Path) -> Command {
        let px = pixel_size.to_string();
        let mut cmd = Command::new(self.kind.program());
        match self.kind {
            ToolKind::RsvgConvert => {
                cmd.arg("-w").arg(&px).arg("-h").arg(&px).arg(source);
                cmd.arg("-o").arg(dest);
            }
            ToolKind::CairoSvg => {
                cmd.arg(source).arg("-o").arg(dest);
                cmd.arg("--output-width").arg(&px);
                cmd.arg("--output-height").arg(&px);
            }
        }
        cmd
    }
}

impl Rasterizer for SvgTool {
    fn render(&self, source: &Path, pixel_size: u32, dest: &Path) -> Result<()> {
        let output = self
            .command(source, pixel_size, dest)
            .output()
            .with_context(|| format!("failed to run {}", self.kind.program()))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} exited with {}: {}",
                self.kind.program(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }
}

fn probe(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}
