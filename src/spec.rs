//! Declarative icon-set specifications.
//!
//! An [`IconSpec`] lists the `(points, scale)` pairs an icon set requires
//! together with the naming convention and asset-catalog metadata shared by
//! the whole set. Adding a new platform size requirement is a data change
//! here, not a code change in the generation loop.

use crate::error::GenerationError;
use std::collections::HashSet;

/// One required raster output: a logical point size and a display scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecEntry {
    /// Logical size in points (e.g. 16 for a 16pt icon slot).
    pub points: u32,
    /// Display scale factor, 1–3.
    pub scale: u32,
}

impl SpecEntry {
    pub const fn new(points: u32, scale: u32) -> Self {
        Self { points, scale }
    }

    /// Pixel dimension of the rendered square image.
    pub fn pixel_size(&self) -> u32 {
        self.points * self.scale
    }

    /// Scale string as it appears in asset catalogs, e.g. "2x".
    pub fn scale_label(&self) -> String {
        format!("{}x", self.scale)
    }

    /// Logical size string as it appears in asset catalogs, e.g. "16x16".
    pub fn size_label(&self) -> String {
        format!("{0}x{0}", self.points)
    }
}

/// How output filenames encode the entry they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// `icon_16x16.png`, `icon_16x16@2x.png` — the iconset convention
    /// `iconutil` expects.
    SizeInName,
    /// `menubar.png`, `menubar@2x.png` — fixed stem, scale suffix only.
    StemOnly,
}

/// A complete icon-set specification: the ordered size entries plus the
/// metadata shared by every asset in the set.
#[derive(Debug, Clone)]
pub struct IconSpec {
    pub stem: &'static str,
    pub naming: Naming,
    /// Asset-catalog idiom for every entry ("mac", "universal", ...).
    pub idiom: &'static str,
    /// Template image sets are tinted by the system at render time.
    pub template: bool,
    pub entries: Vec<SpecEntry>,
}

impl IconSpec {
    /// The ten sizes a macOS app icon set requires: 16–512pt at 1x and 2x.
    pub fn app_icon() -> Self {
        Self {
            stem: "icon",
            naming: Naming::SizeInName,
            idiom: "mac",
            template: false,
            entries: vec![
                SpecEntry::new(16, 1),
                SpecEntry::new(16, 2),
                SpecEntry::new(32, 1),
                SpecEntry::new(32, 2),
                SpecEntry::new(128, 1),
                SpecEntry::new(128, 2),
                SpecEntry::new(256, 1),
                SpecEntry::new(256, 2),
                SpecEntry::new(512, 1),
                SpecEntry::new(512, 2),
            ],
        }
    }

    /// Menu bar status-item sizes: 16pt at 1x, 2x, 3x, rendered as a
    /// template image so macOS can tint it.
    pub fn menubar() -> Self {
        Self {
            stem: "menubar",
            naming: Naming::StemOnly,
            idiom: "universal",
            template: true,
            entries: vec![
                SpecEntry::new(16, 1),
                SpecEntry::new(16, 2),
                SpecEntry::new(16, 3),
            ],
        }
    }

    /// Output filename for an entry, following the set's naming convention.
    pub fn filename(&self, entry: &SpecEntry) -> String {
        let suffix = if entry.scale > 1 {
            format!("@{}x", entry.scale)
        } else {
            String::new()
        };
        match self.naming {
            Naming::SizeInName => format!("{}_{}{}.png", self.stem, entry.size_label(), suffix),
            Naming::StemOnly => format!("{}{}.png", self.stem, suffix),
        }
    }

    /// Check the data-model invariants: positive point sizes, scales in
    /// 1–3, and no two entries mapping to the same filename.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.entries.is_empty() {
            return Err(GenerationError::InvalidSpec("no entries".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.points == 0 {
                return Err(GenerationError::InvalidSpec(
                    "logical size must be positive".to_string(),
                ));
            }
            if !(1..=3).contains(&entry.scale) {
                return Err(GenerationError::InvalidSpec(format!(
                    "scale must be 1, 2 or 3 (got {} for {}pt)",
                    entry.scale, entry.points
                )));
            }
            let filename = self.filename(entry);
            if !seen.insert(filename.clone()) {
                return Err(GenerationError::InvalidSpec(format!(
                    "duplicate output filename {filename}"
                )));
            }
        }

        Ok(())
    }
}

/// Record of one successfully rasterized output. Immutable once created;
/// the manifest is built from these in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAsset {
    pub filename: String,
    pub pixel_size: u32,
    pub points: u32,
    pub scale: u32,
    pub idiom: String,
}
