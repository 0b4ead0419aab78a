//! Contents.json data model for Apple's Asset Catalog format
//!
//! This module defines the subset of Apple's asset catalog Contents.json
//! schema that macOS app icon sets and image sets use: an `images` array
//! with filename/idiom/scale/size, an `info` block, and the optional
//! `properties` block carrying the template-rendering intent for menu bar
//! images.

use crate::error::GenerationError;
use crate::spec::{GeneratedAsset, IconSpec, Naming};
use serde::Serialize;
use std::path::Path;

/// Root structure of a Contents.json file.
#[derive(Serialize, Debug, Clone)]
pub struct ContentsFile {
    /// One entry per generated raster, in spec declaration order.
    pub images: Vec<ImageEntry>,

    /// Versioning and authorship information.
    pub info: Info,

    /// Optional properties for the asset catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

/// Individual image entry within an asset catalog.
#[derive(Serialize, Debug, Clone)]
pub struct ImageEntry {
    /// The filename for the image file.
    pub filename: String,

    /// The device type for the image (e.g. "mac", "universal").
    pub idiom: String,

    /// The scale factor for the image ("1x", "2x", "3x").
    pub scale: String,

    /// The logical size in points (e.g. "16x16"). App icon sets carry
    /// this; plain image sets omit it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Versioning and authorship information for the asset catalog.
#[derive(Serialize, Debug, Clone)]
pub struct Info {
    /// The format version of the asset catalog (always 1).
    pub version: u8,

    /// The tool the catalog is attributed to. Xcode writes "xcode" and we
    /// match it so regenerated catalogs diff cleanly.
    pub author: String,
}

/// Optional properties for the asset catalog.
#[derive(Serialize, Debug, Clone)]
pub struct Properties {
    /// "template" marks the set as a monochrome image that the system
    /// tints at render time (menu bar icons).
    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "template-rendering-intent"
    )]
    pub template_rendering_intent: Option<String>,
}

impl ContentsFile {
    /// Builds the manifest for a set from its spec and the asset records
    /// accumulated during generation.
    pub fn for_assets(spec: &IconSpec, assets: &[GeneratedAsset]) -> Self {
        let images = assets
            .iter()
            .map(|asset| ImageEntry {
                filename: asset.filename.clone(),
                idiom: asset.idiom.clone(),
                scale: format!("{}x", asset.scale),
                size: match spec.naming {
                    Naming::SizeInName => Some(format!("{0}x{0}", asset.points)),
                    Naming::StemOnly => None,
                },
            })
            .collect();

        let properties = spec.template.then(|| Properties {
            template_rendering_intent: Some("template".to_string()),
        });

        Self {
            images,
            info: Info {
                version: 1,
                author: "xcode".to_string(),
            },
            properties,
        }
    }

    /// Serializes this manifest to pretty-printed JSON. Output is a pure
    /// function of the contents, so repeated runs are byte-identical.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Writes this manifest as `Contents.json` inside `dir`, replacing any
    /// existing file.
    pub fn write(&self, dir: &Path) -> Result<(), GenerationError> {
        let json = self.to_json()?;
        std::fs::write(dir.join("Contents.json"), json)?;
        Ok(())
    }
}
