//! The generation loop: rasterize each spec entry, accumulate asset
//! records, write the manifest, and optionally package the set as `.icns`.

use crate::contents_json::ContentsFile;
use crate::error::GenerationError;
use crate::rasterize::{Rasterizer, SvgTool};
use crate::spec::{GeneratedAsset, IconSpec};
use anyhow::{Context, Result};
use image::imageops::FilterType;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Canonical canvas size for the fallback path: render once at this size,
/// then resample down to each failed target.
pub const FALLBACK_CANVAS: u32 = 1024;

/// Built-in simplified glyph for the menu bar set. A full app icon turns
/// to mush at 16pt; this monochrome terminal shape stays legible and works
/// as a template image.
const SIMPLE_MENUBAR_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg width="100" height="100" viewBox="0 0 100 100" xmlns="http://www.w3.org/2000/svg">
  <rect x="14" y="24" width="72" height="52" rx="6" fill="none" stroke="black" stroke-width="6"/>
  <path d="M 26 40 L 38 50 L 26 60" fill="none" stroke="black" stroke-width="6" stroke-linecap="round" stroke-linejoin="round"/>
  <line x1="46" y1="62" x2="66" y2="62" stroke="black" stroke-width="6" stroke-linecap="round"/>
</svg>
"#;

/// Options for a full CLI run, mapped from the parsed arguments.
#[derive(Debug)]
pub struct RunOptions {
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub app_icon: bool,
    pub menubar: bool,
    pub menubar_simple: bool,
    pub no_icns: bool,
}

pub fn run(opts: RunOptions) -> Result<()> {
    let tool = SvgTool::detect()?;
    println!("Using {} for SVG rasterization", tool.kind().program());

    // No variant flag selects the full run: app icon set plus menu bar set.
    let all = !opts.app_icon && !opts.menubar && !opts.menubar_simple;

    if all || opts.app_icon {
        let input = required_input(&opts)?;
        generate_app_icon_set(&tool, input, &opts.output, !opts.no_icns)?;
    }

    if all || opts.menubar {
        let input = required_input(&opts)?;
        generate_menubar_set(&tool, input, &opts.output)?;
    }

    if opts.menubar_simple {
        generate_simple_menubar_set(&tool, &opts.output)?;
    }

    Ok(())
}

fn required_input(opts: &RunOptions) -> Result<&Path> {
    opts.input
        .as_deref()
        .context("an INPUT SVG is required for this icon set")
}

/// Renders every entry of `spec` from `source` into `out_dir`, writes the
/// `Contents.json` manifest, and returns the asset records in declaration
/// order.
///
/// Any entry failing both the direct render and the resampling fallback
/// aborts the run; files written for earlier entries are left in place and
/// no manifest is written.
pub fn generate(
    rasterizer: &dyn Rasterizer,
    source: &Path,
    spec: &IconSpec,
    out_dir: &Path,
) -> Result<Vec<GeneratedAsset>, GenerationError> {
    if !source.exists() {
        return Err(GenerationError::MissingSourceFile(source.to_path_buf()));
    }
    spec.validate()?;

    fs::create_dir_all(out_dir)?;

    let mut assets = Vec::with_capacity(spec.entries.len());
    for entry in &spec.entries {
        let filename = spec.filename(entry);
        let dest = out_dir.join(&filename);
        let pixel_size = entry.pixel_size();

        if let Err(direct) = rasterizer.render(source, pixel_size, &dest) {
            println!("  direct render failed for {filename}, retrying via {FALLBACK_CANVAS}px canvas");
            render_resampled(rasterizer, source, pixel_size, &dest).map_err(|fallback| {
                GenerationError::RasterizationFailed {
                    points: entry.points,
                    scale: entry.scale,
                    reason: format!("{direct:#}; fallback: {fallback:#}"),
                }
            })?;
        }
        println!("  ✓ Generated {filename} ({pixel_size}x{pixel_size})");

        assets.push(GeneratedAsset {
            filename,
            pixel_size,
            points: entry.points,
            scale: entry.scale,
            idiom: spec.idiom.to_string(),
        });
    }

    ContentsFile::for_assets(spec, &assets).write(out_dir)?;
    println!("  ✓ Generated Contents.json");

    Ok(assets)
}

/// Fallback path: render once at the canonical canvas size, then resample
/// down to the target in-process.
fn render_resampled(
    rasterizer: &dyn Rasterizer,
    source: &Path,
    pixel_size: u32,
    dest: &Path,
) -> Result<()> {
    let canvas = tempfile::Builder::new()
        .prefix("iconset-gen-canvas")
        .suffix(".png")
        .tempfile()
        .context("failed to create temporary canvas file")?;

    rasterizer.render(source, FALLBACK_CANVAS, canvas.path())?;

    let rendered = image::open(canvas.path()).context("failed to decode fallback canvas")?;
    let resized = rendered.resize_exact(pixel_size, pixel_size, FilterType::Lanczos3);

    let mut file = fs::File::create(dest).context("failed to create PNG file")?;
    resized
        .write_to(&mut file, image::ImageOutputFormat::Png)
        .context("failed to write PNG")?;
    Ok(())
}

/// Bundles a `.iconset` directory of correctly named PNGs into a single
/// `.icns` file via `iconutil`.
pub fn package_icns(raster_dir: &Path, out_file: &Path) -> Result<(), GenerationError> {
    let output = Command::new("iconutil")
        .arg("-c")
        .arg("icns")
        .arg(raster_dir)
        .arg("-o")
        .arg(out_file)
        .output()
        .map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                GenerationError::MissingExternalTool("iconutil (part of macOS)".to_string())
            } else {
                GenerationError::Io(err)
            }
        })?;

    if !output.status.success() {
        return Err(GenerationError::PackagingFailed(format!(
            "iconutil exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}

/// Generates `AppIcon.appiconset/` (PNGs + Contents.json) and, unless
/// `package` is false, an `AppIcon.icns` next to it.
pub fn generate_app_icon_set(
    rasterizer: &dyn Rasterizer,
    source: &Path,
    out_dir: &Path,
    package: bool,
) -> Result<()> {
    println!("Generating AppIcon.appiconset...");
    let spec = IconSpec::app_icon();
    let set_dir = out_dir.join("AppIcon.appiconset");
    let assets = generate(rasterizer, source, &spec, &set_dir)?;
    println!("✓ Generated AppIcon.appiconset ({} images)", assets.len());

    if package {
        println!("Packaging AppIcon.icns...");
        // iconutil wants a bare .iconset directory without the manifest, so
        // the PNGs are staged into a transient copy.
        let stage = out_dir.join("AppIcon.iconset");
        fs::create_dir_all(&stage)?;
        for asset in &assets {
            fs::copy(set_dir.join(&asset.filename), stage.join(&asset.filename))?;
        }

        let result = package_icns(&stage, &out_dir.join("AppIcon.icns"));
        let _ = fs::remove_dir_all(&stage);
        result?;
        println!("✓ Generated AppIcon.icns");
    }

    Ok(())
}

/// Generates `menubar.imageset/` from the given SVG.
pub fn generate_menubar_set(
    rasterizer: &dyn Rasterizer,
    source: &Path,
    out_dir: &Path,
) -> Result<()> {
    println!("Generating menubar.imageset...");
    let spec = IconSpec::menubar();
    let set_dir = out_dir.join("menubar.imageset");
    let assets = generate(rasterizer, source, &spec, &set_dir)?;
    println!("✓ Generated menubar.imageset ({} images)", assets.len());
    Ok(())
}

/// Generates the menu bar set from the built-in simplified glyph instead
/// of a user-provided SVG.
pub fn generate_simple_menubar_set(rasterizer: &dyn Rasterizer, out_dir: &Path) -> Result<()> {
    let svg = tempfile::Builder::new()
        .prefix("menubar-glyph")
        .suffix(".svg")
        .tempfile()
        .context("failed to create temporary SVG file")?;
    fs::write(svg.path(), SIMPLE_MENUBAR_SVG)?;
    generate_menubar_set(rasterizer, svg.path(), out_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Naming, SpecEntry};
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    /// Writes a real PNG of the requested size, standing in for the
    /// external converter.
    struct PngStub;

    impl Rasterizer for PngStub {
        fn render(&self, _source: &Path, pixel_size: u32, dest: &Path) -> Result<()> {
            let img = RgbaImage::from_pixel(pixel_size, pixel_size, Rgba([10, 20, 30, 255]));
            img.save(dest).context("save stub png")?;
            Ok(())
        }
    }

    /// Refuses every size above `limit`, including the fallback canvas.
    struct FailAbove {
        limit: u32,
    }

    impl Rasterizer for FailAbove {
        fn render(&self, source: &Path, pixel_size: u32, dest: &Path) -> Result<()> {
            if pixel_size > self.limit {
                anyhow::bail!("render refused at {pixel_size}px");
            }
            PngStub.render(source, pixel_size, dest)
        }
    }

    /// Succeeds only at the canonical canvas size, forcing the resampling
    /// fallback for every entry.
    struct CanvasOnly;

    impl Rasterizer for CanvasOnly {
        fn render(&self, source: &Path, pixel_size: u32, dest: &Path) -> Result<()> {
            if pixel_size != FALLBACK_CANVAS {
                anyhow::bail!("direct render unavailable at {pixel_size}px");
            }
            PngStub.render(source, pixel_size, dest)
        }
    }

    fn small_spec() -> IconSpec {
        IconSpec {
            stem: "icon",
            naming: Naming::SizeInName,
            idiom: "mac",
            template: false,
            entries: vec![
                SpecEntry::new(16, 1),
                SpecEntry::new(16, 2),
                SpecEntry::new(32, 1),
            ],
        }
    }

    fn dummy_source(dir: &Path) -> PathBuf {
        let source = dir.join("source.svg");
        fs::write(&source, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();
        source
    }

    #[test]
    fn test_generate_writes_files_and_manifest() {
        let temp = TempDir::new().unwrap();
        let source = dummy_source(temp.path());
        let out_dir = temp.path().join("out");

        let assets = generate(&PngStub, &source, &small_spec(), &out_dir).unwrap();

        let expected = [
            ("icon_16x16.png", 16),
            ("icon_16x16@2x.png", 32),
            ("icon_32x32.png", 32),
        ];
        assert_eq!(assets.len(), expected.len());
        for ((name, px), asset) in expected.iter().zip(&assets) {
            assert_eq!(asset.filename, *name);
            assert_eq!(asset.pixel_size, *px);
            let img = image::open(out_dir.join(name)).unwrap();
            assert_eq!(img.width(), *px);
            assert_eq!(img.height(), *px);
        }

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out_dir.join("Contents.json")).unwrap())
                .unwrap();
        let images = manifest["images"].as_array().unwrap();
        assert_eq!(images.len(), 3);
        assert_eq!(images[0]["filename"], "icon_16x16.png");
        assert_eq!(images[1]["filename"], "icon_16x16@2x.png");
        assert_eq!(images[2]["filename"], "icon_32x32.png");
    }

    #[test]
    fn test_missing_source_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let out_dir = temp.path().join("out");

        let err = generate(
            &PngStub,
            &temp.path().join("does-not-exist.svg"),
            &small_spec(),
            &out_dir,
        )
        .unwrap_err();

        assert!(matches!(err, GenerationError::MissingSourceFile(_)));
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_failed_entry_aborts_but_keeps_earlier_files() {
        let temp = TempDir::new().unwrap();
        let source = dummy_source(temp.path());
        let out_dir = temp.path().join("out");

        // First entry (16px) succeeds; the 32px entry and the 1024px
        // fallback canvas both fail.
        let err = generate(&FailAbove { limit: 16 }, &source, &small_spec(), &out_dir).unwrap_err();

        match err {
            GenerationError::RasterizationFailed { points, scale, .. } => {
                assert_eq!((points, scale), (16, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(out_dir.join("icon_16x16.png").exists());
        assert!(!out_dir.join("Contents.json").exists());
    }

    #[test]
    fn test_fallback_resamples_to_target_size() {
        let temp = TempDir::new().unwrap();
        let source = dummy_source(temp.path());
        let out_dir = temp.path().join("out");

        let spec = IconSpec {
            entries: vec![SpecEntry::new(16, 1)],
            ..small_spec()
        };
        let assets = generate(&CanvasOnly, &source, &spec, &out_dir).unwrap();

        assert_eq!(assets.len(), 1);
        let img = image::open(out_dir.join("icon_16x16.png")).unwrap();
        assert_eq!((img.width(), img.height()), (16, 16));
    }

    #[test]
    fn test_manifest_identical_across_runs() {
        let temp = TempDir::new().unwrap();
        let source = dummy_source(temp.path());

        let first_dir = temp.path().join("first");
        let second_dir = temp.path().join("second");
        generate(&PngStub, &source, &small_spec(), &first_dir).unwrap();
        generate(&PngStub, &source, &small_spec(), &second_dir).unwrap();

        let first = fs::read(first_dir.join("Contents.json")).unwrap();
        let second = fs::read(second_dir.join("Contents.json")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_spec_rejected_before_rendering() {
        let temp = TempDir::new().unwrap();
        let source = dummy_source(temp.path());
        let out_dir = temp.path().join("out");

        let mut spec = small_spec();
        spec.entries.push(SpecEntry::new(16, 1));
        let err = generate(&PngStub, &source, &spec, &out_dir).unwrap_err();

        assert!(matches!(err, GenerationError::InvalidSpec(_)));
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_package_icns_reports_missing_tool() {
        // Only meaningful on hosts without iconutil.
        if Command::new("iconutil").arg("-h").output().is_ok() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let err = package_icns(
            &temp.path().join("AppIcon.iconset"),
            &temp.path().join("AppIcon.icns"),
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::MissingExternalTool(_)));
    }

    #[test]
    fn test_simple_menubar_set_needs_no_input() {
        let temp = TempDir::new().unwrap();
        let out_dir = temp.path().join("out");

        generate_simple_menubar_set(&PngStub, &out_dir).unwrap();

        let set_dir = out_dir.join("menubar.imageset");
        for name in ["menubar.png", "menubar@2x.png", "menubar@3x.png"] {
            assert!(set_dir.join(name).exists(), "missing {name}");
        }
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(set_dir.join("Contents.json")).unwrap())
                .unwrap();
        assert_eq!(
            manifest["properties"]["template-rendering-intent"],
            "template"
        );
    }
}
