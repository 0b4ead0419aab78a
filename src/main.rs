use anyhow::Result;
use clap::Parser;
use iconset_gen::generate::{self, RunOptions};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "iconset-gen",
    about = "Generate macOS icon assets (app icon set, menu bar templates, .icns) from an SVG source"
)]
struct Args {
    /// Path to the source SVG. Optional when --menubar-simple is the only
    /// requested output.
    #[clap(value_name = "INPUT", required_unless_present = "menubar_simple")]
    input: Option<PathBuf>,

    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = "./icons")]
    output: PathBuf,

    /// Generate only the app icon set (AppIcon.appiconset + AppIcon.icns)
    #[clap(long)]
    app_icon: bool,

    /// Generate only the menu bar template image set
    #[clap(long)]
    menubar: bool,

    /// Generate the menu bar set from the built-in simplified glyph
    /// instead of INPUT
    #[clap(long)]
    menubar_simple: bool,

    /// Skip the iconutil packaging step (for non-macOS hosts)
    #[clap(long)]
    no_icns: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    generate::run(RunOptions {
        input: args.input,
        output: args.output,
        app_icon: args.app_icon,
        menubar: args.menubar,
        menubar_simple: args.menubar_simple,
        no_icns: args.no_icns,
    })
}
