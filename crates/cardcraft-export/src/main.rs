//! Headless exporter: rasterizes one side of a saved card design to PNG.
//!
//! # Usage
//!
//! ```bash
//! # Front side at the configured supersampling factor
//! cardcraft-export --design card.json --out front.png
//!
//! # Back side at 2x with a custom editor config
//! RUST_LOG=debug cardcraft-export --design card.json --config editor.json --side back --scale 2 --out back.png
//! ```

use cardcraft_core::{CardDesign, EditorConfig, SceneView, SideId};
use cardcraft_render::{Reconciler, RetainedRenderer, SceneOptions, decode_reference};
use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::{Path, PathBuf};

/// Export a CardCraft design side as a PNG.
#[derive(Parser, Debug)]
#[command(name = "cardcraft-export", about = "Rasterize a CardCraft design to PNG")]
struct Args {
    /// Saved design (JSON)
    #[arg(short, long)]
    design: PathBuf,

    /// Editor configuration (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Which side to export
    #[arg(short, long, value_enum, default_value = "front")]
    side: SideArg,

    /// Supersampling factor; overrides the config's export scale
    #[arg(long)]
    scale: Option<f64>,

    /// Output PNG path
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SideArg {
    Front,
    Back,
}

impl From<SideArg> for SideId {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Front => SideId::Front,
            SideArg::Back => SideId::Back,
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("Export failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => EditorConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => EditorConfig::default(),
    };
    let design = CardDesign::from_json(&std::fs::read_to_string(&args.design)?, &config)?;
    let scale = args.scale.unwrap_or(config.export_scale);
    let side = SideId::from(args.side);
    log::info!(
        "Exporting {side:?} side of {} at {scale}x",
        args.design.display()
    );

    let png = export_side(&design, side, scale)?;
    write_output(&args.out, &png)?;
    log::info!("Wrote {} ({} bytes)", args.out.display(), png.len());
    Ok(())
}

/// Render one side with every decodable image and encode it as PNG.
fn export_side(design: &CardDesign, side: SideId, scale: f64) -> Result<Vec<u8>, Box<dyn Error>> {
    let card_side = design.side(side);
    let mut renderer = RetainedRenderer::new();
    for reference in card_side.image_refs() {
        if renderer.images().contains(reference) {
            continue;
        }
        match decode_reference(reference) {
            Ok(image) => renderer.images_mut().insert(reference.clone(), image),
            Err(e) => log::warn!("Drawing a placeholder for an image that did not decode: {e}"),
        }
    }
    let view = SceneView::new(side, card_side, design.canvas_size());
    renderer.reconcile(&view, &SceneOptions::export());
    Ok(renderer.export(scale)?.to_png()?)
}

fn write_output(path: &Path, png: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardcraft_core::{CardCategory, Logo, Orientation};
    use cardcraft_render::images::png_data_uri;
    use kurbo::Point;

    fn args(dir: &Path, design: &CardDesign, side: SideArg, scale: Option<f64>) -> Args {
        let design_path = dir.join("card.json");
        std::fs::write(&design_path, design.to_json().unwrap()).unwrap();
        Args {
            design: design_path,
            config: None,
            side,
            scale,
            out: dir.join("out").join("card.png"),
        }
    }

    #[test]
    fn test_exports_png_at_configured_scale() {
        let dir = tempfile::tempdir().unwrap();
        let mut design = CardDesign::new(Orientation::Portrait, CardCategory::Wedding);
        let canvas = design.canvas_size();
        design.side_mut(SideId::Back).add_text("With love", canvas);
        let args = args(dir.path(), &design, SideArg::Back, None);

        run(&args).unwrap();

        let bytes = std::fs::read(&args.out).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (780, 1200));
    }

    #[test]
    fn test_scale_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let design = CardDesign::default();
        let args = args(dir.path(), &design, SideArg::Front, Some(1.0));
        run(&args).unwrap();
        let decoded = image::load_from_memory(&std::fs::read(&args.out).unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 260));
    }

    #[test]
    fn test_logo_image_is_drawn() {
        let blue = [0u8, 0, 255, 255].repeat(16);
        let reference = png_data_uri(&blue, 4, 4).unwrap();
        let mut design = CardDesign::default();
        design.side_mut(SideId::Front).logo = Some(Logo::new(reference.clone(), Point::new(200.0, 130.0)));
        assert_eq!(design.side(SideId::Front).image_refs(), vec![&reference]);

        let png = export_side(&design, SideId::Front, 1.0).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(200, 130).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_bad_inputs_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let design = CardDesign::default();
        let mut bad_scale = args(dir.path(), &design, SideArg::Front, Some(0.0));
        assert!(run(&bad_scale).is_err());
        bad_scale.design = dir.path().join("missing.json");
        assert!(run(&bad_scale).is_err());
    }

    #[test]
    fn test_cli_parses() {
        let args = Args::try_parse_from([
            "cardcraft-export",
            "--design",
            "card.json",
            "--side",
            "back",
            "--scale",
            "2",
            "--out",
            "back.png",
        ])
        .unwrap();
        assert_eq!(args.side, SideArg::Back);
        assert_eq!(args.scale, Some(2.0));
        assert!(args.config.is_none());
    }
}
