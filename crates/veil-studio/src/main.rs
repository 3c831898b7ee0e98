use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};

use veil_engine::logging::{init_logging, LoggingConfig};
use veil_engine::paint::Color;
use veil_slideshow::Application;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "bmp"];

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let assets = std::env::var_os("VEIL_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"));

    let names = list_images(&assets)?;
    let pairs = pair_tiles(&names);
    ensure!(
        !pairs.is_empty(),
        "no `<name>.<ext>` + `<name>-hover.<ext>` image pairs in {}",
        assets.display()
    );
    log::info!("{} tile(s) from {}", pairs.len(), assets.display());

    let mut app = Application::new()
        .title("veil studio")
        .size(1280.0, 720.0)
        .assets(&assets)
        .touch_mode(std::env::var("VEIL_TOUCH").is_ok_and(|v| v == "1"));

    if let Ok(mask) = std::env::var("VEIL_MASK") {
        app = app.mask(mask);
    }
    if let Some(palette) = std::env::var("VEIL_PALETTE").ok().as_deref().and_then(parse_palette) {
        app = app.palette(palette);
    }

    for (image, hover) in pairs {
        app = app.tile(image, hover);
    }

    app.run()
}

fn list_images(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read asset directory {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.context("failed to read directory entry")?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Pairs `foo.jpg` with `foo-hover.jpg`, in name order.
fn pair_tiles(names: &[String]) -> Vec<(String, String)> {
    names
        .iter()
        .filter_map(|name| {
            let (stem, ext) = name.rsplit_once('.')?;
            if stem.ends_with("-hover") || !IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                return None;
            }
            let hover = format!("{stem}-hover.{ext}");
            names.contains(&hover).then(|| (name.clone(), hover))
        })
        .collect()
}

/// Five comma-separated `#rrggbb` colours.
fn parse_palette(spec: &str) -> Option<[Color; 5]> {
    let colors: Vec<Color> = spec
        .split(',')
        .map(|s| Color::from_hex(s.trim()))
        .collect::<Option<_>>()?;
    colors.try_into().ok()
}
