//! Font registration for chart text

use plotters::style::{FontStyle, register_font};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Family name chart text is drawn with
pub const FONT_FAMILY: &str = "sans-serif";

/// Fonts tried when none is configured
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

/// Register a font for chart text, once per process.
///
/// Returns whether text can be drawn. Only the first call's `path` counts.
pub fn ensure_font(path: Option<&Path>) -> bool {
    *FONT_REGISTERED.get_or_init(|| register_first(&candidates(path)))
}

fn candidates(path: Option<&Path>) -> Vec<PathBuf> {
    match path {
        Some(path) => vec![path.to_path_buf()],
        None => SYSTEM_FONTS.iter().map(PathBuf::from).collect(),
    }
}

fn register_first(candidates: &[PathBuf]) -> bool {
    for candidate in candidates {
        let Ok(bytes) = std::fs::read(candidate) else {
            debug!("Font {} not readable", candidate.display());
            continue;
        };
        // plotters keeps registered fonts for the life of the process
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        match register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
            Ok(()) => {
                info!("Using font {} for chart text", candidate.display());
                return true;
            }
            Err(_) => warn!("{} is not a usable TrueType font", candidate.display()),
        }
    }

    warn!("No font found, charts are rendered without text");
    false
}
