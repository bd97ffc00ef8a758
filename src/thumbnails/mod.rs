mod download;

pub use download::{fetch, DOWNLOAD_TIMEOUT, USER_AGENT};

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const THUMB_WIDTH: u32 = 256;
pub const THUMB_HEIGHT: u32 = 192;
pub const EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
pub const PLACEHOLDER_FILE: &str = "placeholder.png";
pub const MAX_STEM_CHARS: usize = 100;

const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([0x33, 0x33, 0x33, 0xff]);

static FORBIDDEN_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid regex"));
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Failures of the custom-image flow. The Display text is shown verbatim next
/// to the "Save Custom Image" button.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomImageError {
    #[error("Map name cannot be empty.")]
    EmptyMap,
    #[error("Image URL cannot be empty.")]
    EmptyUrl,
    #[error("Download Error: Timeout")]
    Timeout,
    #[error("Download Error: HTTP Issue\n{0}")]
    Http(String),
    #[error("Download Error: URL Issue\n{0}")]
    Url(String),
    #[error("Image Error: Invalid data or\ncannot save to '{file}'.")]
    Image { file: String },
}

/// What the preview area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Chrome only, no image.
    Blank,
    Placeholder,
    Map { stem: String, image: RgbaImage },
}

/// Filesystem-safe stem for a map name.
pub fn sanitize(name: &str) -> String {
    let replaced = FORBIDDEN_CHARS.replace_all(name, "_");
    let collapsed = WHITESPACE_RUNS.replace_all(&replaced, "_");
    collapsed.chars().take(MAX_STEM_CHARS).collect()
}

fn normalize(image: DynamicImage) -> RgbaImage {
    image
        .resize_exact(THUMB_WIDTH, THUMB_HEIGHT, FilterType::Triangle)
        .to_rgba8()
}

/// Decodes by content rather than extension; downloaded files are often
/// misnamed.
fn decode_file(path: &Path) -> Result<DynamicImage> {
    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decoding {:?}", path))?;
    Ok(image)
}

fn generated_placeholder() -> RgbaImage {
    RgbaImage::from_pixel(THUMB_WIDTH, THUMB_HEIGHT, PLACEHOLDER_COLOR)
}

/// Flat directory of map screenshots named by sanitized map name.
pub struct ThumbnailCache {
    dir: PathBuf,
    placeholder: RgbaImage,
}

impl ThumbnailCache {
    pub fn new(dir: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&dir) {
            log::warn!("Failed to create thumbnail directory {:?}: {}", dir, e);
        }
        let placeholder = Self::load_placeholder(&dir);
        Self { dir, placeholder }
    }

    fn load_placeholder(dir: &Path) -> RgbaImage {
        let path = dir.join(PLACEHOLDER_FILE);
        if !path.exists() {
            return generated_placeholder();
        }
        match decode_file(&path) {
            Ok(img) => normalize(img),
            Err(e) => {
                log::warn!("Unusable placeholder {:?}, using generated one: {:#}", path, e);
                generated_placeholder()
            }
        }
    }

    pub fn placeholder(&self) -> &RgbaImage {
        &self.placeholder
    }

    /// Preview before any map is known.
    pub fn idle(&self, show: bool) -> Preview {
        if show {
            Preview::Placeholder
        } else {
            Preview::Blank
        }
    }

    /// Finds the cached image for `map`. Candidates that exist but fail to
    /// decode are deleted and the next extension is tried.
    pub fn resolve(&self, map: &str, show: bool) -> Preview {
        if !show || map.is_empty() {
            return Preview::Blank;
        }

        let stem = sanitize(map);
        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{}.{}", stem, ext));
            if !path.is_file() {
                continue;
            }
            match decode_file(&path) {
                Ok(img) => {
                    return Preview::Map { stem, image: normalize(img) };
                }
                Err(e) => {
                    log::warn!("Removing corrupt thumbnail {:?}: {:#}", path, e);
                    if let Err(e) = fs::remove_file(&path) {
                        log::warn!("Failed to remove {:?}: {}", path, e);
                    }
                }
            }
        }

        log::debug!("No thumbnail for map {}", map);
        Preview::Placeholder
    }

    /// Decodes `bytes` and stores them as the PNG thumbnail for `map`.
    /// Nothing on disk changes when decoding fails.
    pub fn save_custom(&self, map: &str, bytes: &[u8]) -> Result<PathBuf, CustomImageError> {
        let map = map.trim();
        if map.is_empty() {
            return Err(CustomImageError::EmptyMap);
        }

        let file = format!("{}.png", sanitize(map));
        let path = self.dir.join(&file);
        let image_error = || CustomImageError::Image { file: file.clone() };

        let image = image::load_from_memory(bytes).map_err(|e| {
            log::warn!("Custom image for {} is not decodable: {}", map, e);
            image_error()
        })?;

        normalize(image)
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| {
                log::error!("Failed to save custom image {:?}: {}", path, e);
                image_error()
            })?;

        log::info!("Saved custom image for {} to {:?}", map, path);
        Ok(path)
    }
}
