use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use base64::Engine as _;
use eframe::egui;
use rayon::prelude::*;

/// Decoded images keyed by their source string, uploaded to the GPU on first
/// use. A source that failed to load is remembered as `None` and omitted.
pub struct ImageCache {
    base_path: PathBuf,
    decoded: RefCell<HashMap<String, Option<egui::ColorImage>>>,
    textures: RefCell<HashMap<String, Option<egui::TextureHandle>>>,
}

impl ImageCache {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            decoded: RefCell::new(HashMap::new()),
            textures: RefCell::new(HashMap::new()),
        }
    }

    /// Decode every source in parallel so the first frames don't stall.
    pub fn preload<'a>(&self, sources: impl IntoIterator<Item = &'a str>) {
        let pending: Vec<&str> = {
            let decoded = self.decoded.borrow();
            let mut seen = Vec::new();
            for src in sources {
                if !decoded.contains_key(src) && !seen.contains(&src) {
                    seen.push(src);
                }
            }
            seen
        };
        if pending.is_empty() {
            return;
        }

        let base = self.base_path.as_path();
        let results: Vec<(String, Option<egui::ColorImage>)> = pending
            .par_iter()
            .map(|src| (src.to_string(), decode_logged(base, src)))
            .collect();

        log::debug!("preloaded {} images", results.len());
        self.decoded.borrow_mut().extend(results);
    }

    pub fn get_or_load(&self, ui: &egui::Ui, src: &str) -> Option<egui::TextureHandle> {
        if let Some(handle) = self.textures.borrow().get(src) {
            return handle.clone();
        }

        let image = match self.decoded.borrow_mut().remove(src) {
            Some(image) => image,
            None => decode_logged(&self.base_path, src),
        };
        let handle = image.map(|image| {
            ui.ctx()
                .load_texture(texture_name(src), image, egui::TextureOptions::LINEAR)
        });
        self.textures
            .borrow_mut()
            .insert(src.to_string(), handle.clone());
        handle
    }

    /// Forget everything, e.g. after the note changed on disk.
    pub fn clear(&self) {
        self.decoded.borrow_mut().clear();
        self.textures.borrow_mut().clear();
    }
}

fn texture_name(src: &str) -> String {
    if src.starts_with("data:") {
        // Data URIs can be megabytes long.
        format!("data-uri-{}", src.len())
    } else {
        src.to_string()
    }
}

fn decode_logged(base: &Path, src: &str) -> Option<egui::ColorImage> {
    match read_image_bytes(base, src).and_then(|bytes| decode(&bytes)) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("skipping image {}: {e:#}", short_source(src));
            None
        }
    }
}

fn short_source(src: &str) -> &str {
    match src.find(',') {
        Some(i) if src.starts_with("data:") => &src[..i],
        _ => src,
    }
}

/// Bytes for a file path (relative to the note) or a base64 `data:` URI.
pub fn read_image_bytes(base: &Path, src: &str) -> Result<Vec<u8>> {
    if let Some(rest) = src.strip_prefix("data:") {
        let Some((meta, payload)) = rest.split_once(',') else {
            bail!("malformed data URI");
        };
        if !meta.ends_with(";base64") {
            bail!("only base64 data URIs are supported");
        }
        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        return base64::engine::general_purpose::STANDARD
            .decode(payload)
            .context("invalid base64 payload");
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        bail!("remote images are not fetched");
    }

    let path = Path::new(src.strip_prefix("file://").unwrap_or(src));
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
}

fn decode(bytes: &[u8]) -> Result<egui::ColorImage> {
    let image = image::load_from_memory(bytes).context("unsupported image data")?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([200, 10, 10, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_data_uri_decodes() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes());
        let src = format!("data:image/png;base64,{encoded}");
        let bytes = read_image_bytes(Path::new("."), &src).unwrap();
        let image = decode(&bytes).unwrap();
        assert_eq!(image.size, [2, 3]);
    }

    #[test]
    fn test_relative_path_resolves_against_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.png"), png_bytes()).unwrap();
        let bytes = read_image_bytes(dir.path(), "pic.png").unwrap();
        assert!(decode(&bytes).is_ok());
    }

    #[test]
    fn test_unusable_sources_are_errors() {
        let base = Path::new(".");
        assert!(read_image_bytes(base, "data:image/png,rawbytes").is_err());
        assert!(read_image_bytes(base, "data:nocomma").is_err());
        assert!(read_image_bytes(base, "https://example.com/a.png").is_err());
        assert!(read_image_bytes(base, "/no/such/image.png").is_err());
        assert!(decode(b"not an image").is_err());
    }

    #[test]
    fn test_preload_remembers_failures() {
        let cache = ImageCache::new(PathBuf::from("/no/such/dir"));
        cache.preload(["missing.png", "missing.png"]);
        assert!(matches!(cache.decoded.borrow().get("missing.png"), Some(None)));
        assert_eq!(cache.decoded.borrow().len(), 1);
    }
}
