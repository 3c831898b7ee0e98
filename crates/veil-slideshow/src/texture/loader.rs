use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::Sender;

use image::imageops::FilterType;
use veil_engine::scene::{TextureData, MAX_TEXTURE_DIMENSION};

use super::LoadError;

pub type LoadResult = Result<TextureData, LoadError>;

/// Completion handle for one requested image.
///
/// Dropping a ticket without completing it counts as a lost request.
#[derive(Debug)]
pub struct LoadTicket {
    slot: usize,
    tx: Sender<(usize, LoadResult)>,
}

impl LoadTicket {
    pub(crate) fn new(slot: usize, tx: Sender<(usize, LoadResult)>) -> Self {
        Self { slot, tx }
    }

    /// Position of the request within its set.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn complete(self, result: LoadResult) {
        // The set may be gone already (tile dropped mid-load).
        if self.tx.send((self.slot, result)).is_err() {
            log::trace!("texture slot {} completed after its set was dropped", self.slot);
        }
    }
}

/// Image-loading service.
pub trait ImageLoader {
    /// Starts loading `source`. The result is delivered through `ticket`,
    /// possibly from another thread and in any order relative to other
    /// requests.
    fn load(&self, source: &Path, ticket: LoadTicket);
}

/// Reads and decodes images from disk, one background thread per request.
#[derive(Debug, Clone)]
pub struct ThreadedImageLoader {
    root: PathBuf,
    max_side: u32,
}

impl ThreadedImageLoader {
    /// Relative sources are resolved against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_side: MAX_TEXTURE_DIMENSION,
        }
    }

    /// Images with a side above `max_side` are downscaled to fit.
    pub fn max_dimension(mut self, max_side: u32) -> Self {
        self.max_side = max_side.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, source: &Path) -> PathBuf {
        if source.is_absolute() {
            source.to_path_buf()
        } else {
            self.root.join(source)
        }
    }
}

impl ImageLoader for ThreadedImageLoader {
    fn load(&self, source: &Path, ticket: LoadTicket) {
        let path = self.resolve(source);
        log::debug!("loading {}", path.display());

        let max_side = self.max_side;
        let spawned = thread::Builder::new()
            .name(format!("veil-load-{}", ticket.slot()))
            .spawn(move || ticket.complete(decode_file_within(&path, max_side)));

        if let Err(err) = spawned {
            // The ticket went down with the closure; the set sees a disconnect.
            log::error!("failed to spawn image loader thread: {err}");
        }
    }
}

/// Reads `path` and decodes it to RGBA8.
pub fn decode_file(path: &Path) -> LoadResult {
    decode_file_within(path, MAX_TEXTURE_DIMENSION)
}

fn decode_file_within(path: &Path, max_side: u32) -> LoadResult {
    let bytes = std::fs::read(path).map_err(|err| LoadError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    decode_bytes_within(path, &bytes, max_side)
}

/// Decodes an encoded image (format sniffed from the bytes) to RGBA8,
/// downscaled so neither side exceeds [`MAX_TEXTURE_DIMENSION`].
/// `path` is only used for error reporting.
pub fn decode_bytes(path: &Path, bytes: &[u8]) -> LoadResult {
    decode_bytes_within(path, bytes, MAX_TEXTURE_DIMENSION)
}

/// Like [`decode_bytes`] with an explicit side limit. Aspect ratio is kept.
pub fn decode_bytes_within(path: &Path, bytes: &[u8], max_side: u32) -> LoadResult {
    let mut image = image::load_from_memory(bytes).map_err(|err| LoadError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let max_side = max_side.max(1);
    if image.width() > max_side || image.height() > max_side {
        log::info!(
            "{}: downscaling {}x{} to fit {max_side}px",
            path.display(),
            image.width(),
            image.height()
        );
        image = image.resize(max_side, max_side, FilterType::Triangle);
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TextureData::new(width, height, rgba.into_raw()))
}

/// Loader that holds every request until the test completes it by hand.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ManualLoader {
    pending: std::cell::RefCell<Vec<(PathBuf, LoadTicket)>>,
}

#[cfg(test)]
impl ManualLoader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Completes the oldest request for `source`. Returns `false` if none.
    pub(crate) fn complete(&self, source: &str, result: LoadResult) -> bool {
        let mut pending = self.pending.borrow_mut();
        let Some(idx) = pending.iter().position(|(p, _)| p == Path::new(source)) else {
            return false;
        };
        let (_, ticket) = pending.remove(idx);
        ticket.complete(result);
        true
    }

    /// Completes every outstanding request with a solid texture of `size`.
    pub(crate) fn complete_all(&self, size: (u32, u32)) {
        for (_, ticket) in self.pending.borrow_mut().drain(..) {
            ticket.complete(Ok(TextureData::solid(size.0, size.1, [255, 255, 255, 255])));
        }
    }

    /// Drops every outstanding request without completing it.
    pub(crate) fn abandon_all(&self) {
        self.pending.borrow_mut().clear();
    }
}

#[cfg(test)]
impl ImageLoader for ManualLoader {
    fn load(&self, source: &Path, ticket: LoadTicket) {
        self.pending.borrow_mut().push((source.to_path_buf(), ticket));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba8() {
        let data = decode_bytes(Path::new("mem.png"), &png_bytes(3, 2)).unwrap();
        assert_eq!((data.width, data.height), (3, 2));
        assert_eq!(data.rgba.len(), 24);
        assert_eq!(&data.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn oversized_images_are_downscaled_to_the_texture_limit() {
        let data = decode_bytes(Path::new("wide.png"), &png_bytes(9000, 2)).unwrap();
        assert_eq!(data.width, MAX_TEXTURE_DIMENSION);
        assert!(data.height >= 1 && data.height <= 2);
        assert_eq!(data.rgba.len(), (data.width * data.height * 4) as usize);
    }

    #[test]
    fn downscale_keeps_aspect_ratio() {
        let data = decode_bytes_within(Path::new("tall.png"), &png_bytes(20, 40), 10).unwrap();
        assert_eq!((data.width, data.height), (5, 10));

        let small = decode_bytes_within(Path::new("small.png"), &png_bytes(3, 2), 10).unwrap();
        assert_eq!((small.width, small.height), (3, 2));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_bytes(Path::new("bad.jpg"), b"not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode { ref path, .. } if path == Path::new("bad.jpg")));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = decode_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("here.png"));
    }

    #[test]
    fn relative_sources_resolve_against_root() {
        let loader = ThreadedImageLoader::new("/assets");
        assert_eq!(loader.resolve(Path::new("a.jpg")), PathBuf::from("/assets/a.jpg"));
        assert_eq!(loader.resolve(Path::new("/abs/b.jpg")), PathBuf::from("/abs/b.jpg"));
    }
}
