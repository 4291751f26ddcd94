use super::collision::SourceBitmap;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("decoded image {path} is not a usable bitmap: {source}")]
    InvalidBitmap {
        path: PathBuf,
        #[source]
        source: super::collision::InvalidInputError,
    },
}

#[derive(Debug)]
struct QueuedAsset {
    key: String,
    path: PathBuf,
}

/// Keyed store of decoded RGBA bitmaps with an incremental load queue.
///
/// `load_next` decodes exactly one queued image, so the loader scene can
/// advance its progress bar one asset per tick. A failed decode is recorded
/// as a missing entry and warned about once; later lookups return None
/// silently, letting the renderer fall back to placeholders.
#[derive(Debug, Default)]
pub struct AssetStore {
    queue: VecDeque<QueuedAsset>,
    total_queued: usize,
    loaded: HashMap<String, Option<SourceBitmap>>,
}

impl AssetStore {
    pub fn enqueue(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.queue.push_back(QueuedAsset {
            key: key.into(),
            path: path.into(),
        });
        self.total_queued += 1;
    }

    /// Decodes the next queued asset. Returns the key it processed, or
    /// None when the queue is empty.
    pub fn load_next(&mut self) -> Option<String> {
        let queued = self.queue.pop_front()?;
        match decode_png(&queued.path) {
            Ok(bitmap) => {
                debug!(
                    key = %queued.key,
                    width = bitmap.width(),
                    height = bitmap.height(),
                    "asset_loaded"
                );
                self.loaded.insert(queued.key.clone(), Some(bitmap));
            }
            Err(error) => {
                warn!(key = %queued.key, error = %error, "asset_load_failed");
                self.loaded.insert(queued.key.clone(), None);
            }
        }
        Some(queued.key)
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
    }

    /// Fraction of queued assets processed, in [0, 1]. An empty store
    /// reports 1.0 so a loader with nothing to do finishes immediately.
    pub fn progress(&self) -> f32 {
        if self.total_queued == 0 {
            return 1.0;
        }
        let processed = self.total_queued - self.queue.len();
        processed as f32 / self.total_queued as f32
    }

    pub fn bitmap(&self, key: &str) -> Option<&SourceBitmap> {
        self.loaded.get(key).and_then(|entry| entry.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.loaded.contains_key(key)
    }
}

fn decode_png(path: &std::path::Path) -> Result<SourceBitmap, AssetError> {
    let decoded = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(io) => AssetError::Io {
            path: path.to_path_buf(),
            source: io,
        },
        other => AssetError::Decode {
            path: path.to_path_buf(),
            source: other,
        },
    })?;
    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    SourceBitmap::new(width, height, rgba.into_raw()).map_err(|source| {
        AssetError::InvalidBitmap {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_png(dir: &std::path::Path, name: &str, width: u32, height: u32) -> PathBuf {
        let mut img = image::RgbaImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgba([10, 20, 30, 255]);
        }
        let path = dir.join(name);
        img.save(&path).expect("save png");
        path
    }

    #[test]
    fn empty_store_is_complete_with_full_progress() {
        let mut store = AssetStore::default();
        assert!(store.is_complete());
        assert_eq!(store.progress(), 1.0);
        assert!(store.load_next().is_none());
    }

    #[test]
    fn load_next_processes_one_asset_per_call() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = write_test_png(dir.path(), "a.png", 2, 2);
        let b = write_test_png(dir.path(), "b.png", 4, 4);

        let mut store = AssetStore::default();
        store.enqueue("a", &a);
        store.enqueue("b", &b);
        assert_eq!(store.progress(), 0.0);
        assert!(!store.is_complete());

        assert_eq!(store.load_next().as_deref(), Some("a"));
        assert_eq!(store.progress(), 0.5);

        assert_eq!(store.load_next().as_deref(), Some("b"));
        assert_eq!(store.progress(), 1.0);
        assert!(store.is_complete());

        let bitmap = store.bitmap("a").expect("bitmap a");
        assert_eq!(bitmap.width(), 2);
        assert_eq!(bitmap.height(), 2);
    }

    #[test]
    fn failed_decode_counts_toward_progress_but_yields_no_bitmap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bogus = dir.path().join("missing.png");

        let mut store = AssetStore::default();
        store.enqueue("missing", &bogus);
        assert_eq!(store.load_next().as_deref(), Some("missing"));

        assert!(store.is_complete());
        assert_eq!(store.progress(), 1.0);
        assert!(store.contains("missing"));
        assert!(store.bitmap("missing").is_none());
    }

    #[test]
    fn decoded_alpha_channel_is_preserved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, image::Rgba([255, 255, 255, 200]));
        let path = dir.path().join("alpha.png");
        img.save(&path).expect("save png");

        let mut store = AssetStore::default();
        store.enqueue("alpha", &path);
        store.load_next();

        let bitmap = store.bitmap("alpha").expect("bitmap");
        assert_eq!(bitmap.rgba()[3], 0);
        assert_eq!(bitmap.rgba()[7], 200);
    }
}
