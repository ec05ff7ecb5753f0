//! Image and sound handles.
//!
//! Loading never fails from the caller's point of view: a missing or broken
//! file is logged and yields an invalid handle, and drawing or playing an
//! invalid handle does nothing. `try_load` exposes the underlying error.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use easel_engine::scene::ImageData;

/// Error produced while loading an image or sound file.
#[derive(Debug)]
pub enum AssetError {
    Io { path: PathBuf, source: std::io::Error },
    Decode { path: PathBuf, message: String },
    InvalidPixels { width: u32, height: u32, len: usize },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            AssetError::Decode { path, message } => {
                write!(f, "{}: cannot decode image: {message}", path.display())
            }
            AssetError::InvalidPixels { width, height, len } => write!(
                f,
                "{len} bytes is not a {width}×{height} RGBA8 image"
            ),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ── images ────────────────────────────────────────────────────────────────

/// Shared handle to decoded image pixels.
///
/// Cloning is cheap. `Image::default()` is the invalid handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    data: Option<Arc<ImageData>>,
}

impl Image {
    /// Loads an image file, logging and returning an invalid handle on failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("image not loaded: {e}");
                Self::default()
            }
        }
    }

    /// Loads and decodes an image file (PNG, JPEG, BMP, GIF, ICO, TIFF, WebP).
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let image = Self::from_rgba(width, height, rgba.into_raw())?;
        log::debug!("loaded image {} ({width}×{height})", path.display());
        Ok(image)
    }

    /// Wraps raw straight-alpha RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, AssetError> {
        let len = rgba.len();
        let data = ImageData::new(width, height, rgba)
            .ok_or(AssetError::InvalidPixels { width, height, len })?;
        Ok(Self { data: Some(Arc::new(data)) })
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.data.is_some()
    }

    /// Width in pixels; 0 for an invalid handle.
    pub fn width(&self) -> u32 {
        self.data.as_ref().map_or(0, |d| d.width())
    }

    /// Height in pixels; 0 for an invalid handle.
    pub fn height(&self) -> u32 {
        self.data.as_ref().map_or(0, |d| d.height())
    }

    pub(crate) fn data(&self) -> Option<&Arc<ImageData>> {
        self.data.as_ref()
    }
}

// ── sounds ────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct SoundData {
    path: PathBuf,
    bytes: Arc<[u8]>,
}

/// Shared handle to an encoded sound file.
///
/// The file is read eagerly so a missing file is reported at creation time.
/// Decoding and playback belong to the [`crate::AudioSink`].
#[derive(Debug, Clone, Default)]
pub struct Sound {
    data: Option<Arc<SoundData>>,
}

impl Sound {
    /// Reads a sound file, logging and returning an invalid handle on failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match Self::try_load(path) {
            Ok(sound) => sound,
            Err(e) => {
                log::warn!("sound not loaded: {e}");
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded sound {} ({} bytes)", path.display(), bytes.len());
        Ok(Self {
            data: Some(Arc::new(SoundData {
                path: path.to_path_buf(),
                bytes: bytes.into(),
            })),
        })
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.data.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.data.as_ref().map(|d| d.path.as_path())
    }

    /// Encoded file contents.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.data.as_ref().map(|d| &d.bytes[..])
    }
}

impl PartialEq for Sound {
    /// Handles are equal when they share the same loaded file (or are both invalid).
    fn eq(&self, other: &Self) -> bool {
        match (&self.data, &other.data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_image_is_invalid_handle() {
        let image = Image::load("/definitely/not/here.png");
        assert!(!image.is_valid());
        assert_eq!((image.width(), image.height()), (0, 0));
        assert!(matches!(Image::try_load("/definitely/not/here.png"), Err(AssetError::Io { .. })));
    }

    #[test]
    fn png_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let mut pixels = image::RgbaImage::new(3, 2);
        pixels.put_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
        pixels.save(&path).unwrap();

        let loaded = Image::load(&path);
        assert!(loaded.is_valid());
        assert_eq!((loaded.width(), loaded.height()), (3, 2));
        let data = loaded.data().unwrap();
        assert_eq!(&data.rgba()[16..20], &[255, 0, 0, 255]);
    }

    #[test]
    fn garbage_file_fails_to_decode() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not an image at all").unwrap();
        let err = Image::try_load(file.path()).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains("cannot decode"));
    }

    #[test]
    fn from_rgba_checks_length() {
        assert!(Image::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Image::from_rgba(2, 2, vec![0; 3]),
            Err(AssetError::InvalidPixels { len: 3, .. })
        ));
    }

    #[test]
    fn sound_reads_file_or_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"RIFF....WAVE").unwrap();

        let sound = Sound::load(file.path());
        assert!(sound.is_valid());
        assert_eq!(sound.bytes(), Some(&b"RIFF....WAVE"[..]));
        assert_eq!(sound.path(), Some(file.path()));
        assert_eq!(sound.clone(), sound);

        let missing = Sound::load("/no/such/sound.wav");
        assert!(!missing.is_valid());
        assert_ne!(missing, sound);
    }
}
