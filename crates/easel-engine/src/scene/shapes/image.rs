use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::Vec2;
use crate::scene::{Primitive, SceneBuffer};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Decoded RGBA8 pixels (straight alpha) with a process-unique id.
///
/// Renderers key their texture caches on `id`, so pixel data is uploaded once
/// no matter how many frames draw the image.
pub struct ImageData {
    id: u64,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ImageData {
    /// Wraps raw pixels. Returns `None` when `rgba` does not hold exactly
    /// `width * height` RGBA8 pixels or either dimension is zero.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if width == 0 || height == 0 || rgba.len() != expected {
            return None;
        }
        Some(Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            rgba,
        })
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ImageData {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Image blit payload. Drawn unscaled with its top-left at `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub origin: Vec2,
    pub image: Arc<ImageData>,
}

impl SceneBuffer {
    #[inline]
    pub fn push_image(&mut self, origin: Vec2, image: Arc<ImageData>) {
        self.push(Primitive::Image(ImageCmd { origin, image }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_pixel_buffer() {
        assert!(ImageData::new(2, 2, vec![0; 15]).is_none());
        assert!(ImageData::new(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn ids_are_unique() {
        let a = ImageData::new(1, 1, vec![0; 4]).unwrap();
        let b = ImageData::new(1, 1, vec![0; 4]).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }
}
