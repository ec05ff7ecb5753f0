use std::fmt;
use std::path::{Path, PathBuf};

/// Well-known locations of a sans-serif TrueType font, tried in order when
/// no font was supplied explicitly.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Error returned when a font cannot be read or parsed.
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns the loaded fonts. The first successfully loaded font is the default
/// used for `TextCmd`s.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    /// Reads and loads a font file.
    pub fn load_font_file(&mut self, path: &Path) -> Result<FontId, FontLoadError> {
        let bytes = std::fs::read(path)
            .map_err(|e| FontLoadError(format!("{}: {e}", path.display())))?;
        self.load_font(&bytes)
    }

    /// Loads the first readable font from the platform's usual locations.
    pub fn load_system_default(&mut self) -> Result<FontId, FontLoadError> {
        for candidate in SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from) {
            if !candidate.is_file() {
                continue;
            }
            match self.load_font_file(&candidate) {
                Ok(id) => {
                    log::debug!("loaded default font {}", candidate.display());
                    return Ok(id);
                }
                Err(e) => log::debug!("skipping font candidate: {e}"),
            }
        }
        Err(FontLoadError("no system font found".to_string()))
    }

    /// Returns the default font, if any font is loaded.
    pub fn default_font(&self) -> Option<FontId> {
        if self.fonts.is_empty() { None } else { Some(FontId(0)) }
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_load() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"definitely not a font").is_err());
        assert!(fonts.default_font().is_none());
    }

    #[test]
    fn missing_file_reports_path() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_font_file(Path::new("/no/such/font.ttf")).unwrap_err();
        assert!(err.to_string().contains("/no/such/font.ttf"));
    }
}
