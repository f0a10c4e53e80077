//! Image content types accepted by the service.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    pub const ALL: [ImageMime; 3] = [ImageMime::Jpeg, ImageMime::Png, ImageMime::Webp];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Webp => "image/webp",
        }
    }

    /// Parse a declared content type such as `image/PNG; charset=binary`.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let essence = declared.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .into_iter()
            .find(|mime| mime.as_str().eq_ignore_ascii_case(essence))
    }

    /// Detect the type from the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageMime::Jpeg),
            [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageMime::Png),
            [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => {
                Some(ImageMime::Webp)
            }
            _ => None,
        }
    }

    /// Like [`ImageMime::sniff`], but falls back to PNG for unknown content.
    pub fn sniff_or_png(bytes: &[u8]) -> Self {
        Self::sniff(bytes).unwrap_or_else(|| {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to image/png",
                &bytes[..bytes.len().min(4)]
            );
            ImageMime::Png
        })
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
