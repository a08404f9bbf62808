use std::fmt;
use std::path::PathBuf;

/// Where a cover image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSource {
    /// Raw image bytes, e.g. straight from an upload. The media type and file name are hints used
    /// to decide the image format.
    Bytes {
        data: Vec<u8>,
        media_type: Option<String>,
        file_name: Option<String>,
    },
    /// A remote image, fetched over HTTP(S) at build time
    Url(String),
    /// An image on the local filesystem
    Path(PathBuf),
}

impl CoverSource {
    /// Interpret a configured cover string: http(s) URLs are fetched, anything else is a path.
    pub fn parse<S: AsRef<str>>(value: S) -> Option<CoverSource> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            None
        } else if value.starts_with("http://") || value.starts_with("https://") {
            Some(CoverSource::Url(value.to_string()))
        } else {
            Some(CoverSource::Path(PathBuf::from(value)))
        }
    }
}

impl fmt::Display for CoverSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverSource::Bytes {
                data, file_name, ..
            } => match file_name {
                Some(name) => write!(f, "{name} ({} bytes)", data.len()),
                None => write!(f, "<{} bytes>", data.len()),
            },
            CoverSource::Url(url) => write!(f, "{url}"),
            CoverSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Image formats accepted as covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageKind {
    pub fn media_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Webp => "image/webp",
            ImageKind::Gif => "image/gif",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
            ImageKind::Gif => "gif",
        }
    }

    /// Parse a `Content-Type` value, ignoring parameters and case.
    pub fn from_media_type(media_type: &str) -> Option<ImageKind> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/webp" => Some(ImageKind::Webp),
            "image/gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }

    /// Guess from the extension of a file name or URL. Query strings and fragments are ignored.
    pub fn from_file_name(name: &str) -> Option<ImageKind> {
        let path = name.split(['?', '#']).next().unwrap_or_default();
        let file_name = path.rsplit('/').next().unwrap_or_default();
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "webp" => Some(ImageKind::Webp),
            "gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }

    /// Recognise the format from the leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<ImageKind> {
        match data {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageKind::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(ImageKind::Png),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
                Some(ImageKind::Webp)
            }
            [b'G', b'I', b'F', b'8', ..] => Some(ImageKind::Gif),
            _ => None,
        }
    }

    /// Decide the format of a cover: the declared media type wins, then the file name extension,
    /// then the magic bytes. JPEG is assumed when nothing matches.
    pub fn detect(media_type: Option<&str>, file_name: Option<&str>, data: &[u8]) -> ImageKind {
        media_type
            .and_then(ImageKind::from_media_type)
            .or_else(|| file_name.and_then(ImageKind::from_file_name))
            .or_else(|| ImageKind::sniff(data))
            .unwrap_or(ImageKind::Jpeg)
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media_type())
    }
}

/// A cover image that has been resolved to bytes and a known format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub data: Vec<u8>,
    pub kind: ImageKind,
}

impl CoverImage {
    /// Path of the image inside the `OEBPS` directory.
    pub fn href(&self) -> String {
        format!("images/cover.{}", self.kind.extension())
    }
}
