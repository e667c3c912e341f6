//! Storefront banner image and promotional video.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::wire;
use crate::{Validate, ValidationError};

/// The latest saved media. Each upload overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSettings {
    #[serde(default, alias = "image", deserialize_with = "wire::text")]
    pub image_url: Option<String>,
    #[serde(default, alias = "video", deserialize_with = "wire::text")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Multipart field name expected by `POST /media/upload`.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Content type guessed from the file extension.
#[must_use]
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "ogv" => "video/ogg",
        _ => return None,
    };
    Some(mime)
}

/// Files selected for a media save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaUpload {
    pub image: Option<PathBuf>,
    pub video: Option<PathBuf>,
}

impl MediaUpload {
    /// Selected files paired with their kind and content type. Only
    /// meaningful after [`Validate::validate`] has passed.
    #[must_use]
    pub fn parts(&self) -> Vec<(MediaKind, &Path, &'static str)> {
        [
            (MediaKind::Image, self.image.as_deref()),
            (MediaKind::Video, self.video.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, path)| {
            let path = path?;
            content_type_for(path).map(|mime| (kind, path, mime))
        })
        .collect()
    }
}

fn check_kind(path: &Path, kind: MediaKind) -> Result<(), ValidationError> {
    let prefix = match kind {
        MediaKind::Image => "image/",
        MediaKind::Video => "video/",
    };
    match content_type_for(path) {
        Some(mime) if mime.starts_with(prefix) => Ok(()),
        _ => Err(ValidationError::UnsupportedMedia {
            path: path.display().to_string(),
            expected: kind.label(),
        }),
    }
}

impl Validate for MediaUpload {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.image.is_none() && self.video.is_none() {
            return Err(ValidationError::NothingToUpload);
        }
        if let Some(image) = &self.image {
            check_kind(image, MediaKind::Image)?;
        }
        if let Some(video) = &self.video {
            check_kind(video, MediaKind::Video)?;
        }
        Ok(())
    }
}
