use bytes::Bytes;
use std::path::Path;

/// Media attached to a candidate before it is written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaAsset {
    /// Referenced by URL only.
    Remote(String),
    /// Content to be stored under `file_name` in the domain's media directory.
    File { file_name: String, bytes: Bytes },
}

impl MediaAsset {
    pub fn remote(url: impl Into<String>) -> Self {
        MediaAsset::Remote(url.into())
    }

    pub fn file(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        MediaAsset::File {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// A human-readable text file standing in for media that could not be
    /// generated.
    pub fn placeholder(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::file(file_name, Bytes::from(text.into()))
    }

    pub fn size(&self) -> u64 {
        match self {
            MediaAsset::Remote(_) => 0,
            MediaAsset::File { bytes, .. } => bytes.len() as u64,
        }
    }

    /// The string stored in the record: the URL, or the path the file will
    /// be written to under `dir`.
    pub fn reference(&self, dir: &Path) -> String {
        match self {
            MediaAsset::Remote(url) => url.clone(),
            MediaAsset::File { file_name, .. } => dir.join(file_name).display().to_string(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, MediaAsset::Remote(_))
    }
}
