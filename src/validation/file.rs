//! Upload file checks.

use std::path::Path;

use crate::config::UploadConfig;
use crate::validation::ValidationError;

const MIB: u64 = 1024 * 1024;

/// A file the user wants to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// File name as presented to the backend.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type.
    pub mime: String,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }

    /// Describe a file on disk. The MIME type is guessed from the extension.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| ValidationError::Unreadable(format!("Cannot read {}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = guess_mime(&name).unwrap_or("application/octet-stream");
        Ok(Self::new(name, metadata.len(), mime))
    }
}

/// MIME type for the audio extensions the backend understands.
pub fn guess_mime(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    let ext = lower.rsplit_once('.').map(|(_, ext)| ext)?;
    match ext {
        "wav" | "wave" => Some("audio/wav"),
        "mp3" | "mpeg" => Some("audio/mpeg"),
        "flac" => Some("audio/flac"),
        "ogg" => Some("audio/ogg"),
        "webm" => Some("audio/webm"),
        "m4a" | "mp4" => Some("audio/mp4"),
        _ => None,
    }
}

/// Limits applied to uploads.
#[derive(Debug, Clone)]
pub struct FileRules {
    pub max_size: u64,
    pub allowed_types: Vec<String>,
    pub allowed_extensions: Vec<String>,
}

impl Default for FileRules {
    fn default() -> Self {
        Self::from(&UploadConfig::default())
    }
}

impl From<&UploadConfig> for FileRules {
    fn from(config: &UploadConfig) -> Self {
        Self {
            max_size: config.max_size_bytes,
            allowed_types: config.allowed_types.clone(),
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }
}

/// Check size, then MIME type, then extension.
pub fn validate_file(file: &FileCandidate, rules: &FileRules) -> Result<(), ValidationError> {
    if file.size > rules.max_size {
        return Err(ValidationError::FileTooLarge {
            size: file.size,
            max_mb: (rules.max_size + MIB / 2) / MIB,
        });
    }

    let allowed = rules.allowed_extensions.join(", ");
    if !rules.allowed_types.iter().any(|t| t == &file.mime) {
        return Err(ValidationError::UnsupportedType {
            mime: file.mime.clone(),
            allowed,
        });
    }

    let name = file.name.to_lowercase();
    if !rules.allowed_extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
        return Err(ValidationError::UnsupportedExtension {
            name: file.name.clone(),
            allowed,
        });
    }

    Ok(())
}
