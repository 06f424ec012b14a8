//! Clip storage
//!
//! Resolves the user's documents directory and generates a fresh uniquely
//! named output path for every recording.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Container extension for recorded clips
pub const CLIP_EXTENSION: &str = "mp4";

/// Resolves the directory recordings are written into.
pub trait DocumentStorage: Send + Sync {
    fn documents_dir(&self) -> Option<PathBuf>;
}

/// The user's documents directory, as reported by the OS.
pub struct PlatformStorage;

impl DocumentStorage for PlatformStorage {
    fn documents_dir(&self) -> Option<PathBuf> {
        dirs::document_dir()
    }
}

/// Join a fresh random file name with the fixed clip extension.
pub fn clip_path(directory: &Path) -> PathBuf {
    let file_name = Uuid::new_v4().to_string();
    directory.join(file_name).with_extension(CLIP_EXTENSION)
}
