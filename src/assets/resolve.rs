use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{Img2VideoError, Img2VideoResult};

/// One source image on disk.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageRef {
    path: PathBuf,
}

impl ImageRef {
    /// Reference the image at `path`. The file is not opened.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the image file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Non-empty, lexicographically ordered list of source images.
///
/// The only way to build one is [`resolve_images`] or [`OrderedImageSet::from_paths`], both
/// of which sort explicitly and refuse to produce an empty set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedImageSet {
    images: Vec<ImageRef>,
}

impl OrderedImageSet {
    /// Build a set from arbitrary paths, sorting them by their path bytes.
    pub fn from_paths<I, P>(paths: I) -> Option<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut images: Vec<ImageRef> = paths.into_iter().map(ImageRef::new).collect();
        if images.is_empty() {
            return None;
        }
        images.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
        Some(Self { images })
    }

    /// The image whose aspect ratio sets the output size.
    pub fn first(&self) -> &ImageRef {
        // Non-empty by construction.
        &self.images[0]
    }

    /// Number of images, always at least one.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Images in playback order.
    pub fn iter(&self) -> std::slice::Iter<'_, ImageRef> {
        self.images.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.images.iter().map(ImageRef::path)
    }
}

impl<'a> IntoIterator for &'a OrderedImageSet {
    type Item = &'a ImageRef;
    type IntoIter = std::slice::Iter<'a, ImageRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

/// Scan `dir` (non-recursively) for regular files whose name ends with `.ext`.
///
/// Symlinks and subdirectories are skipped. The result order depends only on the file names.
#[tracing::instrument]
pub fn resolve_images(dir: &Path, extension: &str) -> Img2VideoResult<OrderedImageSet> {
    if !dir.is_dir() {
        return Err(Img2VideoError::DirectoryNotFound(dir.to_path_buf()));
    }

    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let mut matched = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("read directory '{}'", dir.display()))?
    {
        let entry = entry.with_context(|| format!("read entry of '{}'", dir.display()))?;
        // `DirEntry::file_type` does not follow symlinks.
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat '{}'", entry.path().display()))?;
        if !file_type.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            matched.push(entry.path());
        }
    }

    let set = OrderedImageSet::from_paths(matched).ok_or_else(|| Img2VideoError::EmptyImageSet {
        dir: dir.to_path_buf(),
        ext: suffix.clone(),
    })?;
    tracing::debug!(count = set.len(), "resolved images");
    Ok(set)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;
