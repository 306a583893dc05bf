//! Discovery of input images in a directory.
//!
//! Only regular files directly inside the directory are considered (no
//! recursion), and only those whose extension is one of
//! [`IMAGE_EXTENSIONS`], compared case-insensitively. The order is the order
//! the filesystem lists entries in; it is not sorted.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::RotateError;

/// Extensions accepted as input images.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// An input image found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name without its final extension (`photo` for `photo.JPG`).
    pub base: OsString,
    /// Final extension without the dot, in its original case (`JPG`).
    pub extension: OsString,
}

impl ImageFile {
    /// Build an `ImageFile` if `path` carries an accepted image extension.
    ///
    /// The check is on the name only; the file is not opened.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let extension = path.extension()?.to_os_string();
        if !is_image_extension(&extension) {
            return None;
        }
        let base = path.file_stem()?.to_os_string();
        Some(Self {
            path,
            base,
            extension,
        })
    }

    /// Name of the output for `angle`: `{base}_rotated_{angle}.{ext}`.
    pub fn output_file_name(&self, angle: i32) -> OsString {
        let mut name = self.base.clone();
        name.push(format!("_rotated_{angle}."));
        name.push(&self.extension);
        name
    }

    /// File name of the input, for logs and reports.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Whether an extension (without the dot) is an accepted image extension.
pub fn is_image_extension(ext: &OsStr) -> bool {
    ext.to_str().is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

/// List the image files directly inside `dir`, in directory-listing order.
///
/// Subdirectories are skipped even when their name ends in an image
/// extension. Symlinks are followed when deciding whether an entry is a file.
/// An entry whose metadata cannot be read is still listed, so the failure is
/// reported against that file when it is decoded.
///
/// # Errors
///
/// Returns `RotateError::Io` if the directory itself cannot be read.
pub fn discover_images(dir: &Path) -> Result<Vec<ImageFile>, RotateError> {
    let entries = std::fs::read_dir(dir).map_err(|e| RotateError::io(dir, e))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RotateError::io(dir, e))?;
        let path = entry.path();

        let Some(image) = ImageFile::from_path(&path) else {
            continue;
        };

        // `metadata` follows symlinks, unlike `DirEntry::file_type`
        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => images.push(image),
            Ok(_) => {}
            // Unreadable entry (e.g. dangling symlink): fails later as that file's decode error
            Err(e) => {
                warn!(file = %image.display_name(), error = %e, "Cannot stat input entry");
                images.push(image);
            }
        }
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_extension_case_insensitive() {
        for ext in ["png", "PNG", "Jpg", "jpeg", "JPEG", "bmp", "GIF"] {
            assert!(is_image_extension(OsStr::new(ext)), "{ext}");
        }
        for ext in ["tif", "webp", "txt", "", "pngx"] {
            assert!(!is_image_extension(OsStr::new(ext)), "{ext}");
        }
    }

    #[test]
    fn test_image_file_parts() {
        let file = ImageFile::from_path("/in/Holiday.Photo.JPG").unwrap();
        assert_eq!(file.base, OsString::from("Holiday.Photo"));
        assert_eq!(file.extension, OsString::from("JPG"));
        assert_eq!(file.display_name(), "Holiday.Photo.JPG");
    }

    #[test]
    fn test_image_file_rejects_other_names() {
        assert!(ImageFile::from_path("/in/notes.txt").is_none());
        assert!(ImageFile::from_path("/in/README").is_none());
        // A dotfile named like an extension has no extension at all
        assert!(ImageFile::from_path("/in/.png").is_none());
    }

    #[test]
    fn test_output_file_name() {
        let file = ImageFile::from_path("/in/photo.jpg").unwrap();
        assert_eq!(file.output_file_name(90), OsString::from("photo_rotated_90.jpg"));
        assert_eq!(file.output_file_name(0), OsString::from("photo_rotated_0.jpg"));
        assert_eq!(
            file.output_file_name(-45),
            OsString::from("photo_rotated_-45.jpg")
        );
        assert_eq!(
            file.output_file_name(720),
            OsString::from("photo_rotated_720.jpg")
        );
    }

    #[test]
    fn test_output_file_name_keeps_extension_case() {
        let file = ImageFile::from_path("scan.PNG").unwrap();
        assert_eq!(file.output_file_name(180), OsString::from("scan_rotated_180.PNG"));
    }

    #[test]
    fn test_discover_filters_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.JPEG", "c.txt", "d.gif", "e"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("folder.png")).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("deep.png"), b"x").unwrap();

        let mut names: Vec<String> = discover_images(dir.path())
            .unwrap()
            .iter()
            .map(ImageFile::display_name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.png", "b.JPEG", "d.gif"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_keeps_dangling_symlink() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.png"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.png"), dir.path().join("dangling.png"))
            .unwrap();

        let mut names: Vec<String> = discover_images(dir.path())
            .unwrap()
            .iter()
            .map(ImageFile::display_name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["dangling.png", "good.png"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let result = discover_images(Path::new("/definitely/not/a/dir"));
        assert!(matches!(result, Err(RotateError::Io { .. })));
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_images(dir.path()).unwrap().is_empty());
    }
}
