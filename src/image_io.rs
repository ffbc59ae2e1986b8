use std::path::{Path, PathBuf};
use std::fs;
use image::{ImageFormat, RgbImage};

use crate::errors::{ContourPlotterError, Result};

/// File extensions accepted as input images
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Represents an input image with its metadata
pub struct InputImage {
    pub image: RgbImage,
    pub path: PathBuf,
    pub filename: String,
}

/// Get all supported image files from a directory (recursively), sorted by path
pub fn get_image_files_in_dir<P: AsRef<Path>>(dir_path: P) -> Result<Vec<PathBuf>> {
    let dir_path = dir_path.as_ref();

    if !dir_path.exists() {
        return Err(ContourPlotterError::InvalidPath(dir_path.to_path_buf()));
    }

    if !dir_path.is_dir() {
        return Err(ContourPlotterError::Config(format!(
            "{} is not a directory", dir_path.display()
        )));
    }

    let mut image_files = Vec::new();
    find_image_files_recursive(dir_path, &mut image_files)?;
    image_files.sort();

    Ok(image_files)
}

/// Helper function to recursively search for image files
fn find_image_files_recursive(dir_path: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir_path)? {
        let path = entry?.path();

        if path.is_dir() {
            find_image_files_recursive(&path, result)?;
        } else if path.is_file() && is_supported_image(&path) {
            result.push(path);
        }
    }

    Ok(())
}

/// Check the file extension against [`IMAGE_EXTENSIONS`], ignoring case
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Load an image as 8-bit RGB
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<InputImage> {
    let path = path.as_ref();

    // Get filename without extension
    let filename = path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContourPlotterError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let img = image::open(path)?;

    Ok(InputImage {
        image: img.to_rgb8(),
        path: path.to_path_buf(),
        filename,
    })
}

/// Save an RGB image as PNG to the specified path
pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_image_extensions() {
        assert!(is_supported_image(Path::new("creature.jpg")));
        assert!(is_supported_image(Path::new("a/b/SCAN.PNG")));
        assert!(!is_supported_image(Path::new("points.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn missing_directory_is_invalid_path() {
        let result = get_image_files_in_dir("does/not/exist");
        assert!(matches!(result, Err(ContourPlotterError::InvalidPath(_))));
    }

    #[test]
    fn missing_image_fails_to_load() {
        assert!(load_image("does/not/exist.png").is_err());
    }
}
