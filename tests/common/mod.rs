#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Write a uniform grayscale PNG.
pub fn write_gray_png(path: &Path, width: u32, height: u32, value: u8) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    let img = image::GrayImage::from_pixel(width, height, image::Luma([value]));
    img.save(path).expect("write png file");
}

/// Write a textured grayscale PNG (variance well above any threshold).
pub fn write_textured_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    let img = image::GrayImage::from_fn(width, height, |x, y| {
        image::Luma([((x * 31 + y * 17) % 256) as u8])
    });
    img.save(path).expect("write png file");
}

/// Write a label file, creating parent directories.
pub fn write_labels(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write label file");
}
