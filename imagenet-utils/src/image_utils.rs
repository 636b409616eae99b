use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, RgbImage, imageops::FilterType};
use ndarray::Array3;

/// Load an image from disk into memory.
///
/// # Arguments
///
/// * `path` - The path to the image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path_ref = path.as_ref();
    image::open(path_ref).with_context(|| format!("failed to open image {}", path_ref.display()))
}

/// Resize an image to the requested resolution using the provided filter.
pub fn resize_image(image: &DynamicImage, width: u32, height: u32, filter: FilterType) -> RgbImage {
    image.resize_exact(width, height, filter).to_rgb8()
}

/// Convert an RGB image into a normalized RGB CHW array.
///
/// Each channel is scaled to `[0, 1]`, then shifted by `mean` and divided by
/// `std`, matching the usual torchvision ImageNet preprocessing.
///
/// # Arguments
///
/// * `image` - The RGB image to convert.
/// * `mean` - Per-channel mean in RGB order.
/// * `std` - Per-channel standard deviation in RGB order.
pub fn rgb_to_normalized_chw(image: &RgbImage, mean: [f32; 3], std: [f32; 3]) -> Array3<f32> {
    let (width, height) = image.dimensions();
    let mut array = Array3::<f32>::zeros((3, height as usize, width as usize));
    for (x, y, pixel) in image.enumerate_pixels() {
        let (xi, yi) = (x as usize, y as usize);
        for channel in 0..3 {
            let value = pixel[channel] as f32 / 255.0;
            array[(channel, yi, xi)] = (value - mean[channel]) / std[channel];
        }
    }
    array
}
