//! Image preprocessing for ImageNet classifiers.
//!
//! Images are resized to the network's square input, converted to RGB CHW and
//! normalized with the standard ImageNet statistics.

use std::borrow::Cow;

use anyhow::Result;
use image::{DynamicImage, GenericImageView, RgbImage, imageops::FilterType};
use imagenet_utils::{resize_image, rgb_to_normalized_chw};
use tract_onnx::prelude::Tensor;

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Convert `image` into a `[1, 3, resolution, resolution]` f32 tensor.
pub fn preprocess_image(image: &DynamicImage, resolution: u32) -> Result<Tensor> {
    anyhow::ensure!(resolution > 0, "input resolution must be greater than zero");
    let (orig_w, orig_h) = image.dimensions();
    anyhow::ensure!(
        orig_w > 0 && orig_h > 0,
        "source image dimensions must be greater than zero"
    );

    let resized: Cow<'_, RgbImage> = if orig_w == resolution && orig_h == resolution {
        match image.as_rgb8() {
            Some(rgb) => Cow::Borrowed(rgb),
            None => Cow::Owned(image.to_rgb8()),
        }
    } else {
        Cow::Owned(resize_image(
            image,
            resolution,
            resolution,
            FilterType::Triangle,
        ))
    };
    let chw = rgb_to_normalized_chw(&resized, IMAGENET_MEAN, IMAGENET_STD);

    let side = resolution as usize;
    let (data, offset) = chw.into_raw_vec_and_offset();
    debug_assert_eq!(offset, Some(0), "expected contiguous array");
    Tensor::from_shape(&[1, 3, side, side], &data)
        .map_err(|e| anyhow::anyhow!("failed to build input tensor: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn produces_nchw_tensor_of_requested_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([10, 20, 30])));
        let tensor = preprocess_image(&img, 16).expect("preprocess");
        assert_eq!(tensor.shape(), &[1, 3, 16, 16]);
    }

    #[test]
    fn rejects_zero_resolution() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert!(preprocess_image(&img, 0).is_err());
    }
}
