// THEORY:
// The `GridManager` is the sticker sampler. It owns the geometry that lays a fixed
// 3x3 grid over a pre-cropped face photograph and turns the image into nine raw
// color observations, one per sticker, in row-major order.
//
// Key architectural principles:
// 1.  **Fixed Geometry**: The grid covers a centered square sub-window whose side is
//     a configurable fraction of the image's shorter dimension. The window is split
//     into 3x3 equal cells. Inside each cell only a small centered box is sampled,
//     which keeps the sticker borders and the gaps between stickers out of the
//     sample.
// 2.  **Data Transformation**: For each cell it slices the box's pixels out of the
//     image into a `Chunk` and asks the chunk for its median HSV sample. This is the
//     bridge between the raw image and the classifier.
// 3.  **Forgiving Edges**: A box that would extend past the image (only possible
//     with aggressive configurations) is clamped to the image bounds instead of
//     failing.
// 4.  **Stateless**: Sampling reads the image and nothing else. The manager can be
//     shared across threads and reused for any number of faces.

use crate::core_modules::chunk::chunk::{Chunk, RawSample};
use crate::core_modules::face::STICKERS_PER_FACE;
use crate::core_modules::pixel::pixel::Pixel;
use crate::error::{Result, ScanError};
use image::RgbImage;
use log::debug;
use serde::{Deserialize, Serialize};

const GRID_SIZE: u32 = 3;

/// Tunable sampling geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Side of the sampled sub-window as a fraction of the image's shorter dimension.
    pub window_fraction: f64,
    /// The sample box side is the window side divided by this.
    pub sample_box_divisor: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            window_fraction: 0.6,
            sample_box_divisor: 6,
        }
    }
}

/// A pixel rectangle inside the image: `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Lays the 3x3 sticker grid over a face image and samples each cell.
#[derive(Debug, Clone)]
pub struct GridManager {
    config: SamplerConfig,
}

impl GridManager {
    /// Creates a sampler, rejecting geometry that could never produce a grid.
    pub fn new(config: SamplerConfig) -> Result<Self> {
        if !(config.window_fraction > 0.0 && config.window_fraction <= 1.0) {
            return Err(ScanError::InvalidConfig(format!(
                "window_fraction must be in (0, 1], got {}",
                config.window_fraction
            )));
        }
        if config.sample_box_divisor == 0 {
            return Err(ScanError::InvalidConfig(
                "sample_box_divisor must be at least 1".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Computes the nine sample boxes, row-major, for an image of the given size.
    /// Returns `None` when the image is too small to hold a grid.
    pub fn sample_regions(
        &self,
        image_width: u32,
        image_height: u32,
    ) -> Option<[SampleRegion; STICKERS_PER_FACE]> {
        let minor_dimension = image_width.min(image_height) as f64;
        // The epsilon keeps exact products like 300 * 0.6 from flooring to 179.
        let window_side = (minor_dimension * self.config.window_fraction + 1e-9).floor() as u32;
        if window_side < GRID_SIZE {
            return None;
        }
        let box_side = window_side / self.config.sample_box_divisor;
        if box_side == 0 {
            return None;
        }

        let window_x = (image_width - window_side) / 2;
        let window_y = (image_height - window_side) / 2;
        let cell_side = window_side as f64 / GRID_SIZE as f64;
        let half_box = (box_side / 2) as i64;

        let mut regions = [SampleRegion {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }; STICKERS_PER_FACE];

        for (cell_index, region) in regions.iter_mut().enumerate() {
            let row = cell_index as u32 / GRID_SIZE;
            let col = cell_index as u32 % GRID_SIZE;
            let center_x = window_x as i64 + ((col as f64 + 0.5) * cell_side) as i64;
            let center_y = window_y as i64 + ((row as f64 + 0.5) * cell_side) as i64;

            let (x, width) = clamp_span(center_x - half_box, box_side as i64, image_width);
            let (y, height) = clamp_span(center_y - half_box, box_side as i64, image_height);
            if width == 0 || height == 0 {
                return None;
            }
            *region = SampleRegion {
                x,
                y,
                width,
                height,
            };
        }

        Some(regions)
    }

    /// Samples the nine stickers of one face image, row-major. `input_index` only
    /// labels the error for an image too small to sample.
    pub fn sample_face(
        &self,
        image: &RgbImage,
        input_index: usize,
    ) -> Result<[RawSample; STICKERS_PER_FACE]> {
        let regions = self
            .sample_regions(image.width(), image.height())
            .ok_or(ScanError::ImageTooSmall {
                input_index,
                width: image.width(),
                height: image.height(),
            })?;
        let samples = regions.map(|region| Self::extract_chunk(image, region).median_sample());
        debug!("sampled face {}x{}: {:?}", image.width(), image.height(), samples);
        Ok(samples)
    }

    fn extract_chunk(image: &RgbImage, region: SampleRegion) -> Chunk {
        let mut pixels = Vec::with_capacity((region.width * region.height) as usize);
        for y in region.y..region.y + region.height {
            for x in region.x..region.x + region.width {
                pixels.push(Pixel::from(image.get_pixel(x, y)));
            }
        }
        Chunk::new(region.width, region.height, pixels)
    }
}

/// Clamps `[start, start + length)` to `[0, limit)`, returning the clamped start and length.
fn clamp_span(start: i64, length: i64, limit: u32) -> (u32, u32) {
    let clamped_start = start.clamp(0, limit as i64);
    let clamped_end = (start + length).clamp(0, limit as i64);
    (
        clamped_start as u32,
        (clamped_end - clamped_start).max(0) as u32,
    )
}
