use thiserror::Error;

use super::Vec2;

/// An immutable RGBA8 bitmap used as a collision source.
///
/// Construction validates the dimensions and buffer length once so the
/// sampling scan can index without bounds checks on every probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("bitmap dimensions must be at least 1x1, got {width}x{height}")]
    EmptyBitmap { width: u32, height: u32 },
    #[error("rgba buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLengthMismatch { expected: usize, actual: usize },
    #[error("cell_size must be at least 1")]
    ZeroCellSize,
    #[error("sample_step must be at least 1")]
    ZeroSampleStep,
    #[error("world size must be positive and finite, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },
}

impl SourceBitmap {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, InvalidInputError> {
        if width == 0 || height == 0 {
            return Err(InvalidInputError::EmptyBitmap { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(InvalidInputError::BufferLengthMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Alpha of the pixel at (x, y). Callers must stay inside the bitmap.
    fn alpha_at(&self, x: u32, y: u32) -> u8 {
        let index = (y as usize * self.width as usize + x as usize) * 4;
        self.rgba[index + 3]
    }
}

/// One solid cell mapped into world space: an axis-aligned rectangle given
/// by its center and full size. Non-square world aspect ratios produce
/// non-square rectangles; the mask is stretched onto the world exactly like
/// the source image itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleRect {
    pub center: Vec2,
    pub size: Vec2,
}

/// Derives the set of solid obstacle rectangles from a bitmap's alpha
/// channel.
///
/// The bitmap is partitioned row-major into `cell_size`-square cells
/// (partial cells at the right/bottom edge are clipped, never padded).
/// Within each cell, alpha is probed at `sample_step` stride in both axes;
/// the cell is solid on the first probe whose alpha exceeds
/// `alpha_threshold`. Each solid cell yields one rectangle scaled into
/// world space by `world_width / bitmap_width` and
/// `world_height / bitmap_height` per axis.
///
/// Output order is the scan order and is part of the contract. The
/// `sample_step` decimation can miss solid slivers thinner than the probe
/// grid; that is an accepted approximation, not a defect.
pub fn build_obstacles(
    bitmap: &SourceBitmap,
    cell_size: u32,
    sample_step: u32,
    world_width: f32,
    world_height: f32,
    alpha_threshold: u8,
) -> Result<Vec<ObstacleRect>, InvalidInputError> {
    if cell_size == 0 {
        return Err(InvalidInputError::ZeroCellSize);
    }
    if sample_step == 0 {
        return Err(InvalidInputError::ZeroSampleStep);
    }
    if !(world_width.is_finite() && world_width > 0.0)
        || !(world_height.is_finite() && world_height > 0.0)
    {
        return Err(InvalidInputError::InvalidWorldSize {
            width: world_width,
            height: world_height,
        });
    }

    let scale_x = world_width / bitmap.width() as f32;
    let scale_y = world_height / bitmap.height() as f32;
    let mut obstacles = Vec::new();

    let mut y = 0u32;
    while y < bitmap.height() {
        let mut x = 0u32;
        while x < bitmap.width() {
            if cell_is_solid(bitmap, x, y, cell_size, sample_step, alpha_threshold) {
                let center_x = (x as f32 + cell_size as f32 / 2.0) * scale_x;
                let center_y = (y as f32 + cell_size as f32 / 2.0) * scale_y;
                obstacles.push(ObstacleRect {
                    center: Vec2 {
                        x: center_x,
                        y: center_y,
                    },
                    size: Vec2 {
                        x: cell_size as f32 * scale_x,
                        y: cell_size as f32 * scale_y,
                    },
                });
            }
            x = x.saturating_add(cell_size);
        }
        y = y.saturating_add(cell_size);
    }

    Ok(obstacles)
}

fn cell_is_solid(
    bitmap: &SourceBitmap,
    cell_x: u32,
    cell_y: u32,
    cell_size: u32,
    sample_step: u32,
    alpha_threshold: u8,
) -> bool {
    let x_end = cell_x.saturating_add(cell_size).min(bitmap.width());
    let y_end = cell_y.saturating_add(cell_size).min(bitmap.height());

    let mut y = cell_y;
    while y < y_end {
        let mut x = cell_x;
        while x < x_end {
            if bitmap.alpha_at(x, y) > alpha_threshold {
                return true;
            }
            x = x.saturating_add(sample_step);
        }
        y = y.saturating_add(sample_step);
    }

    false
}
