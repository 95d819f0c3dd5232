//! Foot sensor masks.
//!
//! A mask is a greyscale image of the left insole where every pixel of
//! sensor area `n` (0..=98) holds the value `n + 1` and background pixels
//! hold 0. The right insole is the horizontal mirror of the left one and
//! carries sensors `n + 99`.

use crate::tree::{Foot, SensorId};
use crate::utils::config::SENSORS_PER_FOOT;
use crate::utils::error::HeatmapError;
use image::{imageops, DynamicImage, GrayImage, Luma};
use log::debug;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Pixel `(row, column)` of a mask
pub type Pixel = (usize, usize);

/// Pixel areas of every sensor of both feet
#[derive(Debug, Clone)]
pub struct FootMask {
    width: usize,
    height: usize,
    fingerprint: u64,
    /// Left-foot sensor value of every pixel, row-major
    labels: Vec<u8>,
    areas: BTreeMap<SensorId, Vec<Pixel>>,
}

impl FootMask {
    /// Load a left-foot mask image
    ///
    /// Pixel values are read as stored, without colour conversion.
    ///
    /// # Errors
    /// * `HeatmapError::MaskLoad` - file missing or not a decodable image
    /// * `HeatmapError::MaskFormat` - image is not single-channel greyscale
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HeatmapError> {
        let path = path.as_ref();
        debug!("Loading foot mask: {}", path.display());

        let image = image::open(path).map_err(|source| HeatmapError::MaskLoad {
            path: path.display().to_string(),
            source,
        })?;

        let labels = match image {
            DynamicImage::ImageLuma8(img) => img,
            // 16-bit labels above 255 are never sensors
            DynamicImage::ImageLuma16(img) => GrayImage::from_fn(img.width(), img.height(), |x, y| {
                Luma([u8::try_from(img.get_pixel(x, y).0[0]).unwrap_or(0)])
            }),
            other => {
                return Err(HeatmapError::MaskFormat {
                    path: path.display().to_string(),
                    color: format!("{:?}", other.color()),
                })
            }
        };

        Ok(Self::from_image(&labels))
    }

    /// Build a mask from an in-memory left-foot image
    pub fn from_image(left: &GrayImage) -> Self {
        let right = imageops::flip_horizontal(left);

        let mut areas: BTreeMap<SensorId, Vec<Pixel>> = BTreeMap::new();
        for (foot, image) in [(Foot::Left, left), (Foot::Right, &right)] {
            for (x, y, pixel) in image.enumerate_pixels() {
                if let Some(sensor) = foot.sensor_id(pixel.0[0] as usize) {
                    areas
                        .entry(sensor)
                        .or_default()
                        .push((y as usize, x as usize));
                }
            }
        }

        let mut hasher = DefaultHasher::new();
        left.dimensions().hash(&mut hasher);
        left.as_raw().hash(&mut hasher);

        let mask = Self {
            width: left.width() as usize,
            height: left.height() as usize,
            fingerprint: hasher.finish(),
            labels: left.as_raw().clone(),
            areas,
        };
        debug!(
            "Foot mask {} covers {} sensor areas",
            mask.layout_id(),
            mask.areas.len()
        );
        mask
    }

    /// (rows, columns) of one foot panel
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Pixels of one sensor area (empty when the mask has no such area)
    pub fn pixels(&self, sensor: SensorId) -> &[Pixel] {
        self.areas.get(&sensor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a pixel of `foot`'s panel belongs to any sensor area
    pub fn covers(&self, foot: Foot, (row, col): Pixel) -> bool {
        if row >= self.height || col >= self.width {
            return false;
        }
        let col = match foot {
            Foot::Left => col,
            Foot::Right => self.width - 1 - col,
        };
        let value = self.labels[row * self.width + col] as usize;
        (1..=SENSORS_PER_FOOT).contains(&value)
    }

    /// Sensor areas present in the mask
    pub fn sensors(&self) -> impl Iterator<Item = SensorId> + '_ {
        self.areas.keys().copied()
    }

    /// Identity of the sensor layout: size plus content fingerprint
    pub fn layout_id(&self) -> String {
        format!("{}x{}#{:016x}", self.width, self.height, self.fingerprint)
    }
}

impl PartialEq for FootMask {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.fingerprint == other.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};

    /// 4x2 mask: sensor 0 on the left two columns of row 0, sensor 1 at (1, 3)
    fn small_mask() -> GrayImage {
        let mut img = GrayImage::new(4, 2);
        img.put_pixel(0, 0, Luma([1]));
        img.put_pixel(1, 0, Luma([1]));
        img.put_pixel(3, 1, Luma([2]));
        img
    }

    #[test]
    fn test_left_and_mirrored_right_areas() {
        let mask = FootMask::from_image(&small_mask());

        assert_eq!(mask.shape(), (2, 4));
        assert_eq!(mask.pixels(0), &[(0, 0), (0, 1)]);
        assert_eq!(mask.pixels(1), &[(1, 3)]);
        // right foot is mirrored
        assert_eq!(mask.pixels(99), &[(0, 2), (0, 3)]);
        assert_eq!(mask.pixels(100), &[(1, 0)]);
        assert!(mask.pixels(5).is_empty());
        assert_eq!(mask.sensors().collect::<Vec<_>>(), vec![0, 1, 99, 100]);
    }

    #[test]
    fn test_load_keeps_raw_labels() {
        let dir = tempfile::tempdir().unwrap();

        let path8 = dir.path().join("mask8.png");
        small_mask().save(&path8).unwrap();
        assert_eq!(FootMask::load(&path8).unwrap(), FootMask::from_image(&small_mask()));

        let mut wide: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(4, 2);
        wide.put_pixel(0, 0, Luma([1]));
        wide.put_pixel(1, 0, Luma([1]));
        wide.put_pixel(3, 1, Luma([2]));
        wide.put_pixel(2, 1, Luma([1000]));
        let path16 = dir.path().join("mask16.png");
        wide.save(&path16).unwrap();

        let mask = FootMask::load(&path16).unwrap();
        assert_eq!(mask.pixels(0), &[(0, 0), (0, 1)]);
        assert_eq!(mask.pixels(1), &[(1, 3)]);
        assert_eq!(mask.sensors().count(), 4);
    }

    #[test]
    fn test_load_rejects_colour_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([1, 1, 1]));
        img.save(&path).unwrap();

        assert!(matches!(
            FootMask::load(&path),
            Err(HeatmapError::MaskFormat { .. })
        ));
    }

    #[test]
    fn test_covers() {
        let mask = FootMask::from_image(&small_mask());
        assert!(mask.covers(Foot::Left, (0, 1)));
        assert!(!mask.covers(Foot::Left, (0, 2)));
        assert!(mask.covers(Foot::Right, (0, 2)));
        assert!(!mask.covers(Foot::Right, (5, 0)));
    }

    #[test]
    fn test_layout_identity() {
        let a = FootMask::from_image(&small_mask());
        let b = FootMask::from_image(&small_mask());
        assert_eq!(a, b);
        assert_eq!(a.layout_id(), b.layout_id());

        let mut other = small_mask();
        other.put_pixel(2, 1, Luma([3]));
        assert_ne!(a, FootMask::from_image(&other));
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        small_mask().save(&path).unwrap();

        let mask = FootMask::load(&path).unwrap();
        assert_eq!(mask, FootMask::from_image(&small_mask()));
    }

    #[test]
    fn test_missing_mask() {
        assert!(matches!(
            FootMask::load("/nonexistent/mask.png"),
            Err(HeatmapError::MaskLoad { .. })
        ));
    }
}
