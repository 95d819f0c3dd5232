//! Foot heatmaps and their arithmetic.

use super::mask::FootMask;
use crate::analysis::{attribute_average_up, Attribute, AttributeVector};
use crate::tree::{Foot, Node};
use crate::utils::config::STATIC_RANGE;
use crate::utils::error::HeatmapError;
use log::debug;
use ndarray::Array2;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Attribute values painted onto the sensor areas of both feet
#[derive(Debug, Clone, PartialEq)]
pub struct FootHeatmap {
    layout: Arc<FootMask>,
    left: Array2<f64>,
    right: Array2<f64>,
}

impl FootHeatmap {
    /// Paint an attribute vector onto `layout`.
    ///
    /// Sensors 0..=98 fill left-foot areas, 99..=197 right-foot areas. Pixels
    /// outside every area, and areas of sensors missing from `vector`, are 0.
    pub fn from_attribute(vector: &AttributeVector, layout: &Arc<FootMask>) -> Self {
        let mut left = Array2::zeros(layout.shape());
        let mut right = Array2::zeros(layout.shape());

        for (sensor, value) in vector.iter() {
            let grid = match Foot::of_sensor(sensor) {
                Foot::Left => &mut left,
                Foot::Right => &mut right,
            };
            for &pixel in layout.pixels(sensor) {
                grid[pixel] = value;
            }
        }

        Self {
            layout: Arc::clone(layout),
            left,
            right,
        }
    }

    /// Heatmap of `node`'s averaged attribute
    ///
    /// **Public** - node-level entry point
    ///
    /// # Example
    /// ```ignore
    /// let mask = Arc::new(FootMask::load("data/left_foot_mask.png")?);
    /// let fast = FootHeatmap::for_node(tree.at(&["S4", "fast walking"])?, Attribute::SensorPeak, &mask)?;
    /// ```
    pub fn for_node(
        node: &Node,
        attribute: Attribute,
        layout: &Arc<FootMask>,
    ) -> Result<Self, HeatmapError> {
        let table = attribute_average_up(node, attribute)?;
        let vector = table.for_node(node)?;
        debug!(
            "Building {} heatmap for [{}]",
            attribute,
            node.loc().join(" / ")
        );
        Ok(Self::from_attribute(vector, layout))
    }

    pub fn layout(&self) -> &Arc<FootMask> {
        &self.layout
    }

    pub fn left(&self) -> &Array2<f64> {
        &self.left
    }

    pub fn right(&self) -> &Array2<f64> {
        &self.right
    }

    /// Panel of one foot
    pub fn foot(&self, foot: Foot) -> &Array2<f64> {
        match foot {
            Foot::Left => &self.left,
            Foot::Right => &self.right,
        }
    }

    /// Elementwise `self - other`
    ///
    /// # Errors
    /// * `HeatmapError::LayoutMismatch` - built from different masks
    pub fn difference(&self, other: &FootHeatmap) -> Result<FootHeatmap, HeatmapError> {
        self.check_layout(other)?;
        Ok(Self {
            layout: Arc::clone(&self.layout),
            left: &self.left - &other.left,
            right: &self.right - &other.right,
        })
    }

    /// Elementwise `self + other`
    ///
    /// # Errors
    /// * `HeatmapError::LayoutMismatch` - built from different masks
    pub fn sum(&self, other: &FootHeatmap) -> Result<FootHeatmap, HeatmapError> {
        self.check_layout(other)?;
        Ok(Self {
            layout: Arc::clone(&self.layout),
            left: &self.left + &other.left,
            right: &self.right + &other.right,
        })
    }

    /// Every value multiplied by `factor`
    pub fn scale(&self, factor: f64) -> FootHeatmap {
        Self {
            layout: Arc::clone(&self.layout),
            left: &self.left * factor,
            right: &self.right * factor,
        }
    }

    /// Elementwise mean of `heatmaps`
    ///
    /// # Errors
    /// * `HeatmapError::Empty` - no heatmaps given
    /// * `HeatmapError::LayoutMismatch` - heatmaps built from different masks
    pub fn average(heatmaps: &[&FootHeatmap]) -> Result<FootHeatmap, HeatmapError> {
        let (first, rest) = heatmaps.split_first().ok_or(HeatmapError::Empty)?;

        let total = rest
            .iter()
            .try_fold((*first).clone(), |acc, hm| acc.sum(hm))?;
        Ok(total.scale(1.0 / heatmaps.len() as f64))
    }

    /// Smallest and largest value over both feet
    pub fn value_range(&self) -> (f64, f64) {
        self.left.iter().chain(self.right.iter()).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
    }

    fn check_layout(&self, other: &FootHeatmap) -> Result<(), HeatmapError> {
        if Arc::ptr_eq(&self.layout, &other.layout) || self.layout == other.layout {
            return Ok(());
        }
        Err(HeatmapError::LayoutMismatch {
            left: self.layout.layout_id(),
            right: other.layout.layout_id(),
        })
    }
}

/// Colour mapping range of a rendered heatmap
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ColorRange {
    /// Fixed pressure range, 0 to 300 kPa
    #[default]
    Static,
    /// Minimum and maximum of the data
    Auto,
    /// Explicit `(min, max)`
    Manual(f64, f64),
}

impl ColorRange {
    /// Concrete `(min, max)` for `heatmap`
    ///
    /// # Errors
    /// * `HeatmapError::InvalidRange` - manual bounds not finite or `min > max`
    pub fn resolve(&self, heatmap: &FootHeatmap) -> Result<(f64, f64), HeatmapError> {
        match *self {
            ColorRange::Static => Ok(STATIC_RANGE),
            ColorRange::Auto => Ok(heatmap.value_range()),
            ColorRange::Manual(min, max) => {
                if !(min.is_finite() && max.is_finite() && min <= max) {
                    return Err(HeatmapError::InvalidRange(format!("{},{}", min, max)));
                }
                Ok((min, max))
            }
        }
    }
}

impl fmt::Display for ColorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorRange::Static => f.write_str("static"),
            ColorRange::Auto => f.write_str("auto"),
            ColorRange::Manual(min, max) => write!(f, "{},{}", min, max),
        }
    }
}

impl FromStr for ColorRange {
    type Err = HeatmapError;

    /// `static`, `auto`, or `min,max`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "static" => Ok(ColorRange::Static),
            "auto" => Ok(ColorRange::Auto),
            other => {
                let invalid = || HeatmapError::InvalidRange(other.to_string());
                let (min, max) = other.split_once(',').ok_or_else(invalid)?;
                let min: f64 = min.trim().parse().map_err(|_| invalid())?;
                let max: f64 = max.trim().parse().map_err(|_| invalid())?;
                if !(min <= max) {
                    return Err(invalid());
                }
                Ok(ColorRange::Manual(min, max))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn mask() -> Arc<FootMask> {
        let mut img = GrayImage::new(3, 2);
        img.put_pixel(0, 0, Luma([1]));
        img.put_pixel(1, 1, Luma([2]));
        Arc::new(FootMask::from_image(&img))
    }

    fn heatmap(layout: &Arc<FootMask>, l0: f64, r0: f64) -> FootHeatmap {
        let vector: AttributeVector = [(0, l0), (1, 5.0), (99, r0)].into_iter().collect();
        FootHeatmap::from_attribute(&vector, layout)
    }

    #[test]
    fn test_from_attribute_fills_areas() {
        let hm = heatmap(&mask(), 10.0, 20.0);
        assert_eq!(hm.left()[[0, 0]], 10.0);
        assert_eq!(hm.left()[[1, 1]], 5.0);
        assert_eq!(hm.left()[[0, 1]], 0.0);
        // right foot area of sensor 99 is mirrored to column 2
        assert_eq!(hm.right()[[0, 2]], 20.0);
        assert_eq!(hm.right()[[0, 0]], 0.0);
    }

    #[test]
    fn test_difference_of_self_is_zero() {
        let hm = heatmap(&mask(), 10.0, 20.0);
        let diff = hm.difference(&hm).unwrap();
        assert!(diff.left().iter().chain(diff.right().iter()).all(|&v| v == 0.0));
    }

    #[test]
    fn test_average_of_self_is_self() {
        let hm = heatmap(&mask(), 10.0, 20.0);
        assert_eq!(FootHeatmap::average(&[&hm, &hm]).unwrap(), hm);
    }

    #[test]
    fn test_average_of_two() {
        let layout = mask();
        let a = heatmap(&layout, 10.0, 20.0);
        let b = heatmap(&layout, 30.0, 0.0);
        let avg = FootHeatmap::average(&[&a, &b]).unwrap();
        assert_eq!(avg.left()[[0, 0]], 20.0);
        assert_eq!(avg.right()[[0, 2]], 10.0);
    }

    #[test]
    fn test_average_empty() {
        assert!(matches!(FootHeatmap::average(&[]), Err(HeatmapError::Empty)));
    }

    #[test]
    fn test_equal_masks_from_separate_loads_are_compatible() {
        let a = heatmap(&mask(), 1.0, 2.0);
        let b = heatmap(&mask(), 3.0, 4.0);
        assert!(a.difference(&b).is_ok());
    }

    #[test]
    fn test_layout_mismatch() {
        let a = heatmap(&mask(), 1.0, 2.0);
        let other = Arc::new(FootMask::from_image(&GrayImage::new(5, 5)));
        let b = FootHeatmap::from_attribute(&AttributeVector::new(), &other);

        assert!(matches!(a.difference(&b), Err(HeatmapError::LayoutMismatch { .. })));
        assert!(matches!(a.sum(&b), Err(HeatmapError::LayoutMismatch { .. })));
        assert!(matches!(
            FootHeatmap::average(&[&a, &b]),
            Err(HeatmapError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn test_color_range() {
        let hm = heatmap(&mask(), -4.0, 20.0);
        assert_eq!(ColorRange::Static.resolve(&hm).unwrap(), (0.0, 300.0));
        assert_eq!(ColorRange::Auto.resolve(&hm).unwrap(), (-4.0, 20.0));
        assert_eq!("10, 50".parse::<ColorRange>().unwrap(), ColorRange::Manual(10.0, 50.0));
        assert_eq!("auto".parse::<ColorRange>().unwrap(), ColorRange::Auto);
        assert!("50,10".parse::<ColorRange>().is_err());
        assert!("warm".parse::<ColorRange>().is_err());
        assert!(ColorRange::Manual(f64::NAN, 1.0).resolve(&hm).is_err());
    }
}
