//! Time-indexed sensor tables.
//!
//! A `SensorFrame` holds one row per sample and one column per sensor.
//! Sensor ids follow the crate convention: 0..=98 left foot, 99..=197 right foot.
//! pedar itself numbers the sensors of each insole 1..=99; `Foot::sensor_id`
//! converts between the two.

use crate::utils::config::SENSORS_PER_FOOT;
use crate::utils::error::{FrameError, ParseError};
use ndarray::{s, Array2, ArrayView1, Axis};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Sensor id in the crate-wide numbering (0..=197)
pub type SensorId = usize;

/// Foot side of an insole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Foot {
    Left,
    Right,
}

impl Foot {
    /// Branch label used in the trial tree
    pub fn label(&self) -> &'static str {
        match self {
            Foot::Left => "L",
            Foot::Right => "R",
        }
    }

    /// Map a pedar sensor number to the crate-wide sensor id.
    ///
    /// Returns `None` outside 1..=99.
    pub fn sensor_id(&self, pedar_number: usize) -> Option<SensorId> {
        if !(1..=SENSORS_PER_FOOT).contains(&pedar_number) {
            return None;
        }
        Some(self.first_sensor() + pedar_number - 1)
    }

    fn first_sensor(&self) -> SensorId {
        match self {
            Foot::Left => 0,
            Foot::Right => SENSORS_PER_FOOT,
        }
    }

    /// All sensor ids belonging to this foot
    pub fn sensor_range(&self) -> RangeInclusive<SensorId> {
        self.first_sensor()..=self.first_sensor() + SENSORS_PER_FOOT - 1
    }

    /// Which foot a crate-wide sensor id belongs to
    pub fn of_sensor(id: SensorId) -> Foot {
        if id < SENSORS_PER_FOOT {
            Foot::Left
        } else {
            Foot::Right
        }
    }
}

impl fmt::Display for Foot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Foot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(Foot::Left),
            "R" | "r" => Ok(Foot::Right),
            other => Err(ParseError::InvalidFoot(other.to_string())),
        }
    }
}

/// Sample table of a recording or a stance window
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFrame {
    times: Vec<f64>,
    sensors: Vec<SensorId>,
    values: Array2<f64>,
    sample_interval: Option<f64>,
}

impl SensorFrame {
    /// Build a frame, checking the grid shape and index ordering
    pub fn new(
        times: Vec<f64>,
        sensors: Vec<SensorId>,
        values: Array2<f64>,
    ) -> Result<Self, FrameError> {
        let (rows, cols) = values.dim();
        if rows != times.len() || cols != sensors.len() {
            return Err(FrameError::ShapeMismatch {
                rows,
                cols,
                times: times.len(),
                sensors: sensors.len(),
            });
        }

        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            return Err(FrameError::NonFiniteTime(i));
        }

        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(FrameError::UnorderedIndex(i + 1));
        }

        Ok(Self {
            times,
            sensors,
            values,
            sample_interval: None,
        })
    }

    /// Attach the sampling interval of the source recording.
    ///
    /// Used as the time unit when the frame holds fewer than two samples.
    pub fn with_sample_interval(mut self, interval: f64) -> Self {
        self.sample_interval = Some(interval);
        self
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn sensors(&self) -> &[SensorId] {
        &self.sensors
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// (samples, sensors)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Representative spacing between consecutive samples
    pub fn time_unit(&self) -> Option<f64> {
        match self.times.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => self.sample_interval,
        }
    }

    /// Values of one sensor over time
    pub fn column(&self, sensor: SensorId) -> Option<ArrayView1<'_, f64>> {
        self.sensors
            .iter()
            .position(|&s| s == sensor)
            .map(|idx| self.values.column(idx))
    }

    /// Iterate `(sensor, column)` pairs in column order
    pub fn columns(&self) -> impl Iterator<Item = (SensorId, ArrayView1<'_, f64>)> + '_ {
        self.sensors
            .iter()
            .copied()
            .zip(self.values.axis_iter(Axis(1)))
    }

    /// Rows whose time lies in `[start, end]`, restricted to `sensors`.
    ///
    /// Both bounds are inclusive. Sensors absent from the frame are ignored.
    pub fn window(&self, start: f64, end: f64, sensors: RangeInclusive<SensorId>) -> SensorFrame {
        let first = self.times.partition_point(|&t| t < start);
        let last = self.times.partition_point(|&t| t <= end).max(first);

        let cols: Vec<usize> = self
            .sensors
            .iter()
            .enumerate()
            .filter(|(_, s)| sensors.contains(s))
            .map(|(i, _)| i)
            .collect();

        let rows = self.values.slice(s![first..last, ..]);
        let values = rows.select(Axis(1), &cols);

        SensorFrame {
            times: self.times[first..last].to_vec(),
            sensors: cols.iter().map(|&i| self.sensors[i]).collect(),
            values,
            sample_interval: self.time_unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_frame() -> SensorFrame {
        SensorFrame::new(
            vec![0.0, 0.01, 0.02, 0.03],
            vec![0, 1, 99, 100],
            array![
                [1.0, 2.0, 3.0, 4.0],
                [5.0, 6.0, 7.0, 8.0],
                [9.0, 10.0, 11.0, 12.0],
                [13.0, 14.0, 15.0, 16.0]
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_foot_sensor_mapping() {
        assert_eq!(Foot::Left.sensor_id(1), Some(0));
        assert_eq!(Foot::Left.sensor_id(99), Some(98));
        assert_eq!(Foot::Right.sensor_id(1), Some(99));
        assert_eq!(Foot::Right.sensor_id(99), Some(197));
        assert_eq!(Foot::Left.sensor_range(), 0..=98);
        assert_eq!(Foot::Right.sensor_range(), 99..=197);
        assert_eq!(Foot::of_sensor(98), Foot::Left);
        assert_eq!(Foot::of_sensor(99), Foot::Right);
    }

    #[test]
    fn test_foot_parsing() {
        assert_eq!("L".parse::<Foot>().unwrap(), Foot::Left);
        assert_eq!(" r ".parse::<Foot>().unwrap(), Foot::Right);
        assert!("X".parse::<Foot>().is_err());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let result = SensorFrame::new(vec![0.0], vec![0, 1], array![[1.0]]);
        assert!(matches!(result, Err(FrameError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_unordered_index_rejected() {
        let result = SensorFrame::new(vec![0.0, 0.02, 0.01], vec![0], array![[1.0], [2.0], [3.0]]);
        assert!(matches!(result, Err(FrameError::UnorderedIndex(2))));
    }

    #[test]
    fn test_sensor_number_out_of_range() {
        assert_eq!(Foot::Left.sensor_id(0), None);
        assert_eq!(Foot::Left.sensor_id(100), None);
        assert_eq!(Foot::Right.sensor_id(0), None);
        assert_eq!(Foot::Right.sensor_id(100), None);
    }

    #[test]
    fn test_nan_time_rejected() {
        let result = SensorFrame::new(
            vec![0.0, f64::NAN, 0.02],
            vec![0],
            array![[1.0], [2.0], [3.0]],
        );
        assert!(matches!(result, Err(FrameError::NonFiniteTime(1))));

        let result = SensorFrame::new(vec![f64::INFINITY], vec![0], array![[1.0]]);
        assert!(matches!(result, Err(FrameError::NonFiniteTime(0))));
    }

    #[test]
    fn test_window_is_inclusive() {
        let frame = sample_frame();
        let window = frame.window(0.01, 0.02, Foot::Left.sensor_range());

        assert_eq!(window.times(), &[0.01, 0.02]);
        assert_eq!(window.sensors(), &[0, 1]);
        assert_eq!(window.values(), &array![[5.0, 6.0], [9.0, 10.0]]);
    }

    #[test]
    fn test_window_right_foot() {
        let frame = sample_frame();
        let window = frame.window(0.0, 1.0, Foot::Right.sensor_range());

        assert_eq!(window.sensors(), &[99, 100]);
        assert_eq!(window.shape(), (4, 2));
    }

    #[test]
    fn test_time_unit_falls_back_to_interval() {
        let frame = sample_frame();
        let single = frame.window(0.02, 0.02, Foot::Left.sensor_range());

        assert_eq!(single.shape(), (1, 2));
        assert!((single.time_unit().unwrap() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_empty_window() {
        let frame = sample_frame();
        let window = frame.window(5.0, 6.0, Foot::Left.sensor_range());
        assert!(window.is_empty());
    }
}
