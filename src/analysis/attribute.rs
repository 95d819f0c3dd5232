//! Per-sensor attributes of a stance.

use crate::tree::{SensorId, StanceSegment};
use crate::utils::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Attribute that can be computed for every sensor of a stance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Peak pressure
    SensorPeak,
    /// Pressure-time integral
    SensorPti,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::SensorPeak => "sensor_peak",
            Attribute::SensorPti => "sensor_pti",
        }
    }

    /// Compute this attribute for one stance
    pub fn compute(&self, segment: &StanceSegment) -> Result<AttributeVector, AnalysisError> {
        match self {
            Attribute::SensorPeak => sensor_peak(segment),
            Attribute::SensorPti => sensor_pti(segment),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sensor_peak" | "peak" => Ok(Attribute::SensorPeak),
            "sensor_pti" | "pti" => Ok(Attribute::SensorPti),
            other => Err(AnalysisError::UnknownAttribute(other.to_string())),
        }
    }
}

/// Attribute values keyed by sensor id, in ascending sensor order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeVector {
    values: BTreeMap<SensorId, f64>,
}

impl AttributeVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sensor: SensorId) -> Option<f64> {
        self.values.get(&sensor).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sensors(&self) -> impl Iterator<Item = SensorId> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorId, f64)> + '_ {
        self.values.iter().map(|(&s, &v)| (s, v))
    }

    /// Per-sensor mean over `vectors`.
    ///
    /// Each sensor is averaged over the vectors that report it, so a sensor
    /// missing from one child does not pull the mean towards zero.
    pub fn mean(vectors: &[&AttributeVector]) -> AttributeVector {
        let mut sums: BTreeMap<SensorId, (f64, usize)> = BTreeMap::new();
        for vector in vectors {
            for (sensor, value) in vector.iter() {
                if value.is_nan() {
                    continue;
                }
                let entry = sums.entry(sensor).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }

        AttributeVector {
            values: sums
                .into_iter()
                .map(|(sensor, (sum, count))| (sensor, sum / count as f64))
                .collect(),
        }
    }
}

impl FromIterator<(SensorId, f64)> for AttributeVector {
    fn from_iter<I: IntoIterator<Item = (SensorId, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Peak value of every sensor column
///
/// # Errors
/// * `AnalysisError::EmptySegment` - the stance holds no samples
pub fn sensor_peak(segment: &StanceSegment) -> Result<AttributeVector, AnalysisError> {
    let frame = segment.frame();
    if frame.is_empty() {
        return Err(AnalysisError::EmptySegment(segment.loc().join(" / ")));
    }

    Ok(frame
        .columns()
        .map(|(sensor, column)| {
            let peak = column.iter().copied().fold(f64::NAN, f64::max);
            (sensor, peak)
        })
        .collect())
}

/// Pressure-time integral of every sensor column: sum of `value * time_unit`
///
/// # Errors
/// * `AnalysisError::EmptySegment` - the stance holds no samples
/// * `AnalysisError::NoTimeUnit` - a single sample without a known interval
pub fn sensor_pti(segment: &StanceSegment) -> Result<AttributeVector, AnalysisError> {
    let frame = segment.frame();
    if frame.is_empty() {
        return Err(AnalysisError::EmptySegment(segment.loc().join(" / ")));
    }
    let time_unit = frame
        .time_unit()
        .ok_or_else(|| AnalysisError::NoTimeUnit(segment.loc().join(" / ")))?;

    Ok(frame
        .columns()
        .map(|(sensor, column)| {
            let pti: f64 = column
                .iter()
                .filter(|v| !v.is_nan())
                .map(|v| v * time_unit)
                .sum();
            (sensor, pti)
        })
        .collect())
}
