//! Stance segments, the leaves of the trial tree.

use super::frame::SensorFrame;
use crate::utils::error::TreeError;

/// One foot-ground contact within a trial
#[derive(Debug, Clone, PartialEq)]
pub struct StanceSegment {
    name: String,
    pub(super) loc: Vec<String>,
    start: f64,
    end: f64,
    frame: SensorFrame,
}

impl StanceSegment {
    /// Create a detached segment; its location is set when it joins a tree.
    pub fn new(
        name: impl Into<String>,
        start: f64,
        end: f64,
        frame: SensorFrame,
    ) -> Result<Self, TreeError> {
        let name = name.into();
        if !(start <= end) {
            return Err(TreeError::InvalidSegment(format!(
                "{}: start {} is after end {}",
                name, start, end
            )));
        }

        Ok(Self {
            loc: vec![name.clone()],
            name,
            start,
            end,
            frame,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Sample table of this stance
    pub fn frame(&self) -> &SensorFrame {
        &self.frame
    }

    pub fn loc(&self) -> &[String] {
        &self.loc
    }

    pub fn level(&self) -> usize {
        self.loc.len() - 1
    }

    /// Same stance data under a different name (used when reshaping trees)
    pub(super) fn renamed(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            loc: vec![name.clone()],
            name,
            start: self.start,
            end: self.end,
            frame: self.frame.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn frame() -> SensorFrame {
        SensorFrame::new(vec![1.0, 1.01], vec![0], array![[1.0], [2.0]]).unwrap()
    }

    #[test]
    fn test_start_after_end_rejected() {
        let result = StanceSegment::new("stance 1", 2.0, 1.0, frame());
        assert!(matches!(result, Err(TreeError::InvalidSegment(_))));
    }

    #[test]
    fn test_nan_bounds_rejected() {
        assert!(StanceSegment::new("stance 1", f64::NAN, 1.0, frame()).is_err());
    }

    #[test]
    fn test_detached_segment_is_its_own_root() {
        let seg = StanceSegment::new("stance 1", 1.0, 1.01, frame()).unwrap();
        assert_eq!(seg.loc(), &["stance 1".to_string()]);
        assert_eq!(seg.level(), 0);
    }
}
