//! Reader for `.asc` recordings exported by pedar.
//!
//! A recording is a tab separated text file: a block of header lines
//! followed by one row per sample, `time` first and then 198 sensor values
//! (left insole sensors 1..=99, then right insole sensors 1..=99).

use crate::tree::frame::{Foot, SensorFrame, SensorId};
use crate::utils::config::TOTAL_SENSORS;
use crate::utils::error::ParseError;
use log::debug;
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// A fully loaded pedar recording
#[derive(Debug, Clone)]
pub struct AscRecording {
    path: PathBuf,
    frame: SensorFrame,
}

impl AscRecording {
    /// Load a recording, skipping `header_rows` leading lines
    ///
    /// # Errors
    /// * `ParseError::Io` - file cannot be read
    /// * `ParseError::MalformedRecording` - a sample row is not numeric or
    ///   does not carry exactly one value per sensor
    pub fn open(path: impl AsRef<Path>, header_rows: usize) -> Result<Self, ParseError> {
        let path = path.as_ref();
        debug!("Reading recording: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let frame = parse_samples(&content, header_rows, &path.display().to_string())?;
        debug!(
            "Recording {} has {} samples",
            path.display(),
            frame.shape().0
        );

        Ok(Self {
            path: path.to_path_buf(),
            frame,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All samples of both feet
    pub fn frame(&self) -> &SensorFrame {
        &self.frame
    }

    /// Value of one sensor (pedar numbering, 1..=99) at an exact sample time
    pub fn value_at(&self, foot: Foot, time: f64, pedar_number: usize) -> Option<f64> {
        let row = self
            .frame
            .times()
            .iter()
            .position(|&t| (t - time).abs() < 1e-9)?;
        let column = self.frame.column(foot.sensor_id(pedar_number)?)?;
        column.get(row).copied()
    }

    /// One foot's samples within `[start, end]`
    pub fn stance_window(&self, foot: Foot, start: f64, end: f64) -> SensorFrame {
        self.frame.window(start, end, foot.sensor_range())
    }
}

/// Parse the sample block of a recording
fn parse_samples(content: &str, header_rows: usize, source: &str) -> Result<SensorFrame, ParseError> {
    let body: String = content
        .lines()
        .skip(header_rows)
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(body.as_bytes());

    let mut times = Vec::new();
    let mut values = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize + header_rows)
            .unwrap_or(header_rows + index + 1);

        let malformed = |reason: String| ParseError::MalformedRecording {
            path: source.to_string(),
            line,
            reason,
        };

        let mut fields: Vec<&str> = record.iter().map(str::trim).collect();
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        if fields.is_empty() {
            continue;
        }

        if fields.len() != TOTAL_SENSORS + 1 {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                TOTAL_SENSORS + 1,
                fields.len()
            )));
        }

        let mut row = fields.iter().map(|f| {
            f.parse::<f64>()
                .map_err(|_| malformed(format!("'{}' is not a number", f)))
        });

        // the iterator always yields the time field first
        if let Some(time) = row.next() {
            let time = time?;
            if !time.is_finite() {
                return Err(malformed(format!("time '{}' is not finite", fields[0])));
            }
            times.push(time);
        }
        for value in row {
            values.push(value?);
        }
    }

    let grid = Array2::from_shape_vec((times.len(), TOTAL_SENSORS), values).map_err(|e| {
        ParseError::MalformedRecording {
            path: source.to_string(),
            line: header_rows,
            reason: e.to_string(),
        }
    })?;

    let sensors: Vec<SensorId> = (0..TOTAL_SENSORS).collect();
    Ok(SensorFrame::new(times, sensors, grid)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Recording text with `header` lines; sensor `s` of row `i` reads `i * 1000 + s`
    fn recording_text(header: usize, times: &[f64]) -> String {
        let mut text = String::new();
        for i in 0..header {
            text.push_str(&format!("header line {}\n", i));
        }
        for (i, &t) in times.iter().enumerate() {
            let mut fields = vec![format!("{}", t)];
            fields.extend((0..TOTAL_SENSORS).map(|s| format!("{}", i * 1000 + s)));
            text.push_str(&fields.join("\t"));
            text.push_str("\t\n");
        }
        text
    }

    #[test]
    fn test_parse_samples() {
        let text = recording_text(3, &[0.0, 0.01, 0.02]);
        let frame = parse_samples(&text, 3, "test.asc").unwrap();

        assert_eq!(frame.shape(), (3, TOTAL_SENSORS));
        assert_eq!(frame.times(), &[0.0, 0.01, 0.02]);
        assert_eq!(frame.values()[[1, 5]], 1005.0);
    }

    #[test]
    fn test_short_row_rejected() {
        let text = "h\n0.0\t1\t2\n";
        let err = parse_samples(text, 1, "bad.asc").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecording { .. }));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let mut text = recording_text(1, &[0.0]);
        text = text.replacen("\t1\t", "\tx\t", 1);
        let err = parse_samples(&text, 1, "bad.asc").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecording { .. }));
    }

    #[test]
    fn test_nan_time_rejected() {
        let text = recording_text(2, &[0.0, 0.01, 0.02]).replacen("\n0.01\t", "\nnan\t", 1);
        let err = parse_samples(&text, 2, "bad.asc").unwrap_err();
        match err {
            ParseError::MalformedRecording { line, reason, .. } => {
                assert_eq!(line, 4);
                assert!(reason.contains("nan"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_sensor_number_outside_insole() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(recording_text(19, &[0.0, 0.01]).as_bytes())
            .unwrap();

        let rec = AscRecording::open(file.path(), 19).unwrap();
        assert_eq!(rec.value_at(Foot::Left, 0.0, 1), Some(0.0));
        assert_eq!(rec.value_at(Foot::Left, 0.0, 0), None);
        assert_eq!(rec.value_at(Foot::Left, 0.0, 100), None);
        assert_eq!(rec.value_at(Foot::Right, 0.0, 100), None);
    }

    #[test]
    fn test_open_and_lookup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(recording_text(19, &[1.0, 1.01, 1.02, 1.03]).as_bytes())
            .unwrap();

        let rec = AscRecording::open(file.path(), 19).unwrap();
        // right insole sensor 1 is column 99
        assert_eq!(rec.value_at(Foot::Right, 1.01, 1), Some(1099.0));
        assert_eq!(rec.value_at(Foot::Left, 5.0, 1), None);

        let window = rec.stance_window(Foot::Left, 1.01, 1.02);
        assert_eq!(window.shape(), (2, 99));
        assert_eq!(window.sensors()[0], 0);
    }

    #[test]
    fn test_missing_file() {
        let err = AscRecording::open("/nonexistent/S1 fast walking 1.asc", 19).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
