//! Trial tree construction from a guiding file.
//!
//! Each guiding file entry names one recording and one foot. Entries for the
//! same subject, condition and trial share branches; the foot branch collects
//! one stance leaf per valid stance cell.

use super::asc::AscRecording;
use super::guide::{read_guide, GuideEntry};
use crate::tree::{Node, StanceSegment, TrialTree};
use crate::utils::config::DEFAULT_ASC_HEADER_ROWS;
use crate::utils::error::ParseError;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Parse a guiding file and its recordings into a trial tree
///
/// **Public** - main entry point for loading data
///
/// # Arguments
/// * `path` - Guiding file (xlsx/xls/ods or csv)
/// * `conditions` - Condition labels accepted in entry names
/// * `max_read_rate` - Fraction of entries to load, in (0, 1]
///
/// # Errors
/// * `ParseError::InvalidEntry` - an entry name does not match `S<n> <condition> <trial>`
/// * `ParseError::InvalidStance` - a stance range ends before it starts
/// * `ParseError::InvalidReadRate` - `max_read_rate` outside (0, 1]
/// * any error from reading the guiding file or a recording
///
/// # Example
/// ```ignore
/// let tree = trials_parse(
///     "data/subjects/walking plantar pressure time slot.xlsx",
///     &["fast walking", "slow walking", "normal walking"],
///     1.0,
/// )?;
/// ```
pub fn trials_parse<S: AsRef<str>>(
    path: impl AsRef<Path>,
    conditions: &[S],
    max_read_rate: f64,
) -> Result<TrialTree, ParseError> {
    TrialParser::new(conditions)
        .max_read_rate(max_read_rate)
        .parse(path)
}

/// Configurable trial parser
#[derive(Debug, Clone)]
pub struct TrialParser {
    conditions: Vec<String>,
    max_read_rate: f64,
    asc_header_rows: usize,
    show_progress: bool,
}

/// Subject, condition and trial decoded from an entry name
#[derive(Debug, Clone, PartialEq, Eq)]
struct EntryName {
    subject: String,
    condition: String,
    trial: String,
}

impl TrialParser {
    pub fn new<S: AsRef<str>>(conditions: &[S]) -> Self {
        Self {
            conditions: conditions.iter().map(|c| c.as_ref().to_string()).collect(),
            max_read_rate: 1.0,
            asc_header_rows: DEFAULT_ASC_HEADER_ROWS,
            show_progress: false,
        }
    }

    pub fn max_read_rate(mut self, rate: f64) -> Self {
        self.max_read_rate = rate;
        self
    }

    pub fn asc_header_rows(mut self, rows: usize) -> Self {
        self.asc_header_rows = rows;
        self
    }

    /// Draw a progress bar on stderr while loading
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Load the guiding file at `path` and every recording it references
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<TrialTree, ParseError> {
        let path = path.as_ref();
        if !(self.max_read_rate > 0.0 && self.max_read_rate <= 1.0) {
            return Err(ParseError::InvalidReadRate(self.max_read_rate));
        }

        let entries = read_guide(path)?;
        let folder = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        info!("loading {} data entries", entries.len());
        let count = entries_to_load(entries.len(), self.max_read_rate);
        if count < entries.len() {
            info!(
                "max_read_rate {} limits loading to the first {} entries",
                self.max_read_rate, count
            );
        }

        let entry_pattern = self.entry_pattern()?;
        let stance_pattern = stance_pattern()?;
        let progress = self.progress_bar(count);

        let mut tree = TrialTree::new();
        let mut recording: Option<AscRecording> = None;

        for entry in entries.iter().take(count) {
            let name = decode_entry(&entry_pattern, &entry.name)?;
            let asc_path = recording_path(folder, &name.subject, &entry.name);

            if recording.as_ref().map(AscRecording::path) != Some(asc_path.as_path()) {
                recording = Some(AscRecording::open(&asc_path, self.asc_header_rows)?);
            }
            if let Some(rec) = recording.as_ref() {
                add_entry(&mut tree, &name, entry, rec, &stance_pattern)?;
            }

            progress.inc(1);
        }

        progress.finish_and_clear();
        info!(
            "Loaded {} subjects with {} stances",
            tree.branch_names().len(),
            tree.leaf_count()
        );

        Ok(tree)
    }

    fn entry_pattern(&self) -> Result<Regex, ParseError> {
        let conditions = self
            .conditions
            .iter()
            .map(|c| regex::escape(c))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"^(S[1-9][0-9]*) ({}) ([1-9][0-9]*)$", conditions);
        Regex::new(&pattern).map_err(|e| ParseError::InvalidEntry(e.to_string()))
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .map(|style| style.progress_chars("=>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message("loading entries");
        bar
    }
}

/// Number of leading entries to load so that the loaded fraction first
/// reaches `rate`
fn entries_to_load(total: usize, rate: f64) -> usize {
    (1..=total)
        .find(|&k| k as f64 / total as f64 >= rate)
        .unwrap_or(total)
}

fn stance_pattern() -> Result<Regex, ParseError> {
    Regex::new(r"^\s*(\d+(?:\.\d*)?)\s*-\s*(\d+(?:\.\d*)?)\s*$")
        .map_err(|e| ParseError::InvalidEntry(e.to_string()))
}

fn decode_entry(pattern: &Regex, name: &str) -> Result<EntryName, ParseError> {
    let caps = pattern
        .captures(name.trim())
        .ok_or_else(|| ParseError::InvalidEntry(name.to_string()))?;

    Ok(EntryName {
        subject: caps[1].to_string(),
        condition: caps[2].to_string(),
        trial: format!("trial {}", &caps[3]),
    })
}

/// `<guide dir>/<subject>/<entry>.asc`
fn recording_path(folder: &Path, subject: &str, entry: &str) -> PathBuf {
    folder.join(subject).join(format!("{}.asc", entry.trim()))
}

/// Parse a `start-end` stance cell.
///
/// Empty and `nan` cells yield `None` silently; other unreadable cells are
/// skipped with a warning.
fn parse_stance(
    pattern: &Regex,
    entry: &str,
    cell: &str,
) -> Result<Option<(f64, f64)>, ParseError> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    let Some(caps) = pattern.captures(cell) else {
        warn!("skipping unreadable stance '{}' in entry {}", cell, entry);
        return Ok(None);
    };

    let bound = |idx: usize| {
        caps[idx].parse::<f64>().map_err(|e| ParseError::InvalidStance {
            entry: entry.to_string(),
            stance: cell.to_string(),
            reason: e.to_string(),
        })
    };
    let (start, end) = (bound(1)?, bound(2)?);

    if start > end {
        return Err(ParseError::InvalidStance {
            entry: entry.to_string(),
            stance: cell.to_string(),
            reason: format!("start {} is after end {}", start, end),
        });
    }

    Ok(Some((start, end)))
}

fn add_entry(
    tree: &mut TrialTree,
    name: &EntryName,
    entry: &GuideEntry,
    recording: &AscRecording,
    stance_pattern: &Regex,
) -> Result<(), ParseError> {
    let foot_branch = tree
        .root_branch_mut()
        .branch_or_insert(&name.subject)?
        .branch_or_insert(&name.condition)?
        .branch_or_insert(&name.trial)?
        .branch_or_insert(entry.foot.label())?;

    for (idx, cell) in entry.stances.iter().enumerate() {
        let Some((start, end)) = parse_stance(stance_pattern, &entry.name, cell)? else {
            continue;
        };

        let window = recording.stance_window(entry.foot, start, end);
        if window.is_empty() {
            warn!(
                "stance {} of {} ({}-{}) has no samples in {}",
                idx + 1,
                entry.name,
                start,
                end,
                recording.path().display()
            );
            continue;
        }

        let segment = StanceSegment::new(format!("stance {}", idx + 1), start, end, window)?;
        foot_branch.add_branch(Node::Leaf(segment));
    }

    debug!(
        "Entry {} ({}) added {} stance cells",
        entry.name,
        entry.foot,
        entry.stances.len()
    );
    Ok(())
}
