use crate::constants::{
    FOLDER_PREFIX, RATIO_PREFIX, REMOTE_PREFIX, SUCCESS_PREFIX, SUMMARY_PREFIX, TIME_PREFIX,
    WARNING_PREFIX,
};
use crate::error::Result;
use crate::utils::{calculate_compression_ratio, create_progress_bar, format_file_size};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Conversion,
    Upload,
}

impl Stage {
    fn noun(self) -> &'static str {
        match self {
            Stage::Conversion => "conversion",
            Stage::Upload => "upload",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Stage::Conversion => "converted",
            Stage::Upload => "uploaded",
        }
    }
}

/// Lifecycle of a single candidate. Every item leaves `Pending` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    Succeeded,
    Failed,
}

/// Byte counts produced by one successful item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemOutcome {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub stage: Stage,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// Output folder for conversions, remote location note for uploads.
    pub location: String,
    pub elapsed: Duration,
    /// Final state of each candidate, in processing order.
    pub items: Vec<(PathBuf, ItemState)>,
}

impl BatchReport {
    pub fn new(stage: Stage, total: usize, location: impl Into<String>) -> Self {
        Self {
            stage,
            total,
            succeeded: 0,
            failed: 0,
            bytes_in: 0,
            bytes_out: 0,
            location: location.into(),
            elapsed: Duration::ZERO,
            items: Vec::new(),
        }
    }

    pub fn empty(stage: Stage, location: impl Into<String>) -> Self {
        Self::new(stage, 0, location)
    }

    pub fn record(&mut self, result: &Result<ItemOutcome>) -> ItemState {
        match result {
            Ok(outcome) => {
                self.succeeded += 1;
                self.bytes_in += outcome.bytes_in;
                self.bytes_out += outcome.bytes_out;
                ItemState::Succeeded
            }
            Err(_) => {
                self.failed += 1;
                ItemState::Failed
            }
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.succeeded + self.failed == self.total
            && self.items.iter().all(|(_, state)| *state != ItemState::Pending)
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &Path> {
        self.items
            .iter()
            .filter(|(_, state)| *state == ItemState::Failed)
            .map(|(path, _)| path.as_path())
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.bytes_in, self.bytes_out)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "\n{} {} Summary:",
            SUMMARY_PREFIX,
            match self.stage {
                Stage::Conversion => "Conversion",
                Stage::Upload => "Upload",
            }
        )?;
        writeln!(f, "  {} Total files: {}", FOLDER_PREFIX, self.total)?;
        writeln!(
            f,
            "  {} Successfully {}: {}",
            SUCCESS_PREFIX,
            self.stage.past_tense(),
            self.succeeded
        )?;
        writeln!(f, "  {}  Errors: {}", WARNING_PREFIX, self.failed)?;

        match self.stage {
            Stage::Conversion => {
                writeln!(
                    f,
                    "  {} Size: {} -> {}",
                    SUMMARY_PREFIX,
                    format_file_size(self.bytes_in),
                    format_file_size(self.bytes_out)
                )?;
                writeln!(
                    f,
                    "  {} Overall compression ratio: {:.1}%",
                    RATIO_PREFIX,
                    self.compression_ratio()
                )?;
                writeln!(f, "  {} WebP files saved in: {}", FOLDER_PREFIX, self.location)?;
            }
            Stage::Upload => {
                writeln!(
                    f,
                    "  {} Uploaded: {}",
                    SUMMARY_PREFIX,
                    format_file_size(self.bytes_out)
                )?;
                writeln!(
                    f,
                    "  {}  Files available in R2 at path: {}",
                    REMOTE_PREFIX, self.location
                )?;
            }
        }

        write!(f, "  {}  Total time: {:.2?}", TIME_PREFIX, self.elapsed)
    }
}

/// Runs `op` once per item, in order, isolating failures.
///
/// A failing item is logged and tallied; the loop always reaches the end.
/// No retries.
pub fn run_isolated<F>(
    stage: Stage,
    items: &[PathBuf],
    location: impl Into<String>,
    mut op: F,
) -> BatchReport
where
    F: FnMut(&Path) -> Result<ItemOutcome>,
{
    let start = Instant::now();
    let mut report = BatchReport::new(stage, items.len(), location);
    report.items = items
        .iter()
        .map(|item| (item.clone(), ItemState::Pending))
        .collect();
    let progress = create_progress_bar(items.len() as u64);

    for (index, item) in items.iter().enumerate() {
        let name = display_name(item);
        progress.set_message(name.clone());

        let result = op(item);
        let state = report.record(&result);
        report.items[index].1 = state;

        progress.suspend(|| match &result {
            Ok(_) => info!("✓ Successfully {}: {}", stage.past_tense(), name),
            Err(e) => error!("✗ Error during {} {}: {}", stage.noun(), name, e),
        });
        progress.inc(1);
    }

    progress.finish_and_clear();
    report.elapsed = start.elapsed();
    report
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
