//! Helpers shared by both stages.
use crate::constants::PROGRESS_BAR_TEMPLATE;
use crate::logger::is_quiet;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for a batch of `len` items.
///
/// Hidden in quiet mode; indicatif also hides it when stderr is not a terminal.
pub fn create_progress_bar(len: u64) -> ProgressBar {
    if is_quiet() || len == 0 {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

/// Human-readable size with one decimal above bytes, e.g. "1.2 MB".
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Size reduction as a percentage; negative when the output grew.
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}
