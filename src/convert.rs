use crate::codec::{Codec, EncodeOptions};
use crate::config::ConvertConfig;
use crate::constants::{ENV_SOURCE_FOLDER, SOURCE_EXTENSION, TARGET_EXTENSION};
use crate::discovery::{discover, entry_kind, has_extension, EntryKind};
use crate::error::{PipelineError, Result};
use crate::report::{display_name, run_isolated, BatchReport, ItemOutcome, Stage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Replaces exactly one trailing `.{from}` (any case) with `.{to}`.
///
/// Names without the extension are returned unchanged.
pub fn derive_output_name(file_name: &str, from: &str, to: &str) -> String {
    if !has_extension(file_name, from) {
        return file_name.to_string();
    }
    let stem = &file_name[..file_name.len() - from.len()];
    format!("{}{}", stem, to)
}

/// Output path for `input` inside `output_dir`.
pub fn generate_output_path(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PipelineError::item(input, "file name is not valid UTF-8"))?;

    Ok(output_dir.join(derive_output_name(
        file_name,
        SOURCE_EXTENSION,
        TARGET_EXTENSION,
    )))
}

/// Creates `output_dir` and everything above it if missing.
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    if entry_kind(output_dir) == EntryKind::Directory {
        return Ok(());
    }
    fs::create_dir_all(output_dir).map_err(|source| PipelineError::DirectoryCreate {
        path: output_dir.to_path_buf(),
        source,
    })?;
    info!("Created folder: {}", output_dir.display());
    Ok(())
}

/// Converts every item into `output_dir`, one at a time.
///
/// A failed item is logged and counted; it never stops the batch. Fails only
/// if the output folder cannot be created.
pub fn convert_all(
    items: &[PathBuf],
    output_dir: &Path,
    codec: &dyn Codec,
    options: &EncodeOptions,
) -> Result<BatchReport> {
    let location = output_dir.display().to_string();
    if items.is_empty() {
        info!("PNG files not found in the folder");
        return Ok(BatchReport::empty(Stage::Conversion, location));
    }

    ensure_output_dir(output_dir)?;

    Ok(run_isolated(Stage::Conversion, items, location, |input| {
        convert_one(input, output_dir, codec, options)
    }))
}

fn convert_one(
    input: &Path,
    output_dir: &Path,
    codec: &dyn Codec,
    options: &EncodeOptions,
) -> Result<ItemOutcome> {
    let output = generate_output_path(input, output_dir)?;
    info!(
        "Converting: {} -> {}",
        display_name(input),
        display_name(&output)
    );

    let bytes_in = fs::metadata(input)
        .map_err(|e| PipelineError::item(input, e))?
        .len();
    codec
        .encode(input, &output, options)
        .map_err(|e| e.for_item(input))?;
    let bytes_out = fs::metadata(&output)
        .map_err(|e| PipelineError::item(input, format!("no output written: {}", e)))?
        .len();

    Ok(ItemOutcome {
        bytes_in,
        bytes_out,
    })
}

/// Runs the whole conversion stage for `config`.
pub fn run_conversion(config: &ConvertConfig, codec: &dyn Codec) -> Result<BatchReport> {
    if entry_kind(&config.source_dir) != EntryKind::Directory {
        return Err(PipelineError::Configuration(format!(
            "{} is not set or folder not found: {}",
            ENV_SOURCE_FOLDER,
            config.source_dir.display()
        )));
    }

    let output_dir = config.output_dir();
    ensure_output_dir(&output_dir)?;

    let candidates = discover(&config.source_dir, SOURCE_EXTENSION)?;
    info!("Found {} PNG files for conversion", candidates.len());

    convert_all(&candidates, &output_dir, codec, &config.options)
}
