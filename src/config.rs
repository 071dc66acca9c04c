use crate::cli::{ConvertArgs, UploadArgs};
use crate::codec::EncodeOptions;
use crate::constants::{DEFAULT_WRANGLER_BIN, ENV_BUCKET, ENV_SOURCE_FOLDER, OUTPUT_SUBDIR};
use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for the conversion stage, built once in `main`.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub source_dir: PathBuf,
    pub options: EncodeOptions,
}

impl ConvertConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            options: EncodeOptions::default(),
        }
    }

    pub fn from_args(args: &ConvertArgs) -> Result<Self> {
        let source = required(args.source.as_deref(), ENV_SOURCE_FOLDER)?;
        Ok(Self::new(source))
    }

    pub fn output_dir(&self) -> PathBuf {
        output_dir_for(&self.source_dir)
    }
}

/// Settings for the upload stage, built once in `main`.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub source_dir: PathBuf,
    pub bucket: String,
    pub key_prefix: String,
    pub timeout: Option<Duration>,
    pub wrangler_bin: String,
}

impl UploadConfig {
    pub fn new(source_dir: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            bucket: bucket.into(),
            key_prefix: String::new(),
            timeout: None,
            wrangler_bin: DEFAULT_WRANGLER_BIN.to_string(),
        }
    }

    pub fn from_args(args: &UploadArgs) -> Result<Self> {
        let source = required(args.source.as_deref(), ENV_SOURCE_FOLDER)?;
        let bucket = required(args.bucket.as_deref(), ENV_BUCKET)?;

        let mut config = Self::new(source, bucket);
        if let Some(prefix) = non_empty(args.key_prefix.as_deref()) {
            config.key_prefix = prefix.to_string();
        }
        config.timeout = args.timeout.filter(|&secs| secs > 0).map(Duration::from_secs);
        if let Some(bin) = non_empty(args.wrangler.as_deref()) {
            config.wrangler_bin = bin.to_string();
        }
        Ok(config)
    }

    pub fn output_dir(&self) -> PathBuf {
        output_dir_for(&self.source_dir)
    }

    /// Object key for a converted file: optional prefix plus the bare file name.
    pub fn object_key(&self, file_name: &str) -> String {
        if self.key_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.key_prefix.trim_end_matches('/'), file_name)
        }
    }
}

pub fn output_dir_for(source_dir: &Path) -> PathBuf {
    source_dir.join(OUTPUT_SUBDIR)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    non_empty(value).ok_or_else(|| PipelineError::Configuration(format!("{} is not set", key)))
}
