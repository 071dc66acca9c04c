#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use webp_batch::{PipelineError, PutObjectRequest, PutOutcome, Result, Transport};

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Writes a small real PNG so the actual codec can decode it.
pub fn create_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_fn(32, 24, |x, y| Rgba([(x * 8) as u8, (y * 10) as u8, 90, 255]))
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}

pub fn create_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

pub fn sorted_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Records every put; never touches the network.
#[derive(Default)]
pub struct RecordingTransport {
    pub missing: bool,
    pub fail_keys: Vec<String>,
    pub calls: RefCell<Vec<PutObjectRequest>>,
}

impl RecordingTransport {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.calls.borrow().iter().map(|c| c.key.clone()).collect();
        keys.sort();
        keys
    }
}

impl Transport for RecordingTransport {
    fn probe(&self) -> Result<String> {
        if self.missing {
            return Err(PipelineError::ToolMissing {
                tool: "Wrangler".to_string(),
                hint: "npm install -g wrangler".to_string(),
            });
        }
        Ok("wrangler 3.0.0".to_string())
    }

    fn put_object(&self, request: &PutObjectRequest) -> Result<PutOutcome> {
        self.calls.borrow_mut().push(request.clone());
        if self.fail_keys.contains(&request.key) {
            return Err(PipelineError::item(&request.local_path, "exit code 1"));
        }
        Ok(PutOutcome::default())
    }
}
