//! Frame sources
//!
//! A capture source hands out frames until it runs dry. Running dry is the
//! normal way for a session to end, not an error.

use crate::error::RecognizerError;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// One frame and where it came from
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub index: usize,
    pub source: PathBuf,
    pub image: DynamicImage,
}

pub trait CaptureSource {
    /// `Ok(None)` once exhausted. An `Err` only invalidates that one frame;
    /// the next call moves on.
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>, RecognizerError>;
}

/// Ordered still images standing in for a camera
#[derive(Debug, Clone)]
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageSequence {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths, next: 0 }
    }

    /// Files are taken as given; directories expand to their image files
    /// sorted by name.
    pub fn from_inputs(inputs: &[PathBuf]) -> Result<Self, RecognizerError> {
        let mut paths = Vec::new();
        for input in inputs {
            if input.is_dir() {
                let mut entries: Vec<PathBuf> = fs::read_dir(input)?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| p.is_file() && is_image_file(p))
                    .collect();
                entries.sort();
                tracing::debug!(
                    dir = %input.display(),
                    frames = entries.len(),
                    "Expanded input directory"
                );
                paths.extend(entries);
            } else if input.is_file() {
                paths.push(input.clone());
            } else {
                return Err(RecognizerError::Configuration(format!(
                    "input {} does not exist",
                    input.display()
                )));
            }
        }
        Ok(Self::new(paths))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl CaptureSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>, RecognizerError> {
        let Some(path) = self.paths.get(self.next).cloned() else {
            return Ok(None);
        };
        let index = self.next;
        self.next += 1;

        let image = image::open(&path).map_err(|e| {
            RecognizerError::InvalidInput(format!("cannot decode {}: {}", path.display(), e))
        })?;
        Ok(Some(CapturedFrame {
            index,
            source: path,
            image,
        }))
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
