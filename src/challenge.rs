//! Best-effort solving of the portal's distorted-text verification image.
//!
//! Recognition is expected to fail or guess wrong routinely; callers own the
//! retry loop. The solver is a capability trait so session and coordinator
//! tests run against a deterministic implementation instead of the real
//! recognition pipeline.

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use image::imageops;
use image::GrayImage;
use tracing::debug;

/// Guesses shorter than this are never submitted.
pub const CHALLENGE_MIN_LENGTH: usize = 4;

const BINARIZE_THRESHOLD: u8 = 128;
const CONTRAST_BOOST: f32 = 60.0;
const BRIGHTNESS_BOOST: i32 = 40;

/// Page-segmentation modes tried in priority order: single line, single
/// word, raw line.
const SEGMENTATION_MODES: &[&str] = &["7", "8", "13"];

const CHARACTER_WHITELIST: &str =
    "tessedit_char_whitelist=0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

pub trait ChallengeSolver {
    /// Returns a text guess of acceptable length, or `None` when the image
    /// produced nothing usable. An `Err` means the recognition machinery
    /// itself failed, not the image.
    fn solve(&self, image_bytes: &[u8]) -> Result<Option<String>>;
}

/// Real pipeline: grayscale, contrast and brightness enhancement,
/// binarization, then the external `tesseract` binary under each
/// segmentation mode until one yields an acceptable guess.
pub struct TesseractSolver {
    language: String,
}

impl TesseractSolver {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl ChallengeSolver for TesseractSolver {
    fn solve(&self, image_bytes: &[u8]) -> Result<Option<String>> {
        let prepared = preprocess_challenge(image_bytes)?;

        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let png_path = std::env::temp_dir().join(format!(
            "cnr_harvester_challenge_{}_{}.png",
            std::process::id(),
            stamp
        ));
        prepared
            .save(&png_path)
            .with_context(|| format!("failed to write challenge image {}", png_path.display()))?;

        let result = self.recognize(&png_path);
        let _ = fs::remove_file(&png_path);
        result
    }
}

impl TesseractSolver {
    fn recognize(&self, png_path: &Path) -> Result<Option<String>> {
        for mode in SEGMENTATION_MODES {
            let output = Command::new("tesseract")
                .arg(png_path)
                .arg("stdout")
                .arg("-l")
                .arg(&self.language)
                .arg("--oem")
                .arg("3")
                .arg("--psm")
                .arg(mode)
                .arg("-c")
                .arg(CHARACTER_WHITELIST)
                .output()
                .with_context(|| format!("failed to execute tesseract for {}", png_path.display()))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                bail!(
                    "tesseract returned non-zero exit status under psm {}: {}",
                    mode,
                    stderr.trim()
                );
            }

            let guess: String = String::from_utf8_lossy(&output.stdout)
                .chars()
                .filter(|character| character.is_ascii_alphanumeric())
                .collect();

            if guess.len() >= CHALLENGE_MIN_LENGTH {
                debug!(psm = mode, length = guess.len(), "challenge text accepted");
                return Ok(Some(guess));
            }
        }

        debug!("no segmentation mode produced an acceptable guess");
        Ok(None)
    }
}

pub fn tesseract_available() -> bool {
    Command::new("tesseract").arg("--version").output().is_ok()
}

fn preprocess_challenge(image_bytes: &[u8]) -> Result<GrayImage> {
    let decoded =
        image::load_from_memory(image_bytes).context("failed to decode challenge image")?;

    let gray = decoded.to_luma8();
    let enhanced = imageops::brighten(&imageops::contrast(&gray, CONTRAST_BOOST), BRIGHTNESS_BOOST);

    Ok(binarize(enhanced))
}

fn binarize(mut image: GrayImage) -> GrayImage {
    for pixel in image.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > BINARIZE_THRESHOLD {
            255
        } else {
            0
        };
    }
    image
}

/// Deterministic solver returning a fixed answer. Lets session and
/// coordinator tests exercise the acquisition flow without optical
/// recognition in the loop.
pub struct StaticSolver {
    answer: Option<String>,
}

impl StaticSolver {
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
        }
    }

    pub fn unsolvable() -> Self {
        Self { answer: None }
    }
}

impl ChallengeSolver for StaticSolver {
    fn solve(&self, _image_bytes: &[u8]) -> Result<Option<String>> {
        Ok(self.answer.clone())
    }
}
