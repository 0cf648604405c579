//! The raw Fibonacci sample buffer: generated from the recurrence, or loaded
//! from / saved to disk as packed native-endian `i32` (`.bin`) or as
//! space-separated decimal text (`.txt`).

use crate::error::{Result, SpiralError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

// F(47) no longer fits in an i32
pub const MAX_GENERATED_INDEX: u32 = 46;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Binary,
    Text,
}

impl SampleFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "bin" => Some(SampleFormat::Binary),
            "txt" => Some(SampleFormat::Text),
            _ => None,
        }
    }
}

/// `F(0)..=F(last_index)`, so the buffer holds `last_index + 1` samples.
/// Values past `F(MAX_GENERATED_INDEX)` wrap around.
pub fn generate(last_index: u32) -> Vec<i32> {
    let len = last_index as usize + 1;
    let mut samples: Vec<i32> = Vec::with_capacity(len);
    for i in 0..len {
        let value = match i {
            0 => 0,
            1 => 1,
            _ => samples[i - 1].wrapping_add(samples[i - 2]),
        };
        samples.push(value);
    }
    samples
}

pub fn load(path: &Path) -> Result<Vec<i32>> {
    match SampleFormat::from_path(path) {
        Some(SampleFormat::Binary) => read_binary(path),
        Some(SampleFormat::Text) => read_text(path),
        None => Err(SpiralError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: "expected a .bin or .txt file".to_string(),
        }),
    }
}

/// Trailing bytes that do not make up a whole `i32` are ignored.
pub fn read_binary(path: &Path) -> Result<Vec<i32>> {
    let bytes = fs::read(path)?;
    let whole = bytes.len() / std::mem::size_of::<i32>() * std::mem::size_of::<i32>();
    let samples = bytemuck::pod_collect_to_vec::<u8, i32>(&bytes[..whole]);
    tracing::debug!("Read {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

pub fn read_text(path: &Path) -> Result<Vec<i32>> {
    let contents = fs::read_to_string(path)?;
    contents
        .split_whitespace()
        .enumerate()
        .map(|(token, word)| {
            word.parse::<i32>().map_err(|_| SpiralError::Parse {
                path: path.to_path_buf(),
                token,
            })
        })
        .collect()
}

pub fn write_binary(path: &Path, samples: &[i32]) -> Result<()> {
    fs::write(path, bytemuck::cast_slice::<i32, u8>(samples))?;
    Ok(())
}

/// Every value is followed by a single space, trailing one included.
pub fn write_text(path: &Path, samples: &[i32]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for sample in samples {
        write!(writer, "{} ", sample)?;
    }
    writer.flush()?;
    Ok(())
}
