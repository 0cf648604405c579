use crate::error::{Result, SpiralError};
use crate::spiral::sequence::{self, SampleFormat, MAX_GENERATED_INDEX};
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleSource {
    /// `F(0)..=F(last_index)` from the recurrence.
    Formula { last_index: u32 },
    /// A previously saved buffer, loaded verbatim.
    File(PathBuf),
}

/// Where a session persists its sample buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTargets {
    pub binary: PathBuf,
    pub text: PathBuf,
}

/// A validated request for one spiral session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiralRequest {
    pub source: SampleSource,
    pub first_index: usize,
    pub save: Option<SaveTargets>,
}

impl SpiralRequest {
    /// Spiral over `F(first)..=F(second)`.
    pub fn generate(first: i64, second: i64) -> Result<Self> {
        let invalid = |reason| SpiralError::InvalidInput {
            first: first.to_string(),
            second: second.to_string(),
            reason,
        };
        if second <= 0 {
            return Err(invalid("second number must be positive"));
        }
        if first < 0 {
            return Err(invalid("first number must not be negative"));
        }
        if first >= second {
            return Err(invalid("first number must be smaller than the second"));
        }
        if second > i64::from(MAX_GENERATED_INDEX) {
            return Err(invalid("second number is too large for 32-bit samples"));
        }

        Ok(Self {
            source: SampleSource::Formula {
                last_index: second as u32,
            },
            first_index: first as usize,
            save: None,
        })
    }

    /// Same as [`SpiralRequest::generate`], from the raw text inputs.
    pub fn parse(first: &str, second: &str) -> Result<Self> {
        let invalid = || SpiralError::InvalidInput {
            first: first.to_string(),
            second: second.to_string(),
            reason: "expected two integers",
        };
        let f = first.trim().parse::<i64>().map_err(|_| invalid())?;
        let s = second.trim().parse::<i64>().map_err(|_| invalid())?;
        Self::generate(f, s)
    }

    /// Checks that `path` names a `.bin`/`.txt` file that can be opened.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let unavailable = |reason: String| SpiralError::SourceUnavailable {
            path: path.clone(),
            reason,
        };
        if path.as_os_str().is_empty() {
            return Err(unavailable("no path given".to_string()));
        }
        if SampleFormat::from_path(&path).is_none() {
            return Err(unavailable("expected a .bin or .txt file".to_string()));
        }
        File::open(&path).map_err(|e| unavailable(e.to_string()))?;

        Ok(Self {
            source: SampleSource::File(path),
            first_index: 0,
            save: None,
        })
    }

    pub fn with_save(mut self, targets: SaveTargets) -> Self {
        self.save = Some(targets);
        self
    }

    pub fn load_samples(&self) -> Result<Vec<i32>> {
        match &self.source {
            SampleSource::Formula { last_index } => Ok(sequence::generate(*last_index)),
            SampleSource::File(path) => sequence::load(path),
        }
    }

    pub fn persist(&self, samples: &[i32]) -> Result<()> {
        if let Some(targets) = &self.save {
            sequence::write_binary(&targets.binary, samples)?;
            sequence::write_text(&targets.text, samples)?;
            tracing::info!(
                "Saved {} samples to {} and {}",
                samples.len(),
                targets.binary.display(),
                targets.text.display()
            );
        }
        Ok(())
    }
}
