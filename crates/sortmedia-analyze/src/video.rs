//! Video creation dates from container tags via `ffprobe`.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use sortmedia_core::CreationDate;

use crate::temporal::DateSource;
use crate::AnalyzeError;

/// Entries requested from `ffprobe`: the first stream's tags plus the
/// container-level tags as a fallback.
const SHOW_ENTRIES: &str =
    "stream=index,codec_type:stream_tags=creation_time:format_tags=creation_time";

/// Reads `creation_time` tags by running `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfprobeDateSource {
    program: PathBuf,
}

impl Default for FfprobeDateSource {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffprobe"),
        }
    }
}

impl FfprobeDateSource {
    /// Use a specific `ffprobe` binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DateSource for FfprobeDateSource {
    fn read_date(&self, path: &Path) -> Result<Option<CreationDate>, AnalyzeError> {
        let output = Command::new(&self.program)
            .args(["-v", "quiet"])
            .arg(path)
            .args(["-print_format", "json", "-show_entries", SHOW_ENTRIES])
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AnalyzeError::ProbeNotFound {
                        program: self.program.clone(),
                    }
                } else {
                    AnalyzeError::read(path, e)
                }
            })?;

        if !output.status.success() {
            return Err(AnalyzeError::ProbeFailed {
                path: path.to_path_buf(),
                message: format!("exit status {}", output.status),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(&stdout).map_err(|e| AnalyzeError::ProbeOutput {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeSection>,
    format: Option<ProbeSection>,
}

#[derive(Deserialize)]
struct ProbeSection {
    tags: Option<ProbeTags>,
}

#[derive(Deserialize)]
struct ProbeTags {
    creation_time: Option<String>,
}

impl ProbeSection {
    fn creation_time(&self) -> Option<&str> {
        self.tags.as_ref()?.creation_time.as_deref()
    }
}

/// Extract the creation date from `ffprobe` JSON output.
///
/// The first stream's tag wins; the container tag is used when the stream
/// has none. A present but unparseable timestamp yields `None`.
pub fn parse_probe_output(output: &str) -> Result<Option<CreationDate>, serde_json::Error> {
    let probe: ProbeOutput = serde_json::from_str(output)?;

    let raw = probe
        .streams
        .first()
        .and_then(ProbeSection::creation_time)
        .or_else(|| probe.format.as_ref().and_then(ProbeSection::creation_time));

    Ok(raw.and_then(parse_creation_time))
}

fn parse_creation_time(raw: &str) -> Option<CreationDate> {
    let raw = raw.trim();
    let date = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.date_naive()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.fZ") {
        dt.date()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        dt.date()
    } else {
        NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()?
    };
    Some(CreationDate::from_date(date))
}
