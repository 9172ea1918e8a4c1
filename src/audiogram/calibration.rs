//! Calibration table for Elbicare exports.
//!
//! The resource is a JSON object keyed by frequency. Each value is either a
//! plain offset in dB (`level = ampl - offset`) or an array indexed by the
//! device amplitude step (`level = table[ampl]`). A handful of string keys
//! describe the headphone the table was measured for.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use log::{debug, info};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use crate::audiogram::error::{AudiogramError, MEMORY_ORIGIN};
use crate::audiogram::frequency::StandardFrequency;
/// Frequencies every calibration resource has to cover.
pub const REQUIRED_FREQUENCIES: [StandardFrequency; 5] = [
    StandardFrequency::F250,
    StandardFrequency::F500,
    StandardFrequency::F1000,
    StandardFrequency::F2000,
    StandardFrequency::F4000,
];
#[derive(Clone, Debug, PartialEq)]
enum CalibrationEntry {
    Offset(f64),
    Lookup(Vec<f64>),
}
/// Descriptive fields carried next to the calibration values.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CalibrationInfo {
    pub headphone: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub audio_unit: Option<String>,
}
impl CalibrationInfo {
    pub fn is_empty(&self) -> bool {
        self.headphone.is_none()
            && self.author.is_none()
            && self.date.is_none()
            && self.audio_unit.is_none()
    }
    /// One-line description used in plot titles.
    pub fn describe(&self) -> String {
        let mut text = format!(
            "CALIBRATION: {}",
            self.headphone.as_deref().unwrap_or("unknown headphone")
        );
        if let Some(author) = &self.author {
            text.push_str(&format!(" by {author}"));
        }
        if let Some(date) = &self.date {
            text.push_str(&format!(" at {date}"));
        }
        text
    }
}
/// Why a raw amplitude could not be calibrated.
#[derive(Debug, Error, PartialEq)]
pub enum CalibrationMiss {
    #[error("no calibration entry for {0}")]
    MissingFrequency(StandardFrequency),
    #[error("amplitude {0} is not a valid step index")]
    InvalidStep(f64),
    #[error("amplitude step {step} outside calibration table of {len} steps")]
    StepOutOfRange { step: usize, len: usize },
}
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalibrationTable {
    entries: BTreeMap<StandardFrequency, CalibrationEntry>,
    info: CalibrationInfo,
}
impl CalibrationTable {
    /// Table of plain offsets, mostly for callers that build tables in code.
    pub fn from_offsets(
        offsets: impl IntoIterator<Item = (StandardFrequency, f64)>,
    ) -> Result<Self, AudiogramError> {
        let entries = offsets
            .into_iter()
            .map(|(freq, offset)| (freq, CalibrationEntry::Offset(offset)))
            .collect();
        let table = Self {
            entries,
            info: CalibrationInfo::default(),
        };
        table.check_required()?;
        Ok(table)
    }
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AudiogramError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|err| AudiogramError::CalibrationLoad {
            origin: origin.clone(),
            reason: err.to_string(),
        })?;
        let table = Self::from_json_str(&text).map_err(|err| err.in_origin(&origin))?;
        info!(
            "[Calibration] Loaded {} frequencies from {:?}",
            table.entries.len(),
            path
        );
        Ok(table)
    }
    pub fn from_json_str(text: &str) -> Result<Self, AudiogramError> {
        let root: Value = serde_json::from_str(text)
            .map_err(|err| load_error(format!("malformed JSON: {err}")))?;
        let Value::Object(map) = root else {
            return Err(load_error("top-level value is not an object"));
        };
        Self::from_map(&map)
    }
    fn from_map(map: &Map<String, Value>) -> Result<Self, AudiogramError> {
        let mut table = Self::default();
        for (key, value) in map {
            if table.read_info(key, value) {
                continue;
            }
            let Some(freq) = StandardFrequency::parse_key(key) else {
                debug!("[Calibration] Ignoring key {key:?}");
                continue;
            };
            let entry = parse_entry(value)
                .ok_or_else(|| load_error(format!("entry {key:?} is not a number or array of numbers")))?;
            if table.entries.insert(freq, entry).is_some() {
                return Err(load_error(format!("{freq} is defined more than once")));
            }
        }
        table.check_required()?;
        Ok(table)
    }
    fn read_info(&mut self, key: &str, value: &Value) -> bool {
        let slot = match key {
            "headphone" => &mut self.info.headphone,
            "author" => &mut self.info.author,
            "tanggal" | "date" => &mut self.info.date,
            "audio_unit" => &mut self.info.audio_unit,
            _ => return false,
        };
        *slot = Some(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        true
    }
    fn check_required(&self) -> Result<(), AudiogramError> {
        let missing: Vec<String> = REQUIRED_FREQUENCIES
            .iter()
            .filter(|f| !self.entries.contains_key(f))
            .map(|f| f.hz().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(load_error(format!(
                "missing required frequencies: {}",
                missing.join(", ")
            )))
        }
    }
    pub fn info(&self) -> &CalibrationInfo {
        &self.info
    }
    /// Converts a raw device amplitude into a calibrated level.
    pub fn level(&self, frequency: StandardFrequency, raw_ampl: f64) -> Result<f64, CalibrationMiss> {
        match self.entries.get(&frequency) {
            None => Err(CalibrationMiss::MissingFrequency(frequency)),
            Some(CalibrationEntry::Offset(offset)) => Ok(raw_ampl - offset),
            Some(CalibrationEntry::Lookup(steps)) => {
                if raw_ampl < 0.0 || raw_ampl.fract() != 0.0 {
                    return Err(CalibrationMiss::InvalidStep(raw_ampl));
                }
                let step = raw_ampl as usize;
                steps.get(step).copied().ok_or(CalibrationMiss::StepOutOfRange {
                    step,
                    len: steps.len(),
                })
            }
        }
    }
}
fn parse_entry(value: &Value) -> Option<CalibrationEntry> {
    match value {
        Value::Number(n) => n.as_f64().map(CalibrationEntry::Offset),
        Value::Array(items) => items
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<f64>>>()
            .map(CalibrationEntry::Lookup),
        _ => None,
    }
}
fn load_error(reason: impl Into<String>) -> AudiogramError {
    AudiogramError::CalibrationLoad {
        origin: MEMORY_ORIGIN.to_owned(),
        reason: reason.into(),
    }
}
