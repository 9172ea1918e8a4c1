//! Elbicare `HT_*.TXT` exports.
//!
//! The device writes JSON despite the extension:
//! `{"audiogram": {"ch_0": {"freq_0": {"freq": 0.625, "ampl": 12}, ...}, "ch_1": {...}}}`.
//! `freq` is a device label, not a frequency in kHz; [`DEVICE_LABELS`] maps it
//! onto the standard test frequency the device actually played.
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use crate::audiogram::calibration::CalibrationTable;
use crate::audiogram::error::AudiogramError;
use crate::audiogram::frequency::{EarChannel, SourceFormat, StandardFrequency};
use crate::audiogram::model::{AudiogramPoint, NormalizedAudiogram};
/// Device label to standard frequency. There is no label for 125 Hz.
pub const DEVICE_LABELS: [(f64, StandardFrequency); 6] = [
    (0.625, StandardFrequency::F250),
    (1.25, StandardFrequency::F500),
    (2.5, StandardFrequency::F1000),
    (5.0, StandardFrequency::F2000),
    (10.0, StandardFrequency::F4000),
    (20.0, StandardFrequency::F8000),
];
const LABEL_TOLERANCE: f64 = 1e-6;
pub fn label_to_frequency(label: f64) -> Option<StandardFrequency> {
    DEVICE_LABELS
        .iter()
        .find(|(l, _)| (l - label).abs() < LABEL_TOLERANCE)
        .map(|(_, f)| *f)
}
fn channel_for_key(key: &str) -> Option<EarChannel> {
    match key {
        "ch_0" => Some(EarChannel::Left),
        "ch_1" => Some(EarChannel::Right),
        _ => None,
    }
}
#[derive(Deserialize)]
struct RawEntry {
    freq: Value,
    ampl: Value,
}
/// One structurally valid entry, before label mapping and calibration.
#[derive(Clone, Debug, PartialEq)]
pub struct ElbicareReading {
    pub channel: EarChannel,
    pub key: String,
    pub label: Option<f64>,
    pub ampl: Option<f64>,
}
/// Validates the document structure and returns every entry in it.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<ElbicareReading>, AudiogramError> {
    let root: Value = serde_json::from_slice(bytes)
        .map_err(|err| AudiogramError::parse("JSON document", format!("invalid JSON ({err})")))?;
    let root = match root {
        Value::Object(map) => map,
        other => return Err(AudiogramError::parse("JSON object", describe(&other))),
    };
    let audiogram = match root.get("audiogram") {
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(AudiogramError::parse(
                "object under \"audiogram\"",
                describe(other),
            ))
        }
        None => {
            return Err(AudiogramError::parse(
                "top-level key \"audiogram\"",
                format!("keys [{}]", keys(&root)),
            ))
        }
    };
    let mut readings = Vec::new();
    let mut channels_seen = 0;
    for (key, value) in audiogram {
        let Some(channel) = channel_for_key(key) else {
            warn!("[Elbicare] Ignoring unknown channel {key:?}");
            continue;
        };
        channels_seen += 1;
        let Value::Object(entries) = value else {
            return Err(AudiogramError::parse(
                format!("object for channel {key:?}"),
                describe(value),
            ));
        };
        for (entry_key, entry) in entries {
            let raw: RawEntry = serde_json::from_value(entry.clone()).map_err(|err| {
                AudiogramError::parse(
                    format!("{{\"freq\", \"ampl\"}} object at {key}.{entry_key}"),
                    err.to_string(),
                )
            })?;
            readings.push(ElbicareReading {
                channel,
                key: entry_key.clone(),
                label: as_number(&raw.freq),
                ampl: as_number(&raw.ampl),
            });
        }
    }
    if channels_seen == 0 {
        return Err(AudiogramError::parse(
            "channel \"ch_0\" or \"ch_1\"",
            format!("keys [{}]", keys(audiogram)),
        ));
    }
    Ok(readings)
}
/// Parses an export and converts raw amplitudes to dBA.
///
/// Entries that cannot be placed on the chart are skipped with a warning;
/// structural problems fail the whole file.
pub fn parse(bytes: &[u8], calibration: &CalibrationTable) -> Result<NormalizedAudiogram, AudiogramError> {
    let readings = read_entries(bytes)?;
    let total = readings.len();
    let points: Vec<(EarChannel, AudiogramPoint)> = readings
        .into_iter()
        .filter_map(|reading| convert(&reading, calibration).map(|p| (reading.channel, p)))
        .collect();
    if points.len() < total {
        warn!("[Elbicare] Skipped {} of {} entries", total - points.len(), total);
    }
    debug!("[Elbicare] Parsed {} points", points.len());
    NormalizedAudiogram::new(SourceFormat::Elbicare, points)
}
fn convert(reading: &ElbicareReading, calibration: &CalibrationTable) -> Option<AudiogramPoint> {
    let ctx = format!("{} {}", reading.channel, reading.key);
    let Some(label) = reading.label else {
        warn!("[Elbicare] {ctx}: non-numeric freq label, skipped");
        return None;
    };
    let Some(frequency) = label_to_frequency(label) else {
        warn!("[Elbicare] {ctx}: label {label} has no standard frequency, skipped");
        return None;
    };
    let ampl = match reading.ampl {
        Some(a) if a.is_finite() => a,
        _ => {
            warn!("[Elbicare] {ctx}: non-numeric ampl, skipped");
            return None;
        }
    };
    match calibration.level(frequency, ampl) {
        Ok(level) if level.is_finite() => {
            Some(AudiogramPoint::new(frequency, level, SourceFormat::Elbicare.unit()))
        }
        Ok(level) => {
            warn!("[Elbicare] {ctx}: calibrated level {level} is not finite, skipped");
            None
        }
        Err(miss) => {
            warn!("[Elbicare] {ctx}: {miss}, skipped");
            None
        }
    }
}
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
fn keys(map: &Map<String, Value>) -> String {
    map.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "boolean".into(),
        Value::Number(_) => "number".into(),
        Value::String(_) => "string".into(),
        Value::Array(_) => "array".into(),
        Value::Object(_) => "object".into(),
    }
}
