//! Plain-text result files written by pychoacoustics.
//!
//! Each block of interest carries three lines:
//!
//! ```text
//! Ear: Right
//! Frequency (Hz): 250
//! turnpointMean = 39.17, s.d. = 3.01
//! ```
//!
//! Blocks are separated by lines of asterisks and surrounded by unrelated
//! parameter lines, which are ignored. A file is accepted as soon as one block
//! completes; a scan without any completed block is a parse error.
use log::{debug, warn};
use serde::Serialize;
use crate::audiogram::error::AudiogramError;
use crate::audiogram::frequency::{EarChannel, SourceFormat, StandardFrequency};
use crate::audiogram::model::{AudiogramPoint, NormalizedAudiogram};
use crate::audiogram::retspl::RETSPL;
/// One completed block, still in dB SPL.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ThresholdRecord {
    pub channel: EarChannel,
    pub frequency_hz: u32,
    pub turnpoint_mean: f64,
    pub sd: Option<f64>,
    pub line: usize,
}
#[derive(Clone, Copy, Debug, PartialEq)]
enum Line {
    Separator,
    Ear(EarChannel),
    Frequency(u32),
    Turnpoint { mean: f64, sd: Option<f64> },
    Other,
}
fn classify(line: &str) -> Line {
    let line = line.trim();
    if line.len() >= 3 && line.chars().all(|c| c == '*') {
        return Line::Separator;
    }
    if let Some(rest) = line.strip_prefix("Ear:") {
        return match rest.trim() {
            "Left" => Line::Ear(EarChannel::Left),
            "Right" => Line::Ear(EarChannel::Right),
            _ => Line::Other,
        };
    }
    if let Some(rest) = line.strip_prefix("Frequency (Hz):") {
        return rest.trim().parse().map(Line::Frequency).unwrap_or(Line::Other);
    }
    if let Some(rest) = line.strip_prefix("turnpointMean") {
        return parse_turnpoint(rest).unwrap_or(Line::Other);
    }
    Line::Other
}
fn parse_turnpoint(rest: &str) -> Option<Line> {
    let mut fields = rest.trim_start().strip_prefix('=')?.split(',');
    let mean: f64 = fields.next()?.trim().parse().ok()?;
    let sd = fields.next().and_then(|field| {
        let value = field.trim().strip_prefix("s.d.")?.trim_start().strip_prefix('=')?;
        value.trim().parse().ok()
    });
    mean.is_finite().then_some(Line::Turnpoint { mean, sd })
}
/// Scanner state; a block completes on the turnpoint line.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ScanState {
    AwaitEar { frequency: Option<u32> },
    AwaitFrequency { ear: EarChannel },
    AwaitTurnpoint { ear: EarChannel, frequency: u32 },
}
impl ScanState {
    const START: ScanState = ScanState::AwaitEar { frequency: None };
}
#[derive(Debug, Default)]
struct ScanStats {
    ignored: usize,
    abandoned: usize,
}
/// Extracts every completed block in file order.
pub fn scan_records(text: &str) -> Result<Vec<ThresholdRecord>, AudiogramError> {
    let mut state = ScanState::START;
    let mut records = Vec::new();
    let mut stats = ScanStats::default();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        state = match (state, classify(raw)) {
            (_, Line::Separator) => {
                if state != ScanState::START {
                    debug!("[Pychoacoustics] Line {line_no}: block ended before turnpoint");
                    stats.abandoned += 1;
                }
                ScanState::START
            }
            (ScanState::AwaitEar { frequency: None }, Line::Ear(ear)) => {
                ScanState::AwaitFrequency { ear }
            }
            (ScanState::AwaitEar { frequency: Some(frequency) }, Line::Ear(ear)) => {
                ScanState::AwaitTurnpoint { ear, frequency }
            }
            (ScanState::AwaitEar { .. }, Line::Frequency(frequency)) => ScanState::AwaitEar {
                frequency: Some(frequency),
            },
            (ScanState::AwaitFrequency { ear }, Line::Frequency(frequency)) => {
                ScanState::AwaitTurnpoint { ear, frequency }
            }
            (ScanState::AwaitFrequency { .. } | ScanState::AwaitTurnpoint { .. }, Line::Ear(ear)) => {
                warn!("[Pychoacoustics] Line {line_no}: new Ear line before turnpoint, previous block dropped");
                stats.abandoned += 1;
                ScanState::AwaitFrequency { ear }
            }
            (ScanState::AwaitTurnpoint { ear, .. }, Line::Frequency(frequency)) => {
                warn!("[Pychoacoustics] Line {line_no}: frequency repeated before turnpoint, using {frequency} Hz");
                ScanState::AwaitTurnpoint { ear, frequency }
            }
            (ScanState::AwaitTurnpoint { ear, frequency }, Line::Turnpoint { mean, sd }) => {
                records.push(ThresholdRecord {
                    channel: ear,
                    frequency_hz: frequency,
                    turnpoint_mean: mean,
                    sd,
                    line: line_no,
                });
                ScanState::START
            }
            (current, Line::Turnpoint { .. }) => {
                warn!("[Pychoacoustics] Line {line_no}: turnpoint without ear and frequency, skipped");
                stats.ignored += 1;
                current
            }
            (current, Line::Other) => {
                stats.ignored += 1;
                current
            }
        };
    }
    if state != ScanState::START {
        stats.abandoned += 1;
    }
    if stats.abandoned > 0 {
        warn!("[Pychoacoustics] Dropped {} incomplete blocks", stats.abandoned);
    }
    if records.is_empty() {
        return Err(AudiogramError::parse(
            "at least one Ear / Frequency (Hz) / turnpointMean block",
            format!(
                "no complete block in {} lines ({} incomplete)",
                text.lines().count(),
                stats.abandoned
            ),
        ));
    }
    debug!(
        "[Pychoacoustics] {} blocks, {} unrelated lines",
        records.len(),
        stats.ignored
    );
    Ok(records)
}
/// Parses a result file and converts thresholds from dB SPL to dB HL.
pub fn parse(text: &str) -> Result<NormalizedAudiogram, AudiogramError> {
    let records = scan_records(text)?;
    let points = records.iter().filter_map(|record| {
        let Some(frequency) = StandardFrequency::from_hz(record.frequency_hz) else {
            warn!(
                "[Pychoacoustics] Line {}: {} Hz has no RETSPL entry, skipped",
                record.line, record.frequency_hz
            );
            return None;
        };
        let level = RETSPL.spl_to_hl(frequency, record.turnpoint_mean);
        Some((
            record.channel,
            AudiogramPoint::new(frequency, level, SourceFormat::Pychoacoustics.unit()),
        ))
    });
    NormalizedAudiogram::new(SourceFormat::Pychoacoustics, points)
}
/// Same as [`parse`] for raw bytes; invalid UTF-8 is replaced, not rejected.
pub fn parse_bytes(bytes: &[u8]) -> Result<NormalizedAudiogram, AudiogramError> {
    parse(&String::from_utf8_lossy(bytes))
}
