use std::collections::BTreeMap;
use serde::Serialize;
use crate::audiogram::error::AudiogramError;
use crate::audiogram::frequency::{EarChannel, LevelUnit, SourceFormat, StandardFrequency};
/// A single threshold on the chart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AudiogramPoint {
    pub frequency: StandardFrequency,
    pub level_db: f64,
    pub unit: LevelUnit,
}
impl AudiogramPoint {
    pub fn new(frequency: StandardFrequency, level_db: f64, unit: LevelUnit) -> Self {
        Self {
            frequency,
            level_db,
            unit,
        }
    }
}
/// Fixed chart geometry every plotting surface has to honour.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlotAxes {
    pub x_min_hz: f64,
    pub x_max_hz: f64,
    pub x_log_scale: bool,
    pub x_ticks_hz: [u32; 7],
    /// Value drawn at the top of the chart.
    pub y_top_db: f64,
    /// Value drawn at the bottom of the chart.
    pub y_bottom_db: f64,
    pub y_tick_step_db: f64,
    pub y_label: &'static str,
}
impl PlotAxes {
    pub fn for_format(format: SourceFormat) -> Self {
        let y_label = match format.unit() {
            LevelUnit::DbA => "Sound Level (dBA)",
            LevelUnit::DbHl => "Hearing Level (dB HL)",
        };
        Self {
            x_min_hz: 125.0,
            x_max_hz: 8000.0,
            x_log_scale: true,
            x_ticks_hz: StandardFrequency::ALL.map(StandardFrequency::hz),
            y_top_db: -20.0,
            y_bottom_db: 160.0,
            y_tick_step_db: 10.0,
            y_label,
        }
    }
    /// Whether a level lies inside the drawable range.
    pub fn contains_level(&self, level_db: f64) -> bool {
        (self.y_top_db..=self.y_bottom_db).contains(&level_db)
    }
    pub fn y_ticks(&self) -> Vec<f64> {
        let steps = ((self.y_bottom_db - self.y_top_db) / self.y_tick_step_db).round() as usize;
        (0..=steps)
            .map(|i| self.y_top_db + i as f64 * self.y_tick_step_db)
            .collect()
    }
}
/// Parser output shared by both measurement formats.
///
/// Points are kept sorted by frequency. Construction validates the whole
/// point set, so an instance is either complete or never exists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedAudiogram {
    source_format: SourceFormat,
    channels: BTreeMap<EarChannel, Vec<AudiogramPoint>>,
}
impl NormalizedAudiogram {
    pub fn new(
        source_format: SourceFormat,
        points: impl IntoIterator<Item = (EarChannel, AudiogramPoint)>,
    ) -> Result<Self, AudiogramError> {
        let mut channels: BTreeMap<EarChannel, Vec<AudiogramPoint>> = BTreeMap::new();
        for (channel, point) in points {
            validate_point(source_format, &point)?;
            let list = channels.entry(channel).or_default();
            if list.iter().any(|p| p.frequency == point.frequency) {
                return Err(AudiogramError::DuplicatePoint {
                    channel,
                    frequency: point.frequency,
                });
            }
            list.push(point);
        }
        for list in channels.values_mut() {
            list.sort_by_key(|p| p.frequency);
        }
        Ok(Self {
            source_format,
            channels,
        })
    }
    pub fn source_format(&self) -> SourceFormat {
        self.source_format
    }
    pub fn unit(&self) -> LevelUnit {
        self.source_format.unit()
    }
    pub fn axes(&self) -> PlotAxes {
        PlotAxes::for_format(self.source_format)
    }
    pub fn points(&self, channel: EarChannel) -> &[AudiogramPoint] {
        self.channels
            .get(&channel)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
    pub fn level(&self, channel: EarChannel, frequency: StandardFrequency) -> Option<f64> {
        self.points(channel)
            .iter()
            .find(|p| p.frequency == frequency)
            .map(|p| p.level_db)
    }
    /// Frequencies populated in at least one ear, ascending.
    pub fn frequencies(&self) -> Vec<StandardFrequency> {
        StandardFrequency::ALL
            .into_iter()
            .filter(|f| {
                EarChannel::BOTH
                    .iter()
                    .any(|ch| self.level(*ch, *f).is_some())
            })
            .collect()
    }
    pub fn point_count(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}
fn validate_point(format: SourceFormat, point: &AudiogramPoint) -> Result<(), AudiogramError> {
    if format == SourceFormat::Elbicare && point.frequency == StandardFrequency::F125 {
        return Err(AudiogramError::UnsupportedFrequency {
            format,
            frequency: point.frequency,
        });
    }
    if point.unit != format.unit() || !point.level_db.is_finite() {
        return Err(AudiogramError::parse(
            format!("finite level in {}", format.unit()),
            format!("{} {} at {}", point.level_db, point.unit, point.frequency),
        ));
    }
    Ok(())
}
