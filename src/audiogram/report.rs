use serde::Serialize;
use crate::audiogram::calibration::CalibrationInfo;
use crate::audiogram::frequency::{EarChannel, StandardFrequency};
use crate::audiogram::model::NormalizedAudiogram;
use crate::audiogram::pta::PtaResult;
/// Everything a plotting surface or text report needs for one loaded file.
#[derive(Clone, Debug, Serialize)]
pub struct AudiogramReport {
    pub file_name: String,
    pub audiogram: NormalizedAudiogram,
    pub pta_left: PtaResult,
    pub pta_right: PtaResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_info: Option<CalibrationInfo>,
}
impl AudiogramReport {
    pub fn pta(&self, channel: EarChannel) -> &PtaResult {
        match channel {
            EarChannel::Left => &self.pta_left,
            EarChannel::Right => &self.pta_right,
        }
    }
    /// `"12.3 dB HL"` or `"n/a"`, with the given number of decimals.
    pub fn pta_text(&self, channel: EarChannel, decimals: usize) -> String {
        match self.pta(channel).value_db {
            Some(v) => format!("{v:.decimals$} {}", self.audiogram.unit()),
            None => "n/a".to_owned(),
        }
    }
    pub fn title(&self) -> String {
        let heading = format!("{} Audiogram: {}", self.audiogram.source_format(), self.file_name);
        match &self.calibration_info {
            Some(info) if !info.is_empty() => format!("{heading}\n{}", info.describe()),
            Some(_) => heading,
            None => format!("{heading}\nConverted from dB SPL to dB HL using RETSPL (IEC 60318)"),
        }
    }
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
/// Plain-text table of both ears plus the PTA lines.
pub fn render_summary(report: &AudiogramReport) -> String {
    let audiogram = &report.audiogram;
    let rule = "=".repeat(60);
    let mut lines = vec![
        rule.clone(),
        format!(
            "{} AUDIOGRAM ({})",
            audiogram.source_format().to_string().to_uppercase(),
            audiogram.unit()
        ),
        rule.clone(),
        format!("{:<12} {:<15} {:<15}", "Freq (Hz)", "Left Ear", "Right Ear"),
        "-".repeat(60),
    ];
    lines.extend(audiogram.frequencies().into_iter().map(|freq| {
        format!(
            "{:<12} {} {}",
            freq.hz(),
            cell(audiogram, EarChannel::Left, freq),
            cell(audiogram, EarChannel::Right, freq)
        )
    }));
    lines.extend([
        rule.clone(),
        format!("PTA Left:  {}", report.pta_text(EarChannel::Left, 2)),
        format!("PTA Right: {}", report.pta_text(EarChannel::Right, 2)),
        rule,
    ]);
    lines.join("\n") + "\n"
}
fn cell(audiogram: &NormalizedAudiogram, channel: EarChannel, freq: StandardFrequency) -> String {
    match audiogram.level(channel, freq) {
        Some(level) => format!("{level:>10.2} {:<5}", audiogram.unit().label()),
        None => format!("{:>10} {:<5}", "-", ""),
    }
}
