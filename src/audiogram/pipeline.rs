use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use log::info;
use crate::audiogram::calibration::CalibrationTable;
use crate::audiogram::error::AudiogramError;
use crate::audiogram::frequency::{EarChannel, SourceFormat};
use crate::audiogram::pta::compute_pta;
use crate::audiogram::report::AudiogramReport;
use crate::audiogram::source::{FileSource, MeasurementSource};
use crate::audiogram::{elbicare, pychoacoustics};
struct LoadedCalibration {
    table: CalibrationTable,
    modified: Option<SystemTime>,
}
/// Session-level entry point: turns measurement files into ready-to-plot reports.
///
/// The calibration table is read the first time an Elbicare file is loaded and
/// reused afterwards unless the file's modification time changes.
pub struct AudiogramPipeline {
    calibration_path: Option<PathBuf>,
    calibration: Option<LoadedCalibration>,
}
impl AudiogramPipeline {
    pub fn new(calibration_path: Option<PathBuf>) -> Self {
        Self {
            calibration_path,
            calibration: None,
        }
    }
    /// Pipeline with a table that was built or loaded elsewhere.
    pub fn with_calibration(table: CalibrationTable) -> Self {
        Self {
            calibration_path: None,
            calibration: Some(LoadedCalibration {
                table,
                modified: None,
            }),
        }
    }
    pub fn calibration(&mut self) -> Result<&CalibrationTable, AudiogramError> {
        if let Some(path) = self.calibration_path.clone() {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
            let stale = match &self.calibration {
                Some(loaded) => loaded.modified.is_none() || loaded.modified != modified,
                None => true,
            };
            if stale {
                let table = CalibrationTable::load(&path)?;
                self.calibration = Some(LoadedCalibration { table, modified });
            }
        }
        self.calibration
            .as_ref()
            .map(|loaded| &loaded.table)
            .ok_or_else(|| AudiogramError::CalibrationLoad {
                origin: "<unset>".to_owned(),
                reason: "no calibration resource configured".to_owned(),
            })
    }
    pub fn load<S: MeasurementSource>(
        &mut self,
        format: SourceFormat,
        source: &mut S,
    ) -> Result<AudiogramReport, AudiogramError> {
        let origin = source.origin();
        let (audiogram, calibration_info) = match format {
            SourceFormat::Elbicare => {
                let calibration = self.calibration()?;
                let bytes = source.read_bytes()?;
                let audiogram =
                    elbicare::parse(&bytes, calibration).map_err(|e| e.in_origin(&origin))?;
                (audiogram, Some(calibration.info().clone()))
            }
            SourceFormat::Pychoacoustics => {
                let bytes = source.read_bytes()?;
                let audiogram =
                    pychoacoustics::parse_bytes(&bytes).map_err(|e| e.in_origin(&origin))?;
                (audiogram, None)
            }
        };
        info!(
            "[Pipeline] {} {}: {} points",
            format,
            origin,
            audiogram.point_count()
        );
        Ok(AudiogramReport {
            file_name: origin,
            pta_left: compute_pta(&audiogram, EarChannel::Left),
            pta_right: compute_pta(&audiogram, EarChannel::Right),
            audiogram,
            calibration_info,
        })
    }
    pub fn load_file(
        &mut self,
        format: SourceFormat,
        path: impl AsRef<Path>,
    ) -> Result<AudiogramReport, AudiogramError> {
        let mut source = FileSource::new(path.as_ref());
        self.load(format, &mut source)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::audiogram::frequency::StandardFrequency;
    use crate::audiogram::source::MemorySource;
    #[test]
    fn pychoacoustics_does_not_need_calibration() {
        let mut pipeline = AudiogramPipeline::new(None);
        let mut source = MemorySource::new(
            "pyco.txt",
            "Ear: Left\nFrequency (Hz): 500\nturnpointMean = 23.5\n",
        );
        let report = pipeline
            .load(SourceFormat::Pychoacoustics, &mut source)
            .unwrap();
        assert_eq!(report.file_name, "pyco.txt");
        assert_eq!(
            report.audiogram.level(EarChannel::Left, StandardFrequency::F500),
            Some(10.0)
        );
        assert!(!report.pta_left.is_defined());
        assert!(report.calibration_info.is_none());
    }
    #[test]
    fn elbicare_without_calibration_fails_to_load() {
        let mut pipeline = AudiogramPipeline::new(None);
        let mut source = MemorySource::new("HT_1.TXT", r#"{"audiogram": {"ch_0": {}}}"#);
        let err = pipeline.load(SourceFormat::Elbicare, &mut source).unwrap_err();
        assert_eq!(err.kind(), "CalibrationLoadError");
    }
    #[test]
    fn one_table_serves_consecutive_elbicare_files() {
        let table = CalibrationTable::from_json_str(
            r#"{"headphone": "TDH-39", "250": 5, "500": 3, "1000": 2, "2000": 1, "4000": 0.5}"#,
        )
        .unwrap();
        let mut pipeline = AudiogramPipeline::with_calibration(table);
        for (name, ampl) in [("HT_1.TXT", 10.0), ("HT_2.TXT", 15.0)] {
            let json = format!(r#"{{"audiogram": {{"ch_0": {{"freq_0": {{"freq": 0.625, "ampl": {ampl}}}}}}}}}"#);
            let mut source = MemorySource::new(name, json);
            let report = pipeline.load(SourceFormat::Elbicare, &mut source).unwrap();
            assert_eq!(
                report.audiogram.level(EarChannel::Left, StandardFrequency::F250),
                Some(ampl - 5.0)
            );
            let info = report.calibration_info.unwrap();
            assert_eq!(info.headphone.as_deref(), Some("TDH-39"));
        }
    }
    #[test]
    fn parse_errors_carry_the_source_name() {
        let table = CalibrationTable::from_offsets(
            [250, 500, 1000, 2000, 4000]
                .into_iter()
                .filter_map(StandardFrequency::from_hz)
                .map(|f| (f, 0.0)),
        )
        .unwrap();
        let mut pipeline = AudiogramPipeline::with_calibration(table);
        let mut source = MemorySource::new("HT_2.TXT", "not json");
        let err = pipeline.load(SourceFormat::Elbicare, &mut source).unwrap_err();
        assert_eq!(err.kind(), "ParseError");
        assert!(err.to_string().contains("HT_2.TXT"));
    }
}
