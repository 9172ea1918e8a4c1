use std::fs;
use std::path::PathBuf;
use audiogram_plotter::audiogram::{
    render_audiogram_png, AudiogramPipeline, EarChannel, PlotStyle, SourceFormat,
    StandardFrequency,
};
use tempfile::TempDir;
const CALIBRATION: &str = r#"{
    "headphone": "TDH-39",
    "author": "audiology lab",
    "tanggal": "2024-05-01",
    "audio_unit": "dBA",
    "250Hz": 5.0, "500Hz": 3.0, "1000Hz": 2.0, "2000Hz": 1.0, "4000Hz": 0.5
}"#;
const ELBICARE: &str = r#"{"audiogram": {
    "ch_0": {
        "freq_0": {"freq": 0.625, "ampl": 10},
        "freq_1": {"freq": 1.25, "ampl": 8},
        "freq_2": {"freq": 2.5, "ampl": 6},
        "freq_3": {"freq": 5.0, "ampl": 4},
        "freq_4": {"freq": 10.0, "ampl": 2}
    },
    "ch_1": {
        "freq_0": {"freq": 0.625, "ampl": 20},
        "freq_1": {"freq": 1.25, "ampl": 23},
        "freq_2": {"freq": 2.5, "ampl": 22},
        "freq_3": {"freq": 5.0, "ampl": 21},
        "freq_4": {"freq": 10.0, "ampl": 20.5}
    }
}}"#;
fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}
#[test]
fn elbicare_file_to_report() {
    let dir = TempDir::new().unwrap();
    let calib = write(&dir, "calib.json", CALIBRATION);
    let data = write(&dir, "HT_0001.TXT", ELBICARE);
    let mut pipeline = AudiogramPipeline::new(Some(calib));
    let report = pipeline.load_file(SourceFormat::Elbicare, &data).unwrap();
    assert_eq!(report.file_name, "HT_0001.TXT");
    let expected = [(250, 5.0), (500, 5.0), (1000, 4.0), (2000, 3.0), (4000, 1.5)];
    for (hz, level) in expected {
        let freq = StandardFrequency::from_hz(hz).unwrap();
        let got = report.audiogram.level(EarChannel::Left, freq).unwrap();
        assert!((got - level).abs() < 1e-9);
    }
    assert_eq!(report.pta_left.value_db, Some((5.0 + 4.0 + 3.0 + 1.5) / 4.0));
    assert_eq!(report.pta_right.value_db, Some(20.0));
    let info = report.calibration_info.as_ref().unwrap();
    assert_eq!(info.headphone.as_deref(), Some("TDH-39"));
    assert!(report.title().contains("CALIBRATION: TDH-39 by audiology lab at 2024-05-01"));
    for channel in EarChannel::BOTH {
        for point in report.audiogram.points(channel) {
            assert!(StandardFrequency::ALL.contains(&point.frequency));
            assert_ne!(point.frequency, StandardFrequency::F125);
        }
    }
    let png = render_audiogram_png(&report, &PlotStyle::default()).unwrap();
    assert!(!png.is_empty());
}
#[test]
fn calibration_is_reloaded_when_the_file_changes() {
    let dir = TempDir::new().unwrap();
    let calib = write(&dir, "calib.json", CALIBRATION);
    let data = write(&dir, "HT_0002.TXT", ELBICARE);
    let mut pipeline = AudiogramPipeline::new(Some(calib.clone()));
    pipeline.load_file(SourceFormat::Elbicare, &data).unwrap();
    fs::write(&calib, "{\"250\": 1}").unwrap();
    // Force a distinct modification time on coarse-grained filesystems.
    let later = std::time::SystemTime::now() + std::time::Duration::from_secs(5);
    fs::File::options()
        .write(true)
        .open(&calib)
        .unwrap()
        .set_modified(later)
        .unwrap();
    let err = pipeline
        .load_file(SourceFormat::Elbicare, &data)
        .unwrap_err();
    assert_eq!(err.kind(), "CalibrationLoadError");
}
#[test]
fn missing_calibration_aborts_only_the_elbicare_path() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "HT_0003.TXT", ELBICARE);
    let pyco = write(
        &dir,
        "results.txt",
        "Ear: Left\nFrequency (Hz): 250\nturnpointMean = 39.17, s.d. = 3.01\n",
    );
    let mut pipeline = AudiogramPipeline::new(Some(dir.path().join("absent.json")));
    let err = pipeline.load_file(SourceFormat::Elbicare, &data).unwrap_err();
    assert_eq!(err.kind(), "CalibrationLoadError");
    let report = pipeline.load_file(SourceFormat::Pychoacoustics, &pyco).unwrap();
    let level = report
        .audiogram
        .level(EarChannel::Left, StandardFrequency::F250)
        .unwrap();
    assert!((level - 12.17).abs() < 1e-9);
}
#[test]
fn pychoacoustics_file_with_three_frequencies() {
    let dir = TempDir::new().unwrap();
    let mut text = String::from("Experiment: audiogram\n");
    for (hz, spl) in [(125, 50.0), (500, 20.25), (8000, 30.0)] {
        text.push_str("*******************************************************\n");
        text.push_str(&format!(
            "Ear: Right\nFrequency (Hz): {hz}\nturnpointMean = {spl}, s.d. = 1.5\n\n"
        ));
    }
    let path = write(&dir, "pyco.txt", &text);
    let report = AudiogramPipeline::new(None)
        .load_file(SourceFormat::Pychoacoustics, &path)
        .unwrap();
    let right = report.audiogram.points(EarChannel::Right);
    assert_eq!(right.len(), 3);
    assert!((right[0].level_db - 5.0).abs() < 1e-9);
    assert!((right[1].level_db - 6.75).abs() < 1e-9);
    assert!((right[2].level_db - 14.5).abs() < 1e-9);
    assert!(report.audiogram.points(EarChannel::Left).is_empty());
    assert_eq!(report.pta_right.value_db, None);
    assert_eq!(report.audiogram.unit().label(), "dB HL");
}
#[test]
fn unreadable_measurement_file_is_reported() {
    let err = AudiogramPipeline::new(None)
        .load_file(SourceFormat::Pychoacoustics, "/definitely/not/here.txt")
        .unwrap_err();
    assert_eq!(err.kind(), "IoError");
}
#[test]
fn malformed_elbicare_never_yields_an_audiogram() {
    let dir = TempDir::new().unwrap();
    let calib = write(&dir, "calib.json", CALIBRATION);
    let data = write(&dir, "HT_0004.TXT", "{\"audiogram\": {\"ch_0\": ");
    let err = AudiogramPipeline::new(Some(calib))
        .load_file(SourceFormat::Elbicare, &data)
        .unwrap_err();
    assert_eq!(err.kind(), "ParseError");
    assert!(err.to_string().contains("HT_0004.TXT"));
}
