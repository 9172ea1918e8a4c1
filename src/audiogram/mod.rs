// src/audiogram/mod.rs
pub mod calibration;
pub mod elbicare;
pub mod error;
pub mod frequency;
pub mod model;
pub mod pipeline;
pub mod plot;
pub mod pta;
pub mod pychoacoustics;
pub mod report;
pub mod retspl;
pub mod source;
pub use calibration::{CalibrationInfo, CalibrationTable};
pub use error::AudiogramError;
pub use frequency::{EarChannel, LevelUnit, SourceFormat, StandardFrequency};
pub use model::{AudiogramPoint, NormalizedAudiogram, PlotAxes};
pub use pipeline::AudiogramPipeline;
pub use plot::{render_audiogram_png, PlotStyle};
pub use pta::{compute_pta, PtaResult};
pub use report::{render_summary, AudiogramReport};
pub use retspl::{RetsplTable, RETSPL};
pub use source::{FileSource, MeasurementSource, MemorySource};
