use serde::Serialize;
use crate::audiogram::frequency::{EarChannel, StandardFrequency};
use crate::audiogram::model::NormalizedAudiogram;
pub const PTA_FREQUENCIES: [StandardFrequency; 4] = [
    StandardFrequency::F500,
    StandardFrequency::F1000,
    StandardFrequency::F2000,
    StandardFrequency::F4000,
];
/// Pure tone average for one ear. `value_db` is `None` when any of the four
/// averaged frequencies is missing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PtaResult {
    pub channel: EarChannel,
    pub value_db: Option<f64>,
}
impl PtaResult {
    pub fn is_defined(&self) -> bool {
        self.value_db.is_some()
    }
}
pub fn compute_pta(audiogram: &NormalizedAudiogram, channel: EarChannel) -> PtaResult {
    let levels: Option<Vec<f64>> = PTA_FREQUENCIES
        .iter()
        .map(|f| audiogram.level(channel, *f))
        .collect();
    PtaResult {
        channel,
        value_db: levels.map(|l| l.iter().sum::<f64>() / l.len() as f64),
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::audiogram::frequency::{LevelUnit, SourceFormat};
    use crate::audiogram::model::AudiogramPoint;
    fn audiogram(levels: &[(StandardFrequency, f64)]) -> NormalizedAudiogram {
        NormalizedAudiogram::new(
            SourceFormat::Pychoacoustics,
            levels
                .iter()
                .map(|(f, l)| (EarChannel::Left, AudiogramPoint::new(*f, *l, LevelUnit::DbHl))),
        )
        .unwrap()
    }
    #[test]
    fn averages_the_four_pta_frequencies() {
        let a = audiogram(&[
            (StandardFrequency::F250, 100.0),
            (StandardFrequency::F500, 10.0),
            (StandardFrequency::F1000, 20.0),
            (StandardFrequency::F2000, 30.0),
            (StandardFrequency::F4000, 40.0),
            (StandardFrequency::F8000, 100.0),
        ]);
        let pta = compute_pta(&a, EarChannel::Left);
        assert_eq!(pta.value_db, Some(25.0));
        assert!(!compute_pta(&a, EarChannel::Right).is_defined());
    }
    #[test]
    fn missing_frequency_is_undefined_not_zero() {
        let a = audiogram(&[
            (StandardFrequency::F500, 0.0),
            (StandardFrequency::F1000, 0.0),
            (StandardFrequency::F2000, 0.0),
        ]);
        assert_eq!(compute_pta(&a, EarChannel::Left).value_db, None);
        let b = audiogram(&[
            (StandardFrequency::F500, 0.0),
            (StandardFrequency::F1000, 0.0),
            (StandardFrequency::F2000, 0.0),
            (StandardFrequency::F4000, 0.0),
        ]);
        assert_eq!(compute_pta(&b, EarChannel::Left).value_db, Some(0.0));
    }
}
