use std::fmt;
use serde::{Serialize, Serializer};
/// The seven audiometric test frequencies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardFrequency {
    F125,
    F250,
    F500,
    F1000,
    F2000,
    F4000,
    F8000,
}
impl StandardFrequency {
    pub const ALL: [StandardFrequency; 7] = [
        StandardFrequency::F125,
        StandardFrequency::F250,
        StandardFrequency::F500,
        StandardFrequency::F1000,
        StandardFrequency::F2000,
        StandardFrequency::F4000,
        StandardFrequency::F8000,
    ];
    pub fn hz(self) -> u32 {
        match self {
            StandardFrequency::F125 => 125,
            StandardFrequency::F250 => 250,
            StandardFrequency::F500 => 500,
            StandardFrequency::F1000 => 1000,
            StandardFrequency::F2000 => 2000,
            StandardFrequency::F4000 => 4000,
            StandardFrequency::F8000 => 8000,
        }
    }
    pub fn from_hz(hz: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.hz() == hz)
    }
    /// Accepts `250`, `"250"`, `"250Hz"`, `"250 hz"` and `"0.25kHz"`.
    pub fn parse_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        let (number, scale) = if let Some(n) = key.strip_suffix("khz") {
            (n, 1000.0)
        } else if let Some(n) = key.strip_suffix("hz") {
            (n, 1.0)
        } else {
            (key.as_str(), 1.0)
        };
        let value: f64 = number.trim().parse().ok()?;
        Self::from_hz_f64(value * scale)
    }
    pub fn from_hz_f64(hz: f64) -> Option<Self> {
        if !hz.is_finite() || hz.fract().abs() > 1e-9 || hz < 0.0 {
            return None;
        }
        Self::from_hz(hz.round() as u32)
    }
}
impl fmt::Display for StandardFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}
impl Serialize for StandardFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.hz())
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EarChannel {
    Left,
    Right,
}
impl EarChannel {
    pub const BOTH: [EarChannel; 2] = [EarChannel::Left, EarChannel::Right];
}
impl fmt::Display for EarChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EarChannel::Left => f.write_str("left"),
            EarChannel::Right => f.write_str("right"),
        }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LevelUnit {
    #[serde(rename = "dBA")]
    DbA,
    #[serde(rename = "dB HL")]
    DbHl,
}
impl LevelUnit {
    pub fn label(self) -> &'static str {
        match self {
            LevelUnit::DbA => "dBA",
            LevelUnit::DbHl => "dB HL",
        }
    }
}
impl fmt::Display for LevelUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Elbicare,
    Pychoacoustics,
}
impl SourceFormat {
    pub fn unit(self) -> LevelUnit {
        match self {
            SourceFormat::Elbicare => LevelUnit::DbA,
            SourceFormat::Pychoacoustics => LevelUnit::DbHl,
        }
    }
}
impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Elbicare => f.write_str("Elbicare"),
            SourceFormat::Pychoacoustics => f.write_str("Pychoacoustics"),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn keys_normalize_to_standard_frequencies() {
        assert_eq!(StandardFrequency::parse_key("250"), Some(StandardFrequency::F250));
        assert_eq!(StandardFrequency::parse_key("250Hz"), Some(StandardFrequency::F250));
        assert_eq!(StandardFrequency::parse_key(" 1000 Hz "), Some(StandardFrequency::F1000));
        assert_eq!(StandardFrequency::parse_key("0.5kHz"), Some(StandardFrequency::F500));
        assert_eq!(StandardFrequency::parse_key("8000.0"), Some(StandardFrequency::F8000));
        assert_eq!(StandardFrequency::parse_key("750"), None);
        assert_eq!(StandardFrequency::parse_key("headphone"), None);
        assert_eq!(StandardFrequency::parse_key("250.5"), None);
    }
    #[test]
    fn units_follow_source_format() {
        assert_eq!(SourceFormat::Elbicare.unit().label(), "dBA");
        assert_eq!(SourceFormat::Pychoacoustics.unit().label(), "dB HL");
    }
    #[test]
    fn frequency_serializes_as_hz() {
        let json = serde_json::to_string(&StandardFrequency::F4000).unwrap();
        assert_eq!(json, "4000");
    }
}
