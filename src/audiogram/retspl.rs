use crate::audiogram::frequency::StandardFrequency;
/// Reference equivalent threshold sound pressure levels (IEC 60318, supra-aural).
///
/// `dB HL = dB SPL - RETSPL`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RetsplTable;
impl RetsplTable {
    pub const fn new() -> Self {
        RetsplTable
    }
    pub fn offset(&self, frequency: StandardFrequency) -> f64 {
        match frequency {
            StandardFrequency::F125 => 45.0,
            StandardFrequency::F250 => 27.0,
            StandardFrequency::F500 => 13.5,
            StandardFrequency::F1000 => 7.5,
            StandardFrequency::F2000 => 9.0,
            StandardFrequency::F4000 => 12.0,
            StandardFrequency::F8000 => 15.5,
        }
    }
    pub fn spl_to_hl(&self, frequency: StandardFrequency, spl_db: f64) -> f64 {
        spl_db - self.offset(frequency)
    }
}
pub static RETSPL: RetsplTable = RetsplTable::new();
