use serde::{Deserialize, Serialize};

/// One user's rating of one film: five mechanical sub-scores plus the
/// subjective "gut feeling" score. All values are integers in 1-10 (the
/// score formula also tolerates 0 from legacy data).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingVector {
    pub s1: u8,
    pub s2: u8,
    pub s3: u8,
    pub s4: u8,
    pub s5: u8,
    pub m: u8,
}

impl RatingVector {
    pub fn base_scores(&self) -> [u8; 5] {
        [self.s1, self.s2, self.s3, self.s4, self.s5]
    }
}

impl Default for RatingVector {
    fn default() -> Self {
        Self {
            s1: 5,
            s2: 5,
            s3: 5,
            s4: 5,
            s5: 5,
            m: 5,
        }
    }
}
