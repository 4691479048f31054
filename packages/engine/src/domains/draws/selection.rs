//! Pure selection helpers shared by the draw engine and the daily pick
//! scheduler: prep-time buckets, seed derivation and stable indexing.

use chrono::NaiveDate;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::common::{EngineError, UserId};

/// Prep-time filter bucket. Each bucket covers the half-open minute range
/// above the previous one; 60 is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepTimeBucket {
    Min15,
    Min30,
    Min45,
    Min60,
}

impl PrepTimeBucket {
    pub fn from_minutes(minutes: i16) -> Result<Self, EngineError> {
        match minutes {
            15 => Ok(Self::Min15),
            30 => Ok(Self::Min30),
            45 => Ok(Self::Min45),
            60 => Ok(Self::Min60),
            other => Err(EngineError::Validation(format!(
                "prep time bucket must be one of 15, 30, 45, 60, got {}",
                other
            ))),
        }
    }

    pub fn as_minutes(self) -> i16 {
        match self {
            Self::Min15 => 15,
            Self::Min30 => 30,
            Self::Min45 => 45,
            Self::Min60 => 60,
        }
    }

    /// SQL-facing bounds: estimate must be > lower and, when bounded,
    /// <= upper.
    pub fn bounds(self) -> (i16, Option<i16>) {
        match self {
            Self::Min15 => (0, Some(15)),
            Self::Min30 => (15, Some(30)),
            Self::Min45 => (30, Some(45)),
            Self::Min60 => (45, None),
        }
    }

    pub fn contains(self, minutes: i16) -> bool {
        let (lower, upper) = self.bounds();
        minutes > lower && upper.map_or(true, |u| minutes <= u)
    }
}

/// Derive a u64 from an arbitrary seed string. Identical seed strings
/// always yield identical values across processes and runs.
pub fn seed_from_string(seed: &str) -> u64 {
    let digest = Sha256::digest(seed.as_bytes());
    u64::from_be_bytes(digest[..8].try_into().unwrap_or([0; 8]))
}

/// Canonical seed string for a user's daily pick. Concurrent first
/// requests for the same (user, date) derive the same seed and therefore
/// converge on the same selection without a lock.
pub fn daily_seed_string(user_id: UserId, date: NaiveDate) -> String {
    format!("daily:{}:{}", user_id, date)
}

/// Pick an index into a stably-ordered pool. With a seed the index is a
/// pure function of (seed, len); without one it is uniform random.
pub fn pick_index(len: usize, seed: Option<u64>) -> usize {
    debug_assert!(len > 0);
    match seed {
        Some(value) => (value % len as u64) as usize,
        None => rand::thread_rng().gen_range(0..len),
    }
}
