//! Record id generation
//!
//! Ids combine the millisecond clock with a random sub-millisecond
//! perturbation (`millis * 1000 + rand(0..1000)`), then are forced strictly
//! increasing per generator. Values stay below 2^53 so browser clients
//! reading the document can represent them exactly.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Deserializer};

/// Identifier of a stored record
pub type RecordId = u64;

const PERTURBATION_RANGE: u64 = 1000;

/// Monotonic id source owned by a single manager
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: RecordId,
}

impl IdGenerator {
    /// Create a generator that only yields ids greater than `existing_max`
    pub fn after(existing_max: RecordId) -> Self {
        Self { last: existing_max }
    }

    /// Create a generator seeded past every id in `ids`
    pub fn seeded<I: IntoIterator<Item = RecordId>>(ids: I) -> Self {
        Self::after(ids.into_iter().max().unwrap_or(0))
    }

    /// Next id
    pub fn next_id(&mut self) -> RecordId {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let jitter = rand::thread_rng().gen_range(0..PERTURBATION_RANGE);
        let candidate = millis * PERTURBATION_RANGE + jitter;
        let id = candidate.max(self.last + 1);
        self.last = id;
        id
    }
}

/// Accept ids written as integers, fractional numbers or numeric strings.
///
/// Older documents stored `Date.now() + Math.random()`; fractional ids are
/// scaled by 1000 and rounded so distinct legacy ids stay distinct.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(u64),
        Float(f64),
        Text(String),
    }

    let invalid = |raw: &dyn std::fmt::Display| -> D::Error {
        <D::Error as serde::de::Error>::custom(format!("invalid record id: {}", raw))
    };
    match RawId::deserialize(deserializer)? {
        RawId::Int(v) => Ok(v),
        RawId::Float(v) => float_id(v).ok_or_else(|| invalid(&v)),
        RawId::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(float_id))
                .ok_or_else(|| invalid(&s))
        }
    }
}

fn float_id(v: f64) -> Option<RecordId> {
    if !v.is_finite() || v < 0.0 {
        return None;
    }
    if v.fract() == 0.0 {
        Some(v as u64)
    } else {
        Some((v * PERTURBATION_RANGE as f64).round() as u64)
    }
}
