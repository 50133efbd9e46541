//! Resolution profiling
//!
//! Sweeps a resolution range and reports where the best partition changes.

use super::common::NodeId;
use super::error::{AlgoError, AlgoResult};
use super::multiplex::Scored;

/// A resolution range over which one partition was found.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    pub low: f64,
    pub high: f64,
    /// Best score seen inside the range
    pub score: f64,
    pub communities: Vec<Vec<NodeId>>,
}

impl Interval {
    pub fn contains(&self, resolution: f64) -> bool {
        self.low <= resolution && resolution <= self.high
    }
}

/// Profile a scoring function over `[low, high]`.
///
/// The range is bisected until both ends of a piece yield the same partition or the piece is
/// no wider than `grain`; neighbouring pieces with equal partitions are then merged. With
/// `log` set the bisection (and `grain`) work on `ln(resolution)`.
///
/// Intervals come back ordered by resolution and cover the whole range.
pub fn profile<F>(
    mut score: F,
    log: bool,
    grain: f64,
    low: f64,
    high: f64,
) -> AlgoResult<Vec<Interval>>
where
    F: FnMut(f64) -> AlgoResult<Scored>,
{
    if !(low < high) || !(grain > 0.0) || (log && low <= 0.0) {
        return Err(AlgoError::InvalidRange { low, high });
    }

    let (to_scale, from_scale): (fn(f64) -> f64, fn(f64) -> f64) = if log {
        (f64::ln, f64::exp)
    } else {
        (|x| x, |x| x)
    };

    // Scored partitions keyed by the bits of the scaled resolution
    let mut cache: Vec<(u64, Scored)> = Vec::new();
    let mut eval = |x: f64| -> AlgoResult<Scored> {
        if let Some((_, hit)) = cache.iter().find(|(k, _)| *k == x.to_bits()) {
            return Ok(hit.clone());
        }
        let result = score(from_scale(x))?;
        cache.push((x.to_bits(), result.clone()));
        Ok(result)
    };

    let mut pieces: Vec<Interval> = Vec::new();
    let mut stack = vec![(to_scale(low), to_scale(high))];

    while let Some((lo, hi)) = stack.pop() {
        let (lo_score, lo_comm) = eval(lo)?;
        let (hi_score, hi_comm) = eval(hi)?;

        if lo_comm == hi_comm {
            pieces.push(Interval {
                low: lo,
                high: hi,
                score: lo_score.max(hi_score),
                communities: lo_comm,
            });
            continue;
        }

        let mid = (lo + hi) / 2.0;
        if hi - lo <= grain {
            pieces.push(Interval { low: lo, high: mid, score: lo_score, communities: lo_comm });
            pieces.push(Interval { low: mid, high: hi, score: hi_score, communities: hi_comm });
            continue;
        }

        // Left half first
        stack.push((mid, hi));
        stack.push((lo, mid));
    }

    let mut merged: Vec<Interval> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match merged.last_mut() {
            Some(last) if last.communities == piece.communities => {
                last.high = piece.high;
                last.score = last.score.max(piece.score);
            }
            _ => merged.push(piece),
        }
    }

    for interval in &mut merged {
        interval.low = from_scale(interval.low);
        interval.high = from_scale(interval.high);
    }
    // Undo rounding from the scale round trip at the outer bounds
    if let Some(first) = merged.first_mut() {
        first.low = low;
    }
    if let Some(last) = merged.last_mut() {
        last.high = high;
    }

    tracing::debug!(intervals = merged.len(), evaluations = cache.len(), "profiled resolution range");
    Ok(merged)
}
