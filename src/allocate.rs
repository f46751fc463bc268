//! Proportional allocation of the chunk budget across clusters.
//!
//! Each cluster gets a share of the total budget proportional to its share
//! of the chunks, rounded to whole chunks. Independent rounding leaves the
//! table summing to a little more or less than the budget, so a correction
//! pass walks the clusters in descending-percentage order and moves one
//! unit at a time until the sum is exact. Big clusters absorb the rounding
//! error: a ±1 matters least where the allocation is largest.
//!
//! ```text
//! budget = 7, shares = 45% / 35% / 20%
//!
//! raw      = [3.15, 2.45, 1.40]
//! rounded  = [3,    2,    1  ]      Σ = 6, diff = +1
//! corrected= [4,    2,    1  ]      Σ = 7  ← largest cluster takes the unit
//! ```
//!
//! ## What This Module Does NOT Do
//!
//! Allocations are not capped to cluster sizes; the selector caps when it
//! takes chunks. And pathological percentage inputs (far from summing to
//! 100) can drive a small cluster's correction below zero; that is left
//! visible rather than silently clamped, and pinned down in tests.

/// Distribute `budget` across clusters proportionally to their percentages.
///
/// `shares` pairs each cluster id with its percentage of total chunks, in
/// the iteration order the merger will later follow; the returned table
/// preserves that order. Rounding is half-away-from-zero, and the
/// correction is deterministic: descending percentage, ties broken by
/// ascending cluster id.
///
/// The returned allocations always sum to exactly `budget`.
///
/// ```rust
/// use abridge::allocate;
///
/// let table = allocate(&[(0, 45.0), (1, 35.0), (2, 20.0)], 7);
/// assert_eq!(table.iter().map(|&(_, n)| n).sum::<i64>(), 7);
/// ```
#[must_use]
pub fn allocate(shares: &[(usize, f64)], budget: usize) -> Vec<(usize, i64)> {
    if shares.is_empty() {
        return Vec::new();
    }

    let budget = budget as i64;
    let mut table: Vec<(usize, i64)> = shares
        .iter()
        .map(|&(id, pct)| (id, (pct / 100.0 * budget as f64).round() as i64))
        .collect();

    let allocated: i64 = table.iter().map(|&(_, n)| n).sum();
    let diff = budget - allocated;
    if diff == 0 {
        return table;
    }

    // Positions into `table`, largest percentage first, ids breaking ties.
    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        shares[b]
            .1
            .total_cmp(&shares[a].1)
            .then(shares[a].0.cmp(&shares[b].0))
    });

    let step = diff.signum();
    let mut remaining = diff.abs();
    for &pos in order.iter().cycle() {
        if remaining == 0 {
            break;
        }
        table[pos].1 += step;
        remaining -= 1;
    }

    table
}
