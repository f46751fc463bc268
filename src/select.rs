//! Representative selection: pick the chunks that typify each cluster.
//!
//! ## Typical, Not Central
//!
//! The obvious pick (the chunks nearest the centroid) biases toward the
//! cluster's densest core and can return near-duplicates. Instead we rank
//! by *typicality*: compute every member's distance to the centroid, take
//! the mean of those distances, and prefer the chunks whose distance is
//! closest to that mean.
//!
//! ```text
//! distances to centroid:  [0.1, 0.9, 1.0, 1.1, 2.4]
//! mean distance:           1.1
//! deviation from mean:    [1.0, 0.2, 0.1, 0.0, 1.3]
//! rank:                    4th  3rd  2nd  1st  5th
//! ```
//!
//! The near-centroid chunk (0.1) and the outlier (2.4) both rank last; the
//! chunks sitting where most of the cluster sits rank first.
//!
//! Ranking is a stable sort, so equal deviations keep document order.

use crate::embed::euclidean;
use crate::Chunk;

/// Representative chunks chosen for one cluster.
#[derive(Debug, Clone)]
pub struct Selection {
    /// The cluster these chunks stand in for.
    pub cluster: usize,
    /// Selected chunks, most typical first.
    pub chunks: Vec<Chunk>,
}

/// Select each cluster's most typical chunks, up to its allocation.
///
/// Takes the shared per-run chunk embeddings, the per-chunk cluster labels,
/// the centroid table (fitted means, or theme embeddings in theme mode),
/// and the allocation table. Returns one [`Selection`] per allocation entry,
/// in allocation-table order. Each selection holds at most
/// `min(allocation, cluster size)` chunks; negative allocations select
/// nothing.
#[must_use]
pub fn select_representatives(
    chunks: &[Chunk],
    embeddings: &[Vec<f32>],
    labels: &[usize],
    centroids: &[Vec<f32>],
    allocation: &[(usize, i64)],
) -> Vec<Selection> {
    allocation
        .iter()
        .map(|&(cluster, allocated)| {
            // Member chunks with their centroid distances, document order.
            let members: Vec<(usize, f32)> = labels
                .iter()
                .enumerate()
                .filter(|&(_, &label)| label == cluster)
                .map(|(idx, _)| (idx, euclidean(&embeddings[idx], &centroids[cluster])))
                .collect();

            let take = allocated.max(0) as usize;
            if members.is_empty() || take == 0 {
                return Selection {
                    cluster,
                    chunks: Vec::new(),
                };
            }

            let mean: f32 =
                members.iter().map(|&(_, d)| d).sum::<f32>() / members.len() as f32;

            let mut ranked = members;
            ranked.sort_by(|a, b| (a.1 - mean).abs().total_cmp(&(b.1 - mean).abs()));

            let selected = ranked
                .iter()
                .take(take.min(ranked.len()))
                .map(|&(idx, _)| chunks[idx].clone())
                .collect();

            Selection {
                cluster,
                chunks: selected,
            }
        })
        .collect()
}
