//! Theme clustering: group chunks by what they are about.
//!
//! Three modes, one output shape:
//!
//! - **Predefined themes**: the caller names the themes; each chunk goes to
//!   the theme whose embedding it is most cosine-similar to. No model-order
//!   search, no centroids to fit; the theme embeddings themselves serve as
//!   cluster centers.
//! - **Automatic k**: run seeded k-means for every candidate count in the
//!   closed interval `[2, min(9, chunks − 1)]`, score each partition with
//!   the mean silhouette coefficient, keep the best (ties go to the lower
//!   k), and re-fit once at the winner.
//! - **Explicit k**: seeded k-means at the given count.
//!
//! ## Silhouette Scoring
//!
//! For a point with mean intra-cluster distance `a` and mean distance `b`
//! to the nearest other cluster:
//!
//! ```text
//! s = (b − a) / max(a, b)      ∈ [−1, 1]
//! ```
//!
//! High mean silhouette means tight, well-separated clusters. It is the
//! model-order criterion here because it needs no ground truth.
//!
//! ## Determinism
//!
//! K-means is seeded: the first center of each restart draws from a
//! fixed-seed RNG, the remaining centers follow deterministic
//! farthest-point seeding, restarts derive their seeds from the master
//! seed, and ties are broken first-encountered. Identical input always
//! produces identical labels. The whole reduction must be reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::embed::{cosine, euclidean};
use crate::{Error, Result};

/// Fixed master seed for reproducible clustering.
pub const DEFAULT_SEED: u64 = 42;

/// Upper bound of the automatic cluster-count search.
const AUTO_K_CEILING: usize = 9;

/// One cluster's share of the partition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterInfo {
    /// Cluster id; indexes into [`Partition::centroids`].
    pub id: usize,
    /// Theme name, when clustering against predefined themes.
    pub theme: Option<String>,
    /// Number of member chunks.
    pub count: usize,
    /// Share of total chunks, in percent, rounded to 2 decimal places.
    pub percentage: f64,
}

/// A chunk partition: per-chunk labels plus per-cluster shares and centers.
///
/// `clusters` lists only non-empty clusters (ascending id): an unused
/// predefined theme simply does not appear, and gets no allocation
/// downstream. `centroids` is indexed by cluster id and covers every id:
/// fitted means in the k-means modes, the theme embeddings in theme mode.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition {
    /// Cluster id assigned to each chunk, in chunk order.
    pub labels: Vec<usize>,
    /// Non-empty clusters, ascending by id.
    pub clusters: Vec<ClusterInfo>,
    /// Cluster centers, indexed by cluster id.
    pub centroids: Vec<Vec<f32>>,
}

impl Partition {
    /// The number of cluster ids (including empty theme clusters).
    #[must_use]
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Human-readable label for a cluster: its theme name, or `Cluster N`.
    #[must_use]
    pub fn display_label(&self, id: usize) -> String {
        self.clusters
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.theme.clone())
            .unwrap_or_else(|| format!("Cluster {id}"))
    }

    fn from_labels(
        labels: Vec<usize>,
        centroids: Vec<Vec<f32>>,
        themes: Option<&[String]>,
    ) -> Self {
        let k = centroids.len();
        let total = labels.len();
        let mut counts = vec![0usize; k];
        for &label in &labels {
            counts[label] += 1;
        }

        let clusters = (0..k)
            .filter(|&id| counts[id] > 0)
            .map(|id| ClusterInfo {
                id,
                theme: themes.map(|names| names[id].clone()),
                count: counts[id],
                percentage: round2(counts[id] as f64 / total as f64 * 100.0),
            })
            .collect();

        Self {
            labels,
            clusters,
            centroids,
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Seeded k-means clusterer with automatic model-order search.
///
/// ## Example
///
/// ```rust
/// use abridge::Clusterer;
///
/// let data = vec![
///     vec![0.0, 0.0],
///     vec![0.1, 0.0],
///     vec![10.0, 10.0],
///     vec![10.1, 10.0],
/// ];
///
/// let partition = Clusterer::new().fit(&data, Some(2)).unwrap();
/// assert_eq!(partition.labels[0], partition.labels[1]);
/// assert_ne!(partition.labels[0], partition.labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct Clusterer {
    seed: u64,
    restarts: usize,
    max_iters: usize,
}

impl Clusterer {
    /// Create a clusterer with the default seed and search settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seed: DEFAULT_SEED,
            restarts: 10,
            max_iters: 100,
        }
    }

    /// Override the master seed. Same seed + same input = same labels.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cluster chunk embeddings with k-means.
    ///
    /// With `k = None`, searches `[2, min(9, points − 1)]` by silhouette
    /// score and re-fits at the winning count.
    ///
    /// # Errors
    ///
    /// [`Error::NoChunks`] for empty input, [`Error::DimensionMismatch`]
    /// for ragged embeddings, [`Error::InvalidClusterCount`] when `k` (or
    /// the search lower bound) is infeasible for the point count.
    pub fn fit(&self, embeddings: &[Vec<f32>], k: Option<usize>) -> Result<Partition> {
        check_dims(embeddings)?;
        let n = embeddings.len();

        let k = match k {
            Some(k) => {
                if k == 0 || k > n {
                    return Err(Error::InvalidClusterCount { k, points: n });
                }
                k
            }
            None => self.auto_k(embeddings)?,
        };

        let (labels, centroids) = self.kmeans(embeddings, k);
        tracing::debug!(k, points = n, "fitted k-means partition");
        Ok(Partition::from_labels(labels, centroids, None))
    }

    /// Assign each chunk to the most cosine-similar predefined theme.
    ///
    /// Ties break toward the first theme. The returned partition's
    /// centroids are the theme embeddings themselves, so downstream
    /// centrality ranking works the same as in the k-means modes.
    ///
    /// # Errors
    ///
    /// [`Error::NoChunks`] for empty input, [`Error::InvalidClusterCount`]
    /// for an empty theme list, [`Error::DimensionMismatch`] for ragged
    /// embeddings.
    pub fn assign_themes(
        &self,
        embeddings: &[Vec<f32>],
        themes: &[String],
        theme_embeddings: &[Vec<f32>],
    ) -> Result<Partition> {
        check_dims(embeddings)?;
        check_dims(theme_embeddings)?;
        if themes.is_empty() || theme_embeddings.len() != themes.len() {
            return Err(Error::InvalidClusterCount {
                k: themes.len(),
                points: embeddings.len(),
            });
        }

        let labels = embeddings
            .iter()
            .map(|emb| {
                let mut best = 0;
                let mut best_sim = f32::NEG_INFINITY;
                for (idx, theme_emb) in theme_embeddings.iter().enumerate() {
                    let sim = cosine(emb, theme_emb);
                    if sim > best_sim {
                        best = idx;
                        best_sim = sim;
                    }
                }
                best
            })
            .collect();

        Ok(Partition::from_labels(
            labels,
            theme_embeddings.to_vec(),
            Some(themes),
        ))
    }

    /// Search the closed interval `[2, min(9, n − 1)]` for the best k.
    fn auto_k(&self, embeddings: &[Vec<f32>]) -> Result<usize> {
        let n = embeddings.len();
        let upper = AUTO_K_CEILING.min(n.saturating_sub(1));
        if upper < 2 {
            return Err(Error::InvalidClusterCount { k: 2, points: n });
        }

        let mut best_k = 2;
        let mut best_score = f32::NEG_INFINITY;
        for k in 2..=upper {
            let (labels, _) = self.kmeans(embeddings, k);
            let score = silhouette_score(embeddings, &labels, k);
            if score > best_score {
                best_k = k;
                best_score = score;
            }
        }

        tracing::debug!(best_k, best_score, "silhouette search complete");
        Ok(best_k)
    }

    /// Best-of-restarts k-means. Restart seeds derive from the master seed;
    /// the first restart wins inertia ties.
    fn kmeans(&self, data: &[Vec<f32>], k: usize) -> (Vec<usize>, Vec<Vec<f32>>) {
        let mut best: Option<(Vec<usize>, Vec<Vec<f32>>, f64)> = None;

        for restart in 0..self.restarts {
            let seed = self.seed.wrapping_add(restart as u64);
            let (labels, centroids, inertia) = self.kmeans_once(data, k, seed);
            match &best {
                Some((_, _, best_inertia)) if inertia >= *best_inertia => {}
                _ => best = Some((labels, centroids, inertia)),
            }
        }

        let (labels, centroids, _) = best.expect("at least one restart");
        (labels, centroids)
    }

    fn kmeans_once(&self, data: &[Vec<f32>], k: usize, seed: u64) -> (Vec<usize>, Vec<Vec<f32>>, f64) {
        let n = data.len();
        let mut rng = StdRng::seed_from_u64(seed);

        // Farthest-point (maximin) seeding: a seeded first pick, then each
        // new center is the point farthest from its nearest chosen center.
        // Well-separated groups are guaranteed a center each.
        let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(k);
        centroids.push(data[rng.gen_range(0..n)].clone());
        while centroids.len() < k {
            let mut far_idx = 0;
            let mut far_dist = -1.0f32;
            for (idx, point) in data.iter().enumerate() {
                let nearest = centroids
                    .iter()
                    .map(|c| sq_dist(point, c))
                    .fold(f32::MAX, f32::min);
                if nearest > far_dist {
                    far_dist = nearest;
                    far_idx = idx;
                }
            }
            centroids.push(data[far_idx].clone());
        }

        let mut labels = vec![0usize; n];
        for _ in 0..self.max_iters {
            labels = assign(data, &centroids);
            let new_centroids = update(data, &labels, &centroids, k);

            let shift: f32 = centroids
                .iter()
                .flatten()
                .zip(new_centroids.iter().flatten())
                .map(|(a, b)| (a - b).abs())
                .sum();
            centroids = new_centroids;
            if shift < 1e-6 {
                break;
            }
        }

        let inertia = data
            .iter()
            .zip(&labels)
            .map(|(point, &label)| f64::from(sq_dist(point, &centroids[label])))
            .sum();

        (labels, centroids, inertia)
    }
}

impl Default for Clusterer {
    fn default() -> Self {
        Self::new()
    }
}

fn sq_dist(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn assign(data: &[Vec<f32>], centroids: &[Vec<f32>]) -> Vec<usize> {
    data.iter()
        .map(|point| {
            let mut best = 0;
            let mut best_dist = f32::MAX;
            for (idx, centroid) in centroids.iter().enumerate() {
                let dist = sq_dist(point, centroid);
                if dist < best_dist {
                    best = idx;
                    best_dist = dist;
                }
            }
            best
        })
        .collect()
}

fn update(data: &[Vec<f32>], labels: &[usize], old: &[Vec<f32>], k: usize) -> Vec<Vec<f32>> {
    let dim = data[0].len();
    let mut sums = vec![vec![0.0f32; dim]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in data.iter().zip(labels) {
        counts[label] += 1;
        for (acc, &x) in sums[label].iter_mut().zip(point) {
            *acc += x;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(idx, (mut sum, count))| {
            if count == 0 {
                // An emptied cluster keeps its previous center.
                old[idx].clone()
            } else {
                for x in &mut sum {
                    *x /= count as f32;
                }
                sum
            }
        })
        .collect()
}

/// Mean silhouette coefficient of a partition.
///
/// Singleton-cluster points score 0, matching the usual convention.
#[must_use]
pub fn silhouette_score(data: &[Vec<f32>], labels: &[usize], k: usize) -> f32 {
    let n = data.len();
    let mut counts = vec![0usize; k];
    for &label in labels {
        counts[label] += 1;
    }

    let mut total = 0.0f32;
    for i in 0..n {
        let own = labels[i];
        if counts[own] <= 1 {
            continue; // silhouette of a singleton is 0
        }

        let mut dist_sums = vec![0.0f32; k];
        for j in 0..n {
            if i != j {
                dist_sums[labels[j]] += euclidean(&data[i], &data[j]);
            }
        }

        let a = dist_sums[own] / (counts[own] - 1) as f32;
        let b = (0..k)
            .filter(|&c| c != own && counts[c] > 0)
            .map(|c| dist_sums[c] / counts[c] as f32)
            .fold(f32::MAX, f32::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    total / n as f32
}

fn check_dims(vectors: &[Vec<f32>]) -> Result<()> {
    if vectors.is_empty() {
        return Err(Error::NoChunks);
    }
    let expected = vectors[0].len();
    for v in vectors {
        if v.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                got: v.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![0.2, 0.1],
            vec![0.1, 0.2],
            vec![9.9, 10.0],
            vec![10.0, 9.8],
            vec![10.2, 10.1],
        ]
    }

    #[test]
    fn test_explicit_k_separates_blobs() {
        let partition = Clusterer::new().fit(&two_blobs(), Some(2)).unwrap();
        assert_eq!(partition.labels[0], partition.labels[1]);
        assert_eq!(partition.labels[3], partition.labels[4]);
        assert_ne!(partition.labels[0], partition.labels[3]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let data = two_blobs();
        let clusterer = Clusterer::new();
        let first = clusterer.fit(&data, None).unwrap();
        let second = clusterer.fit(&data, None).unwrap();
        assert_eq!(first.labels, second.labels);
    }

    #[test]
    fn test_auto_k_finds_three_blobs() {
        let mut data = Vec::new();
        for center in [0.0f32, 20.0, 40.0] {
            for offset in [0.0f32, 0.3, 0.6, 0.9] {
                data.push(vec![center + offset, center - offset]);
            }
        }
        let partition = Clusterer::new().fit(&data, None).unwrap();
        assert_eq!(partition.clusters.len(), 3);
    }

    #[test]
    fn test_percentages_round_to_two_decimals() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
        ];
        let partition = Clusterer::new().fit(&data, Some(2)).unwrap();
        let total: f64 = partition.clusters.iter().map(|c| c.percentage).sum();
        // 66.67 + 33.33
        assert!((total - 100.0).abs() < 0.02);
        for cluster in &partition.clusters {
            let scaled = cluster.percentage * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_theme_assignment_argmax() {
        let clusterer = Clusterer::new();
        let themes = vec!["x axis".to_string(), "y axis".to_string()];
        let theme_embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let chunks = vec![vec![0.9, 0.1], vec![0.1, 0.9], vec![0.8, 0.2]];

        let partition = clusterer
            .assign_themes(&chunks, &themes, &theme_embeddings)
            .unwrap();
        assert_eq!(partition.labels, vec![0, 1, 0]);
        assert_eq!(partition.clusters[0].theme.as_deref(), Some("x axis"));
        // Theme embeddings double as centroids.
        assert_eq!(partition.centroids[1], vec![0.0, 1.0]);
    }

    #[test]
    fn test_unused_theme_gets_no_share() {
        let clusterer = Clusterer::new();
        let themes = vec!["near".to_string(), "far".to_string()];
        let theme_embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let chunks = vec![vec![1.0, 0.0], vec![0.9, 0.1]];

        let partition = clusterer
            .assign_themes(&chunks, &themes, &theme_embeddings)
            .unwrap();
        assert_eq!(partition.clusters.len(), 1);
        assert_eq!(partition.clusters[0].id, 0);
        assert_eq!(partition.k(), 2); // centroid table still covers both ids
    }

    #[test]
    fn test_empty_input_errors() {
        let err = Clusterer::new().fit(&[], Some(2)).unwrap_err();
        assert!(matches!(err, Error::NoChunks));
    }

    #[test]
    fn test_infeasible_k_errors() {
        let data = vec![vec![0.0], vec![1.0]];
        let err = Clusterer::new().fit(&data, Some(5)).unwrap_err();
        assert!(matches!(err, Error::InvalidClusterCount { k: 5, points: 2 }));
    }

    #[test]
    fn test_auto_k_needs_three_points() {
        let data = vec![vec![0.0], vec![1.0]];
        let err = Clusterer::new().fit(&data, None).unwrap_err();
        assert!(matches!(err, Error::InvalidClusterCount { .. }));
    }

    #[test]
    fn test_ragged_embeddings_error() {
        let data = vec![vec![0.0, 1.0], vec![1.0]];
        let err = Clusterer::new().fit(&data, Some(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { expected: 2, got: 1 }
        ));
    }

    #[test]
    fn test_silhouette_prefers_true_split() {
        let data = two_blobs();
        let good = vec![0, 0, 0, 1, 1, 1];
        let bad = vec![0, 1, 0, 1, 0, 1];
        assert!(silhouette_score(&data, &good, 2) > silhouette_score(&data, &bad, 2));
    }
}
