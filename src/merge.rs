//! Proxy-text assembly.
//!
//! The last reduction step: concatenate the selected representatives,
//! cluster by cluster, under a label line per cluster. The result is the
//! proxy text handed to the summarization collaborator in place of the
//! full document; the labels give the summarizer the theme structure the
//! clusterer discovered.

use crate::cluster::Partition;
use crate::select::Selection;

/// Merge selected representatives into one labeled proxy string.
///
/// Clusters appear in allocation-table order. Each cluster contributes a
/// `[label]` header line (the theme name when one exists, `Cluster N`
/// otherwise) followed by its chunks' trimmed text. Empty selections are
/// skipped entirely.
///
/// ```rust
/// use abridge::{merge_proxy, Chunk, Clusterer, Selection};
///
/// let partition = Clusterer::new()
///     .fit(&[vec![0.0, 0.0], vec![9.0, 9.0]], Some(2))
///     .unwrap();
/// let selections = vec![
///     Selection { cluster: 0, chunks: vec![Chunk::new("First point.", 0)] },
///     Selection { cluster: 1, chunks: vec![Chunk::new("Second point.", 1)] },
/// ];
///
/// let proxy = merge_proxy(&selections, &partition);
/// assert!(proxy.contains("[Cluster 0]"));
/// assert!(proxy.contains("First point."));
/// ```
#[must_use]
pub fn merge_proxy(selections: &[Selection], partition: &Partition) -> String {
    let mut lines: Vec<String> = Vec::new();

    for selection in selections {
        if selection.chunks.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("[{}]", partition.display_label(selection.cluster)));
        for chunk in &selection.chunks {
            lines.push(chunk.text.trim().to_string());
        }
    }

    lines.join("\n")
}
