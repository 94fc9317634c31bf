//! Association of incoming detections with tracked blobs.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{BoundingBox, overlap_matrix};
use crate::tracker::blob::Blob;

/// Detection input for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// Object type label
    pub kind: Option<String>,
    /// Confidence of the type label
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            kind: None,
            confidence: None,
        }
    }

    pub fn labeled(bbox: BoundingBox, kind: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            kind: Some(kind.into()),
            confidence: Some(confidence),
        }
    }

    /// Detection from TLBR coordinates (x1, y1, x2, y2).
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(BoundingBox::from_tlbr(x1, y1, x2, y2))
    }
}

/// Algorithm used to resolve competing detection/blob pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Commit pairs in descending score order.
    #[default]
    Greedy,
    /// Maximum total score via Jonker-Volgenant assignment.
    Optimal,
}

/// One-to-one pairing of detections with blobs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    /// `(detection index, blob id)` pairs
    pub matches: Vec<(usize, u64)>,
    pub unmatched_detections: Vec<usize>,
    pub unmatched_blobs: Vec<u64>,
}

/// Compute match scores of shape (detections, blobs).
///
/// A pair scores its IoU. When both type labels are known and disagree the
/// score is divided by `1 + detection_confidence * blob_confidence`. Pairs
/// whose IoU is below `threshold`, or whose final score does not exceed
/// it, score zero.
pub fn score_matrix<T>(detections: &[Detection], blobs: &[&Blob<T>], threshold: f32) -> Array2<f32> {
    let det_boxes: Vec<BoundingBox> = detections.iter().map(|d| d.bbox).collect();
    let blob_boxes: Vec<BoundingBox> = blobs.iter().map(|b| b.bounding_box).collect();
    let mut scores = overlap_matrix(&det_boxes, &blob_boxes);

    for ((i, j), score) in scores.indexed_iter_mut() {
        if *score < threshold {
            *score = 0.0;
            continue;
        }
        let det = &detections[i];
        let blob = blobs[j];
        if let (Some(det_kind), Some(blob_kind)) = (&det.kind, &blob.kind) {
            if det_kind != blob_kind {
                let det_conf = det.confidence.unwrap_or(0.0);
                let blob_conf = blob.kind_confidence.unwrap_or(0.0);
                *score /= 1.0 + det_conf * blob_conf;
            }
        }
        if *score <= threshold {
            *score = 0.0;
        }
    }
    scores
}

/// Pair detections with blobs one-to-one.
pub fn match_detections<T>(
    detections: &[Detection],
    blobs: &[&Blob<T>],
    threshold: f32,
    strategy: MatchStrategy,
) -> Assignment {
    let scores = score_matrix(detections, blobs, threshold);
    let blob_ids: Vec<u64> = blobs.iter().map(|b| b.id).collect();
    let pairs = match strategy {
        MatchStrategy::Greedy => greedy_assignment(&scores, &blob_ids),
        MatchStrategy::Optimal => optimal_assignment(&scores, &blob_ids),
    };

    let mut det_matched = vec![false; detections.len()];
    let mut blob_matched = vec![false; blobs.len()];
    let mut matches = Vec::with_capacity(pairs.len());
    for (i, j) in pairs {
        det_matched[i] = true;
        blob_matched[j] = true;
        matches.push((i, blob_ids[j]));
    }

    Assignment {
        matches,
        unmatched_detections: (0..detections.len()).filter(|&i| !det_matched[i]).collect(),
        unmatched_blobs: blob_ids
            .iter()
            .zip(&blob_matched)
            .filter(|(_, matched)| !**matched)
            .map(|(id, _)| *id)
            .collect(),
    }
}

/// Commit candidate pairs by descending score, skipping any pair whose
/// detection or blob is already taken. Ties go to the lower detection
/// index, then the lower blob id.
fn greedy_assignment(scores: &Array2<f32>, blob_ids: &[u64]) -> Vec<(usize, usize)> {
    let mut candidates: Vec<(f32, usize, usize)> = scores
        .indexed_iter()
        .filter(|(_, score)| **score > 0.0)
        .map(|((i, j), score)| (*score, i, j))
        .collect();
    candidates.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then(a.1.cmp(&b.1))
            .then(blob_ids[a.2].cmp(&blob_ids[b.2]))
    });

    let (num_dets, num_blobs) = scores.dim();
    let mut det_taken = vec![false; num_dets];
    let mut blob_taken = vec![false; num_blobs];
    let mut pairs = Vec::new();

    for (score, i, j) in candidates {
        if det_taken[i] || blob_taken[j] {
            debug!(
                detection = i,
                object_id = blob_ids[j],
                score,
                "already matched"
            );
            continue;
        }
        det_taken[i] = true;
        blob_taken[j] = true;
        pairs.push((i, j));
    }
    pairs
}

/// Maximum-weight assignment on the score matrix.
///
/// Cost is `1 - score`; invalid pairs and padding cost 1, so minimising the
/// total cost maximises the summed score of valid pairs.
fn optimal_assignment(scores: &Array2<f32>, blob_ids: &[u64]) -> Vec<(usize, usize)> {
    let (num_rows, num_cols) = scores.dim();
    if num_rows == 0 || num_cols == 0 {
        return Vec::new();
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), 1.0);
    for ((i, j), score) in scores.indexed_iter() {
        padded[[i, j]] = 1.0 - *score as f64;
    }

    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => row_to_col
            .iter()
            .enumerate()
            .filter(|&(i, &j)| i < num_rows && j < num_cols && scores[[i, j]] > 0.0)
            .map(|(i, &j)| (i, j))
            .collect(),
        Err(_) => {
            debug!("assignment solver failed, falling back to greedy order");
            greedy_assignment(scores, blob_ids)
        }
    }
}
