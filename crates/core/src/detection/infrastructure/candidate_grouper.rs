//! Neighbor grouping of raw detector hits.
//!
//! A real face fires many overlapping anchors across pyramid levels while
//! spurious hits tend to stay isolated. Clusters with too few members are
//! dropped and each surviving cluster collapses into its mean box.

use crate::detection::infrastructure::disjoint_set::DisjointSet;

/// Two hits belong to the same face when their IoU exceeds this.
pub const GROUP_IOU_THRESH: f64 = 0.4;

/// Final suppression between already-grouped faces.
pub const NMS_IOU_THRESH: f64 = 0.3;

/// A raw detection in image coordinates, `[x1, y1, x2, y2]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub corners: [f64; 4],
    pub score: f64,
}

impl Candidate {
    fn area(&self) -> f64 {
        let [x1, y1, x2, y2] = self.corners;
        (x2 - x1).max(0.0) * (y2 - y1).max(0.0)
    }

    /// Intersection over union with `other`; 0.0 when they don't touch.
    pub fn iou(&self, other: &Candidate) -> f64 {
        let [ax1, ay1, ax2, ay2] = self.corners;
        let [bx1, by1, bx2, by2] = other.corners;
        let overlap_w = (ax2.min(bx2) - ax1.max(bx1)).max(0.0);
        let overlap_h = (ay2.min(by2) - ay1.max(by1)).max(0.0);
        let inter = overlap_w * overlap_h;
        if inter <= 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}

/// Groups overlapping candidates and keeps clusters holding more than
/// `min_neighbors` members.
///
/// `min_neighbors == 0` skips grouping: every candidate survives, and only
/// non-maximum suppression is applied.
pub fn group_candidates(candidates: &[Candidate], min_neighbors: u32) -> Vec<Candidate> {
    if min_neighbors == 0 {
        let mut raw = candidates.to_vec();
        return nms(&mut raw, NMS_IOU_THRESH);
    }

    let mut clusters = DisjointSet::new(candidates.len());
    for (i, a) in candidates.iter().enumerate() {
        for (j, b) in candidates.iter().enumerate().skip(i + 1) {
            if a.iou(b) > GROUP_IOU_THRESH {
                clusters.join(i, j);
            }
        }
    }

    let mut grouped: Vec<Candidate> = clusters
        .into_clusters()
        .into_iter()
        .filter(|members| members.len() > min_neighbors as usize)
        .map(|members| mean_candidate(candidates, &members))
        .collect();

    nms(&mut grouped, NMS_IOU_THRESH)
}

fn mean_candidate(candidates: &[Candidate], members: &[usize]) -> Candidate {
    let n = members.len() as f64;
    let mut corners = [0.0; 4];
    let mut score: f64 = 0.0;
    for &m in members {
        for (acc, v) in corners.iter_mut().zip(candidates[m].corners) {
            *acc += v;
        }
        score = score.max(candidates[m].score);
    }
    for c in &mut corners {
        *c /= n;
    }
    Candidate { corners, score }
}

/// Greedy non-maximum suppression, highest score first.
pub fn nms(dets: &mut [Candidate], iou_thresh: f64) -> Vec<Candidate> {
    dets.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; dets.len()];

    for i in 0..dets.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(dets[i].clone());
        for j in (i + 1)..dets.len() {
            if !suppressed[j] && dets[i].iou(&dets[j]) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}
