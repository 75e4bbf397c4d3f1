//! Union-find over candidate indices, used to pool overlapping detections.

/// Disjoint sets of `0..len`, merged pairwise and read back as clusters.
pub struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn root(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            // path halving
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Puts `a` and `b` in the same cluster.
    pub fn join(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.root(a), self.root(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }

    /// Clusters as ascending member lists, ordered by their first member.
    pub fn into_clusters(mut self) -> Vec<Vec<usize>> {
        let len = self.parent.len();
        let mut by_root: Vec<Vec<usize>> = vec![Vec::new(); len];
        for i in 0..len {
            let r = self.root(i);
            by_root[r].push(i);
        }
        by_root.into_iter().filter(|c| !c.is_empty()).collect()
    }
}
