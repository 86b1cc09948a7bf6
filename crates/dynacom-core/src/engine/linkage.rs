//! Ward agglomerative clustering and "maxclust" flat cuts.
//!
//! The tree is built with the nearest-neighbour chain algorithm on Euclidean distances
//! between observation rows, updating distances with the Lance–Williams formula for Ward's
//! criterion. Merges are then ordered by height (stably) and renumbered so that node
//! `n + i` is the cluster formed by merge `i`, and each merge lists its lower id first.
//! This is the same tree conventional hierarchical-clustering libraries return.

use super::error::EngineError;
use nalgebra::DMatrix;
use std::cmp::Ordering;

/// One agglomeration step. Ids below the leaf count are observations; id `n + i` is merge `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub height: f64,
    pub size: usize,
}

/// A complete Ward dendrogram over `leaves` observations.
#[derive(Debug, Clone, PartialEq)]
pub struct WardTree {
    leaves: usize,
    merges: Vec<Merge>,
}

/// Index of pair `(i, j)`, `i < j`, in a condensed distance vector over `n` points.
#[inline]
fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    let (i, j) = if i < j { (i, j) } else { (j, i) };
    n * i - i * (i + 1) / 2 + (j - i - 1)
}

fn ward_update(d_xi: f64, d_yi: f64, d_xy: f64, size_x: usize, size_y: usize, size_i: usize) -> f64 {
    let (nx, ny, ni) = (size_x as f64, size_y as f64, size_i as f64);
    let t = 1.0 / (nx + ny + ni);
    ((ni + nx) * t * d_xi * d_xi + (ni + ny) * t * d_yi * d_yi - ni * t * d_xy * d_xy).sqrt()
}

struct LinkageUnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    next_label: usize,
}

impl LinkageUnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..2 * n - 1).collect(),
            size: vec![1; 2 * n - 1],
            next_label: n,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn merge(&mut self, x: usize, y: usize) -> usize {
        self.parent[x] = self.next_label;
        self.parent[y] = self.next_label;
        let size = self.size[x] + self.size[y];
        self.size[self.next_label] = size;
        self.next_label += 1;
        size
    }
}

impl WardTree {
    /// Clusters the rows of `observations`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyModel`] if there are no rows.
    pub fn from_observations(observations: &DMatrix<f64>) -> Result<Self, EngineError> {
        let n = observations.nrows();
        if n == 0 {
            return Err(EngineError::EmptyModel);
        }

        let mut distances = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                distances.push((observations.row(i) - observations.row(j)).norm());
            }
        }
        Ok(Self::from_condensed(n, distances))
    }

    fn from_condensed(n: usize, mut distances: Vec<f64>) -> Self {
        if n == 1 {
            return Self {
                leaves: 1,
                merges: Vec::new(),
            };
        }

        let mut size = vec![1usize; n];
        let mut chain: Vec<usize> = Vec::with_capacity(n);
        let mut raw = Vec::with_capacity(n - 1);

        for _ in 0..n - 1 {
            if chain.is_empty() {
                if let Some(first) = (0..n).find(|&i| size[i] > 0) {
                    chain.push(first);
                }
            }

            // Grow the chain until its last two entries are reciprocal nearest neighbours.
            let (x, y, height) = loop {
                let x = chain[chain.len() - 1];
                let previous = chain.len().checked_sub(2).map(|p| chain[p]);
                let (mut y, mut current_min) = match previous {
                    Some(p) => (p, distances[condensed_index(n, x, p)]),
                    None => (x, f64::INFINITY),
                };
                for i in 0..n {
                    if size[i] == 0 || i == x {
                        continue;
                    }
                    let d = distances[condensed_index(n, x, i)];
                    if d < current_min {
                        current_min = d;
                        y = i;
                    }
                }
                if previous == Some(y) {
                    break (x, y, current_min);
                }
                chain.push(y);
            };
            chain.truncate(chain.len() - 2);

            let (x, y) = if x > y { (y, x) } else { (x, y) };
            let (nx, ny) = (size[x], size[y]);
            raw.push(Merge {
                left: x,
                right: y,
                height,
                size: nx + ny,
            });
            size[x] = 0;
            size[y] = nx + ny;

            for i in 0..n {
                let ni = size[i];
                if ni == 0 || i == y {
                    continue;
                }
                let updated = ward_update(
                    distances[condensed_index(n, i, x)],
                    distances[condensed_index(n, i, y)],
                    height,
                    nx,
                    ny,
                    ni,
                );
                distances[condensed_index(n, i, y)] = updated;
            }
        }

        raw.sort_by(|a, b| a.height.partial_cmp(&b.height).unwrap_or(Ordering::Equal));

        let mut union_find = LinkageUnionFind::new(n);
        let merges = raw
            .into_iter()
            .map(|merge| {
                let a = union_find.find(merge.left);
                let b = union_find.find(merge.right);
                let (left, right) = if a < b { (a, b) } else { (b, a) };
                let size = union_find.merge(left, right);
                Merge {
                    left,
                    right,
                    height: merge.height,
                    size,
                }
            })
            .collect();

        Self { leaves: n, merges }
    }

    pub fn leaves(&self) -> usize {
        self.leaves
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Largest merge height inside the subtree of every merge node.
    fn max_heights(&self) -> Vec<f64> {
        let n = self.leaves;
        let mut max = Vec::with_capacity(self.merges.len());
        for merge in &self.merges {
            let child = |id: usize| if id >= n { max[id - n] } else { f64::NEG_INFINITY };
            let value = merge.height.max(child(merge.left)).max(child(merge.right));
            max.push(value);
        }
        max
    }

    /// Flat clustering into at most `k` clusters ("maxclust").
    ///
    /// Labels start at 1 and are handed out in a pre-order walk from the root, visiting
    /// the lower-id child first. Tied merge heights can yield fewer than `k` clusters.
    pub fn cut(&self, k: usize) -> Vec<usize> {
        let n = self.leaves;
        let mut labels = vec![0usize; n];
        if self.merges.is_empty() {
            labels.fill(1);
            return labels;
        }

        let max_heights = self.max_heights();
        let threshold = if k >= n {
            f64::NEG_INFINITY
        } else {
            let mut sorted = max_heights.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            sorted[n - k.max(1) - 1]
        };

        let mut next_label = 0;
        let mut stack = vec![2 * n - 2];
        while let Some(node) = stack.pop() {
            if node < n {
                next_label += 1;
                labels[node] = next_label;
                continue;
            }
            let merge = &self.merges[node - n];
            if max_heights[node - n] <= threshold {
                next_label += 1;
                self.assign_subtree(node, next_label, &mut labels);
            } else {
                stack.push(merge.right);
                stack.push(merge.left);
            }
        }
        labels
    }

    fn assign_subtree(&self, node: usize, label: usize, labels: &mut [usize]) {
        let n = self.leaves;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if id < n {
                labels[id] = label;
            } else {
                let merge = &self.merges[id - n];
                stack.push(merge.left);
                stack.push(merge.right);
            }
        }
    }
}
