//! Grouping of similar folders

use crate::scan::FolderCandidate;
use docsort_domain::{compare_precedence, is_unknown_folder, similarity};
use std::collections::BTreeMap;

/// Disjoint-set forest over `0..n`
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Representative of `x`'s set
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // path compression
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Join the sets of `a` and `b`; false if already joined
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// A planned merge: indices into the candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Folder that survives
    pub winner: usize,
    /// Folders folded into the winner, by name
    pub losers: Vec<usize>,
}

/// Cluster candidates whose keys score at or above `threshold`
///
/// Grouping is transitive: if A matches B and B matches C, all three land
/// in one cluster even when A and C do not match. Each cluster of two or
/// more folders yields a plan whose winner has the most files, then the
/// shortest name. The reserved `Unknown` folder never clusters.
///
/// Plans are ordered by winner name.
pub fn plan_merges(candidates: &[FolderCandidate], threshold: f64) -> Vec<MergePlan> {
    let mut sets = UnionFind::new(candidates.len());
    let eligible: Vec<usize> = (0..candidates.len())
        .filter(|&i| !is_unknown_folder(&candidates[i].name))
        .collect();

    for (n, &i) in eligible.iter().enumerate() {
        for &j in &eligible[n + 1..] {
            if similarity(&candidates[i].key, &candidates[j].key) >= threshold {
                sets.union(i, j);
            }
        }
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &i in &eligible {
        groups.entry(sets.find(i)).or_default().push(i);
    }

    let mut plans: Vec<MergePlan> = groups
        .into_values()
        .filter(|members| members.len() > 1)
        .filter_map(|members| {
            let winner = *members.iter().min_by(|&&a, &&b| {
                compare_precedence(
                    candidates[a].file_count,
                    &candidates[a].name,
                    candidates[b].file_count,
                    &candidates[b].name,
                )
            })?;
            let mut losers: Vec<usize> = members.into_iter().filter(|&i| i != winner).collect();
            losers.sort_by(|&a, &b| candidates[a].name.cmp(&candidates[b].name));
            Some(MergePlan { winner, losers })
        })
        .collect();

    plans.sort_by(|a, b| candidates[a.winner].name.cmp(&candidates[b.winner].name));
    plans
}
