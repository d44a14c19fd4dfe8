use derive_more::Display;
use serde::{Deserialize, Serialize};

/// How partial results computed over independent partitions are merged into one.
///
/// Both strategies give the same value for exact arithmetic, but floating-point reductions
/// are not bitwise reproducible across strategies or partition counts: only equality up to
/// the rounding introduced by a different summation order is guaranteed.
#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Left fold in partition order: `((p0 + p1) + p2) + ...`.
    ///
    /// Rounding error grows linearly with the number of partitions.
    #[display("sequential")]
    #[serde(rename = "sequential")]
    Sequential,
    /// Pairwise tree: adjacent partials are merged level by level, `(p0 + p1) + (p2 + p3)`.
    ///
    /// Rounding error grows with the logarithm of the number of partitions.
    #[default]
    #[display("tree")]
    #[serde(rename = "tree")]
    Tree,
}

impl MergeStrategy {
    /// Merge all `partials` with `combine`, keeping their relative order.
    ///
    /// Returns `None` when there is nothing to merge.
    pub fn merge<T, F>(self, partials: Vec<T>, combine: F) -> Option<T>
    where
        F: Fn(T, T) -> T,
    {
        match self {
            MergeStrategy::Sequential => partials.into_iter().reduce(combine),
            MergeStrategy::Tree => merge_tree(partials, combine),
        }
    }
}

fn merge_tree<T, F>(partials: Vec<T>, combine: F) -> Option<T>
where
    F: Fn(T, T) -> T,
{
    let mut level = partials;

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut items = level.into_iter();

        while let Some(lhs) = items.next() {
            match items.next() {
                Some(rhs) => next.push(combine(lhs, rhs)),
                None => next.push(lhs),
            }
        }

        level = next;
    }

    level.pop()
}
