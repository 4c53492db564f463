//! Gap-free local block alignment.
//!
//! A restricted variant of Smith-Waterman: the forward pass fills a local
//! score matrix that permits indels, but the traceback walks strictly
//! diagonally from the maximum-scoring cell and stops at the first cell
//! whose score is beaten by its upper or left neighbour. The result is the
//! contiguous, gap-free block anchored at the best-scoring cell.
//!
//! This does NOT guarantee a globally optimal local alignment (the forward
//! pass can route its maximum through a gap the traceback refuses to take);
//! it is the intended behaviour for extracting a single ungapped
//! correspondence block between two conformers of the same chain.

use crate::scoring::ScoringWeights;

/// A gap-free aligned block between two token sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockMatch {
    /// Score of the anchoring cell.
    pub score: i32,
    /// Number of aligned token pairs.
    pub length: usize,
    /// Offset of the block in the first sequence.
    pub start1: usize,
    /// Offset of the block in the second sequence.
    pub start2: usize,
    /// Tokens of the block from the first sequence.
    pub tokens1: Vec<String>,
    /// Tokens of the block from the second sequence.
    pub tokens2: Vec<String>,
}

impl BlockMatch {
    fn empty() -> Self {
        Self {
            score: 0,
            length: 0,
            start1: 0,
            start2: 0,
            tokens1: Vec::new(),
            tokens2: Vec::new(),
        }
    }
}

/// Align two token sequences and return the best gap-free block.
///
/// Empty inputs yield a zero-length block, not an error. On ties for the
/// maximum score, the first cell in row-major scan order wins.
pub fn align_block<S: AsRef<str>>(s1: &[S], s2: &[S], weights: &ScoringWeights) -> BlockMatch {
    let n1 = s1.len();
    let n2 = s2.len();
    if n1 == 0 || n2 == 0 {
        return BlockMatch::empty();
    }

    let cols = n2 + 1;
    let mut f = vec![0i32; (n1 + 1) * cols];
    let idx = |i: usize, j: usize| i * cols + j;

    let (mut max_i, mut max_j) = (0usize, 0usize);
    for i in 1..=n1 {
        for j in 1..=n2 {
            let sub = if s1[i - 1].as_ref() == s2[j - 1].as_ref() {
                weights.match_score
            } else {
                weights.mismatch
            };
            let diag = f[idx(i - 1, j - 1)] + sub;
            let up = f[idx(i - 1, j)] + weights.indel;
            let left = f[idx(i, j - 1)] + weights.indel;
            f[idx(i, j)] = diag.max(up).max(left).max(0);

            if f[idx(max_i, max_j)] < f[idx(i, j)] {
                max_i = i;
                max_j = j;
            }
        }
    }

    // Strictly diagonal walk back from the maximum, stopping at the first
    // cell dominated by its upper or left neighbour, or at a matrix edge.
    let (mut i, mut j) = (max_i, max_j);
    while i > 0 && j > 0 {
        if f[idx(i, j)] >= f[idx(i - 1, j)] && f[idx(i, j)] >= f[idx(i, j - 1)] {
            i -= 1;
            j -= 1;
        } else {
            break;
        }
    }

    BlockMatch {
        score: f[idx(max_i, max_j)],
        length: max_i - i,
        start1: i,
        start2: j,
        tokens1: s1[i..max_i].iter().map(|t| t.as_ref().to_string()).collect(),
        tokens2: s2[j..max_j].iter().map(|t| t.as_ref().to_string()).collect(),
    }
}
