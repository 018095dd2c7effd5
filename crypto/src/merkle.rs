//! Evidence-bundle Merkle trees.
//!
//! The tree is stored as one array of node hashes per level, leaves first.
//! A node's sibling is at `index ^ 1` and its parent at `index >> 1` on the
//! next level. An odd level is padded by repeating its last hash before the
//! parents are computed, so every stored node has a sibling.

use crate::error::ProofError;
use crate::hash::{sha256, sha256_multi};
use serde::{Deserialize, Serialize};
use truthmarket_types::Digest;

/// Which operand the sibling hash is when recombining.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// `parent = H(sibling || current)`
    Left,
    /// `parent = H(current || sibling)`
    Right,
}

/// One level of an inclusion proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Digest,
    pub side: Side,
}

/// Hash of a leaf's content.
pub fn leaf_hash(content: &[u8]) -> Digest {
    sha256(content)
}

/// Hash of an interior node.
pub fn node_hash(left: &Digest, right: &Digest) -> Digest {
    sha256_multi(&[left.as_bytes(), right.as_bytes()])
}

/// A level-indexed Merkle tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    /// `levels[0]` are the leaf hashes, the last level holds the root.
    levels: Vec<Vec<Digest>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Build a tree over raw leaf contents, in order.
    pub fn build<T: AsRef<[u8]>>(leaves: &[T]) -> Self {
        Self::from_leaf_hashes(leaves.iter().map(|l| leaf_hash(l.as_ref())).collect())
    }

    /// Build a tree over already-hashed leaves.
    pub fn from_leaf_hashes(leaf_hashes: Vec<Digest>) -> Self {
        let leaf_count = leaf_hashes.len();
        if leaf_count == 0 {
            return Self {
                levels: Vec::new(),
                leaf_count,
            };
        }

        let mut levels = vec![leaf_hashes];
        loop {
            let current = match levels.last_mut() {
                Some(level) if level.len() > 1 => level,
                _ => break,
            };
            if current.len() % 2 == 1 {
                let last = current[current.len() - 1];
                current.push(last);
            }
            let next: Vec<Digest> = current
                .chunks_exact(2)
                .map(|pair| node_hash(&pair[0], &pair[1]))
                .collect();
            levels.push(next);
        }

        Self { levels, leaf_count }
    }

    /// Root hash, or `None` for the empty-tree sentinel.
    pub fn root(&self) -> Option<Digest> {
        self.levels.last().and_then(|top| top.first().copied())
    }

    /// Number of proof steps from a leaf to the root.
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    pub fn leaf(&self, index: usize) -> Option<Digest> {
        if index < self.leaf_count {
            self.levels.first().map(|leaves| leaves[index])
        } else {
            None
        }
    }

    /// The per-level node arrays, leaves first (odd levels include their padding).
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Inclusion proof for the leaf at `index`, ordered leaf to root.
    pub fn generate_proof(&self, index: usize) -> Result<Vec<ProofStep>, ProofError> {
        if self.is_empty() {
            return Err(ProofError::EmptyTree);
        }
        if index >= self.leaf_count {
            return Err(ProofError::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count,
            });
        }

        let mut proof = Vec::with_capacity(self.depth());
        let mut idx = index;
        for level in &self.levels[..self.depth()] {
            let side = if idx & 1 == 0 { Side::Right } else { Side::Left };
            proof.push(ProofStep {
                sibling: level[idx ^ 1],
                side,
            });
            idx >>= 1;
        }
        Ok(proof)
    }

    /// Verify a proof against this tree's root, rejecting proofs whose
    /// length does not match the tree depth.
    pub fn verify(&self, leaf_hash: &Digest, proof: &[ProofStep]) -> Result<bool, ProofError> {
        let root = self.root().ok_or(ProofError::EmptyTree)?;
        if proof.len() != self.depth() {
            return Err(ProofError::DepthMismatch {
                expected: self.depth(),
                actual: proof.len(),
            });
        }
        Ok(verify_proof(leaf_hash, proof, &root))
    }
}

/// Recombine `leaf_hash` with each proof step in order and compare to `root`.
pub fn verify_proof(leaf_hash: &Digest, proof: &[ProofStep], root: &Digest) -> bool {
    let computed = proof.iter().fold(*leaf_hash, |current, step| match step.side {
        Side::Left => node_hash(&step.sibling, &current),
        Side::Right => node_hash(&current, &step.sibling),
    });
    computed == *root
}
