//! Note commitment tree and authentication paths.
//!
//! The tree is a fixed-depth binary Merkle tree over note commitments.
//! Leaves are note commitment encodings; unfilled leaves are all-zero.
//! Interior nodes hash their depth together with both children:
//!
//! ```text
//! node(d, l, r) = BLAKE2b-256("Shielded_MrklNod", d || l || r)
//! ```
//!
//! where `d` is the level of the children (leaves are level 0). Mixing in
//! the level keeps a subtree root from masquerading as a leaf.
//!
//! [`Witness`] is a spend's inclusion proof. [`CommitmentTree`] is an
//! in-memory append-only tree that produces witnesses; wallets talking to
//! a real node get witnesses from the node instead.

use bitvec::prelude::*;

use crate::{
    constants::{MERKLE_NODE_PERSONALIZATION, TREE_DEPTH},
    error::{Result, TransactionError},
    hash::blake2b_256,
    note::NoteCommitment,
    wire::{self, ParseResult},
};

/// A node of the commitment tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MerkleHash([u8; 32]);

impl MerkleHash {
    /// The hash of an unfilled leaf.
    pub const EMPTY_LEAF: Self = Self([0u8; 32]);

    /// Combine two children at `level`.
    #[must_use]
    pub fn combine(level: u8, left: &Self, right: &Self) -> Self {
        Self(blake2b_256(
            MERKLE_NODE_PERSONALIZATION,
            &[&[level], &left.0, &right.0],
        ))
    }

    /// The root of an all-empty subtree of the given height.
    #[must_use]
    pub fn empty_root(height: usize) -> Self {
        (0u8..)
            .take(height)
            .fold(Self::EMPTY_LEAF, |node, level| Self::combine(level, &node, &node))
    }

    /// Raw hash bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (rem, bytes) = wire::array::<32>(input)?;
        Ok((rem, Self(bytes)))
    }
}

impl From<[u8; 32]> for MerkleHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<&NoteCommitment> for MerkleHash {
    fn from(cm: &NoteCommitment) -> Self {
        Self(cm.to_bytes())
    }
}

/// An authentication path for one leaf.
///
/// `auth_path` is deepest-first: entry `i` is the sibling at level `i`.
/// Bit `i` of `position` says whether the running node is the right child
/// at that level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness {
    position: u32,
    tree_size: u32,
    auth_path: [MerkleHash; TREE_DEPTH],
    root: MerkleHash,
}

impl Witness {
    /// Assemble a witness.
    ///
    /// The path must have exactly [`TREE_DEPTH`] siblings and the position
    /// must lie inside the tree, otherwise [`TransactionError::InvalidWitness`].
    pub fn new(
        position: u32,
        tree_size: u32,
        path: Vec<MerkleHash>,
        root: MerkleHash,
    ) -> Result<Self> {
        if position >= tree_size {
            return Err(TransactionError::InvalidWitness);
        }
        let auth_path = <[MerkleHash; TREE_DEPTH]>::try_from(path)
            .map_err(|_path| TransactionError::InvalidWitness)?;
        Ok(Self {
            position,
            tree_size,
            auth_path,
            root,
        })
    }

    /// Leaf index of the witnessed note.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Number of leaves in the tree the root was taken from.
    #[must_use]
    pub const fn tree_size(&self) -> u32 {
        self.tree_size
    }

    /// The claimed tree root (the spend's anchor).
    #[must_use]
    pub const fn root(&self) -> &MerkleHash {
        &self.root
    }

    /// Sibling hashes, deepest first.
    #[must_use]
    pub const fn auth_path(&self) -> &[MerkleHash; TREE_DEPTH] {
        &self.auth_path
    }

    /// Fold `commitment` up the path.
    #[must_use]
    pub fn root_from(&self, commitment: &NoteCommitment) -> MerkleHash {
        self.position
            .view_bits::<Lsb0>()
            .iter()
            .by_vals()
            .zip(self.auth_path.iter())
            .zip(0u8..)
            .fold(MerkleHash::from(commitment), |node, ((is_right, sibling), level)| {
                if is_right {
                    MerkleHash::combine(level, sibling, &node)
                } else {
                    MerkleHash::combine(level, &node, sibling)
                }
            })
    }

    /// Check that `commitment` sits at `position` under `root`.
    ///
    /// A mismatch is [`TransactionError::InvalidWitness`], never a silent
    /// `false`.
    pub fn verify(&self, commitment: &NoteCommitment) -> Result<()> {
        if self.root_from(commitment) == self.root {
            Ok(())
        } else {
            Err(TransactionError::InvalidWitness)
        }
    }
}

/// An append-only in-memory commitment tree.
#[derive(Clone, Debug, Default)]
pub struct CommitmentTree {
    leaves: Vec<MerkleHash>,
}

impl CommitmentTree {
    /// An empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { leaves: Vec::new() }
    }

    /// Number of leaves appended so far.
    #[must_use]
    pub fn len(&self) -> u32 {
        u32::try_from(self.leaves.len()).unwrap_or(u32::MAX)
    }

    /// Whether no leaf has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Append a commitment, returning its position.
    pub fn append(&mut self, commitment: &NoteCommitment) -> Result<u32> {
        let position = u32::try_from(self.leaves.len())
            .map_err(|_err| TransactionError::InvalidState("commitment tree is full"))?;
        if position == u32::MAX {
            return Err(TransactionError::InvalidState("commitment tree is full"));
        }
        self.leaves.push(MerkleHash::from(commitment));
        Ok(position)
    }

    /// The current root.
    #[must_use]
    pub fn root(&self) -> MerkleHash {
        let mut level_nodes = self.leaves.clone();
        for level in (0u8..).take(TREE_DEPTH) {
            level_nodes = parent_level(level, &level_nodes);
        }
        level_nodes
            .first()
            .copied()
            .unwrap_or_else(|| MerkleHash::empty_root(TREE_DEPTH))
    }

    /// Authentication path for the leaf at `position`, or `None` if the
    /// position has not been filled.
    #[must_use]
    pub fn witness(&self, position: u32) -> Option<Witness> {
        let mut index = usize::try_from(position).ok()?;
        if index >= self.leaves.len() {
            return None;
        }
        let mut level_nodes = self.leaves.clone();
        let mut auth_path = Vec::with_capacity(TREE_DEPTH);
        for level in (0u8..).take(TREE_DEPTH) {
            let sibling = level_nodes
                .get(index ^ 1)
                .copied()
                .unwrap_or_else(|| MerkleHash::empty_root(usize::from(level)));
            auth_path.push(sibling);
            level_nodes = parent_level(level, &level_nodes);
            index >>= 1;
        }
        let root = level_nodes.first().copied()?;
        Witness::new(position, self.len(), auth_path, root).ok()
    }
}

/// Hash one level into the next, padding an odd tail with the empty
/// subtree root.
fn parent_level(level: u8, nodes: &[MerkleHash]) -> Vec<MerkleHash> {
    let empty = MerkleHash::empty_root(usize::from(level));
    nodes
        .chunks(2)
        .map(|pair| {
            let left = pair.first().unwrap_or(&empty);
            let right = pair.get(1).unwrap_or(&empty);
            MerkleHash::combine(level, left, right)
        })
        .collect()
}
