//! Posting flags carried alongside a [`crate::posting::Posting`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Mirrors the accounting engine's own transfer-flag bits, not a Rust
    /// invention — `Linked` chains postings into one atomic unit, `Pending`
    /// reserves funds without moving them, `PostPending`/`VoidPending`
    /// resolve a prior pending posting by id and are mutually exclusive.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PostingFlags: u16 {
        const LINKED = 1 << 0;
        const PENDING = 1 << 1;
        const POST_PENDING = 1 << 2;
        const VOID_PENDING = 1 << 3;
    }
}

impl PostingFlags {
    pub const fn empty_flags() -> Self {
        Self::empty()
    }
}

impl Default for PostingFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linked_and_pending_combine() {
        let f = PostingFlags::LINKED | PostingFlags::PENDING;
        assert!(f.contains(PostingFlags::LINKED));
        assert!(f.contains(PostingFlags::PENDING));
        assert!(!f.contains(PostingFlags::POST_PENDING));
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(PostingFlags::default(), PostingFlags::empty());
    }
}
