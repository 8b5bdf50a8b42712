//! Cache set with an index-linked recency list.
//!
//! Blocks live in a flat vector indexed by way. The recency order is a doubly linked
//! list threaded through the blocks by way index: `head` is the most recently promoted
//! block, `tail` the least. Reordering never moves a block's storage.
//!
//! # Performance
//!
//! - `move_to_head()` / `move_to_tail()`: O(1)
//! - `move_to_position()` / `promote()` / `position()`: O(W) where W is the associativity

use std::iter;

use super::block::CacheBlock;

/// One set: `assoc` blocks plus their recency order.
#[derive(Clone, Debug)]
pub struct CacheSet {
    blocks: Vec<CacheBlock>,
    head: usize,
    tail: usize,
}

impl CacheSet {
    /// Creates a set of `assoc` invalid blocks ordered way 0 (head) to way `assoc - 1` (tail).
    ///
    /// # Panics
    ///
    /// Panics if `assoc` is zero.
    pub fn new(assoc: usize) -> Self {
        assert!(assoc > 0, "a set needs at least one way");
        let mut blocks: Vec<CacheBlock> = (0..assoc).map(CacheBlock::new).collect();
        for way in 0..assoc {
            blocks[way].prev = way.checked_sub(1);
            blocks[way].next = (way + 1 < assoc).then_some(way + 1);
        }
        Self {
            blocks,
            head: 0,
            tail: assoc - 1,
        }
    }

    /// Ways in this set.
    #[inline]
    pub fn assoc(&self) -> usize {
        self.blocks.len()
    }

    /// Block stored in `way`.
    #[inline]
    pub fn block(&self, way: usize) -> &CacheBlock {
        &self.blocks[way]
    }

    /// Mutable block stored in `way`.
    #[inline]
    pub fn block_mut(&mut self, way: usize) -> &mut CacheBlock {
        &mut self.blocks[way]
    }

    /// All blocks in way order.
    #[inline]
    pub fn blocks(&self) -> &[CacheBlock] {
        &self.blocks
    }

    /// All blocks in way order, mutably. Reordering goes through the `move_*` methods.
    #[inline]
    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut CacheBlock> {
        self.blocks.iter_mut()
    }

    /// Way of the valid block holding `tag` in the given security state.
    pub fn find(&self, tag: u64, secure: bool) -> Option<usize> {
        self.blocks.iter().position(|b| b.matches(tag, secure))
    }

    /// Most recently promoted way.
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Least recently promoted way.
    #[inline]
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Ways from head (MRU) to tail (LRU).
    pub fn iter_mru(&self) -> impl Iterator<Item = usize> + '_ {
        iter::successors(Some(self.head), move |&way| self.blocks[way].next)
    }

    /// Ways from tail (LRU) to head (MRU).
    pub fn iter_lru(&self) -> impl Iterator<Item = usize> + '_ {
        iter::successors(Some(self.tail), move |&way| self.blocks[way].prev)
    }

    /// Recency order as a vector of ways, head first.
    pub fn recency(&self) -> Vec<usize> {
        self.iter_mru().collect()
    }

    /// Distance of `way` from the head.
    pub fn position(&self, way: usize) -> usize {
        self.iter_mru()
            .position(|w| w == way)
            .unwrap_or(self.blocks.len() - 1)
    }

    /// Moves `way` to the head.
    pub fn move_to_head(&mut self, way: usize) {
        if way == self.head {
            return;
        }
        self.unlink(way);
        self.link_before(way, Some(self.head));
    }

    /// Moves `way` to the tail.
    pub fn move_to_tail(&mut self, way: usize) {
        if way == self.tail {
            return;
        }
        self.unlink(way);
        self.link_before(way, None);
    }

    /// Moves `way` so that it sits `pos` slots from the head.
    ///
    /// Positions past the tail are clamped to the tail.
    pub fn move_to_position(&mut self, way: usize, pos: usize) {
        let last = self.blocks.len() - 1;
        if pos == 0 {
            self.move_to_head(way);
            return;
        }
        if pos >= last {
            self.move_to_tail(way);
            return;
        }
        self.unlink(way);
        // `way` is off the list, so the block now at `pos` is the one to precede.
        let anchor = self.iter_mru().nth(pos);
        self.link_before(way, anchor);
    }

    /// Moves `way` `offset` slots toward the head, stopping at the head.
    pub fn promote(&mut self, way: usize, offset: usize) {
        if offset == 0 {
            return;
        }
        let pos = self.position(way).saturating_sub(offset);
        self.move_to_position(way, pos);
    }

    /// Recency list is a permutation of exactly this set's ways with consistent links.
    pub fn is_well_formed(&self) -> bool {
        let assoc = self.blocks.len();
        let mut seen = vec![false; assoc];
        let mut prev = None;
        let mut count = 0;
        let mut cursor = Some(self.head);
        while let Some(way) = cursor {
            if way >= assoc || seen[way] || self.blocks[way].prev != prev {
                return false;
            }
            seen[way] = true;
            count += 1;
            prev = Some(way);
            cursor = self.blocks[way].next;
        }
        count == assoc && prev == Some(self.tail)
    }

    fn unlink(&mut self, way: usize) {
        let prev = self.blocks[way].prev;
        let next = self.blocks[way].next;
        match prev {
            Some(p) => self.blocks[p].next = next,
            None => {
                if let Some(n) = next {
                    self.head = n;
                }
            }
        }
        match next {
            Some(n) => self.blocks[n].prev = prev,
            None => {
                if let Some(p) = prev {
                    self.tail = p;
                }
            }
        }
        self.blocks[way].prev = None;
        self.blocks[way].next = None;
    }

    /// Links an unlinked `way` in front of `anchor`, or at the tail when `anchor` is `None`.
    fn link_before(&mut self, way: usize, anchor: Option<usize>) {
        match anchor {
            Some(at) => {
                let prev = self.blocks[at].prev;
                self.blocks[way].prev = prev;
                self.blocks[way].next = Some(at);
                self.blocks[at].prev = Some(way);
                match prev {
                    Some(p) => self.blocks[p].next = Some(way),
                    None => self.head = way,
                }
            }
            None => {
                let tail = self.tail;
                self.blocks[way].prev = Some(tail);
                self.blocks[way].next = None;
                self.blocks[tail].next = Some(way);
                self.tail = way;
            }
        }
    }
}
