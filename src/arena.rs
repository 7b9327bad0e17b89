//! Slab storage for tree nodes.
//!
//! The splay tree owns every node through its arena; links between nodes and the ancestor paths
//! kept by cursors are plain `Handle`s, which never own anything.

use std::mem;
use std::ops::{Index, IndexMut};

/// A copyable, non-owning reference to a slot of an `Arena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle(usize);

enum Block<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// An allocator for a single type of object that recycles freed slots.
///
/// Every object is dropped when the arena is dropped or cleared. Freed slots are chained into a
/// free list and handed out again by later allocations, so a handle is only meaningful while the
/// object it was returned for is still allocated.
pub struct Arena<T> {
    head: Option<usize>,
    blocks: Vec<Block<T>>,
    len: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            head: None,
            blocks: Vec::new(),
            len: 0,
        }
    }

    /// Number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Moves `value` into the arena and returns its handle.
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.blocks.push(Block::Occupied(value));
                Handle(self.blocks.len() - 1)
            },
            Some(index) => {
                let vacant_block = mem::replace(&mut self.blocks[index], Block::Occupied(value));
                match vacant_block {
                    Block::Vacant(next) => self.head = next,
                    Block::Occupied(_) => unreachable!("free list points at an occupied block"),
                }
                Handle(index)
            },
        }
    }

    /// Moves the object out of the arena and recycles its slot.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to a live object.
    pub fn free(&mut self, handle: Handle) -> T {
        let Handle(index) = handle;
        assert!(index < self.blocks.len(), "attempting to free an invalid block");
        let old_block = mem::replace(&mut self.blocks[index], Block::Vacant(self.head));
        match old_block {
            Block::Vacant(next) => {
                self.blocks[index] = Block::Vacant(next);
                panic!("attempting to free a vacant block");
            },
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(index);
                value
            },
        }
    }

    /// Drops every object and forgets every slot.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.head = None;
        self.len = 0;
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.blocks.get(handle.0) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.blocks.get_mut(handle.0) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle does not refer to a live node.")
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle does not refer to a live node.")
    }
}
