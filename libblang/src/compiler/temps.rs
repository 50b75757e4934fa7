// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `temps` module defines the allocator for function-local stack slots.

/// Allocates dense, 1-based stack-slot indices within one function.
///
/// `count` is the number of slots currently live and `max` the high-water mark. A statement or
/// expression grouping captures `count` with [AutoVarAllocator::mark] on entry and restores it
/// with [AutoVarAllocator::release_to] on exit, so siblings reuse slots while `max` still
/// upper-bounds every index ever handed out. `max` becomes the function's frame size.
#[derive(Debug, Default, Copy, Clone)]
pub struct AutoVarAllocator {
    count: usize,
    max: usize,
}

impl AutoVarAllocator {
    /// Creates an allocator with no live slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next slot and returns its 1-based index.
    pub fn allocate(&mut self) -> usize {
        self.count += 1;
        if self.count > self.max {
            self.max = self.count;
        }
        self.count
    }

    /// Captures the current live-slot count.
    pub fn mark(&self) -> usize {
        self.count
    }

    /// Releases every slot allocated since the matching [AutoVarAllocator::mark]. The high-water
    /// mark is never lowered.
    pub fn release_to(&mut self, mark: usize) {
        debug_assert!(mark <= self.count);
        self.count = mark;
    }

    /// The high-water mark of concurrently live slots.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Resets the allocator at a function boundary.
    pub fn reset(&mut self) {
        self.count = 0;
        self.max = 0;
    }
}
