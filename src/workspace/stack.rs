//! Bounded MRU history of visited files
//!
//! A fixed-capacity ring of path strings with three indices: `base` (oldest
//! retained entry), `top` (next write slot) and `max` (forward-history
//! boundary). `base == top` means empty. All three indices move only by
//! wrap-around increment/decrement.
//!
//! The stack stores raw paths, not records; whether a popped path is still
//! worth returning is the caller's business, expressed as a predicate.
#![allow(dead_code)]

pub const STACK_SIZE: usize = 64;

#[derive(Debug)]
pub struct FileStack {
    slots: Vec<String>,
    top: usize,
    base: usize,
    max: usize,
}

fn advance(i: &mut usize) {
    *i += 1;
    if *i == STACK_SIZE {
        *i = 0;
    }
}

fn retreat(i: &mut usize) {
    if *i == 0 {
        *i = STACK_SIZE - 1;
    } else {
        *i -= 1;
    }
}

impl FileStack {
    pub fn new() -> Self {
        Self {
            slots: vec![String::new(); STACK_SIZE],
            top: 0,
            base: 0,
            max: 0,
        }
    }

    /// Record a visit. Pushing the path already at the logical top is a
    /// no-op. Pushing past `max` truncates stale forward history; pushing
    /// into `base` evicts the oldest entry.
    pub fn push(&mut self, name: &str) {
        if name == self.at_top() {
            return;
        }
        self.slots[self.top] = name.to_string();
        if self.top == self.max {
            advance(&mut self.max);
        }
        advance(&mut self.top);
        if self.top == self.base {
            advance(&mut self.base);
        }
    }

    /// Walk `top` backward until an entry passes `valid` or the stack is
    /// exhausted. Skipped entries are discarded, never re-added.
    pub fn pop(&mut self, mut valid: impl FnMut(&str) -> bool) -> Option<String> {
        loop {
            if self.base == self.top {
                return None;
            }
            retreat(&mut self.top);
            let name = self.slots[self.top].clone();
            if valid(&name) {
                return Some(name);
            }
        }
    }

    /// The path at the logical top (empty string when the stack is empty or
    /// the slot was never written).
    pub fn at_top(&self) -> &str {
        let mut t = self.top;
        retreat(&mut t);
        &self.slots[t]
    }

    /// True when no forward history exists beyond the current position.
    pub fn at_forward_boundary(&self) -> bool {
        self.top == self.max
    }

    /// The slot at the write position. After a boundary-checked snapshot
    /// push this is the forward-history entry to switch to.
    pub fn forward_slot(&self) -> &str {
        &self.slots[self.top]
    }

    /// Pull the forward boundary back one slot. Used when backward
    /// navigation starts from the newest position.
    pub fn retreat_max(&mut self) {
        retreat(&mut self.max);
    }

    pub fn is_empty(&self) -> bool {
        self.base == self.top
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        (self.top + STACK_SIZE - self.base) % STACK_SIZE
    }
}

impl Default for FileStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(stack: &mut FileStack) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(name) = stack.pop(|_| true) {
            out.push(name);
        }
        out
    }

    #[test]
    fn test_push_and_pop_order() {
        let mut stack = FileStack::new();
        stack.push("/a");
        stack.push("/b");
        stack.push("/c");
        assert_eq!(drain(&mut stack), vec!["/c", "/b", "/a"]);
    }

    #[test]
    fn test_push_top_is_noop() {
        let mut stack = FileStack::new();
        stack.push("/a");
        stack.push("/b");
        let (top, base, max) = (stack.top, stack.base, stack.max);
        stack.push("/b");
        assert_eq!((stack.top, stack.base, stack.max), (top, base, max));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_pop_empty_leaves_indices_alone() {
        let mut stack = FileStack::new();
        assert_eq!(stack.pop(|_| true), None);
        assert_eq!((stack.top, stack.base, stack.max), (0, 0, 0));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut stack = FileStack::new();
        for i in 0..STACK_SIZE + 1 {
            stack.push(&format!("/f{}", i));
        }
        assert!(stack.len() < STACK_SIZE);
        let drained = drain(&mut stack);
        // Newest is first out; the oldest pushes were evicted.
        assert_eq!(drained[0], format!("/f{}", STACK_SIZE));
        assert!(!drained.contains(&"/f0".to_string()));
    }

    #[test]
    fn test_pop_skips_invalid_entries() {
        let mut stack = FileStack::new();
        stack.push("/a");
        stack.push("/closed");
        stack.push("/b");
        let mut seen = Vec::new();
        let got = stack.pop(|name| {
            seen.push(name.to_string());
            name != "/closed" && name != "/b"
        });
        assert_eq!(got, Some("/a".to_string()));
        assert_eq!(seen, vec!["/b", "/closed", "/a"]);
        // Skipped entries are gone for good.
        assert_eq!(stack.pop(|_| true), None);
    }

    #[test]
    fn test_forward_boundary() {
        let mut stack = FileStack::new();
        stack.push("/a");
        stack.push("/b");
        assert!(stack.at_forward_boundary());
        // Going back one entry exposes forward history.
        stack.pop(|_| true);
        assert!(!stack.at_forward_boundary());
        assert_eq!(stack.forward_slot(), "/b");
    }
}
