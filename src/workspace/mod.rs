//! Workspace module - the editing session context
//!
//! One `Session` owns everything a running editor process mutates: the
//! buffer store, the navigation stack, the ignore list and the active file
//! path. `main` creates it, restores it from disk, and shares it with the
//! launch server behind a mutex; applying one launch message is one lock
//! acquisition, the same exclusion domain the UI uses for its own edits.
//!
//! Note: the navigation entry points are driven by the UI layer.
#![allow(dead_code)]

pub mod session;
mod stack;

pub use stack::{FileStack, STACK_SIZE};

use crate::buffer::{BufferStore, FileRecord};
use crate::util::path::{simplified, split_focus};

use session::IgnoreSet;

/// Editor-side state of the active file, handed to the core whenever it
/// needs to capture "what the user currently sees".
#[derive(Debug, Clone, Default)]
pub struct EditorSnapshot {
    pub content: Vec<u8>,
    pub modified: bool,
    pub sel_begin: usize,
    pub sel_end: usize,
}

#[derive(Debug, Default)]
pub struct Session {
    pub buffers: BufferStore,
    pub stack: FileStack,
    pub ignore: IgnoreSet,
    /// Path of the active file; empty when nothing is active.
    pub cur_file: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a file argument of the form `path[:line]`, normalize it, read it
    /// into the store and position its selection at the requested line
    /// (`default_line` when no suffix is given). Returns false when the file
    /// could not be opened.
    pub fn open_file_at_line(&mut self, arg: &str, default_line: usize) -> bool {
        let (path, suffix_line) = split_focus(arg);
        let focus_line = suffix_line.unwrap_or(default_line);
        let path = simplified(path);
        if !self.open_and_track(&path) {
            return false;
        }
        let offset = self.buffers.offset_for_line(&path, focus_line);
        self.buffers.set_selection(&path, offset, offset);
        true
    }

    /// Read a file into the store and record the visit on the stack.
    pub fn open_and_track(&mut self, path: &str) -> bool {
        if !self.buffers.open_and_read(path) {
            return false;
        }
        self.stack.push(path);
        true
    }

    /// Snapshot the active file into the store and record the visit.
    /// Call this before switching away, and before saving a session.
    pub fn save_current(&mut self, snap: EditorSnapshot) {
        if !self.cur_file.is_empty() {
            self.buffers.snapshot(
                &self.cur_file,
                snap.content,
                snap.modified,
                snap.sel_begin,
                snap.sel_end,
            );
        }
        let cur = self.cur_file.clone();
        self.stack.push(&cur);
    }

    /// Make `name` the active file and hand its record to the caller.
    /// An unknown name clears the active file instead.
    pub fn switch_to(&mut self, name: &str) -> Option<&FileRecord> {
        if self.buffers.contains(name) {
            self.cur_file = name.to_string();
        } else {
            self.cur_file.clear();
        }
        self.buffers.get(&self.cur_file)
    }

    /// Most recent stack entry that is still an open file.
    pub fn pop_latest(&mut self) -> Option<String> {
        let Session { stack, buffers, .. } = self;
        stack.pop(|name| buffers.is_open(name))
    }

    /// Make the most recent open file in history the active one: pop it,
    /// re-record the outgoing active file, then switch. The shared tail of
    /// process startup and of applying a launch message.
    pub fn activate_latest(&mut self) -> Option<String> {
        let target = self.pop_latest();
        let snap = self.snapshot_of_current();
        self.save_current(snap);
        if let Some(target) = &target {
            self.switch_to(target);
        }
        target
    }

    pub fn close_file(&mut self, path: &str) {
        self.buffers.close(path);
    }

    /// Forward navigation. Snapshotting the active file re-records it at the
    /// current position, after which the slot at the write position is the
    /// forward entry to switch to.
    pub fn navigate_forward(&mut self, snap: EditorSnapshot) -> Option<String> {
        if self.stack.at_forward_boundary() {
            return None;
        }
        self.save_current(snap);
        Some(self.stack.forward_slot().to_string())
    }

    /// Backward navigation: snapshot, step over the entry for the active
    /// file, and return the one before it. `None` means history is
    /// exhausted.
    pub fn navigate_back(&mut self, snap: EditorSnapshot) -> Option<String> {
        let from_newest = self.stack.at_forward_boundary();
        self.save_current(snap);
        if from_newest {
            self.stack.retreat_max();
        }
        // Drop the entry save_current just recorded for the active file.
        self.pop_latest();
        self.pop_latest()
    }

    /// The store's view of the active file, as an `EditorSnapshot`. Used by
    /// headless callers that have no live buffer to capture.
    pub fn snapshot_of_current(&self) -> EditorSnapshot {
        match self.buffers.get(&self.cur_file) {
            Some(rec) => EditorSnapshot {
                content: rec.content.clone(),
                modified: rec.modified,
                sel_begin: rec.sel_begin,
                sel_end: rec.sel_end,
            },
            None => EditorSnapshot::default(),
        }
    }
}
