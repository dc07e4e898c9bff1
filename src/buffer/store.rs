//! The file-record store
//!
//! Records are created on first successful read and then live for the whole
//! process: closing a file only clears its considered-open flag, so the
//! navigation stack stops treating the path as a valid target while the
//! record (and its selection) stays available for the session dump.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;

use crate::util::log;

/// In-memory state for one open file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Last known buffer text, kept in sync by the UI snapshotting the
    /// active file before any switch.
    pub content: Vec<u8>,
    /// True if `content` differs from the on-disk state.
    pub modified: bool,
    /// Selection offsets into `content`. Two independent offsets; callers
    /// decide which end is which.
    pub sel_begin: usize,
    pub sel_end: usize,
    /// Cleared when the file is closed. The record itself is kept.
    open: bool,
}

impl FileRecord {
    fn from_disk(content: Vec<u8>) -> Self {
        Self {
            content,
            modified: false,
            sel_begin: 0,
            sel_end: 0,
            open: true,
        }
    }
}

/// Mapping from absolute, simplified path to `FileRecord`.
#[derive(Debug, Default)]
pub struct BufferStore {
    files: HashMap<String, FileRecord>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a record exists for `path`, reading the file from disk when
    /// it is seen for the first time. Returns true once a record exists;
    /// a read failure on an unknown path is logged and yields false.
    pub fn open_and_read(&mut self, path: &str) -> bool {
        if let Some(rec) = self.files.get_mut(path) {
            rec.open = true;
            return true;
        }
        match fs::read(path) {
            Ok(content) => {
                self.files.insert(path.to_string(), FileRecord::from_disk(content));
                true
            }
            Err(e) => {
                log(&format!("cannot read {}: {}", path, e));
                false
            }
        }
    }

    /// Overwrite (or create) the record for `path` with editor state. Called
    /// right before switching away from a file and before a session save, so
    /// the store always reflects the last-seen state of the active file.
    pub fn snapshot(
        &mut self,
        path: &str,
        content: Vec<u8>,
        modified: bool,
        sel_begin: usize,
        sel_end: usize,
    ) {
        self.files.insert(
            path.to_string(),
            FileRecord {
                content,
                modified,
                sel_begin,
                sel_end,
                open: true,
            },
        );
    }

    /// Translate a 1-based line number into a byte offset into the record's
    /// content, saturating at end-of-content.
    pub fn offset_for_line(&self, path: &str, line: usize) -> usize {
        let Some(rec) = self.files.get(path) else {
            return 0;
        };
        let mut cur_line = 1;
        for (y, b) in rec.content.iter().enumerate() {
            if cur_line == line {
                return y;
            }
            if *b == b'\n' {
                cur_line += 1;
            }
        }
        rec.content.len()
    }

    pub fn set_selection(&mut self, path: &str, begin: usize, end: usize) {
        if let Some(rec) = self.files.get_mut(path) {
            rec.sel_begin = begin;
            rec.sel_end = end;
        }
    }

    /// Drop `path` from the considered-open bookkeeping. The record stays in
    /// the map.
    pub fn close(&mut self, path: &str) {
        if let Some(rec) = self.files.get_mut(path) {
            rec.open = false;
        }
    }

    /// Whether `path` is a valid navigation target: a tracked, open record
    /// with a non-empty path.
    pub fn is_open(&self, path: &str) -> bool {
        !path.is_empty() && self.files.get(path).is_some_and(|r| r.open)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileRecord)> {
        self.files.iter()
    }
}
