//! Session persistence
//!
//! The session file holds one line per open file, `path:begin:end`, with
//! files not on the navigation stack first and stack files last in
//! oldest-to-newest order, so the most recently used file is the final
//! line. Content is never persisted, only path and selection.
//!
//! A companion ignore file holds one regex pattern per line; names that
//! match are left out of the session dump. Both files live in the user's
//! home directory and their absence simply means "empty".

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use super::{EditorSnapshot, Session};
use crate::util::log;

const SESSION_FILE: &str = ".tabby";
const IGNORE_FILE: &str = ".tabbyignore";

/// Compiled ignore patterns, keyed by their raw source line. Patterns that
/// fail to compile stay as inert entries that never match.
#[derive(Debug, Default)]
pub struct IgnoreSet {
    patterns: std::collections::HashMap<String, Option<Regex>>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pattern: &str) {
        let compiled = Regex::new(pattern).ok();
        if compiled.is_none() {
            log(&format!("ignoring unparsable pattern: {}", pattern));
        }
        self.patterns.insert(pattern.to_string(), compiled);
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns
            .values()
            .flatten()
            .any(|re| re.is_match(name))
    }
}

/// Whether a name counts as a saved file for session purposes: it must
/// carry a path component and not match the ignore list.
fn is_saved_name(session: &Session, name: &str) -> bool {
    name.contains('/') && !session.ignore.matches(name)
}

fn home_file(name: &str) -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(name)
}

/// Save the session to the per-user session file.
pub fn save(session: &mut Session, snap: EditorSnapshot) -> Result<()> {
    save_to(session, snap, &home_file(SESSION_FILE))
}

/// Restore the session and the ignore list from their per-user files.
pub fn restore(session: &mut Session) {
    restore_from(session, &home_file(SESSION_FILE), &home_file(IGNORE_FILE));
}

/// Save to an explicit path. Snapshots the active file first, then writes
/// every record not on the stack followed by the stack's files in
/// oldest-to-newest order. The whole file is rewritten; a crash mid-write
/// can lose the session, which is accepted for a single-user best-effort
/// store.
pub fn save_to(session: &mut Session, snap: EditorSnapshot, path: &Path) -> Result<()> {
    session.save_current(snap);
    let (on_stack, stack_list) = drain_stack_set(session);

    let mut out = String::new();
    for (name, rec) in session.buffers.iter() {
        if !on_stack.contains(name.as_str()) && is_saved_name(session, name) {
            out.push_str(&format!("{}:{}:{}\n", name, rec.sel_begin, rec.sel_end));
        }
    }
    // stack_list is newest-first; the most recent file must be the last line.
    for name in stack_list.iter().rev() {
        if let Some(rec) = session.buffers.get(name) {
            out.push_str(&format!("{}:{}:{}\n", name, rec.sel_begin, rec.sel_end));
        }
    }
    fs::write(path, out).with_context(|| format!("unable to save session to {}", path.display()))
}

/// Drain the navigation stack into the set of saved files it holds,
/// newest-first and de-duplicated, starting with the active file.
fn drain_stack_set(session: &mut Session) -> (HashSet<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut list = Vec::new();
    let mut add = |session: &Session, name: &str, list: &mut Vec<String>| {
        if is_saved_name(session, name) && seen.insert(name.to_string()) {
            list.push(name.to_string());
        }
    };
    let cur = session.cur_file.clone();
    add(session, &cur, &mut list);
    while let Some(name) = session.pop_latest() {
        add(session, &name, &mut list);
    }
    (seen, list)
}

/// Restore from explicit paths. Malformed lines are skipped or defaulted;
/// files that no longer open are dropped from the session.
pub fn restore_from(session: &mut Session, session_path: &Path, ignore_path: &Path) {
    let content = fs::read_to_string(session_path).unwrap_or_default();
    for line in content.lines() {
        let mut fields = line.splitn(3, ':');
        let path = fields.next().unwrap_or("");
        if path.is_empty() {
            continue;
        }
        if session.open_and_track(path) {
            let begin = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
            let end = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
            session.buffers.set_selection(path, begin, end);
        }
    }

    session.ignore = IgnoreSet::new();
    let patterns = fs::read_to_string(ignore_path).unwrap_or_default();
    for line in patterns.lines() {
        if !line.is_empty() {
            session.ignore.insert(line);
        }
    }
}
