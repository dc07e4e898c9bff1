//! Path normalization for file arguments
//!
//! Arguments arrive from the command line (or over the launch channel, where
//! the client has already normalized them). They are keyed by absolute,
//! textually simplified path in the buffer store, so every entry point runs
//! through `prefixed` + `split_focus` + `simplified` before touching state.

use std::env;

use crate::util::log;

/// Prefix a relative path with the current working directory.
///
/// Failure to obtain the working directory is logged and the path is
/// returned unchanged; callers treat the result as best-effort.
pub fn prefixed(path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    match env::current_dir() {
        Ok(wd) => format!("{}/{}", wd.display(), path),
        Err(e) => {
            log(&format!("cannot resolve working directory: {}", e));
            path.to_string()
        }
    }
}

/// Textually collapse `/./` and `/../` segments.
///
/// Purely lexical: no symlink resolution and no root-escape clamping.
/// A `/../` with no preceding component to cancel (malformed input) just
/// drops everything up to and including itself.
pub fn simplified(path: &str) -> String {
    let mut res = path.to_string();
    while let Some(i) = res.find("/./") {
        res.replace_range(i + 1..i + 3, "");
    }
    while let Some(i) = res.find("/../") {
        match res[..i].rfind('/') {
            Some(prev) => res.replace_range(prev + 1..i + 4, ""),
            None => res.replace_range(..i + 4, ""),
        }
    }
    res
}

/// Split a trailing `:<line>` focus suffix off a file argument.
///
/// Splits at the first colon; if the remainder does not parse as a line
/// number the suffix is still consumed and the caller's default applies.
pub fn split_focus(arg: &str) -> (&str, Option<usize>) {
    match arg.split_once(':') {
        Some((path, rest)) => (path, rest.parse().ok()),
        None => (arg, None),
    }
}
