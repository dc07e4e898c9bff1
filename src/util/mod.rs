//! Small shared helpers: path normalization and best-effort logging.

pub mod path;

/// Best-effort log sink. Nothing in the core treats a logged failure as
/// fatal, so one stderr line is all that is needed.
pub fn log(msg: &str) {
    eprintln!("tabby: {}", msg);
}
