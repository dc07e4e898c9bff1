//! Launch message codec
//!
//! A client forwards its command line to the running server as plain
//! newline-delimited text: the focus line number first, one absolute path
//! per line after it, and an empty line as terminator. No length prefix,
//! no versioning.

/// The payload a client sends to a running server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchMessage {
    pub focus_line: usize,
    pub paths: Vec<String>,
}

impl LaunchMessage {
    pub fn new(focus_line: usize, paths: Vec<String>) -> Self {
        Self { focus_line, paths }
    }

    pub fn encode(&self) -> String {
        let mut out = format!("{}\n", self.focus_line);
        for path in &self.paths {
            out.push_str(path);
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// Decode a raw message. The first line is the focus line (defaulting
    /// to 1 when it fails to parse); subsequent lines are paths up to the
    /// first empty line.
    pub fn decode(raw: &str) -> Self {
        let mut lines = raw.split('\n');
        let focus_line = lines
            .next()
            .and_then(|l| l.parse().ok())
            .unwrap_or(1);
        let paths = lines
            .take_while(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self { focus_line, paths }
    }
}
