//! Launch coordination
//!
//! Decides, once per process start, whether this process becomes the
//! long-lived editor server or a disposable client. The rendezvous point is
//! a per-user unix socket; whoever binds it first is the server, everyone
//! else connects, forwards their file arguments as a `LaunchMessage`, and
//! exits. A socket that exists but accepts no connection is stale and gets
//! unlinked before the attempt is repeated.

mod message;
mod server;

pub use message::LaunchMessage;
pub use server::{LaunchServer, ShutdownHandle};

use std::env;
use std::fs;
use std::io::Write;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;

use crate::util::log;

/// Attempts at winning or reaching the rendezvous socket before giving up
/// and running standalone.
pub const MAX_RETRIES: u32 = 3;

/// Everything the coordinator needs from the command line.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub socket_path: PathBuf,
    pub standalone: bool,
    pub focus_line: usize,
    /// Absolute file arguments, focus suffixes still attached.
    pub files: Vec<String>,
}

/// Outcome of the launch decision.
pub enum Role {
    /// This process owns the rendezvous socket and serves future launches.
    Server(UnixListener),
    /// Arguments were forwarded to a running server; exit without UI.
    Client,
    /// No coordination: forced by `-s`, an unsupported platform, or
    /// exhausted retries.
    Standalone,
}

/// The per-user rendezvous socket, named from the user identity.
pub fn default_socket_path() -> PathBuf {
    let user = env::var("USER").unwrap_or_default();
    PathBuf::from(format!("/tmp/tabby-{}", user))
}

/// Run the server/client decision. Never fails: every error path degrades
/// to `Role::Standalone`.
pub fn provide_server(opts: &LaunchOptions) -> Role {
    if opts.standalone || !cfg!(unix) {
        return Role::Standalone;
    }
    for _ in 0..=MAX_RETRIES {
        if let Ok(listener) = UnixListener::bind(&opts.socket_path) {
            return Role::Server(listener);
        }
        // The name is taken. Assume a live server and hand our arguments
        // over.
        match UnixStream::connect(&opts.socket_path) {
            Ok(mut stream) => {
                if !opts.files.is_empty() {
                    let msg = LaunchMessage::new(opts.focus_line, opts.files.clone());
                    if let Err(e) = stream.write_all(msg.encode().as_bytes()) {
                        log(&format!("cannot forward arguments: {}", e));
                    }
                }
                return Role::Client;
            }
            Err(_) => {
                // Socket exists but nothing listens behind it: a leftover
                // from a dead process. Unlink it and repeat the decision.
                let _ = fs::remove_file(&opts.socket_path);
            }
        }
    }
    Role::Standalone
}
