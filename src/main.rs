mod buffer;
mod launch;
mod ui;
mod util;
mod workspace;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;

use launch::{provide_server, LaunchOptions, LaunchServer, Role};
use ui::{Frontend, NullFrontend};
use util::path::prefixed;
use workspace::{session, Session};

#[derive(Parser, Debug)]
#[command(name = "tabby")]
#[command(about = "Single-instance text editor core", long_about = None)]
struct Cli {
    /// Focus line for newly opened files
    #[arg(short = 'f', long = "focus-line", default_value_t = 1)]
    focus_line: usize,

    /// Force a new standalone instance instead of forwarding to a running one
    #[arg(short = 's', long = "standalone")]
    standalone: bool,

    /// Files to open, each optionally suffixed with :<line>
    files: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let files: Vec<String> = cli.files.iter().map(|f| prefixed(f)).collect();

    let opts = LaunchOptions {
        socket_path: launch::default_socket_path(),
        standalone: cli.standalone,
        focus_line: cli.focus_line,
        files,
    };
    let role = provide_server(&opts);
    if matches!(role, Role::Client) {
        // Arguments were handed to the running instance; nothing else to do.
        return Ok(());
    }

    let mut sess = Session::new();
    session::restore(&mut sess);
    for file in &opts.files {
        sess.open_file_at_line(file, opts.focus_line);
    }
    sess.activate_latest();
    let sess = Arc::new(Mutex::new(sess));
    let frontend: Arc<dyn Frontend> = Arc::new(NullFrontend);

    if let Role::Server(listener) = role {
        let server = LaunchServer::new(listener, opts.socket_path.clone());
        let handle = server.spawn(Arc::clone(&sess), frontend);
        // Headless core: serve launches until the socket is torn down. The
        // UI layer, when present, owns the main thread instead.
        let _ = handle.join();
    }

    let mut sess = match sess.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let snap = sess.snapshot_of_current();
    session::save(&mut sess, snap)?;
    Ok(())
}
