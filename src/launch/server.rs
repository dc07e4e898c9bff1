//! The server-side accept loop
//!
//! Runs on its own thread. Each inbound connection carries one launch
//! message; applying it (open every path, pick the new active file, notify
//! the UI) happens under a single session lock, so a whole batch is atomic
//! relative to UI-triggered mutations. The loop holds no lock while blocked
//! in accept.
//!
//! An accept error ends the loop. Closing the listening socket at process
//! exit produces exactly such an error, and the transport gives no way to
//! tell the two cases apart; the shutdown flag lets an orderly exit mark
//! its intent first so only unexpected failures get logged.
//!
//! Note: the shutdown handle is for the UI layer's exit path.
#![allow(dead_code)]

use std::io::{self, Read};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::LaunchMessage;
use crate::ui::Frontend;
use crate::util::log;
use crate::workspace::Session;

pub struct LaunchServer {
    listener: UnixListener,
    socket_path: PathBuf,
    shutdown: Arc<AtomicBool>,
}

/// Marks an orderly shutdown before the listener goes away, so the accept
/// loop can stay quiet about the resulting error.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn signal(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl LaunchServer {
    pub fn new(listener: UnixListener, socket_path: PathBuf) -> Self {
        Self {
            listener,
            socket_path,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Start the accept loop as background work.
    pub fn spawn(
        self,
        session: Arc<Mutex<Session>>,
        frontend: Arc<dyn Frontend>,
    ) -> JoinHandle<()> {
        thread::spawn(move || self.serve(session, frontend))
    }

    fn serve(self, session: Arc<Mutex<Session>>, frontend: Arc<dyn Frontend>) {
        loop {
            let mut stream = match self.listener.accept() {
                Ok((stream, _)) => stream,
                Err(e) => {
                    if !self.shutdown.load(Ordering::SeqCst) {
                        log(&format!("launch channel closed: {}", e));
                    }
                    break;
                }
            };
            let raw = match read_message(&mut stream) {
                Ok(raw) => raw,
                Err(e) => {
                    log(&format!("cannot read launch message: {}", e));
                    continue;
                }
            };
            if raw.is_empty() {
                // A client with no file arguments connects without writing.
                continue;
            }
            apply_message(&LaunchMessage::decode(&raw), &session, frontend.as_ref());
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Open every path from one message and, if anything opened, surface the
/// most recent navigation target through the frontend. One lock acquisition
/// covers the whole batch.
fn apply_message(msg: &LaunchMessage, session: &Mutex<Session>, frontend: &dyn Frontend) {
    let mut session = match session.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let mut opened = 0;
    for path in &msg.paths {
        if session.open_file_at_line(path, msg.focus_line) {
            opened += 1;
        }
    }
    if opened == 0 {
        return;
    }
    let target = session.activate_latest();

    // The lock stays held through the notifications: one message batch,
    // including the UI hand-off, is atomic relative to UI-triggered
    // mutations. Frontends get everything they need as arguments and must
    // not reach back into the session.
    frontend.present_window();
    frontend.refresh_file_list();
    if let Some(target) = target {
        frontend.switch_to_file(&target);
    }
}

/// Accumulate one message from the stream: read until the blank-line
/// terminator shows up or the peer closes its end.
fn read_message(stream: &mut UnixStream) -> io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(2).any(|w| w == b"\n\n") {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::{provide_server, LaunchOptions, Role};
    use std::io::Write;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingFrontend {
        presented: Mutex<u32>,
        switched: Mutex<Vec<String>>,
    }

    impl Frontend for RecordingFrontend {
        fn present_window(&self) {
            *self.presented.lock().unwrap() += 1;
        }
        fn refresh_file_list(&self) {}
        fn switch_to_file(&self, path: &str) {
            self.switched.lock().unwrap().push(path.to_string());
        }
    }

    fn write_file(dir: &std::path::Path, name: &str, content: &[u8]) -> String {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_two_launches_share_one_server() {
        let dir = tempfile::tempdir().unwrap();
        let x = write_file(dir.path(), "x.txt", b"first file\n");
        let y = write_file(dir.path(), "y.txt", b"l1\nl2\nl3\nl4\nl5\nl6\n");
        let socket_path = dir.path().join("launch.sock");

        // First launch: wins the socket and becomes the server.
        let first = LaunchOptions {
            socket_path: socket_path.clone(),
            standalone: false,
            focus_line: 1,
            files: vec![x.clone()],
        };
        let Role::Server(listener) = provide_server(&first) else {
            panic!("first launch must become the server");
        };

        let mut session = Session::new();
        for file in &first.files {
            session.open_file_at_line(file, first.focus_line);
        }
        // Same startup tail as main: the freshest history entry becomes
        // the active file.
        session.activate_latest();
        assert_eq!(session.cur_file, x);
        let session = Arc::new(Mutex::new(session));
        let frontend = Arc::new(RecordingFrontend::default());

        let server = LaunchServer::new(listener, socket_path.clone());
        let shutdown = server.shutdown_handle();
        let _handle = server.spawn(
            Arc::clone(&session),
            Arc::clone(&frontend) as Arc<dyn Frontend>,
        );

        // Second launch: same socket, must degrade to a client that
        // forwards its arguments and is done.
        let second = LaunchOptions {
            socket_path,
            standalone: false,
            focus_line: 1,
            files: vec![format!("{}:5", y)],
        };
        assert!(matches!(provide_server(&second), Role::Client));

        // The server applies the message on its own thread.
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if session.lock().unwrap().buffers.contains(&y) {
                break;
            }
            assert!(
                Instant::now() < deadline,
                "server never applied the launch message"
            );
            thread::sleep(Duration::from_millis(10));
        }

        let mut guard = session.lock().unwrap();
        assert!(guard.buffers.contains(&x));
        assert_eq!(guard.cur_file, y);
        let expected = guard.buffers.offset_for_line(&y, 5);
        let rec = guard.buffers.get(&y).unwrap();
        assert_eq!((rec.sel_begin, rec.sel_end), (expected, expected));
        // Backward navigation from y must land on x.
        let snap = guard.snapshot_of_current();
        assert_eq!(guard.navigate_back(snap), Some(x));
        drop(guard);

        assert_eq!(*frontend.presented.lock().unwrap(), 1);
        assert_eq!(*frontend.switched.lock().unwrap(), vec![y]);
        shutdown.signal();
    }

    #[test]
    fn test_apply_keeps_outgoing_file_in_history() {
        let dir = tempfile::tempdir().unwrap();
        let x = write_file(dir.path(), "x.txt", b"first file\n");
        let y = write_file(dir.path(), "y.txt", b"l1\nl2\nl3\nl4\nl5\n");

        let session = Mutex::new(Session::new());
        {
            let mut guard = session.lock().unwrap();
            guard.open_file_at_line(&x, 1);
            guard.activate_latest();
            assert_eq!(guard.cur_file, x);
        }

        let msg = LaunchMessage::new(1, vec![format!("{}:5", y)]);
        apply_message(&msg, &session, &crate::ui::NullFrontend);

        let mut guard = session.lock().unwrap();
        assert_eq!(guard.cur_file, y);
        // The file that was active before the message must still be
        // reachable backward in history.
        let snap = guard.snapshot_of_current();
        assert_eq!(guard.navigate_back(snap), Some(x));
    }

    #[test]
    fn test_message_spanning_multiple_writes() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", b"contents\n");
        let socket_path = dir.path().join("launch.sock");
        let listener = UnixListener::bind(&socket_path).unwrap();

        let session = Arc::new(Mutex::new(Session::new()));
        let frontend: Arc<dyn Frontend> = Arc::new(crate::ui::NullFrontend);
        let server = LaunchServer::new(listener, socket_path.clone());
        let shutdown = server.shutdown_handle();
        let _handle = server.spawn(Arc::clone(&session), frontend);

        // Dribble the message out in pieces; the terminator-scanning read
        // must reassemble it.
        let mut stream = UnixStream::connect(&socket_path).unwrap();
        let encoded = LaunchMessage::new(1, vec![a.clone()]).encode();
        for piece in encoded.as_bytes().chunks(3) {
            stream.write_all(piece).unwrap();
            stream.flush().unwrap();
            thread::sleep(Duration::from_millis(1));
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if session.lock().unwrap().buffers.contains(&a) {
                break;
            }
            assert!(Instant::now() < deadline, "message was never applied");
            thread::sleep(Duration::from_millis(10));
        }
        shutdown.signal();
    }
}
