#![allow(dead_code)]

use once_cell::sync::Lazy;
use reqwest::Client;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio::time::sleep;

pub struct TestServer {
    pub base_url: String,
    child: Child,
    data_dir: TempDir,
}

impl TestServer {
    pub fn api(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }
}

// The child goes first; `data_dir` is removed when the fields drop afterwards.
impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

// Statics are never dropped, so the shared server and its data directory are
// torn down from an atexit hook instead.
#[cfg(unix)]
mod exit_hook {
    use std::path::PathBuf;
    use std::sync::OnceLock;

    static SHARED: OnceLock<(i32, PathBuf)> = OnceLock::new();

    pub fn register(pid: u32, data_dir: PathBuf) {
        if SHARED.set((pid as i32, data_dir)).is_ok() {
            unsafe {
                libc::atexit(on_exit);
            }
        }
    }

    extern "C" fn on_exit() {
        if let Some((pid, data_dir)) = SHARED.get() {
            unsafe {
                libc::kill(*pid, libc::SIGTERM);
            }
            let _ = std::fs::remove_dir_all(data_dir);
        }
    }
}

pub fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/stats")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

/// Starts the server binary on a free port with a fresh data directory.
pub async fn spawn_server(store: &str) -> TestServer {
    let port = pick_free_port();
    let data_dir = tempfile::Builder::new()
        .prefix("habit_tracker_")
        .tempdir()
        .expect("create data dir");
    let file_name = if store == "file" { "habits.json" } else { "habits.db" };

    let child = Command::new(env!("CARGO_BIN_EXE_habit_tracker"))
        .env("PORT", port.to_string())
        .env("HABITS_STORE", store)
        .env("HABITS_DB_PATH", data_dir.path().join(file_name))
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    let server = TestServer {
        base_url,
        child,
        data_dir,
    };
    wait_until_ready(&server.base_url).await;
    server
}

/// One server per test binary, started on first use.
pub async fn shared_server(store: &str) -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(store).await);

    #[cfg(unix)]
    exit_hook::register(server.child.id(), server.data_dir.path().to_path_buf());

    *guard = Some(Arc::clone(&server));
    server
}
