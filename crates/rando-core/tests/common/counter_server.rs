//! Minimal HTTP/1.1 server emulating the click counter service for
//! integration tests, plus an optional rule-config document.
//!
//! `POST /c` creates a counter, `GET /c/{id}` reads it and `POST /c/{id}`
//! increments it. `GET /rules.json` serves the configured rules body and
//! `GET /random` the configured random website.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Body served at `/rules.json`; 404 if unset.
    pub rules_json: Option<String>,
    /// Body served at `/random`; 404 if unset.
    pub random_url: Option<String>,
    /// Every counter request answers 500.
    pub counter_broken: bool,
    /// Increments answer with a non-numeric body.
    pub garbage_counts: bool,
}

#[derive(Default)]
struct ServerState {
    counters: Mutex<HashMap<String, u64>>,
    next_id: AtomicUsize,
    rule_hits: AtomicUsize,
}

pub struct TestServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base: String,
    state: Arc<ServerState>,
}

impl TestServer {
    pub fn counter_url(&self) -> String {
        format!("{}/c", self.base)
    }

    pub fn rules_url(&self) -> String {
        format!("{}/rules.json", self.base)
    }

    pub fn random_url(&self) -> String {
        format!("{}/random", self.base)
    }

    pub fn rule_hits(&self) -> usize {
        self.state.rule_hits.load(Ordering::SeqCst)
    }

    pub fn count(&self, id: &str) -> Option<u64> {
        self.state.counters.lock().unwrap().get(id).copied()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(ServerState::default());
    let opts = Arc::new(opts);
    let shared = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&shared);
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &state, &opts));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        state,
    }
}

fn handle(mut stream: std::net::TcpStream, state: &ServerState, opts: &ServerOptions) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    let (status, body) = route(method, path, state, opts);
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn route(method: &str, path: &str, state: &ServerState, opts: &ServerOptions) -> (&'static str, String) {
    const NOT_FOUND: &str = "404 Not Found";
    if path == "/rules.json" && method.eq_ignore_ascii_case("GET") {
        state.rule_hits.fetch_add(1, Ordering::SeqCst);
        return match &opts.rules_json {
            Some(body) => ("200 OK", body.clone()),
            None => (NOT_FOUND, String::new()),
        };
    }
    if path == "/random" && method.eq_ignore_ascii_case("GET") {
        return match &opts.random_url {
            Some(body) => ("200 OK", format!("{body}\n")),
            None => (NOT_FOUND, String::new()),
        };
    }
    let Some(rest) = path.strip_prefix("/c") else {
        return (NOT_FOUND, String::new());
    };
    if opts.counter_broken {
        return ("500 Internal Server Error", "boom".to_string());
    }
    let mut counters = state.counters.lock().unwrap();
    match (method.to_ascii_uppercase().as_str(), rest.trim_start_matches('/')) {
        ("POST", "") => {
            let id = format!("ctr{}", state.next_id.fetch_add(1, Ordering::SeqCst));
            counters.insert(id.clone(), 0);
            ("200 OK", id)
        }
        ("GET", id) => match counters.get(id) {
            Some(n) => ("200 OK", n.to_string()),
            None => (NOT_FOUND, String::new()),
        },
        ("POST", id) => match counters.get_mut(id) {
            Some(_) if opts.garbage_counts => ("200 OK", "lots".to_string()),
            Some(n) => {
                *n += 1;
                ("200 OK", n.to_string())
            }
            None => (NOT_FOUND, String::new()),
        },
        _ => ("405 Method Not Allowed", String::new()),
    }
}
