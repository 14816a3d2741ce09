//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every GET with one canned response and records the request head
//! (request line plus headers) so tests can inspect what the client sent.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u32,
    pub body: Vec<u8>,
    /// When set, requests without `/final` in the path get a 302 to `/final`
    /// and only `/final` receives the canned response.
    pub redirect_first: bool,
    /// When set, send the response head, then hold the connection this long
    /// before the body.
    pub stall: Option<std::time::Duration>,
}

impl Canned {
    pub fn json(status: u32, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
            redirect_first: false,
            stall: None,
        }
    }

    /// Response whose body arrives only after `stall`.
    pub fn stalled(body: &str, stall: std::time::Duration) -> Self {
        Self {
            stall: Some(stall),
            ..Self::json(200, body)
        }
    }
}

pub struct TestServer {
    /// Base URL with trailing slash, e.g. "http://127.0.0.1:12345/".
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Recorded request heads in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Request lines only ("GET /path HTTP/1.1").
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.lines().next().unwrap_or("").to_string())
            .collect()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(canned: Canned) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    let canned = Arc::new(canned);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let canned = Arc::clone(&canned);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &canned, &log));
        }
    });
    TestServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn handle(mut stream: std::net::TcpStream, canned: &Canned, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s.to_string(),
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(request);

    if canned.redirect_first && !path.contains("/final") {
        let _ = stream.write_all(
            b"HTTP/1.1 302 Found\r\nLocation: /final\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    let reason = match canned.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        canned.status,
        reason,
        canned.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    if let Some(stall) = canned.stall {
        let _ = stream.flush();
        thread::sleep(stall);
    }
    let _ = stream.write_all(&canned.body);
}
