//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed pages by path, answers 404 for unknown paths, and can be told
//! to hang on a path (never answer) to provoke client timeouts. Counts hits
//! per path so tests can assert on retries.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Route {
    Page(String),
    Status(u16),
    Hang,
}

#[derive(Default)]
pub struct PageServerBuilder {
    routes: HashMap<String, Route>,
}

impl PageServerBuilder {
    pub fn page(mut self, path: &str, html: &str) -> Self {
        self.routes.insert(path.to_string(), Route::Page(html.to_string()));
        self
    }

    pub fn status(mut self, path: &str, code: u16) -> Self {
        self.routes.insert(path.to_string(), Route::Status(code));
        self
    }

    pub fn hang(mut self, path: &str) -> Self {
        self.routes.insert(path.to_string(), Route::Hang);
        self
    }

    /// Starts the server in a background thread. It runs until the process exits.
    pub fn start(self) -> PageServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes = Arc::new(self.routes);
        let hits: Arc<Mutex<HashMap<String, usize>>> = Arc::default();
        let hits_srv = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits_srv);
                thread::spawn(move || handle(stream, &routes, &hits));
            }
        });
        PageServer {
            base_url: format!("http://127.0.0.1:{}", port),
            hits,
        }
    }
}

pub struct PageServer {
    /// e.g. "http://127.0.0.1:12345" (no trailing slash)
    pub base_url: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl PageServer {
    pub fn builder() -> PageServerBuilder {
        PageServerBuilder::default()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, hits: &Mutex<HashMap<String, usize>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let (status, body) = match routes.get(&path) {
        Some(Route::Page(html)) => ("200 OK".to_string(), html.clone()),
        Some(Route::Status(code)) => (format!("{} Error", code), String::new()),
        Some(Route::Hang) => {
            thread::sleep(Duration::from_secs(5));
            return;
        }
        None => ("404 Not Found".to_string(), String::new()),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}
