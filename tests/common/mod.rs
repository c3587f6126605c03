//! Minimal HTTP gallery server for integration tests.
//!
//! Serves canned responses keyed by exact request path (percent-encoded, as
//! the client sends it) and records every request target, query included.
//! Unknown paths answer 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read as _, Write as _};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Base path the gallery application is mounted under.
pub const MOUNT: &str = "/gallery/";

#[derive(Clone)]
pub struct Route {
    path: String,
    status: u16,
    body: String,
}

/// A 200 JSON response at `path` (relative to [`MOUNT`]).
pub fn json(path: &str, body: &str) -> Route {
    Route {
        path: format!("{MOUNT}{path}"),
        status: 200,
        body: body.to_string(),
    }
}

/// An empty response with `status` at `path` (relative to [`MOUNT`]).
pub fn status(path: &str, status: u16) -> Route {
    Route {
        path: format!("{MOUNT}{path}"),
        status,
        body: String::new(),
    }
}

/// Two tags, three images, `b.jpg` shared by both tags.
pub fn sample_gallery() -> Vec<Route> {
    vec![
        json("rest/gallery", r#"["cats","night sky"]"#),
        json(
            "rest/gallery/tag/cats",
            r#"[{"fileName":"a.jpg","description":"A <cat>"},{"fileName":"b.jpg","description":"Cat at night"}]"#,
        ),
        json(
            "rest/gallery/tag/night%20sky",
            r#"[{"fileName":"b.jpg","description":"Cat at night"},{"fileName":"c.jpg","description":"Moon"}]"#,
        ),
        json(
            "rest/gallery/image/a.jpg",
            r#"{"fileName":"a.jpg","description":"x","tags":"y,z"}"#,
        ),
        json(
            "rest/gallery/image/b.jpg",
            r#"{"fileName":"b.jpg","description":"Cat at night","tags":["cats","night sky"]}"#,
        ),
        json(
            "rest/gallery/image/c.jpg",
            r#"{"fileName":"c.jpg","description":"Moon","tags":["night sky"]}"#,
        ),
    ]
}

pub struct GalleryServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    _stop: mpsc::Sender<()>,
}

impl GalleryServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel::<()>();
        let routes: Arc<HashMap<String, Route>> =
            Arc::new(routes.into_iter().map(|r| (r.path.clone(), r)).collect());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            listener.set_nonblocking(true).unwrap();
            loop {
                // Stops on an explicit signal or when the server is dropped.
                if !matches!(rx.try_recv(), Err(TryRecvError::Empty)) {
                    break;
                }
                match listener.accept() {
                    Ok((stream, _)) => {
                        let routes = Arc::clone(&routes);
                        let log = Arc::clone(&log);
                        thread::spawn(move || serve_request(stream, &routes, &log));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            port,
            requests,
            _stop: tx,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}{MOUNT}", self.port)
    }

    /// Request targets received so far, e.g. `/gallery/rest/gallery?dummy=123`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn serve_request(mut stream: TcpStream, routes: &HashMap<String, Route>, log: &Mutex<Vec<String>>) {
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 4096];
    let n = match stream.read(&mut buf) {
        Ok(n) if n > 0 => n,
        _ => return,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
    let path = target.split('?').next().unwrap_or("/").to_string();
    log.lock().unwrap().push(target);

    let (code, body) = match routes.get(&path) {
        Some(route) => (route.status, route.body.clone()),
        None => (404, String::new()),
    };

    let header = format!(
        "HTTP/1.1 {code} {}\r\n\
         Content-Type: application/json; charset=utf-8\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        reason(code),
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}
