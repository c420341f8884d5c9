//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes are matched on method and path (query ignored). Every request is recorded so
//! tests can assert how often an upstream was called and with what body.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Route {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Default)]
struct State {
    routes: HashMap<(String, String), Route>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone)]
pub struct MockServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl MockServer {
    /// Starts the server in a background thread. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    let state = Arc::clone(&state);
                    thread::spawn(move || handle(stream, &state));
                }
            });
        }
        Self {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn route(&self, method: &str, path: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.route_with_headers(method, path, status, Vec::new(), body);
    }

    pub fn json(&self, method: &str, path: &str, status: u16, body: &str) {
        self.route_with_headers(
            method,
            path,
            status,
            vec![("Content-Type".into(), "application/json".into())],
            body,
        );
    }

    pub fn redirect(&self, method: &str, path: &str, location: &str) {
        self.route_with_headers(
            method,
            path,
            302,
            vec![("Location".into(), location.into())],
            Vec::new(),
        );
    }

    pub fn route_with_headers(
        &self,
        method: &str,
        path: &str,
        status: u16,
        headers: Vec<(String, String)>,
        body: impl Into<Vec<u8>>,
    ) {
        self.insert(
            method,
            path,
            Route {
                status,
                headers,
                body: body.into(),
                delay: None,
            },
        );
    }

    /// Like `route`, but the response is only sent after `delay`
    pub fn slow_route(&self, method: &str, path: &str, delay: Duration, body: impl Into<Vec<u8>>) {
        self.insert(
            method,
            path,
            Route {
                status: 200,
                headers: Vec::new(),
                body: body.into(),
                delay: Some(delay),
            },
        );
    }

    fn insert(&self, method: &str, path: &str, route: Route) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert((method.to_uppercase(), path.to_owned()), route);
    }

    /// Number of requests received for `path`, any method
    pub fn hits(&self, path: &str) -> usize {
        self.requests(path).len()
    }

    pub fn requests(&self, path: &str) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    let route = {
        let mut state = state.lock().unwrap();
        state.requests.push(request.clone());
        // HEAD falls back to the GET route without a body
        state
            .routes
            .get(&(request.method.clone(), request.path.clone()))
            .or_else(|| {
                (request.method == "HEAD")
                    .then(|| state.routes.get(&("GET".to_owned(), request.path.clone())))
                    .flatten()
            })
            .cloned()
    };

    let route = route.unwrap_or(Route {
        status: 404,
        headers: Vec::new(),
        body: b"not found".to_vec(),
        delay: None,
    });
    if let Some(delay) = route.delay {
        thread::sleep(delay);
    }

    let mut response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        reason(route.status),
        route.body.len()
    );
    for (name, value) in &route.headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("\r\n");
    let _ = stream.write_all(response.as_bytes());
    if request.method != "HEAD" {
        let _ = stream.write_all(&route.body);
    }
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];

    // Read until the end of the headers
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_uppercase();
    let target = request_line.next()?;
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let headers: HashMap<String, String> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_owned()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let body_end = (header_end + content_length).min(data.len());
    let body = String::from_utf8_lossy(&data[header_end..body_end]).into_owned();

    Some(RecordedRequest {
        method,
        path: path.to_owned(),
        query: query.to_owned(),
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
