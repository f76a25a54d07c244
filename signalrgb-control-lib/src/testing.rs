//! A scripted HTTP stub for exercising the client against a real socket.
//!
//! Each scripted response answers exactly one connection; once the script is
//! exhausted the listener closes, so a request that should have been served
//! from cache shows up as a connection error instead of passing silently.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub(crate) struct StubResponse {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

impl StubResponse {
    pub fn ok(body: &str) -> Self {
        StubResponse::with_status(200, body)
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        StubResponse {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(status: u16, body: &str, delay: Duration) -> Self {
        StubResponse {
            status,
            body: body.to_string(),
            delay: Some(delay),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

pub(crate) struct StubServer {
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let port = listener.local_addr().expect("stub listener addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for response in responses {
                let Ok((stream, _)) = listener.accept() else {
                    break;
                };
                // A timed-out client closes the socket early; keep consuming
                // the script regardless.
                let _ = serve_one(stream, &response, &log);
            }
        });
        StubServer { port, requests }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log").clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().expect("request log").len()
    }
}

fn serve_one(
    mut stream: TcpStream,
    response: &StubResponse,
    log: &Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    log.lock().expect("request log").push(RecordedRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    if let Some(delay) = response.delay {
        thread::sleep(delay);
    }

    let reason = match response.status {
        200 => "OK",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "",
    };
    let payload = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason,
        response.body.len(),
        response.body
    );
    stream.write_all(payload.as_bytes())?;
    stream.flush()
}
