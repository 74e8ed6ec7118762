//! Shared test utilities: a blocking HTTP stub that answers with canned JSON.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::Value;

use crate::{ElasticClient, EngineConfig};

/// One request as received by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// `METHOD /path?query`
    pub line: String,
    pub body: Value,
}

pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    /// Serve one connection per reply, in order, then stop listening.
    /// Requests are recorded before the reply is written.
    pub fn start(replies: Vec<(u16, Value)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let url = format!("http://{}", listener.local_addr().expect("stub address"));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for (status, reply) in replies {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let request = read_request(&stream);
                recorded.lock().expect("stub lock").push(request);
                write_reply(stream, status, &reply);
            }
        });

        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("stub lock").clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.line).collect()
    }
}

/// A server URL nothing listens on.
pub fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{}", addr)
}

pub fn client_for(servers: Vec<String>) -> ElasticClient {
    ElasticClient::new(EngineConfig {
        servers,
        ..EngineConfig::default()
    })
    .expect("client")
}

fn read_request(stream: &TcpStream) -> Recorded {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("request line");

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).expect("header");
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().expect("content length");
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).expect("body");

    Recorded {
        line: request_line.split_whitespace().take(2).collect::<Vec<_>>().join(" "),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    }
}

fn write_reply(mut stream: TcpStream, status: u16, reply: &Value) {
    let body = reply.to_string();
    let head = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}
