//! Minimal one-shot HTTP server for exercising the Confluence client

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the client sent
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Path and query of the request line
    pub fn target(&self) -> &str {
        self.request_line.split(' ').nth(1).unwrap_or_default()
    }
}

pub struct StubServer {
    pub base_uri: String,
    handle: JoinHandle<CapturedRequest>,
}

impl StubServer {
    /// Answer exactly one request with `status` and `body`
    pub async fn respond(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut raw = Vec::new();
            let mut buffer = [0u8; 1024];
            while !raw.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buffer).await.unwrap();
                if read == 0 {
                    break;
                }
                raw.extend_from_slice(&buffer[..read]);
            }

            let response = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            parse_request(&String::from_utf8_lossy(&raw))
        });

        Self {
            base_uri: format!("http://{address}"),
            handle,
        }
    }

    pub async fn captured(self) -> CapturedRequest {
        self.handle.await.unwrap()
    }
}

fn parse_request(raw: &str) -> CapturedRequest {
    let mut lines = raw.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    CapturedRequest {
        request_line,
        headers,
    }
}

/// Content API body wrapping `html` the way Confluence does
pub fn page_body(html: &str) -> String {
    serde_json::json!({
        "id": "12345",
        "type": "page",
        "body": { "view": { "value": html, "representation": "view" } }
    })
    .to_string()
}
