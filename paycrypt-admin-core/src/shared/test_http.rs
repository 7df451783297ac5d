//! In-process HTTP responder for backend and wallet tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A received request: `GET /api/orders?page=1 HTTP/1.1` plus the body.
#[derive(Debug, Clone)]
pub struct Request {
    pub line: String,
    pub body: String,
}

impl Request {
    pub fn path(&self) -> &str {
        self.line.split_whitespace().nth(1).unwrap_or("")
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        let (_, query) = self.path().split_once('?')?;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then_some(value)
        })
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

async fn read_request(socket: &mut TcpStream) -> Request {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n > 0 {
            raw.extend_from_slice(&chunk[..n]);
        }
        let text = String::from_utf8_lossy(&raw).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if raw.len() >= end + 4 + length || n == 0 {
                return Request {
                    line: text.lines().next().unwrap_or("").to_string(),
                    body: text[end + 4..].to_string(),
                };
            }
        } else if n == 0 {
            return Request { line: String::new(), body: text };
        }
    }
}

/// Answer every connection with `respond(request)`; returns the base URL.
pub async fn serve_with<F>(respond: F) -> String
where
    F: Fn(&Request) -> (u16, String) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut socket).await;
            let (status, body) = respond(&request);
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}", address)
}

/// Answer connections with `responses` in order, then with 500s.
pub async fn serve(responses: Vec<(u16, String)>) -> String {
    let queue = Mutex::new(VecDeque::from(responses));
    serve_with(move |_| {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((500, r#"{"message":"no more responses"}"#.to_string()))
    })
    .await
}

/// JSON-RPC endpoint: `handle(method, params)` returns a result or a
/// `(code, message)` error.
pub async fn serve_json_rpc<F>(handle: F) -> String
where
    F: Fn(&str, &serde_json::Value) -> Result<serde_json::Value, (i64, String)> + Send + 'static,
{
    serve_with(move |request| {
        let call = request.json();
        let method = call["method"].as_str().unwrap_or("");
        let mut response = serde_json::json!({ "jsonrpc": "2.0", "id": call["id"].clone() });
        match handle(method, &call["params"]) {
            Ok(result) => response["result"] = result,
            Err((code, message)) => response["error"] = serde_json::json!({ "code": code, "message": message }),
        }
        (200, response.to_string())
    })
    .await
}
