use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde_json::Value;

/// What the stub sends back for any completion request.
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// 200 with the given text in the provider's reply shape.
    Reply(String),
    /// Non-success status with an upstream-style error body.
    Error { status: u16, message: String },
}

/// One tiny_http server answering both provider wire shapes:
/// `/v1/chat/completions` (OpenAI) and `/v1/messages` (Anthropic).
pub struct ProviderStub {
    pub base_url: String,
    requests: Arc<AtomicUsize>,
    last_body: Arc<std::sync::Mutex<Option<Value>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ProviderStub {
    pub fn spawn(behavior: StubBehavior) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start provider stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/v1");

        let requests = Arc::new(AtomicUsize::new(0));
        let last_body = Arc::new(std::sync::Mutex::new(None));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let thread_requests = Arc::clone(&requests);
        let thread_last_body = Arc::clone(&last_body);
        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                thread_requests.fetch_add(1, Ordering::SeqCst);

                let path = request.url().to_string();
                let shape = match path.as_str() {
                    "/v1/chat/completions" => ReplyShape::OpenAi,
                    "/v1/messages" => ReplyShape::Anthropic,
                    _ => {
                        let _ = request.respond(
                            tiny_http::Response::from_string("not found").with_status_code(404),
                        );
                        continue;
                    }
                };
                if request.method() != &tiny_http::Method::Post {
                    let _ = request.respond(
                        tiny_http::Response::from_string("method not allowed")
                            .with_status_code(405),
                    );
                    continue;
                }

                let mut body = String::new();
                if request.as_reader().read_to_string(&mut body).is_err() {
                    let _ = request.respond(
                        tiny_http::Response::from_string("invalid request body")
                            .with_status_code(400),
                    );
                    continue;
                }
                if let Ok(parsed) = serde_json::from_str::<Value>(&body)
                    && let Ok(mut slot) = thread_last_body.lock()
                {
                    *slot = Some(parsed);
                }

                let (status, response_body) = match &behavior {
                    StubBehavior::Reply(text) => (200, reply_body(shape, text)),
                    StubBehavior::Error { status, message } => (
                        *status,
                        serde_json::json!({ "error": { "message": message } }),
                    ),
                };

                let mut response = tiny_http::Response::from_string(response_body.to_string())
                    .with_status_code(status);
                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                response = response.with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            last_body,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// JSON body of the most recent request, if any parsed.
    #[allow(dead_code)]
    pub fn last_body(&self) -> Option<Value> {
        self.last_body.lock().ok().and_then(|slot| slot.clone())
    }
}

impl Drop for ProviderStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ReplyShape {
    OpenAi,
    Anthropic,
}

fn reply_body(shape: ReplyShape, text: &str) -> Value {
    match shape {
        ReplyShape::OpenAi => serde_json::json!({
            "id": "chatcmpl-stub",
            "object": "chat.completion",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": text } }
            ]
        }),
        ReplyShape::Anthropic => serde_json::json!({
            "id": "msg_stub",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": text }
            ]
        }),
    }
}
