use std::io::Read as _;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde_json::Value;

pub static HERO_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0xFF, 0xD9];

pub const ACCESS_KEY: &str = "stub-access-key";
pub const TOKEN: &str = "stub-token";
pub const PHOTOGRAPHER: &str = "Stub Photographer";
pub const PROFILE_URL: &str = "https://example.com/@stub";

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubBehavior {
    Healthy,
    /// Every request answers 503.
    Unavailable,
    /// The photo lookup succeeds but carries no image URL.
    MissingImageUrl,
}

/// Serves the image provider (`/photos/random`, `/images/hero.jpg`) and the
/// text-generation endpoint (`/generate`) on one ephemeral port.
pub struct ProviderStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ProviderStub {
    pub fn spawn(behavior: StubBehavior) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start provider stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");
        let image_url = format!("{base_url}/images/hero.jpg");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

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

                if behavior == StubBehavior::Unavailable {
                    let _ = request.respond(
                        tiny_http::Response::from_string("unavailable").with_status_code(503),
                    );
                    continue;
                }

                let url = request.url().to_string();
                let path = url.split('?').next().unwrap_or(&url).to_owned();
                let method = request.method().clone();

                let response = match (&method, path.as_str()) {
                    (tiny_http::Method::Get, "/photos/random") => {
                        if !url.contains(&format!("client_id={ACCESS_KEY}")) {
                            json_response(401, serde_json::json!({"errors": ["bad key"]}))
                        } else if behavior == StubBehavior::MissingImageUrl {
                            json_response(200, serde_json::json!({"urls": {}}))
                        } else {
                            json_response(
                                200,
                                serde_json::json!({
                                    "urls": { "regular": image_url },
                                    "user": {
                                        "name": PHOTOGRAPHER,
                                        "links": { "html": PROFILE_URL }
                                    }
                                }),
                            )
                        }
                    }
                    (tiny_http::Method::Get, "/images/hero.jpg") => {
                        tiny_http::Response::from_data(HERO_JPEG.to_vec()).with_status_code(200)
                    }
                    (tiny_http::Method::Post, "/generate") => {
                        let authorized = request.headers().iter().any(|h| {
                            h.field.equiv("Authorization")
                                && h.value.as_str() == format!("Bearer {TOKEN}")
                        });
                        let mut body = String::new();
                        let _ = request.as_reader().read_to_string(&mut body);
                        let prompt = serde_json::from_str::<Value>(&body)
                            .ok()
                            .and_then(|v| v.get("inputs").and_then(|i| i.as_str()).map(str::to_owned));

                        match (authorized, prompt) {
                            (true, Some(prompt)) => json_response(
                                200,
                                serde_json::json!([{
                                    "generated_text": format!(
                                        "{prompt}\nStub intro paragraph.\n\nStub why paragraph."
                                    )
                                }]),
                            ),
                            (false, _) => json_response(401, serde_json::json!({"error": "unauthorized"})),
                            (true, None) => json_response(400, serde_json::json!({"error": "missing inputs"})),
                        }
                    }
                    _ => tiny_http::Response::from_string("not found").with_status_code(404),
                };

                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn generate_endpoint(&self) -> String {
        format!("{}/generate", self.base_url)
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

fn json_response(status: u16, body: Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("build header");
    tiny_http::Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(header)
}
