//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use waypoint::config::AppConfig;

/// Read one full HTTP request (head plus content-length body) so the
/// client never sees the connection close mid-write.
#[allow(dead_code)]
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];
    loop {
        match socket.read(&mut tmp).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&tmp[..n]);
                let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                    continue;
                };
                let head = String::from_utf8_lossy(&buf[..head_end]);
                let content_length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
    }
}

/// Start a programmable mock provider on an ephemeral port.
///
/// The handler is invoked per request and returns (status, JSON body).
#[allow(dead_code)]
pub async fn start_provider<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request(&mut socket).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A fixed-response mock provider.
#[allow(dead_code)]
pub async fn start_fixed_provider(status: u16, body: String) -> SocketAddr {
    start_provider(move || {
        let body = body.clone();
        async move { (status, body) }
    })
    .await
}

/// Config pointing every provider at the given mocks, with fast retries
/// so tests stay quick.
#[allow(dead_code)]
pub fn test_config(geocoding: SocketAddr, weather: SocketAddr, places: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.providers.geocoding.base_url = format!("http://{geocoding}");
    config.providers.geocoding.timeout_secs = 2;
    config.providers.weather.base_url = format!("http://{weather}");
    config.providers.weather.timeout_secs = 2;
    config.providers.places.base_url = format!("http://{places}");
    config.providers.places.timeout_secs = 2;
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config
}

#[allow(dead_code)]
pub fn geocoding_body(lat: &str, lon: &str) -> String {
    format!(r#"[{{"lat": "{lat}", "lon": "{lon}"}}]"#)
}

#[allow(dead_code)]
pub fn weather_body(temperature: f64, probability: u32) -> String {
    format!(
        r#"{{
            "current": {{"temperature_2m": {temperature}, "time": "2026-08-07T14:00"}},
            "hourly": {{
                "time": ["2026-08-07T14:00", "2026-08-07T15:00"],
                "precipitation_probability": [{probability}, 80]
            }}
        }}"#
    )
}

#[allow(dead_code)]
pub fn places_body(names: &[&str]) -> String {
    let elements: Vec<String> = names
        .iter()
        .map(|n| format!(r#"{{"tags": {{"name": "{n}"}}}}"#))
        .collect();
    format!(r#"{{"elements": [{}]}}"#, elements.join(","))
}
