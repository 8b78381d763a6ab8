use showgraph_core::TransportConfig;
use showgraph_fetch::{HeaderProfile, HttpFetcher, PageFetcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Answer one request with `200 OK` and hand back the raw request text.
async fn capture_request() -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                .await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}"), rx)
}

#[tokio::test]
async fn test_configured_headers_are_sent() {
    let (base, request) = capture_request().await;
    let config = TransportConfig {
        user_agent: "showgraph-test/1.0".to_string(),
        accept_language: "en-GB".to_string(),
        ..TransportConfig::default()
    };

    let fetcher: Arc<dyn PageFetcher> = Arc::new(
        HttpFetcher::with_headers(&HeaderProfile::from_config(&config)).expect("build fetcher"),
    );
    let body = fetcher
        .fetch(&format!("{base}/find/?q=Scrubs"), Duration::from_secs(5))
        .await
        .expect("fetch page");
    assert_eq!(body, "ok");

    let raw = request.await.expect("captured request").to_lowercase();
    assert!(raw.starts_with("get /find/?q=scrubs http/1.1"));
    assert!(raw.contains("user-agent: showgraph-test/1.0"));
    assert!(raw.contains("accept-language: en-gb"));
    assert!(raw.contains("accept: text/html"));
}

#[test]
fn test_invalid_header_value_is_rejected() {
    let profile = HeaderProfile {
        user_agent: "bad\nagent".to_string(),
        ..HeaderProfile::default()
    };
    assert!(HttpFetcher::with_headers(&profile).is_err());
}
