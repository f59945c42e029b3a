// ABOUTME: Discovery of a running browser's DevTools websocket through its /json/version endpoint.
// ABOUTME: Used in attach mode before connecting to a browser the user started with remote debugging.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ExtractError, Result};

const PROBE_TIMEOUT: Duration = Duration::from_millis(800);

/// `/json/version` response subset.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpVersionInfo {
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
    #[serde(rename = "Browser")]
    pub browser: Option<String>,
}

/// Resolves the DevTools websocket URL of a browser listening on `port`.
///
/// Tries the IPv4 loopback, `localhost` and the IPv6 loopback in that order
/// and returns the first successful answer.
pub async fn fetch_cdp_endpoint(port: u16) -> Result<CdpVersionInfo> {
    let client = reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()
        .map_err(|e| ExtractError::session(port_target(port), "build probe client", Some(e.into())))?;

    let mut last_error = "no response".to_string();
    for url in [
        format!("http://127.0.0.1:{}/json/version", port),
        format!("http://localhost:{}/json/version", port),
        format!("http://[::1]:{}/json/version", port),
    ] {
        let response = match client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(%url, error = %e, "probe failed");
                last_error = e.to_string();
                continue;
            }
        };

        if !response.status().is_success() {
            last_error = format!("unexpected status {}", response.status());
            continue;
        }

        return response.json::<CdpVersionInfo>().await.map_err(|e| {
            ExtractError::session(url, "parse /json/version", Some(e.into()))
        });
    }

    Err(ExtractError::session(
        port_target(port),
        "probe",
        Some(anyhow::anyhow!(
            "no browser with remote debugging found ({}); start one with: {} --remote-debugging-port={}",
            last_error,
            launch_hint(),
            port
        )),
    ))
}

fn port_target(port: u16) -> String {
    format!("port {}", port)
}

fn launch_hint() -> &'static str {
    if cfg!(target_os = "windows") {
        "chrome.exe"
    } else if cfg!(target_os = "macos") {
        "\"/Applications/Google Chrome.app/Contents/MacOS/Google Chrome\""
    } else {
        "google-chrome"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn reads_websocket_url() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/json/version");
                then.status(200).json_body(serde_json::json!({
                    "Browser": "Chrome/120.0.0.0",
                    "Protocol-Version": "1.3",
                    "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/browser/abc"
                }));
            })
            .await;

        let info = fetch_cdp_endpoint(server.port()).await.unwrap();
        assert_eq!(
            info.web_socket_debugger_url,
            "ws://127.0.0.1:9222/devtools/browser/abc"
        );
        assert_eq!(info.browser.as_deref(), Some("Chrome/120.0.0.0"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_a_session_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/json/version");
                then.status(500);
            })
            .await;

        let err = fetch_cdp_endpoint(server.port()).await.unwrap_err();
        assert!(err.is_session());
        assert!(err.to_string().contains("--remote-debugging-port="));
    }

    #[tokio::test]
    async fn missing_websocket_field_fails_to_parse() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/json/version");
                then.status(200).json_body(serde_json::json!({ "Browser": "Chrome" }));
            })
            .await;

        let err = fetch_cdp_endpoint(server.port()).await.unwrap_err();
        assert!(err.is_session());
        assert_eq!(err.op, "parse /json/version");
    }
}
