use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;

use hostsieve_common::{Domain, ProbeSettings};

const DEFAULT_SCHEME: &str = "http";

/// Issues one GET request and reports the response status code.
///
/// Any status class counts as a response. Redirects are reported, never
/// followed. Connection failures and timeouts are errors, which the prober
/// records as "no response".
#[async_trait]
pub trait HttpStatusProbe: Send + Sync {
    async fn status(&self, url: &str) -> anyhow::Result<u16>;
}

pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new(settings: &ProbeSettings) -> anyhow::Result<Self> {
        let client: Client = Client::builder()
            .timeout(settings.http_timeout)
            .connect_timeout(settings.http_timeout.min(Duration::from_secs(5)))
            .user_agent(settings.user_agent.as_str())
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpStatusProbe for ReqwestProbe {
    async fn status(&self, url: &str) -> anyhow::Result<u16> {
        let response = self.client.get(url).send().await?;
        Ok(response.status().as_u16())
    }
}

/// URL probed for `domain`. Domains never carry a scheme, so it is always `http`.
pub fn target_url(domain: &Domain) -> String {
    format!("{DEFAULT_SCHEME}://{domain}/")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on a loopback port.
    async fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket.write_all(response).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[test]
    fn scheme_defaults_to_http() {
        let domain = Domain::parse("ads.example.com").unwrap();
        assert_eq!(target_url(&domain), "http://ads.example.com/");
    }

    #[tokio::test]
    async fn redirect_is_the_answer() {
        let url = serve_once(
            b"HTTP/1.1 301 Moved Permanently\r\nLocation: http://127.0.0.1:9/\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let client = ReqwestProbe::new(&ProbeSettings::default()).unwrap();
        assert_eq!(client.status(&url).await.unwrap(), 301);
    }

    #[tokio::test]
    async fn error_statuses_are_responses_too() {
        let url = serve_once(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let client = ReqwestProbe::new(&ProbeSettings::default()).unwrap();
        assert_eq!(client.status(&url).await.unwrap(), 503);
    }

    #[tokio::test]
    #[ignore]
    async fn reqwest_probe_reports_status() {
        let probe = ReqwestProbe::new(&ProbeSettings::default()).unwrap();
        let status = probe.status("http://example.com/").await.unwrap();
        assert!(status >= 100);
    }
}
