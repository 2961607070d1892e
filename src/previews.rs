//! Email previews rendered in real email clients.

use crate::models::{EmailClientListResult, PreviewListResult, PreviewRequestOptions};
use crate::poll::{self, PollConfig, Polled, Probe};
use crate::{Client, Error, Result};
use reqwest::{Method, StatusCode};

/// How long to wait for a preview to be rendered.
const PREVIEW_TIMEOUT_MS: u64 = 120_000;

impl Client {
    /// List the email clients previews can be generated for.
    pub async fn list_preview_email_clients(&self) -> Result<EmailClientListResult> {
        self.get_json("api/screenshots/clients").await
    }

    /// Request screenshots of an email rendered in the given email clients.
    pub async fn generate_email_previews(
        &self,
        message_id: &str,
        options: &PreviewRequestOptions,
    ) -> Result<PreviewListResult> {
        self.post_json(&format!("api/messages/{message_id}/screenshots"), options)
            .await
    }

    /// Download a rendered preview, waiting up to two minutes for it to be ready.
    ///
    /// Fails with [`Error::PreviewTimeout`] if the preview is still being
    /// generated when the time is up.
    pub async fn download_preview(&self, preview_id: &str) -> Result<Vec<u8>> {
        let polled = poll::drive(preview_config(), move || self.preview_once(preview_id)).await?;
        rendered(polled, preview_id)
    }

    /// One download attempt: 200 carries the image, 202 means not rendered yet.
    async fn preview_once(&self, preview_id: &str) -> Result<Probe<Vec<u8>>> {
        let request = self.request(Method::GET, &format!("api/files/screenshots/{preview_id}"));
        let response = self.send(request).await?;

        let delay = poll::suggested_delay(response.headers());

        match response.status() {
            StatusCode::OK => Ok(Probe {
                value: response.bytes().await?.to_vec(),
                ready: true,
                delay,
            }),
            StatusCode::ACCEPTED => Ok(Probe {
                value: Vec::new(),
                ready: false,
                delay,
            }),
            status => Err(Error::PreviewStatus(status.as_u16())),
        }
    }
}

fn preview_config() -> PollConfig {
    PollConfig::new(Some(PREVIEW_TIMEOUT_MS), Some(true))
}

fn rendered(polled: Polled<Vec<u8>>, preview_id: &str) -> Result<Vec<u8>> {
    match polled {
        Polled::Ready(image) => Ok(image),
        Polled::Pending(_) | Polled::TimedOut => Err(Error::PreviewTimeout {
            preview_id: preview_id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn preview_still_rendering_after_two_minutes_times_out() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let probe = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(Probe {
                value: Vec::new(),
                ready: false,
                delay: None,
            }))
        };

        let started = Instant::now();
        let polled = poll::drive(preview_config(), probe).await.unwrap();

        assert!(matches!(polled, Polled::TimedOut));
        // one attempt per second from 0s through 120s
        assert_eq!(calls.load(Ordering::SeqCst), 121);
        assert_eq!(started.elapsed(), Duration::from_secs(120));

        let err = rendered(polled, "p9").unwrap_err();
        assert!(matches!(&err, Error::PreviewTimeout { preview_id } if preview_id == "p9"));
        assert!(err.is_timeout());
        assert!(err.to_string().contains("[p9]"));
    }

    #[test]
    fn ready_preview_returns_image() {
        assert_eq!(rendered(Polled::Ready(vec![1, 2]), "p1").unwrap(), vec![1, 2]);
    }
}
