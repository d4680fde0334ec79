use super::{ProfileClient, ProfileError, ProfileRecord};
use crate::config::ProfileConfig;
use crate::error::{Result, SkillError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

/// Reads the caller's profile and posts it to the configured webhook.
///
/// [`ProfileForwarder::spawn`] runs the work detached from the response path.
/// Spawned tasks are tracked so the binary can drain them on exit with
/// [`ProfileForwarder::shutdown`].
pub struct ProfileForwarder {
    client: ProfileClient,
    http: reqwest::Client,
    webhook_url: String,
    tracker: TaskTracker,
}

impl ProfileForwarder {
    pub fn new(http: reqwest::Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client: ProfileClient::new(http.clone()),
            http,
            webhook_url: webhook_url.into(),
            tracker: TaskTracker::new(),
        }
    }

    /// Build a forwarder from config, or `None` when forwarding is off.
    ///
    /// # Errors
    ///
    /// Returns [`SkillError::Config`] if the webhook URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn from_config(config: &ProfileConfig, user_agent: Option<&str>) -> Result<Option<Self>> {
        let Some(webhook_url) = config.active_webhook() else {
            return Ok(None);
        };
        url::Url::parse(webhook_url)
            .map_err(|e| SkillError::Config(format!("profile.webhook_url: {e}")))?;

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }
        let http = builder
            .build()
            .map_err(|e| SkillError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Some(Self::new(http, webhook_url)))
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// Read all three fields, then post the combined record once.
    ///
    /// # Errors
    ///
    /// Returns the first read failure, or the webhook failure. Nothing is
    /// posted unless every read succeeded.
    pub async fn forward(
        &self,
        endpoint_base: &str,
        access_token: &str,
    ) -> std::result::Result<ProfileRecord, ProfileError> {
        let record = self.client.fetch(endpoint_base, access_token).await?;

        let response = self
            .http
            .post(&self.webhook_url)
            .json(&record)
            .send()
            .await
            .map_err(ProfileError::WebhookTransport)?;
        if !response.status().is_success() {
            return Err(ProfileError::Webhook {
                status: response.status().as_u16(),
            });
        }

        Ok(record)
    }

    /// Run [`forward`](Self::forward) as a detached task.
    ///
    /// Failures are logged and go nowhere else. Returns `None` when no tokio
    /// runtime is available or the forwarder is shutting down.
    pub fn spawn(
        self: &Arc<Self>,
        endpoint_base: String,
        access_token: String,
    ) -> Option<JoinHandle<()>> {
        if self.tracker.is_closed() {
            tracing::debug!("profile forwarder closed; skipping forward");
            return None;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime available; profile forward skipped");
            return None;
        };

        let this = Arc::clone(self);
        let handle = self.tracker.spawn_on(
            async move {
                match this.forward(&endpoint_base, &access_token).await {
                    Ok(_) => tracing::info!("profile forwarded"),
                    Err(e) => tracing::warn!(error = %e, "profile forward failed"),
                }
            },
            &runtime,
        );
        Some(handle)
    }

    /// Number of forwarding tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting new tasks and wait for the running ones.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
