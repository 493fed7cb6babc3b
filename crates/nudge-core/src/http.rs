use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use nudge_shared::csrf::{CSRF_HEADER, csrf_token};
use nudge_shared::endpoints::{
    CACHE_BUST_PARAM, NOTIFICATION_COUNT_PATH, NOTIFICATIONS_PATH, STATISTICS_PATH,
    TASK_LIST_PATH, toggle_task_path,
};
use nudge_shared::error::BackendError;
use nudge_shared::notify::Backend;
use nudge_shared::task::{
    CountResponse, NotificationSnapshot, NotificationsResponse, Statistics, Task, ToggleRequest,
    ToggleResponse,
};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// The task server over HTTP.
///
/// Cookies persist for the lifetime of the backend so the CSRF token
/// obtained from one request is reused for every toggle.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
    jar: Arc<Jar>,
}

impl HttpBackend {
    pub fn new(base: Url, timeout: Duration) -> anyhow::Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(timeout)
            .cookie_provider(jar.clone())
            .user_agent(concat!("nudge/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed building HTTP client for the task server")?;
        info!(server = %base, timeout_secs = timeout.as_secs(), "created task server client");
        Ok(Self { client, base, jar })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| BackendError::transport(path, err))
    }

    fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        let header = header.to_str().ok()?;
        csrf_token(header)
    }

    /// Returns the CSRF token, visiting the task list once to obtain the
    /// cookie when none is stored yet.
    #[tracing::instrument(skip(self))]
    async fn ensure_csrf(&self) -> Result<String, BackendError> {
        if let Some(token) = self.csrf_token() {
            return Ok(token);
        }

        let url = self.endpoint(TASK_LIST_PATH)?;
        debug!(url = %url, "priming CSRF cookie");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| BackendError::transport(TASK_LIST_PATH, err))?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "task list page did not load");
        }

        self.csrf_token().ok_or_else(|| BackendError::Rejected {
            message: "server did not set a csrftoken cookie".to_string(),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get_json<T>(&self, endpoint: &str, url: Url) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|err| BackendError::transport(endpoint, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| BackendError::decode(endpoint, err))
    }
}

impl Backend for HttpBackend {
    async fn fetch_due_tasks(&self) -> Result<Vec<Task>, BackendError> {
        let url = self.endpoint(NOTIFICATIONS_PATH)?;
        let body: NotificationsResponse = self.get_json(NOTIFICATIONS_PATH, url).await?;
        debug!(count = body.notifications.len(), "fetched due tasks");
        Ok(body.notifications)
    }

    async fn fetch_count(&self, fresh: bool) -> Result<NotificationSnapshot, BackendError> {
        let mut url = self.endpoint(NOTIFICATION_COUNT_PATH)?;
        if fresh {
            url.query_pairs_mut().append_pair(
                CACHE_BUST_PARAM,
                &Utc::now().timestamp_millis().to_string(),
            );
        }
        let body: CountResponse = self.get_json(NOTIFICATION_COUNT_PATH, url).await?;
        Ok(body.into())
    }

    async fn fetch_statistics(&self) -> Result<Statistics, BackendError> {
        let url = self.endpoint(STATISTICS_PATH)?;
        self.get_json(STATISTICS_PATH, url).await
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_task(&self, id: u64, completed: bool) -> Result<ToggleResponse, BackendError> {
        let path = toggle_task_path(id);
        let url = self.endpoint(&path)?;
        let token = self.ensure_csrf().await?;

        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER, token)
            .header(reqwest::header::REFERER, self.base.as_str())
            .json(&ToggleRequest { completed })
            .send()
            .await
            .map_err(|err| BackendError::transport(&path, err))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| BackendError::transport(&path, err))?;

        match serde_json::from_slice::<ToggleResponse>(&bytes) {
            // Failed toggles still carry `{success: false, error}`.
            Ok(body) if status.is_success() || body.error.is_some() => Ok(body),
            Ok(_) => Err(BackendError::Status {
                endpoint: path,
                status: status.as_u16(),
            }),
            Err(_) if !status.is_success() => Err(BackendError::Status {
                endpoint: path,
                status: status.as_u16(),
            }),
            Err(err) => Err(BackendError::decode(&path, err)),
        }
    }
}
