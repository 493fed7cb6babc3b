use gloo::net::http::{Request, Response};
use nudge_shared::csrf::{CSRF_HEADER, csrf_token};
use nudge_shared::endpoints::{
    NOTIFICATION_COUNT_PATH, NOTIFICATIONS_PATH, STATISTICS_PATH, notification_count_fresh_path,
    toggle_task_path,
};
use nudge_shared::error::BackendError;
use nudge_shared::notify::Backend;
use nudge_shared::task::{
    CountResponse, NotificationSnapshot, NotificationsResponse, Statistics, Task, ToggleRequest,
    ToggleResponse,
};
use serde::de::DeserializeOwned;

use crate::app::browser::document_cookies;

/// Same-origin `fetch` against the page's own server.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchBackend;

async fn get_json<T>(endpoint: &str, url: &str) -> Result<T, BackendError>
where
    T: DeserializeOwned,
{
    let response = Request::get(url)
        .header("Cache-Control", "no-cache")
        .send()
        .await
        .map_err(|e| BackendError::transport(endpoint, e))?;
    decode(endpoint, response).await
}

async fn decode<T>(endpoint: &str, response: Response) -> Result<T, BackendError>
where
    T: DeserializeOwned,
{
    if !response.ok() {
        return Err(BackendError::Status {
            endpoint: endpoint.to_string(),
            status: response.status(),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::decode(endpoint, e))
}

impl Backend for FetchBackend {
    async fn fetch_due_tasks(&self) -> Result<Vec<Task>, BackendError> {
        let body: NotificationsResponse = get_json(NOTIFICATIONS_PATH, NOTIFICATIONS_PATH).await?;
        Ok(body.notifications)
    }

    async fn fetch_count(&self, fresh: bool) -> Result<NotificationSnapshot, BackendError> {
        let url = if fresh {
            notification_count_fresh_path(js_sys::Date::now() as i64)
        } else {
            NOTIFICATION_COUNT_PATH.to_string()
        };
        let body: CountResponse = get_json(NOTIFICATION_COUNT_PATH, &url).await?;
        Ok(body.into())
    }

    async fn fetch_statistics(&self) -> Result<Statistics, BackendError> {
        get_json(STATISTICS_PATH, STATISTICS_PATH).await
    }

    async fn toggle_task(&self, id: u64, completed: bool) -> Result<ToggleResponse, BackendError> {
        let path = toggle_task_path(id);
        let token = csrf_token(&document_cookies()).unwrap_or_default();
        if token.is_empty() {
            tracing::warn!(task_id = id, "no csrftoken cookie; the server may reject the toggle");
        }

        let request = Request::post(&path)
            .header(CSRF_HEADER, &token)
            .json(&ToggleRequest { completed })
            .map_err(|e| BackendError::transport(&path, e))?;
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::transport(&path, e))?;

        let status = response.status();
        match response.json::<ToggleResponse>().await {
            Ok(body) if response.ok() || body.error.is_some() => Ok(body),
            Ok(_) => Err(BackendError::Status {
                endpoint: path,
                status,
            }),
            Err(_) if !response.ok() => Err(BackendError::Status {
                endpoint: path,
                status,
            }),
            Err(e) => Err(BackendError::decode(&path, e)),
        }
    }
}
