//! JSON RPC transport to the managed marketplace backend.
//!
//! Every call is `POST {base}/rpc/{method}` with a JSON object of named
//! arguments. Worker calls carry the caller in the `x-caller-principal`
//! header and privileged calls carry `username`/`password` arguments. The
//! backend answers `{"ok": <value>}` or `{"err": "<message>"}`.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error, instrument};
use url::Url;

use seva_sangam_core::{
    AdminCredentials, BackendError, Category, CategoryId, Inquiry, InquiryId, MarketplaceBackend,
    Principal, UserProfile, WorkerId, WorkerProfile,
};

use crate::config::BackendConfig;

/// Header carrying the worker identity on caller-identified calls.
pub const CALLER_HEADER: &str = "x-caller-principal";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RpcReply<T> {
    Ok(T),
    Err(String),
}

/// Client for the backend RPC endpoint.
#[derive(Clone)]
pub struct HttpBackend {
    inner: Arc<HttpBackendInner>,
}

struct HttpBackendInner {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl HttpBackend {
    /// Create a client for `base_url` using the timeout and API key from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &Url, config: &BackendConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(HttpBackendInner {
                client,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// Execute one RPC.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        caller: Option<&Principal>,
        args: Value,
    ) -> Result<T, BackendError> {
        let endpoint = format!("{}/rpc/{method}", self.inner.base_url);

        let mut request = self.inner.client.post(&endpoint).json(&args);
        if let Some(caller) = caller {
            request = request.header(CALLER_HEADER, caller.as_str());
        }
        if let Some(key) = &self.inner.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            debug!(method, error = %e, "Backend request failed");
            BackendError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        match serde_json::from_str::<RpcReply<T>>(&body) {
            Ok(RpcReply::Ok(value)) => Ok(value),
            Ok(RpcReply::Err(message)) => {
                debug!(method, %status, message = %message, "Backend rejected call");
                Err(BackendError::Rejected(message))
            }
            Err(e) if status.is_success() => {
                error!(
                    method,
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(BackendError::InvalidResponse(e.to_string()))
            }
            Err(_) if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN =>
            {
                Err(BackendError::Rejected(format!("Unauthorized (HTTP {status})")))
            }
            Err(_) => {
                error!(
                    method,
                    %status,
                    body = %body.chars().take(500).collect::<String>(),
                    "Backend returned non-success status"
                );
                Err(BackendError::InvalidResponse(format!("HTTP {status}")))
            }
        }
    }

    async fn admin_call<T: DeserializeOwned>(
        &self,
        method: &str,
        creds: &AdminCredentials,
        mut args: Value,
    ) -> Result<T, BackendError> {
        if let Value::Object(map) = &mut args {
            map.insert("username".to_string(), Value::from(creds.username()));
            map.insert(
                "password".to_string(),
                Value::from(creds.password().expose_secret()),
            );
        }
        self.call(method, None, args).await
    }
}

#[async_trait]
impl MarketplaceBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn get_all_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.call("getAllCategories", None, json!({})).await
    }

    #[instrument(skip(self), fields(category_id = %id))]
    async fn get_category(&self, id: &CategoryId) -> Result<Option<Category>, BackendError> {
        self.call("getCategory", None, json!({ "id": id })).await
    }

    #[instrument(skip(self))]
    async fn get_all_workers(&self) -> Result<Vec<WorkerProfile>, BackendError> {
        self.call("getAllWorkers", None, json!({})).await
    }

    #[instrument(skip(self), fields(category_id = %category_id))]
    async fn get_workers_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<WorkerProfile>, BackendError> {
        self.call(
            "getWorkersByCategory",
            None,
            json!({ "categoryId": category_id }),
        )
        .await
    }

    #[instrument(skip(self), fields(worker_id = %id))]
    async fn get_worker_profile(
        &self,
        id: &WorkerId,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.call("getWorkerProfile", None, json!({ "id": id })).await
    }

    #[instrument(skip(self, inquiry), fields(worker_id = %inquiry.worker_id))]
    async fn create_inquiry(&self, inquiry: Inquiry) -> Result<(), BackendError> {
        self.call("createInquiry", None, json!({ "inquiry": inquiry }))
            .await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn get_caller_user_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<UserProfile>, BackendError> {
        self.call("getCallerUserProfile", Some(caller), json!({}))
            .await
    }

    #[instrument(skip(self, profile), fields(caller = %caller))]
    async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: UserProfile,
    ) -> Result<(), BackendError> {
        self.call(
            "saveCallerUserProfile",
            Some(caller),
            json!({ "profile": profile }),
        )
        .await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn get_my_worker_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.call("getMyWorkerProfile", Some(caller), json!({}))
            .await
    }

    #[instrument(skip(self, profile), fields(caller = %caller))]
    async fn register_worker(
        &self,
        caller: &Principal,
        profile: WorkerProfile,
    ) -> Result<(), BackendError> {
        self.call("registerWorker", Some(caller), json!({ "profile": profile }))
            .await
    }

    #[instrument(skip(self, profile), fields(caller = %caller, worker_id = %id))]
    async fn update_worker_profile(
        &self,
        caller: &Principal,
        id: &WorkerId,
        profile: WorkerProfile,
    ) -> Result<(), BackendError> {
        self.call(
            "updateWorkerProfile",
            Some(caller),
            json!({ "id": id, "profile": profile }),
        )
        .await
    }

    #[instrument(skip(self), fields(caller = %caller, worker_id = %worker_id))]
    async fn get_worker_inquiries(
        &self,
        caller: &Principal,
        worker_id: &WorkerId,
    ) -> Result<Vec<Inquiry>, BackendError> {
        self.call(
            "getWorkerInquiries",
            Some(caller),
            json!({ "workerId": worker_id }),
        )
        .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username()))]
    async fn get_all_workers_admin(
        &self,
        creds: &AdminCredentials,
    ) -> Result<Vec<WorkerProfile>, BackendError> {
        self.admin_call("getAllWorkersAdmin", creds, json!({})).await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username(), worker_id = %id))]
    async fn get_worker_profile_admin(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.admin_call("getWorkerProfileAdmin", creds, json!({ "id": id }))
            .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username(), worker_id = %worker_id))]
    async fn get_worker_inquiries_admin(
        &self,
        creds: &AdminCredentials,
        worker_id: &WorkerId,
    ) -> Result<Vec<Inquiry>, BackendError> {
        self.admin_call(
            "getWorkerInquiriesAdmin",
            creds,
            json!({ "workerId": worker_id }),
        )
        .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username(), worker_id = %id))]
    async fn approve_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.admin_call("approveWorker", creds, json!({ "workerId": id }))
            .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username(), worker_id = %id))]
    async fn reject_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.admin_call("rejectWorker", creds, json!({ "workerId": id }))
            .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username(), worker_id = %id))]
    async fn publish_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.admin_call("publishWorker", creds, json!({ "workerId": id }))
            .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username(), worker_id = %id))]
    async fn unpublish_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.admin_call("unpublishWorker", creds, json!({ "workerId": id }))
            .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username(), worker_id = %id))]
    async fn remove_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.admin_call("removeWorker", creds, json!({ "workerId": id }))
            .await
    }

    #[instrument(skip(self, creds, category), fields(admin = %creds.username(), category_id = %category.id))]
    async fn create_category(
        &self,
        creds: &AdminCredentials,
        category: Category,
    ) -> Result<(), BackendError> {
        self.admin_call("createCategory", creds, json!({ "category": category }))
            .await
    }

    #[instrument(skip(self, creds, category), fields(admin = %creds.username(), category_id = %id))]
    async fn update_category(
        &self,
        creds: &AdminCredentials,
        id: &CategoryId,
        category: Category,
    ) -> Result<(), BackendError> {
        self.admin_call(
            "updateCategory",
            creds,
            json!({ "id": id, "category": category }),
        )
        .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username(), category_id = %id))]
    async fn delete_category(
        &self,
        creds: &AdminCredentials,
        id: &CategoryId,
    ) -> Result<(), BackendError> {
        self.admin_call("deleteCategory", creds, json!({ "id": id }))
            .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username()))]
    async fn get_all_inquiries(
        &self,
        creds: &AdminCredentials,
    ) -> Result<Vec<Inquiry>, BackendError> {
        self.admin_call("getAllInquiries", creds, json!({})).await
    }

    #[instrument(skip(self, creds, inquiry), fields(admin = %creds.username(), inquiry_id = %id))]
    async fn update_inquiry(
        &self,
        creds: &AdminCredentials,
        id: &InquiryId,
        inquiry: Inquiry,
    ) -> Result<(), BackendError> {
        self.admin_call(
            "updateInquiry",
            creds,
            json!({ "id": id, "inquiry": inquiry }),
        )
        .await
    }

    #[instrument(skip(self, creds), fields(admin = %creds.username(), inquiry_id = %id))]
    async fn delete_inquiry(
        &self,
        creds: &AdminCredentials,
        id: &InquiryId,
    ) -> Result<(), BackendError> {
        self.admin_call("deleteInquiry", creds, json!({ "id": id }))
            .await
    }
}
