//! In-process marketplace backend.
//!
//! Enforces the same contract as the managed backend: admin credentials on
//! privileged calls, ownership on worker calls and the lifecycle rules from
//! [`seva_sangam_core::lifecycle`]. State lives in memory and is lost on
//! restart, so this is only for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use seva_sangam_core::lifecycle::{self, ActionOutcome, WorkerAction};
use seva_sangam_core::{
    AdminCredentials, BackendError, Category, CategoryId, Inquiry, InquiryId, MarketplaceBackend,
    Principal, UserProfile, WorkerId, WorkerProfile,
};

const UNAUTHORIZED: &str = "Unauthorized: Only admins can perform this action";
const NOT_OWNER: &str = "Unauthorized: caller does not own this worker profile";
const WORKER_NOT_FOUND: &str = "Worker not found";
const CATEGORY_NOT_FOUND: &str = "Category not found";
const INQUIRY_NOT_FOUND: &str = "Inquiry not found";

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    workers: Vec<WorkerProfile>,
    inquiries: Vec<Inquiry>,
    users: HashMap<Principal, UserProfile>,
}

impl State {
    fn worker_mut(&mut self, id: &WorkerId) -> Result<&mut WorkerProfile, BackendError> {
        self.workers
            .iter_mut()
            .find(|w| w.id == *id)
            .ok_or_else(|| BackendError::Rejected(WORKER_NOT_FOUND.to_string()))
    }

    fn owned_worker(
        &self,
        caller: &Principal,
        id: &WorkerId,
    ) -> Result<&WorkerProfile, BackendError> {
        let worker = self
            .workers
            .iter()
            .find(|w| w.id == *id)
            .ok_or_else(|| BackendError::Rejected(WORKER_NOT_FOUND.to_string()))?;
        if worker.principal != *caller {
            return Err(BackendError::Rejected(NOT_OWNER.to_string()));
        }
        Ok(worker)
    }
}

/// Marketplace backend held in process memory.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<State>>,
    admin: Option<Arc<(String, SecretString)>>,
    offline: Arc<AtomicBool>,
    admin_revoked: Arc<AtomicBool>,
}

impl MemoryBackend {
    /// A backend with no admin account; every privileged call is rejected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend accepting the given admin credentials.
    #[must_use]
    pub fn with_admin(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            admin: Some(Arc::new((username.into(), password))),
            ..Self::default()
        }
    }

    /// Simulate a lost connection: every call fails with a network error
    /// until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Reject the admin account from now on, as if its password had been
    /// changed on the backend.
    pub fn revoke_admin(&self) {
        self.admin_revoked.store(true, Ordering::SeqCst);
    }

    /// Insert or replace a worker directly, bypassing registration rules.
    pub async fn insert_worker(&self, profile: WorkerProfile) {
        let mut state = self.state.write().await;
        state.workers.retain(|w| w.id != profile.id);
        state.workers.push(profile);
    }

    /// Insert or replace a category directly.
    pub async fn insert_category(&self, category: Category) {
        let mut state = self.state.write().await;
        state.categories.retain(|c| c.id != category.id);
        state.categories.push(category);
    }

    fn ensure_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Network("NetworkError: backend unreachable".to_string()));
        }
        Ok(())
    }

    fn authorize(&self, creds: &AdminCredentials) -> Result<(), BackendError> {
        self.ensure_online()?;
        let authorized = !self.admin_revoked.load(Ordering::SeqCst)
            && self.admin.as_deref().is_some_and(|(username, password)| {
                creds.username() == username.as_str()
                    && creds.password().expose_secret() == password.expose_secret()
            });
        if authorized {
            Ok(())
        } else {
            debug!(admin = %creds.username(), "Rejected admin credentials");
            Err(BackendError::Rejected(UNAUTHORIZED.to_string()))
        }
    }

    async fn moderate(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
        action: WorkerAction,
    ) -> Result<(), BackendError> {
        self.authorize(creds)?;
        let mut state = self.state.write().await;
        let current = state.worker_mut(id)?.clone();

        match lifecycle::apply(current, action)
            .map_err(|e| BackendError::Rejected(e.to_string()))?
        {
            ActionOutcome::Updated(updated) => *state.worker_mut(id)? = updated,
            ActionOutcome::Removed => {
                state.workers.retain(|w| w.id != *id);
                state.inquiries.retain(|i| i.worker_id != *id);
            }
        }
        debug!(worker_id = %id, action = %action, "Applied worker action");
        Ok(())
    }
}

#[async_trait]
impl MarketplaceBackend for MemoryBackend {
    async fn get_all_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.ensure_online()?;
        Ok(self.state.read().await.categories.clone())
    }

    async fn get_category(&self, id: &CategoryId) -> Result<Option<Category>, BackendError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state.categories.iter().find(|c| c.id == *id).cloned())
    }

    async fn get_all_workers(&self) -> Result<Vec<WorkerProfile>, BackendError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state
            .workers
            .iter()
            .filter(|w| w.is_publicly_visible())
            .cloned()
            .collect())
    }

    async fn get_workers_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<WorkerProfile>, BackendError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state
            .workers
            .iter()
            .filter(|w| w.category_id == *category_id && w.is_publicly_visible())
            .cloned()
            .collect())
    }

    async fn get_worker_profile(
        &self,
        id: &WorkerId,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state
            .workers
            .iter()
            .find(|w| w.id == *id && w.is_publicly_visible())
            .cloned())
    }

    #[instrument(skip(self, inquiry), fields(inquiry_id = %inquiry.id))]
    async fn create_inquiry(&self, inquiry: Inquiry) -> Result<(), BackendError> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        if !state.workers.iter().any(|w| w.id == inquiry.worker_id) {
            return Err(BackendError::Rejected(WORKER_NOT_FOUND.to_string()));
        }
        state.inquiries.push(inquiry);
        Ok(())
    }

    async fn get_caller_user_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<UserProfile>, BackendError> {
        self.ensure_online()?;
        Ok(self.state.read().await.users.get(caller).cloned())
    }

    #[instrument(skip(self, profile), fields(caller = %caller))]
    async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: UserProfile,
    ) -> Result<(), BackendError> {
        self.ensure_online()?;
        self.state.write().await.users.insert(caller.clone(), profile);
        Ok(())
    }

    async fn get_my_worker_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state
            .workers
            .iter()
            .find(|w| w.principal == *caller)
            .cloned())
    }

    #[instrument(skip(self, profile), fields(caller = %caller, worker_id = %profile.id))]
    async fn register_worker(
        &self,
        caller: &Principal,
        profile: WorkerProfile,
    ) -> Result<(), BackendError> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        if state.workers.iter().any(|w| w.principal == *caller) {
            return Err(BackendError::Rejected(
                "A worker profile already exists for this account".to_string(),
            ));
        }
        if state.workers.iter().any(|w| w.id == profile.id) {
            return Err(BackendError::Rejected("Worker id already in use".to_string()));
        }

        state.workers.push(WorkerProfile {
            principal: caller.clone(),
            status: seva_sangam_core::WorkerStatus::Pending,
            published: false,
            ..profile
        });
        Ok(())
    }

    #[instrument(skip(self, profile), fields(caller = %caller, worker_id = %id))]
    async fn update_worker_profile(
        &self,
        caller: &Principal,
        id: &WorkerId,
        profile: WorkerProfile,
    ) -> Result<(), BackendError> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        let current = state.owned_worker(caller, id)?.clone();
        *state.worker_mut(id)? = lifecycle::apply_worker_edit(&current, profile);
        Ok(())
    }

    async fn get_worker_inquiries(
        &self,
        caller: &Principal,
        worker_id: &WorkerId,
    ) -> Result<Vec<Inquiry>, BackendError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        state.owned_worker(caller, worker_id)?;
        Ok(state
            .inquiries
            .iter()
            .filter(|i| i.worker_id == *worker_id)
            .cloned()
            .collect())
    }

    async fn get_all_workers_admin(
        &self,
        creds: &AdminCredentials,
    ) -> Result<Vec<WorkerProfile>, BackendError> {
        self.authorize(creds)?;
        Ok(self.state.read().await.workers.clone())
    }

    async fn get_worker_profile_admin(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.authorize(creds)?;
        let state = self.state.read().await;
        Ok(state.workers.iter().find(|w| w.id == *id).cloned())
    }

    async fn get_worker_inquiries_admin(
        &self,
        creds: &AdminCredentials,
        worker_id: &WorkerId,
    ) -> Result<Vec<Inquiry>, BackendError> {
        self.authorize(creds)?;
        let state = self.state.read().await;
        Ok(state
            .inquiries
            .iter()
            .filter(|i| i.worker_id == *worker_id)
            .cloned()
            .collect())
    }

    async fn approve_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.moderate(creds, id, WorkerAction::Approve).await
    }

    async fn reject_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.moderate(creds, id, WorkerAction::Reject).await
    }

    async fn publish_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.moderate(creds, id, WorkerAction::Publish).await
    }

    async fn unpublish_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.moderate(creds, id, WorkerAction::Unpublish).await
    }

    async fn remove_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.moderate(creds, id, WorkerAction::Remove).await
    }

    async fn create_category(
        &self,
        creds: &AdminCredentials,
        category: Category,
    ) -> Result<(), BackendError> {
        self.authorize(creds)?;
        let mut state = self.state.write().await;
        if state.categories.iter().any(|c| c.id == category.id) {
            return Err(BackendError::Rejected("Category already exists".to_string()));
        }
        state.categories.push(category);
        Ok(())
    }

    async fn update_category(
        &self,
        creds: &AdminCredentials,
        id: &CategoryId,
        category: Category,
    ) -> Result<(), BackendError> {
        self.authorize(creds)?;
        let mut state = self.state.write().await;
        let slot = state
            .categories
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| BackendError::Rejected(CATEGORY_NOT_FOUND.to_string()))?;
        *slot = Category {
            id: id.clone(),
            ..category
        };
        Ok(())
    }

    async fn delete_category(
        &self,
        creds: &AdminCredentials,
        id: &CategoryId,
    ) -> Result<(), BackendError> {
        self.authorize(creds)?;
        let mut state = self.state.write().await;
        let before = state.categories.len();
        state.categories.retain(|c| c.id != *id);
        if state.categories.len() == before {
            return Err(BackendError::Rejected(CATEGORY_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    async fn get_all_inquiries(
        &self,
        creds: &AdminCredentials,
    ) -> Result<Vec<Inquiry>, BackendError> {
        self.authorize(creds)?;
        Ok(self.state.read().await.inquiries.clone())
    }

    async fn update_inquiry(
        &self,
        creds: &AdminCredentials,
        id: &InquiryId,
        inquiry: Inquiry,
    ) -> Result<(), BackendError> {
        self.authorize(creds)?;
        let mut state = self.state.write().await;
        let slot = state
            .inquiries
            .iter_mut()
            .find(|i| i.id == *id)
            .ok_or_else(|| BackendError::Rejected(INQUIRY_NOT_FOUND.to_string()))?;
        *slot = Inquiry {
            id: id.clone(),
            ..inquiry
        };
        Ok(())
    }

    async fn delete_inquiry(
        &self,
        creds: &AdminCredentials,
        id: &InquiryId,
    ) -> Result<(), BackendError> {
        self.authorize(creds)?;
        let mut state = self.state.write().await;
        let before = state.inquiries.len();
        state.inquiries.retain(|i| i.id != *id);
        if state.inquiries.len() == before {
            return Err(BackendError::Rejected(INQUIRY_NOT_FOUND.to_string()));
        }
        Ok(())
    }
}
