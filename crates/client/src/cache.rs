//! Query cache in front of a backend.
//!
//! Public and worker reads are cached under hierarchical keys such as
//! `workers/category/plumber`. A successful mutation invalidates whole
//! roots (`workers`, `worker`, ...) so the next read refetches. Privileged
//! reads always go to the backend.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument, warn};

use seva_sangam_core::{
    AdminCredentials, BackendError, Category, CategoryId, Inquiry, InquiryId, MarketplaceBackend,
    Principal, SharedBackend, UserProfile, WorkerId, WorkerProfile,
};

/// First segment of a cache key.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheRoot {
    Categories,
    Category,
    Workers,
    Worker,
    MyWorker,
    WorkerJobs,
    CurrentUserProfile,
}

impl CacheRoot {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Category => "category",
            Self::Workers => "workers",
            Self::Worker => "worker",
            Self::MyWorker => "my-worker",
            Self::WorkerJobs => "worker-jobs",
            Self::CurrentUserProfile => "current-user-profile",
        }
    }
}

/// Key of one cached query.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    Category(CategoryId),
    Workers,
    WorkersByCategory(CategoryId),
    Worker(WorkerId),
    MyWorker(Principal),
    WorkerJobs(Principal, WorkerId),
    CurrentUserProfile(Principal),
}

impl CacheKey {
    #[must_use]
    pub const fn root(&self) -> CacheRoot {
        match self {
            Self::Categories => CacheRoot::Categories,
            Self::Category(_) => CacheRoot::Category,
            Self::Workers | Self::WorkersByCategory(_) => CacheRoot::Workers,
            Self::Worker(_) => CacheRoot::Worker,
            Self::MyWorker(_) => CacheRoot::MyWorker,
            Self::WorkerJobs(..) => CacheRoot::WorkerJobs,
            Self::CurrentUserProfile(_) => CacheRoot::CurrentUserProfile,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.root().as_str();
        match self {
            Self::Categories | Self::Workers => f.write_str(root),
            Self::Category(id) => write!(f, "{root}/{id}"),
            Self::WorkersByCategory(id) => write!(f, "{root}/category/{id}"),
            Self::Worker(id) => write!(f, "{root}/{id}"),
            Self::MyWorker(principal) | Self::CurrentUserProfile(principal) => {
                write!(f, "{root}/{principal}")
            }
            Self::WorkerJobs(principal, id) => write!(f, "{root}/{principal}/{id}"),
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Vec<Category>),
    Category(Option<Category>),
    Workers(Vec<WorkerProfile>),
    Worker(Option<Box<WorkerProfile>>),
    Inquiries(Vec<Inquiry>),
    User(Option<UserProfile>),
}

/// Conversion between query results and [`CacheValue`].
trait Cached: Sized + Clone {
    fn into_value(self) -> CacheValue;
    fn from_value(value: CacheValue) -> Option<Self>;
}

impl Cached for Vec<Category> {
    fn into_value(self) -> CacheValue {
        CacheValue::Categories(self)
    }
    fn from_value(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Categories(v) => Some(v),
            _ => None,
        }
    }
}

impl Cached for Option<Category> {
    fn into_value(self) -> CacheValue {
        CacheValue::Category(self)
    }
    fn from_value(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Category(v) => Some(v),
            _ => None,
        }
    }
}

impl Cached for Vec<WorkerProfile> {
    fn into_value(self) -> CacheValue {
        CacheValue::Workers(self)
    }
    fn from_value(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Workers(v) => Some(v),
            _ => None,
        }
    }
}

impl Cached for Option<WorkerProfile> {
    fn into_value(self) -> CacheValue {
        CacheValue::Worker(self.map(Box::new))
    }
    fn from_value(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Worker(v) => Some(v.map(|w| *w)),
            _ => None,
        }
    }
}

impl Cached for Vec<Inquiry> {
    fn into_value(self) -> CacheValue {
        CacheValue::Inquiries(self)
    }
    fn from_value(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Inquiries(v) => Some(v),
            _ => None,
        }
    }
}

impl Cached for Option<UserProfile> {
    fn into_value(self) -> CacheValue {
        CacheValue::User(self)
    }
    fn from_value(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::User(v) => Some(v),
            _ => None,
        }
    }
}

/// Backend decorator that caches reads and invalidates on mutations.
#[derive(Clone)]
pub struct CachedBackend {
    inner: SharedBackend,
    cache: Cache<CacheKey, CacheValue>,
}

impl CachedBackend {
    /// Wrap `inner` with a cache of `capacity` entries living `ttl`.
    #[must_use]
    pub fn new(inner: SharedBackend, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self { inner, cache }
    }

    /// Drop every cached entry under the given roots.
    pub fn invalidate(&self, roots: &[CacheRoot]) {
        let roots = roots.to_vec();
        debug!(?roots, "Invalidating cache roots");
        if let Err(e) = self
            .cache
            .invalidate_entries_if(move |key, _| roots.contains(&key.root()))
        {
            warn!(error = %e, "Cache invalidation failed, clearing everything");
            self.cache.invalidate_all();
        }
    }

    /// Whether `key` currently has a cached value.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.cache.get(key).await.is_some()
    }

    async fn get_or_fetch<T, F>(&self, key: CacheKey, fetch: F) -> Result<T, BackendError>
    where
        T: Cached,
        F: Future<Output = Result<T, BackendError>>,
    {
        if let Some(value) = self.cache.get(&key).await.and_then(T::from_value) {
            debug!(key = %key, "Cache hit");
            return Ok(value);
        }

        let value = fetch.await?;
        self.cache.insert(key, value.clone().into_value()).await;
        Ok(value)
    }

    /// Run a mutation and invalidate `roots` if it succeeds.
    async fn mutate<F>(&self, roots: &[CacheRoot], mutation: F) -> Result<(), BackendError>
    where
        F: Future<Output = Result<(), BackendError>>,
    {
        mutation.await?;
        self.invalidate(roots);
        Ok(())
    }
}

const WORKER_ROOTS: &[CacheRoot] = &[CacheRoot::MyWorker, CacheRoot::Workers, CacheRoot::Worker];
const MODERATION_ROOTS: &[CacheRoot] = &[CacheRoot::Workers, CacheRoot::Worker];
const CATEGORY_ROOTS: &[CacheRoot] = &[CacheRoot::Categories, CacheRoot::Category];
const INQUIRY_ROOTS: &[CacheRoot] = &[CacheRoot::WorkerJobs];
const USER_ROOTS: &[CacheRoot] = &[CacheRoot::CurrentUserProfile];

#[async_trait]
impl MarketplaceBackend for CachedBackend {
    #[instrument(skip(self))]
    async fn get_all_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.get_or_fetch(CacheKey::Categories, self.inner.get_all_categories())
            .await
    }

    #[instrument(skip(self), fields(category_id = %id))]
    async fn get_category(&self, id: &CategoryId) -> Result<Option<Category>, BackendError> {
        self.get_or_fetch(CacheKey::Category(id.clone()), self.inner.get_category(id))
            .await
    }

    #[instrument(skip(self))]
    async fn get_all_workers(&self) -> Result<Vec<WorkerProfile>, BackendError> {
        self.get_or_fetch(CacheKey::Workers, self.inner.get_all_workers())
            .await
    }

    #[instrument(skip(self), fields(category_id = %category_id))]
    async fn get_workers_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<WorkerProfile>, BackendError> {
        self.get_or_fetch(
            CacheKey::WorkersByCategory(category_id.clone()),
            self.inner.get_workers_by_category(category_id),
        )
        .await
    }

    #[instrument(skip(self), fields(worker_id = %id))]
    async fn get_worker_profile(
        &self,
        id: &WorkerId,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.get_or_fetch(CacheKey::Worker(id.clone()), self.inner.get_worker_profile(id))
            .await
    }

    async fn create_inquiry(&self, inquiry: Inquiry) -> Result<(), BackendError> {
        self.mutate(INQUIRY_ROOTS, self.inner.create_inquiry(inquiry))
            .await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn get_caller_user_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<UserProfile>, BackendError> {
        self.get_or_fetch(
            CacheKey::CurrentUserProfile(caller.clone()),
            self.inner.get_caller_user_profile(caller),
        )
        .await
    }

    async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: UserProfile,
    ) -> Result<(), BackendError> {
        self.mutate(
            USER_ROOTS,
            self.inner.save_caller_user_profile(caller, profile),
        )
        .await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn get_my_worker_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.get_or_fetch(
            CacheKey::MyWorker(caller.clone()),
            self.inner.get_my_worker_profile(caller),
        )
        .await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn refresh_my_worker_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        let fresh = self.inner.refresh_my_worker_profile(caller).await?;
        self.cache
            .insert(CacheKey::MyWorker(caller.clone()), fresh.clone().into_value())
            .await;
        Ok(fresh)
    }

    async fn register_worker(
        &self,
        caller: &Principal,
        profile: WorkerProfile,
    ) -> Result<(), BackendError> {
        self.mutate(WORKER_ROOTS, self.inner.register_worker(caller, profile))
            .await
    }

    async fn update_worker_profile(
        &self,
        caller: &Principal,
        id: &WorkerId,
        profile: WorkerProfile,
    ) -> Result<(), BackendError> {
        self.mutate(
            WORKER_ROOTS,
            self.inner.update_worker_profile(caller, id, profile),
        )
        .await
    }

    #[instrument(skip(self), fields(caller = %caller, worker_id = %worker_id))]
    async fn get_worker_inquiries(
        &self,
        caller: &Principal,
        worker_id: &WorkerId,
    ) -> Result<Vec<Inquiry>, BackendError> {
        self.get_or_fetch(
            CacheKey::WorkerJobs(caller.clone(), worker_id.clone()),
            self.inner.get_worker_inquiries(caller, worker_id),
        )
        .await
    }

    async fn get_all_workers_admin(
        &self,
        creds: &AdminCredentials,
    ) -> Result<Vec<WorkerProfile>, BackendError> {
        self.inner.get_all_workers_admin(creds).await
    }

    async fn get_worker_profile_admin(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.inner.get_worker_profile_admin(creds, id).await
    }

    async fn get_worker_inquiries_admin(
        &self,
        creds: &AdminCredentials,
        worker_id: &WorkerId,
    ) -> Result<Vec<Inquiry>, BackendError> {
        self.inner.get_worker_inquiries_admin(creds, worker_id).await
    }

    async fn approve_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.mutate(MODERATION_ROOTS, self.inner.approve_worker(creds, id))
            .await
    }

    async fn reject_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.mutate(MODERATION_ROOTS, self.inner.reject_worker(creds, id))
            .await
    }

    async fn publish_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.mutate(MODERATION_ROOTS, self.inner.publish_worker(creds, id))
            .await
    }

    async fn unpublish_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.mutate(MODERATION_ROOTS, self.inner.unpublish_worker(creds, id))
            .await
    }

    async fn remove_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError> {
        self.mutate(MODERATION_ROOTS, self.inner.remove_worker(creds, id))
            .await
    }

    async fn create_category(
        &self,
        creds: &AdminCredentials,
        category: Category,
    ) -> Result<(), BackendError> {
        self.mutate(CATEGORY_ROOTS, self.inner.create_category(creds, category))
            .await
    }

    async fn update_category(
        &self,
        creds: &AdminCredentials,
        id: &CategoryId,
        category: Category,
    ) -> Result<(), BackendError> {
        self.mutate(
            CATEGORY_ROOTS,
            self.inner.update_category(creds, id, category),
        )
        .await
    }

    async fn delete_category(
        &self,
        creds: &AdminCredentials,
        id: &CategoryId,
    ) -> Result<(), BackendError> {
        self.mutate(CATEGORY_ROOTS, self.inner.delete_category(creds, id))
            .await
    }

    async fn get_all_inquiries(
        &self,
        creds: &AdminCredentials,
    ) -> Result<Vec<Inquiry>, BackendError> {
        self.inner.get_all_inquiries(creds).await
    }

    async fn update_inquiry(
        &self,
        creds: &AdminCredentials,
        id: &InquiryId,
        inquiry: Inquiry,
    ) -> Result<(), BackendError> {
        self.mutate(INQUIRY_ROOTS, self.inner.update_inquiry(creds, id, inquiry))
            .await
    }

    async fn delete_inquiry(
        &self,
        creds: &AdminCredentials,
        id: &InquiryId,
    ) -> Result<(), BackendError> {
        self.mutate(INQUIRY_ROOTS, self.inner.delete_inquiry(creds, id))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;
    use seva_sangam_core::WorkerStatus;

    use super::*;
    use crate::memory::MemoryBackend;

    fn admin() -> AdminCredentials {
        AdminCredentials::new("admin", SecretString::from("s3cret-Pass"))
    }

    fn setup() -> (MemoryBackend, CachedBackend) {
        let memory = MemoryBackend::with_admin("admin", SecretString::from("s3cret-Pass"));
        let cached = CachedBackend::new(Arc::new(memory.clone()), Duration::from_secs(300), 100);
        (memory, cached)
    }

    fn worker(id: &str, status: WorkerStatus, published: bool) -> WorkerProfile {
        WorkerProfile {
            id: WorkerId::new(id),
            principal: Principal::new(format!("p-{id}")),
            full_name: "Asha".to_string(),
            phone_number: "9876543210".to_string(),
            category_id: CategoryId::new("painter"),
            location: seva_sangam_core::Location::default(),
            pricing: seva_sangam_core::Pricing::default(),
            availability: seva_sangam_core::Schedule::default(),
            integrations: seva_sangam_core::Integrations::default(),
            years_experience: 0,
            photo: None,
            status,
            published,
        }
    }

    #[test]
    fn test_key_paths() {
        assert_eq!(CacheKey::Categories.to_string(), "categories");
        assert_eq!(
            CacheKey::WorkersByCategory(CategoryId::new("plumber")).to_string(),
            "workers/category/plumber"
        );
        assert_eq!(
            CacheKey::WorkerJobs(Principal::new("p"), WorkerId::new("w")).to_string(),
            "worker-jobs/p/w"
        );
        assert_eq!(
            CacheKey::CurrentUserProfile(Principal::new("p")).to_string(),
            "current-user-profile/p"
        );
        assert_eq!(
            CacheKey::WorkersByCategory(CategoryId::new("x")).root(),
            CacheRoot::Workers
        );
        assert_ne!(CacheKey::Worker(WorkerId::new("w")).root(), CacheRoot::Workers);
    }

    #[tokio::test]
    async fn test_reads_are_served_from_cache_until_invalidated() {
        let (memory, cached) = setup();
        assert!(cached.get_all_categories().await.unwrap().is_empty());

        memory.insert_category(Category::active("mason", "Mason")).await;
        assert!(cached.get_all_categories().await.unwrap().is_empty());

        cached.invalidate(&[CacheRoot::Categories]);
        assert_eq!(cached.get_all_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_moderation_invalidates_worker_roots() {
        let (memory, cached) = setup();
        memory.insert_worker(worker("w1", WorkerStatus::Approved, false)).await;

        assert!(cached.get_all_workers().await.unwrap().is_empty());
        assert!(cached
            .get_workers_by_category(&CategoryId::new("painter"))
            .await
            .unwrap()
            .is_empty());

        cached.publish_worker(&admin(), &WorkerId::new("w1")).await.unwrap();

        assert!(!cached.contains(&CacheKey::Workers).await);
        assert_eq!(cached.get_all_workers().await.unwrap().len(), 1);
        assert_eq!(
            cached
                .get_workers_by_category(&CategoryId::new("painter"))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cache() {
        let (_memory, cached) = setup();
        cached.get_all_categories().await.unwrap();

        let wrong = AdminCredentials::new("admin", SecretString::from("bad"));
        assert!(cached
            .create_category(&wrong, Category::active("x", "X"))
            .await
            .is_err());
        assert!(cached.contains(&CacheKey::Categories).await);
    }

    #[tokio::test]
    async fn test_category_mutation_leaves_worker_cache() {
        let (_memory, cached) = setup();
        cached.get_all_workers().await.unwrap();
        cached.get_all_categories().await.unwrap();

        cached
            .create_category(&admin(), Category::active("tailor", "Tailor"))
            .await
            .unwrap();

        assert!(cached.contains(&CacheKey::Workers).await);
        assert!(!cached.contains(&CacheKey::Categories).await);
    }

    #[tokio::test]
    async fn test_refresh_replaces_stale_own_profile() {
        let (memory, cached) = setup();
        let caller = Principal::new("p-w3");
        memory.insert_worker(worker("w3", WorkerStatus::Pending, false)).await;
        assert_eq!(
            cached.get_my_worker_profile(&caller).await.unwrap().unwrap().status,
            WorkerStatus::Pending
        );

        // Moderated through another cache, as the admin process does.
        memory.approve_worker(&admin(), &WorkerId::new("w3")).await.unwrap();
        memory.publish_worker(&admin(), &WorkerId::new("w3")).await.unwrap();
        assert_eq!(
            cached.get_my_worker_profile(&caller).await.unwrap().unwrap().status,
            WorkerStatus::Pending
        );

        let fresh = cached.refresh_my_worker_profile(&caller).await.unwrap().unwrap();
        assert_eq!(fresh.status, WorkerStatus::Approved);
        assert!(fresh.published);
        let cached_again = cached.get_my_worker_profile(&caller).await.unwrap().unwrap();
        assert_eq!(cached_again, fresh);
    }

    #[tokio::test]
    async fn test_saving_user_profile_invalidates_only_its_root() {
        let (_memory, cached) = setup();
        let caller = Principal::new("p-1");
        assert_eq!(cached.get_caller_user_profile(&caller).await.unwrap(), None);
        cached.get_all_workers().await.unwrap();

        let profile = UserProfile {
            name: "Meena".to_string(),
            role: "worker".to_string(),
        };
        cached
            .save_caller_user_profile(&caller, profile.clone())
            .await
            .unwrap();

        assert!(
            !cached
                .contains(&CacheKey::CurrentUserProfile(caller.clone()))
                .await
        );
        assert!(cached.contains(&CacheKey::Workers).await);
        assert_eq!(
            cached.get_caller_user_profile(&caller).await.unwrap(),
            Some(profile)
        );
    }

    #[tokio::test]
    async fn test_admin_reads_are_not_cached() {
        let (memory, cached) = setup();
        assert!(cached.get_all_workers_admin(&admin()).await.unwrap().is_empty());
        memory.insert_worker(worker("w2", WorkerStatus::Pending, false)).await;
        assert_eq!(cached.get_all_workers_admin(&admin()).await.unwrap().len(), 1);
    }
}
