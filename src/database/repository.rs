use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::memory::MemoryStore;
use crate::database::models::*;
use crate::database::postgres::PgStore;
use crate::database::DatabaseError;
use crate::types::{OrderStatus, Role};

type Result<T> = std::result::Result<T, DatabaseError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, filter: UserFilter) -> Result<Vec<User>>;
    async fn update_profile(&self, id: i64, changes: ProfileChanges) -> Result<User>;
    async fn update_role(&self, id: i64, role: Role) -> Result<User>;
    async fn ban(&self, id: i64, reason: String) -> Result<User>;
    async fn unban(&self, id: i64) -> Result<User>;
    async fn stats(&self) -> Result<UserStats>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: NewProject) -> Result<Project>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Project>>;
    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Project>>;
    async fn update(&self, id: i64, changes: ProjectChanges) -> Result<Project>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn list(&self, filter: ProjectFilter) -> Result<Vec<Project>>;
    async fn update_status(&self, id: i64, change: ProjectStatusChange) -> Result<Project>;
    async fn stats(&self) -> Result<ProjectStats>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fails with `NotFound` when `project_id` names a missing portfolio project.
    async fn create(&self, order: NewOrder) -> Result<Order>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>>;
    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Order>>;
    async fn list_all(&self) -> Result<Vec<Order>>;
    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn stats(&self) -> Result<OrderStats>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Fails with `NotFound` when the recipient does not exist.
    async fn create(&self, message: NewMessage) -> Result<Message>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Message>>;
    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Message>>;
    async fn mark_read(&self, id: i64) -> Result<Message>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn unread_count(&self, user_id: i64) -> Result<i64>;
    async fn list_all(&self) -> Result<Vec<MessageWithUsers>>;
    async fn stats(&self) -> Result<MessageStats>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// `Conflict` on a duplicate pair, `NotFound` for a missing portfolio project.
    async fn add(&self, user_id: i64, project_id: i64) -> Result<Favorite>;
    /// Returns whether a row was removed.
    async fn remove(&self, user_id: i64, project_id: i64) -> Result<bool>;
    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<FavoriteWithProject>>;
    async fn exists(&self, user_id: i64, project_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    async fn list(&self, filter: PortfolioFilter) -> Result<Vec<PortfolioProject>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<PortfolioProject>>;
    async fn categories(&self) -> Result<Vec<Category>>;
    async fn create(&self, draft: PortfolioDraft) -> Result<PortfolioProject>;
    async fn update(&self, id: i64, changes: PortfolioChanges) -> Result<PortfolioProject>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn count(&self) -> Result<i64>;
    async fn recent(&self, limit: i64) -> Result<Vec<PortfolioProject>>;
}

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn list(&self, filter: BlogFilter) -> Result<Vec<BlogPost>>;
    /// Published and already due, newest first.
    async fn published(&self, limit: i64, offset: i64) -> Result<Vec<BlogPost>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<BlogPost>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;
    /// Fails with `Conflict` when the slug is taken.
    async fn create(&self, author_id: i64, slug: String, draft: BlogDraft) -> Result<BlogPost>;
    async fn update(&self, id: i64, changes: BlogChanges) -> Result<BlogPost>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn stats(&self) -> Result<BlogStats>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, contact: NewContact) -> Result<ContactSubmission>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ContactSubmission>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<ContactSubmission>>;
    async fn update(&self, id: i64, changes: ContactChanges) -> Result<ContactSubmission>;
    async fn reply(&self, id: i64, reply: String) -> Result<ContactSubmission>;
    async fn mark_read(&self, id: i64) -> Result<ContactSubmission>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn statistics(&self) -> Result<ContactStats>;
    async fn count(&self) -> Result<i64>;
    async fn recent(&self, limit: i64) -> Result<Vec<ContactSubmission>>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Setting>>;
    async fn find_by_key(&self, key: &str) -> Result<Option<Setting>>;
    async fn update(&self, key: &str, value: String) -> Result<Setting>;
    /// All or nothing: an unknown key rolls back every write.
    async fn update_many(&self, values: HashMap<String, String>) -> Result<Vec<Setting>>;
}

/// Per-entity data access, shared by every handler through `AppState`.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub portfolio: Arc<dyn PortfolioRepository>,
    pub blog: Arc<dyn BlogRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self::from_backend(Arc::new(PgStore::new(pool)))
    }

    /// In-process store preloaded with the sample data `schema::seed` inserts.
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::seeded()))
    }

    fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: UserRepository
            + ProjectRepository
            + OrderRepository
            + MessageRepository
            + FavoriteRepository
            + PortfolioRepository
            + BlogRepository
            + ContactRepository
            + SettingsRepository
            + 'static,
    {
        Self {
            users: backend.clone(),
            projects: backend.clone(),
            orders: backend.clone(),
            messages: backend.clone(),
            favorites: backend.clone(),
            portfolio: backend.clone(),
            blog: backend.clone(),
            contacts: backend.clone(),
            settings: backend,
        }
    }
}
