use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::database::models::*;
use crate::database::repository::*;
use crate::database::schema::{DEFAULT_SETTINGS, SAMPLE_CATEGORIES, SAMPLE_PORTFOLIO};
use crate::database::DatabaseError;
use crate::types::{ContactStatus, ContentStatus, OrderStatus, ProjectStatus, Role, SettingType};

type Result<T> = std::result::Result<T, DatabaseError>;

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Newest first.
    fn newest(&self) -> impl Iterator<Item = &T> {
        self.rows.values().rev()
    }

    fn update(&mut self, id: i64, what: &str, apply: impl FnOnce(&mut T)) -> Result<T> {
        let row = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", what)))?;
        apply(row);
        Ok(row.clone())
    }

    fn remove(&mut self, id: i64, what: &str) -> Result<()> {
        self.rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", what)))
    }
}

struct MemoryState {
    users: Table<User>,
    projects: Table<Project>,
    orders: Table<Order>,
    messages: Table<Message>,
    favorites: Table<Favorite>,
    portfolio: Table<PortfolioProject>,
    categories: Table<Category>,
    blog: Table<BlogPost>,
    contacts: Table<ContactSubmission>,
    settings: Table<Setting>,
}

impl MemoryState {
    fn empty() -> Self {
        Self {
            users: Table::new(),
            projects: Table::new(),
            orders: Table::new(),
            messages: Table::new(),
            favorites: Table::new(),
            portfolio: Table::new(),
            categories: Table::new(),
            blog: Table::new(),
            contacts: Table::new(),
            settings: Table::new(),
        }
    }

    fn require_user(&self, id: i64, what: &str) -> Result<()> {
        if self.users.contains(id) {
            Ok(())
        } else {
            Err(DatabaseError::NotFound(format!("{} not found", what)))
        }
    }

    fn require_portfolio(&self, id: i64) -> Result<()> {
        if self.portfolio.contains(id) {
            Ok(())
        } else {
            Err(DatabaseError::NotFound("Portfolio project not found".to_string()))
        }
    }

    fn with_author(&self, mut post: BlogPost) -> BlogPost {
        post.author_name = post
            .author_id
            .and_then(|id| self.users.rows.get(&id))
            .and_then(|u| u.name.clone());
        post
    }
}

/// In-process store with the same uniqueness and cascade rules as the
/// Postgres schema. Used by the test suite and for running without a database.
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self {
            state: RwLock::new(MemoryState::empty()),
        }
    }

    /// Preloaded with the same sample categories, portfolio and settings as `schema::seed`.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let mut state = MemoryState::empty();

        for (name, description) in SAMPLE_CATEGORIES {
            state.categories.insert_with(|id| Category {
                id,
                name: name.to_string(),
                description: Some(description.to_string()),
                created_at: now,
            });
        }

        for sample in SAMPLE_PORTFOLIO {
            state.portfolio.insert_with(|id| PortfolioProject {
                id,
                title: sample.title.to_string(),
                client: Some(sample.client.to_string()),
                category: Some(sample.category.to_string()),
                image: Some(sample.image.to_string()),
                description: Some(sample.description.to_string()),
                duration: Some(sample.duration.to_string()),
                featured: sample.featured,
                status: ContentStatus::Published,
                published_at: None,
                created_at: now,
                updated_at: now,
            });
        }

        for (key, value, setting_type, description) in DEFAULT_SETTINGS {
            // Tags in DEFAULT_SETTINGS are all valid; an unknown one is skipped.
            let Ok(setting_type) = setting_type.parse::<SettingType>() else {
                continue;
            };
            state.settings.insert_with(|id| Setting {
                id,
                key: key.to_string(),
                value: value.to_string(),
                setting_type,
                description: Some(description.to_string()),
                updated_at: now,
            });
        }

        Self {
            state: RwLock::new(state),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut state = self.state.write().await;
        if state.users.rows.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("Email already registered".to_string()));
        }
        let now = Utc::now();
        Ok(state.users.insert_with(|id| User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            avatar: None,
            role: user.role,
            is_active: true,
            banned_at: None,
            ban_reason: None,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, filter: UserFilter) -> Result<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .newest()
            .filter(|u| filter.role.map_or(true, |r| u.role == r))
            .filter(|u| filter.is_active.map_or(true, |a| u.is_active == a))
            .cloned()
            .collect())
    }

    async fn update_profile(&self, id: i64, changes: ProfileChanges) -> Result<User> {
        let mut state = self.state.write().await;
        state.users.update(id, "User", |u| {
            if let Some(name) = changes.name {
                u.name = Some(name);
            }
            if let Some(avatar) = changes.avatar {
                u.avatar = Some(avatar);
            }
            u.updated_at = Utc::now();
        })
    }

    async fn update_role(&self, id: i64, role: Role) -> Result<User> {
        let mut state = self.state.write().await;
        state.users.update(id, "User", |u| {
            u.role = role;
            u.updated_at = Utc::now();
        })
    }

    async fn ban(&self, id: i64, reason: String) -> Result<User> {
        let mut state = self.state.write().await;
        state.users.update(id, "User", |u| {
            let now = Utc::now();
            u.is_active = false;
            u.banned_at = Some(now);
            u.ban_reason = Some(reason);
            u.updated_at = now;
        })
    }

    async fn unban(&self, id: i64) -> Result<User> {
        let mut state = self.state.write().await;
        state.users.update(id, "User", |u| {
            u.is_active = true;
            u.banned_at = None;
            u.ban_reason = None;
            u.updated_at = Utc::now();
        })
    }

    async fn stats(&self) -> Result<UserStats> {
        let state = self.state.read().await;
        let mut stats = UserStats::default();
        for user in state.users.rows.values() {
            stats.total_users += 1;
            match user.role {
                Role::Admin => stats.admin_count += 1,
                Role::Team => stats.team_count += 1,
                Role::Client => stats.client_count += 1,
            }
            if user.is_active {
                stats.active_count += 1;
            } else {
                stats.banned_count += 1;
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn create(&self, project: NewProject) -> Result<Project> {
        let mut state = self.state.write().await;
        state.require_user(project.user_id, "User")?;
        let now = Utc::now();
        Ok(state.projects.insert_with(|id| Project {
            id,
            user_id: project.user_id,
            title: project.title,
            description: project.description,
            image: project.image,
            status: ProjectStatus::Pending,
            assigned_to: None,
            deadline: None,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>> {
        Ok(self.state.read().await.projects.get(id))
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .newest()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, changes: ProjectChanges) -> Result<Project> {
        let mut state = self.state.write().await;
        state.projects.update(id, "Project", |p| {
            if let Some(title) = changes.title {
                p.title = title;
            }
            if let Some(description) = changes.description {
                p.description = Some(description);
            }
            if let Some(image) = changes.image {
                p.image = Some(image);
            }
            p.updated_at = Utc::now();
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.state.write().await.projects.remove(id, "Project")
    }

    async fn list(&self, filter: ProjectFilter) -> Result<Vec<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .newest()
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .filter(|p| filter.assigned_to.map_or(true, |a| p.assigned_to == Some(a)))
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: i64, change: ProjectStatusChange) -> Result<Project> {
        let mut state = self.state.write().await;
        if !state.projects.contains(id) {
            return Err(DatabaseError::NotFound("Project not found".to_string()));
        }
        if let Some(assignee) = change.assigned_to {
            state.require_user(assignee, "Assigned user")?;
        }
        state.projects.update(id, "Project", |p| {
            p.status = change.status;
            p.assigned_to = change.assigned_to;
            p.deadline = change.deadline;
            p.updated_at = Utc::now();
        })
    }

    async fn stats(&self) -> Result<ProjectStats> {
        let state = self.state.read().await;
        let mut stats = ProjectStats::default();
        for project in state.projects.rows.values() {
            stats.total_projects += 1;
            match project.status {
                ProjectStatus::Pending => stats.pending_count += 1,
                ProjectStatus::InProgress => stats.in_progress_count += 1,
                ProjectStatus::Review => stats.review_count += 1,
                ProjectStatus::Completed => stats.completed_count += 1,
                ProjectStatus::Cancelled => stats.cancelled_count += 1,
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let mut state = self.state.write().await;
        state.require_user(order.user_id, "User")?;
        if let Some(project_id) = order.project_id {
            state.require_portfolio(project_id)?;
        }
        let now = Utc::now();
        Ok(state.orders.insert_with(|id| Order {
            id,
            user_id: order.user_id,
            project_id: order.project_id,
            amount: order.amount,
            status: OrderStatus::Pending,
            details: order.details,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.get(id))
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .newest()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        Ok(self.state.read().await.orders.newest().cloned().collect())
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order> {
        let mut state = self.state.write().await;
        state.orders.update(id, "Order", |o| {
            o.status = status;
            o.updated_at = Utc::now();
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.state.write().await.orders.remove(id, "Order")
    }

    async fn stats(&self) -> Result<OrderStats> {
        let state = self.state.read().await;
        let mut stats = OrderStats::default();
        for order in state.orders.rows.values() {
            stats.total_orders += 1;
            stats.total_revenue += order.amount;
            match order.status {
                OrderStatus::Pending => stats.pending_orders += 1,
                OrderStatus::Processing => stats.processing_orders += 1,
                OrderStatus::Completed => stats.completed_orders += 1,
                OrderStatus::Cancelled => stats.cancelled_orders += 1,
            }
        }
        if stats.total_orders > 0 {
            stats.average_order_value = stats.total_revenue / stats.total_orders as f64;
        }
        Ok(stats)
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create(&self, message: NewMessage) -> Result<Message> {
        let mut state = self.state.write().await;
        state.require_user(message.user_id, "User")?;
        let now = Utc::now();
        Ok(state.messages.insert_with(|id| Message {
            id,
            user_id: message.user_id,
            sender_id: message.sender_id,
            title: message.title,
            content: message.content,
            message_type: message.message_type,
            is_read: false,
            created_at: now,
        }))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Message>> {
        Ok(self.state.read().await.messages.get(id))
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Message>> {
        let state = self.state.read().await;
        Ok(state
            .messages
            .newest()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: i64) -> Result<Message> {
        let mut state = self.state.write().await;
        state.messages.update(id, "Message", |m| m.is_read = true)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.state.write().await.messages.remove(id, "Message")
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state
            .messages
            .rows
            .values()
            .filter(|m| m.user_id == user_id && !m.is_read)
            .count() as i64)
    }

    async fn list_all(&self) -> Result<Vec<MessageWithUsers>> {
        let state = self.state.read().await;
        let email = |id: Option<i64>| {
            id.and_then(|id| state.users.rows.get(&id))
                .map(|u| u.email.clone())
        };
        Ok(state
            .messages
            .newest()
            .map(|m| MessageWithUsers {
                sender_email: email(m.sender_id),
                recipient_email: email(Some(m.user_id)),
                message: m.clone(),
            })
            .collect())
    }

    async fn stats(&self) -> Result<MessageStats> {
        let state = self.state.read().await;
        Ok(MessageStats {
            total_messages: state.messages.rows.len() as i64,
            unread_count: state.messages.rows.values().filter(|m| !m.is_read).count() as i64,
        })
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn add(&self, user_id: i64, project_id: i64) -> Result<Favorite> {
        let mut state = self.state.write().await;
        state.require_user(user_id, "User")?;
        state.require_portfolio(project_id)?;
        if state
            .favorites
            .rows
            .values()
            .any(|f| f.user_id == user_id && f.project_id == project_id)
        {
            return Err(DatabaseError::Conflict("Project already in favorites".to_string()));
        }
        let now = Utc::now();
        Ok(state.favorites.insert_with(|id| Favorite {
            id,
            user_id,
            project_id,
            created_at: now,
        }))
    }

    async fn remove(&self, user_id: i64, project_id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.favorites.rows.len();
        state
            .favorites
            .rows
            .retain(|_, f| !(f.user_id == user_id && f.project_id == project_id));
        Ok(state.favorites.rows.len() < before)
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<FavoriteWithProject>> {
        let state = self.state.read().await;
        let now = Utc::now();
        Ok(state
            .favorites
            .newest()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| {
                let p = state.portfolio.rows.get(&f.project_id)?;
                p.is_visible_at(now).then(|| FavoriteWithProject {
                    favorite: f.clone(),
                    title: p.title.clone(),
                    description: p.description.clone(),
                    image: p.image.clone(),
                    category: p.category.clone(),
                })
            })
            .collect())
    }

    async fn exists(&self, user_id: i64, project_id: i64) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state
            .favorites
            .rows
            .values()
            .any(|f| f.user_id == user_id && f.project_id == project_id))
    }
}

#[async_trait]
impl PortfolioRepository for MemoryStore {
    async fn list(&self, filter: PortfolioFilter) -> Result<Vec<PortfolioProject>> {
        let state = self.state.read().await;
        let now = Utc::now();
        let limit = filter
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);
        Ok(state
            .portfolio
            .newest()
            .filter(|p| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| p.category.as_deref() == Some(c))
            })
            .filter(|p| filter.featured.map_or(true, |f| p.featured == f))
            .filter(|p| !filter.published_only || p.is_visible_at(now))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PortfolioProject>> {
        Ok(self.state.read().await.portfolio.get(id))
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state.categories.rows.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create(&self, draft: PortfolioDraft) -> Result<PortfolioProject> {
        let mut state = self.state.write().await;
        if state.portfolio.rows.values().any(|p| p.title == draft.title) {
            return Err(DatabaseError::Conflict(
                "A portfolio project with this title exists".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(state.portfolio.insert_with(|id| PortfolioProject {
            id,
            title: draft.title,
            client: draft.client,
            category: draft.category,
            image: draft.image,
            description: draft.description,
            duration: draft.duration,
            featured: draft.featured,
            status: draft.status,
            published_at: draft.published_at,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i64, changes: PortfolioChanges) -> Result<PortfolioProject> {
        let mut state = self.state.write().await;
        if let Some(title) = &changes.title {
            if state
                .portfolio
                .rows
                .values()
                .any(|p| p.id != id && &p.title == title)
            {
                return Err(DatabaseError::Conflict(
                    "A portfolio project with this title exists".to_string(),
                ));
            }
        }
        state.portfolio.update(id, "Portfolio project", |p| {
            if let Some(v) = changes.title {
                p.title = v;
            }
            if changes.client.is_some() {
                p.client = changes.client;
            }
            if changes.category.is_some() {
                p.category = changes.category;
            }
            if changes.image.is_some() {
                p.image = changes.image;
            }
            if changes.description.is_some() {
                p.description = changes.description;
            }
            if changes.duration.is_some() {
                p.duration = changes.duration;
            }
            if let Some(v) = changes.featured {
                p.featured = v;
            }
            if let Some(v) = changes.status {
                p.status = v;
            }
            if changes.published_at.is_some() {
                p.published_at = changes.published_at;
            }
            p.updated_at = Utc::now();
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        state.portfolio.remove(id, "Portfolio project")?;
        state.favorites.rows.retain(|_, f| f.project_id != id);
        for order in state.orders.rows.values_mut() {
            if order.project_id == Some(id) {
                order.project_id = None;
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.state.read().await.portfolio.rows.len() as i64)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<PortfolioProject>> {
        let state = self.state.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state.portfolio.newest().take(limit).cloned().collect())
    }
}

#[async_trait]
impl BlogRepository for MemoryStore {
    async fn list(&self, filter: BlogFilter) -> Result<Vec<BlogPost>> {
        let state = self.state.read().await;
        Ok(state
            .blog
            .newest()
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .filter(|p| filter.author_id.map_or(true, |a| p.author_id == Some(a)))
            .map(|p| state.with_author(p.clone()))
            .collect())
    }

    async fn published(&self, limit: i64, offset: i64) -> Result<Vec<BlogPost>> {
        let state = self.state.read().await;
        let now = Utc::now();
        let mut posts: Vec<BlogPost> = state
            .blog
            .newest()
            .filter(|p| p.is_visible_at(now))
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            let a_at = a.published_at.unwrap_or(a.created_at);
            let b_at = b.published_at.unwrap_or(b.created_at);
            b_at.cmp(&a_at).then(b.id.cmp(&a.id))
        });
        Ok(posts
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|p| state.with_author(p))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BlogPost>> {
        let state = self.state.read().await;
        Ok(state.blog.get(id).map(|p| state.with_author(p)))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let state = self.state.read().await;
        Ok(state
            .blog
            .rows
            .values()
            .find(|p| p.slug == slug)
            .cloned()
            .map(|p| state.with_author(p)))
    }

    async fn create(&self, author_id: i64, slug: String, draft: BlogDraft) -> Result<BlogPost> {
        let mut state = self.state.write().await;
        state.require_user(author_id, "Author")?;
        if state.blog.rows.values().any(|p| p.slug == slug) {
            return Err(DatabaseError::Conflict(
                "A post with this slug already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let post = state.blog.insert_with(|id| BlogPost {
            id,
            title: draft.title,
            slug,
            content: draft.content,
            excerpt: draft.excerpt,
            author_id: Some(author_id),
            status: draft.status,
            featured_image: draft.featured_image,
            tags: draft.tags,
            seo_title: draft.seo_title,
            seo_description: draft.seo_description,
            published_at: draft.published_at,
            created_at: now,
            updated_at: now,
            author_name: None,
        });
        Ok(state.with_author(post))
    }

    async fn update(&self, id: i64, changes: BlogChanges) -> Result<BlogPost> {
        let mut state = self.state.write().await;
        if let Some(slug) = &changes.slug {
            if state.blog.rows.values().any(|p| p.id != id && &p.slug == slug) {
                return Err(DatabaseError::Conflict(
                    "A post with this slug already exists".to_string(),
                ));
            }
        }
        let post = state.blog.update(id, "Blog post", |p| {
            if let Some(v) = changes.title {
                p.title = v;
            }
            if let Some(v) = changes.slug {
                p.slug = v;
            }
            if let Some(v) = changes.content {
                p.content = v;
            }
            if changes.excerpt.is_some() {
                p.excerpt = changes.excerpt;
            }
            if let Some(v) = changes.status {
                p.status = v;
            }
            if changes.featured_image.is_some() {
                p.featured_image = changes.featured_image;
            }
            if let Some(v) = changes.tags {
                p.tags = v;
            }
            if changes.seo_title.is_some() {
                p.seo_title = changes.seo_title;
            }
            if changes.seo_description.is_some() {
                p.seo_description = changes.seo_description;
            }
            if changes.published_at.is_some() {
                p.published_at = changes.published_at;
            }
            p.updated_at = Utc::now();
        })?;
        Ok(state.with_author(post))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.state.write().await.blog.remove(id, "Blog post")
    }

    async fn stats(&self) -> Result<BlogStats> {
        let state = self.state.read().await;
        let mut stats = BlogStats::default();
        for post in state.blog.rows.values() {
            stats.total_posts += 1;
            match post.status {
                ContentStatus::Published => stats.published_count += 1,
                ContentStatus::Draft => stats.draft_count += 1,
                ContentStatus::Archived => stats.archived_count += 1,
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create(&self, contact: NewContact) -> Result<ContactSubmission> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        Ok(state.contacts.insert_with(|id| ContactSubmission {
            id,
            name: contact.name,
            email: contact.email,
            company: contact.company,
            message: contact.message,
            status: ContactStatus::New,
            is_read: false,
            reply_message: None,
            replied_at: None,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ContactSubmission>> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .newest()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ContactSubmission>> {
        Ok(self.state.read().await.contacts.get(id))
    }

    async fn update(&self, id: i64, changes: ContactChanges) -> Result<ContactSubmission> {
        let mut state = self.state.write().await;
        state.contacts.update(id, "Contact submission", |c| {
            if let Some(v) = changes.name {
                c.name = v;
            }
            if let Some(v) = changes.email {
                c.email = v;
            }
            if changes.company.is_some() {
                c.company = changes.company;
            }
            if let Some(v) = changes.message {
                c.message = v;
            }
            if let Some(v) = changes.status {
                c.status = v;
            }
            c.updated_at = Utc::now();
        })
    }

    async fn reply(&self, id: i64, reply: String) -> Result<ContactSubmission> {
        let mut state = self.state.write().await;
        state.contacts.update(id, "Contact submission", |c| {
            let now = Utc::now();
            c.reply_message = Some(reply);
            c.replied_at = Some(now);
            c.status = ContactStatus::Replied;
            c.is_read = true;
            c.updated_at = now;
        })
    }

    async fn mark_read(&self, id: i64) -> Result<ContactSubmission> {
        let mut state = self.state.write().await;
        state.contacts.update(id, "Contact submission", |c| {
            c.is_read = true;
            if c.status == ContactStatus::New {
                c.status = ContactStatus::Read;
            }
            c.updated_at = Utc::now();
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.state.write().await.contacts.remove(id, "Contact submission")
    }

    async fn statistics(&self) -> Result<ContactStats> {
        let state = self.state.read().await;
        let week_ago = Utc::now() - Duration::days(7);
        let mut stats = ContactStats::default();
        for contact in state.contacts.rows.values() {
            stats.total += 1;
            if !contact.is_read {
                stats.unread_count += 1;
            }
            if contact.status == ContactStatus::Replied {
                stats.replied_count += 1;
            }
            if contact.created_at >= week_ago {
                stats.last_7_days += 1;
            }
        }
        Ok(stats)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.state.read().await.contacts.rows.len() as i64)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ContactSubmission>> {
        ContactRepository::list(self, limit, 0).await
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Setting>> {
        let state = self.state.read().await;
        let mut settings: Vec<Setting> = state.settings.rows.values().cloned().collect();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Setting>> {
        let state = self.state.read().await;
        Ok(state.settings.rows.values().find(|s| s.key == key).cloned())
    }

    async fn update(&self, key: &str, value: String) -> Result<Setting> {
        let mut state = self.state.write().await;
        let id = state
            .settings
            .rows
            .values()
            .find(|s| s.key == key)
            .map(|s| s.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Setting '{}' not found", key)))?;
        state.settings.update(id, "Setting", |s| {
            s.value = value;
            s.updated_at = Utc::now();
        })
    }

    async fn update_many(&self, values: HashMap<String, String>) -> Result<Vec<Setting>> {
        let mut state = self.state.write().await;

        // Resolve every key before writing anything.
        let mut targets = Vec::with_capacity(values.len());
        for (key, value) in values {
            let id = state
                .settings
                .rows
                .values()
                .find(|s| s.key == key)
                .map(|s| s.id)
                .ok_or_else(|| DatabaseError::NotFound(format!("Setting '{}' not found", key)))?;
            targets.push((key, id, value));
        }
        targets.sort_by(|a, b| a.0.cmp(&b.0));

        let now = Utc::now();
        let mut updated = Vec::with_capacity(targets.len());
        for (_, id, value) in targets {
            updated.push(state.settings.update(id, "Setting", |s| {
                s.value = value;
                s.updated_at = now;
            })?);
        }
        Ok(updated)
    }
}
