use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::*;
use crate::database::repository::*;
use crate::database::DatabaseError;
use crate::types::{OrderStatus, Role};

type Result<T> = std::result::Result<T, DatabaseError>;

const USER_COLUMNS: &str =
    "id, email, password_hash, name, avatar, role, is_active, banned_at, ban_reason, created_at, updated_at";

const PORTFOLIO_VISIBLE: &str =
    "status = 'published' AND (published_at IS NULL OR published_at <= NOW())";

const BLOG_SELECT: &str = "SELECT bp.*, u.name AS author_name
     FROM blog_posts bp
     LEFT JOIN users u ON u.id = bp.author_id";

/// sqlx-backed store. Queries are checked at runtime so the crate builds
/// without a live database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn found<T>(row: Option<T>, what: &str) -> Result<T> {
    row.ok_or_else(|| DatabaseError::NotFound(format!("{} not found", what)))
}

fn deleted(rows_affected: u64, what: &str) -> Result<()> {
    if rows_affected == 0 {
        Err(DatabaseError::NotFound(format!("{} not found", what)))
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, name, role) VALUES ($1, $2, $3, $4)
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::classify(e, "Email already registered", "User not found"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self, filter: UserFilter) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users
             WHERE ($1::text IS NULL OR role = $1)
               AND ($2::bool IS NULL OR is_active = $2)
             ORDER BY created_at DESC, id DESC",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(filter.role.map(|r| r.as_str()))
            .bind(filter.is_active)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_profile(&self, id: i64, changes: ProfileChanges) -> Result<User> {
        let sql = format!(
            "UPDATE users
             SET name = COALESCE($2, name), avatar = COALESCE($3, avatar), updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.avatar)
            .fetch_optional(&self.pool)
            .await?;
        found(row, "User")
    }

    async fn update_role(&self, id: i64, role: Role) -> Result<User> {
        let sql = format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;
        found(row, "User")
    }

    async fn ban(&self, id: i64, reason: String) -> Result<User> {
        let sql = format!(
            "UPDATE users
             SET is_active = FALSE, banned_at = NOW(), ban_reason = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(reason)
            .fetch_optional(&self.pool)
            .await?;
        found(row, "User")
    }

    async fn unban(&self, id: i64) -> Result<User> {
        let sql = format!(
            "UPDATE users
             SET is_active = TRUE, banned_at = NULL, ban_reason = NULL, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        found(row, "User")
    }

    async fn stats(&self) -> Result<UserStats> {
        Ok(sqlx::query_as::<_, UserStats>(
            "SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE role = 'admin') AS admin_count,
                COUNT(*) FILTER (WHERE role = 'team') AS team_count,
                COUNT(*) FILTER (WHERE role = 'client') AS client_count,
                COUNT(*) FILTER (WHERE is_active) AS active_count,
                COUNT(*) FILTER (WHERE NOT is_active) AS banned_count
             FROM users",
        )
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn create(&self, project: NewProject) -> Result<Project> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (user_id, title, description, image)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(project.user_id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "Project already exists", "User not found"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>> {
        Ok(sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Project>> {
        Ok(sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update(&self, id: i64, changes: ProjectChanges) -> Result<Project> {
        let row = sqlx::query_as::<_, Project>(
            "UPDATE projects
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 image = COALESCE($4, image),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.image)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Project")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        deleted(result.rows_affected(), "Project")
    }

    async fn list(&self, filter: ProjectFilter) -> Result<Vec<Project>> {
        Ok(sqlx::query_as::<_, Project>(
            "SELECT * FROM projects
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::bigint IS NULL OR assigned_to = $2)
             ORDER BY created_at DESC, id DESC",
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.assigned_to)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_status(&self, id: i64, change: ProjectStatusChange) -> Result<Project> {
        let row = sqlx::query_as::<_, Project>(
            "UPDATE projects
             SET status = $2, assigned_to = $3, deadline = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(change.status.as_str())
        .bind(change.assigned_to)
        .bind(change.deadline)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "Project conflict", "Assigned user not found"))?;
        found(row, "Project")
    }

    async fn stats(&self) -> Result<ProjectStats> {
        Ok(sqlx::query_as::<_, ProjectStats>(
            "SELECT
                COUNT(*) AS total_projects,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_count,
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress_count,
                COUNT(*) FILTER (WHERE status = 'review') AS review_count,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_count,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled_count
             FROM projects",
        )
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        sqlx::query_as::<_, Order>(
            "INSERT INTO orders (user_id, project_id, amount, details)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(order.user_id)
        .bind(order.project_id)
        .bind(order.amount)
        .bind(&order.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "Order already exists", "Portfolio project not found"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        Ok(sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Order>> {
        Ok(sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        Ok(
            sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order> {
        let row = sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Order")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        deleted(result.rows_affected(), "Order")
    }

    async fn stats(&self) -> Result<OrderStats> {
        Ok(sqlx::query_as::<_, OrderStats>(
            "SELECT
                COUNT(*) AS total_orders,
                COALESCE(SUM(amount), 0)::float8 AS total_revenue,
                COALESCE(AVG(amount), 0)::float8 AS average_order_value,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_orders,
                COUNT(*) FILTER (WHERE status = 'processing') AS processing_orders,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_orders,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled_orders
             FROM orders",
        )
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl MessageRepository for PgStore {
    async fn create(&self, message: NewMessage) -> Result<Message> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO messages (user_id, sender_id, title, content, message_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(message.user_id)
        .bind(message.sender_id)
        .bind(&message.title)
        .bind(&message.content)
        .bind(message.message_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "Message already exists", "User not found"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Message>> {
        Ok(sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Message>> {
        Ok(sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn mark_read(&self, id: i64) -> Result<Message> {
        let row = sqlx::query_as::<_, Message>(
            "UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Message")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        deleted(result.rows_affected(), "Message")
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_all(&self) -> Result<Vec<MessageWithUsers>> {
        Ok(sqlx::query_as::<_, MessageWithUsers>(
            "SELECT m.*, s.email AS sender_email, r.email AS recipient_email
             FROM messages m
             LEFT JOIN users s ON s.id = m.sender_id
             LEFT JOIN users r ON r.id = m.user_id
             ORDER BY m.created_at DESC, m.id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn stats(&self) -> Result<MessageStats> {
        Ok(sqlx::query_as::<_, MessageStats>(
            "SELECT
                COUNT(*) AS total_messages,
                COUNT(*) FILTER (WHERE NOT is_read) AS unread_count
             FROM messages",
        )
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl FavoriteRepository for PgStore {
    async fn add(&self, user_id: i64, project_id: i64) -> Result<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (user_id, project_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::classify(e, "Project already in favorites", "Portfolio project not found")
        })
    }

    async fn remove(&self, user_id: i64, project_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND project_id = $2")
            .bind(user_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<FavoriteWithProject>> {
        // Favorites of items that are no longer visible stay stored but are not listed.
        let sql = format!(
            "SELECT f.id, f.user_id, f.project_id, f.created_at,
                    p.title, p.description, p.image, p.category
             FROM favorites f
             JOIN portfolio_projects p ON p.id = f.project_id
             WHERE f.user_id = $1 AND {}
             ORDER BY f.created_at DESC, f.id DESC",
            PORTFOLIO_VISIBLE
        );
        Ok(sqlx::query_as::<_, FavoriteWithProject>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn exists(&self, user_id: i64, project_id: i64) -> Result<bool> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND project_id = $2)",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl PortfolioRepository for PgStore {
    async fn list(&self, filter: PortfolioFilter) -> Result<Vec<PortfolioProject>> {
        let sql = format!(
            "SELECT * FROM portfolio_projects
             WHERE ($1::text IS NULL OR category = $1)
               AND ($2::bool IS NULL OR featured = $2)
               AND ($3 = FALSE OR ({}))
             ORDER BY created_at DESC, id DESC
             LIMIT $4",
            PORTFOLIO_VISIBLE
        );
        Ok(sqlx::query_as::<_, PortfolioProject>(&sql)
            .bind(&filter.category)
            .bind(filter.featured)
            .bind(filter.published_only)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PortfolioProject>> {
        Ok(
            sqlx::query_as::<_, PortfolioProject>("SELECT * FROM portfolio_projects WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        Ok(
            sqlx::query_as::<_, Category>("SELECT * FROM portfolio_categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn create(&self, draft: PortfolioDraft) -> Result<PortfolioProject> {
        sqlx::query_as::<_, PortfolioProject>(
            "INSERT INTO portfolio_projects
                (title, client, category, image, description, duration, featured, status, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(&draft.title)
        .bind(&draft.client)
        .bind(&draft.category)
        .bind(&draft.image)
        .bind(&draft.description)
        .bind(&draft.duration)
        .bind(draft.featured)
        .bind(draft.status.as_str())
        .bind(draft.published_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::classify(e, "A portfolio project with this title exists", "Not found")
        })
    }

    async fn update(&self, id: i64, changes: PortfolioChanges) -> Result<PortfolioProject> {
        let row = sqlx::query_as::<_, PortfolioProject>(
            "UPDATE portfolio_projects
             SET title = COALESCE($2, title),
                 client = COALESCE($3, client),
                 category = COALESCE($4, category),
                 image = COALESCE($5, image),
                 description = COALESCE($6, description),
                 duration = COALESCE($7, duration),
                 featured = COALESCE($8, featured),
                 status = COALESCE($9, status),
                 published_at = COALESCE($10, published_at),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.client)
        .bind(&changes.category)
        .bind(&changes.image)
        .bind(&changes.description)
        .bind(&changes.duration)
        .bind(changes.featured)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.published_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::classify(e, "A portfolio project with this title exists", "Not found")
        })?;
        found(row, "Portfolio project")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM portfolio_projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        deleted(result.rows_affected(), "Portfolio project")
    }

    async fn count(&self) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM portfolio_projects")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<PortfolioProject>> {
        Ok(sqlx::query_as::<_, PortfolioProject>(
            "SELECT * FROM portfolio_projects ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl BlogRepository for PgStore {
    async fn list(&self, filter: BlogFilter) -> Result<Vec<BlogPost>> {
        let sql = format!(
            "{}
             WHERE ($1::text IS NULL OR bp.status = $1)
               AND ($2::bigint IS NULL OR bp.author_id = $2)
             ORDER BY bp.created_at DESC, bp.id DESC",
            BLOG_SELECT
        );
        Ok(sqlx::query_as::<_, BlogPost>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.author_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn published(&self, limit: i64, offset: i64) -> Result<Vec<BlogPost>> {
        let sql = format!(
            "{}
             WHERE bp.status = 'published' AND (bp.published_at IS NULL OR bp.published_at <= NOW())
             ORDER BY COALESCE(bp.published_at, bp.created_at) DESC, bp.id DESC
             LIMIT $1 OFFSET $2",
            BLOG_SELECT
        );
        Ok(sqlx::query_as::<_, BlogPost>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BlogPost>> {
        let sql = format!("{} WHERE bp.id = $1", BLOG_SELECT);
        Ok(sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let sql = format!("{} WHERE bp.slug = $1", BLOG_SELECT);
        Ok(sqlx::query_as::<_, BlogPost>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, author_id: i64, slug: String, draft: BlogDraft) -> Result<BlogPost> {
        sqlx::query_as::<_, BlogPost>(
            "WITH bp AS (
                INSERT INTO blog_posts
                    (title, slug, content, excerpt, author_id, status, featured_image, tags,
                     seo_title, seo_description, published_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
             )
             SELECT bp.*, u.name AS author_name FROM bp LEFT JOIN users u ON u.id = bp.author_id",
        )
        .bind(&draft.title)
        .bind(&slug)
        .bind(&draft.content)
        .bind(&draft.excerpt)
        .bind(author_id)
        .bind(draft.status.as_str())
        .bind(&draft.featured_image)
        .bind(&draft.tags)
        .bind(&draft.seo_title)
        .bind(&draft.seo_description)
        .bind(draft.published_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "A post with this slug already exists", "Author not found"))
    }

    async fn update(&self, id: i64, changes: BlogChanges) -> Result<BlogPost> {
        let row = sqlx::query_as::<_, BlogPost>(
            "WITH bp AS (
                UPDATE blog_posts
                SET title = COALESCE($2, title),
                    slug = COALESCE($3, slug),
                    content = COALESCE($4, content),
                    excerpt = COALESCE($5, excerpt),
                    status = COALESCE($6, status),
                    featured_image = COALESCE($7, featured_image),
                    tags = COALESCE($8, tags),
                    seo_title = COALESCE($9, seo_title),
                    seo_description = COALESCE($10, seo_description),
                    published_at = COALESCE($11, published_at),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT bp.*, u.name AS author_name FROM bp LEFT JOIN users u ON u.id = bp.author_id",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.slug)
        .bind(&changes.content)
        .bind(&changes.excerpt)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(&changes.featured_image)
        .bind(&changes.tags)
        .bind(&changes.seo_title)
        .bind(&changes.seo_description)
        .bind(changes.published_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "A post with this slug already exists", "Author not found"))?;
        found(row, "Blog post")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        deleted(result.rows_affected(), "Blog post")
    }

    async fn stats(&self) -> Result<BlogStats> {
        Ok(sqlx::query_as::<_, BlogStats>(
            "SELECT
                COUNT(*) AS total_posts,
                COUNT(*) FILTER (WHERE status = 'published') AS published_count,
                COUNT(*) FILTER (WHERE status = 'draft') AS draft_count,
                COUNT(*) FILTER (WHERE status = 'archived') AS archived_count
             FROM blog_posts",
        )
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl ContactRepository for PgStore {
    async fn create(&self, contact: NewContact) -> Result<ContactSubmission> {
        Ok(sqlx::query_as::<_, ContactSubmission>(
            "INSERT INTO contact_submissions (name, email, company, message)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.company)
        .bind(&contact.message)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ContactSubmission>> {
        Ok(sqlx::query_as::<_, ContactSubmission>(
            "SELECT * FROM contact_submissions ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ContactSubmission>> {
        Ok(sqlx::query_as::<_, ContactSubmission>(
            "SELECT * FROM contact_submissions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update(&self, id: i64, changes: ContactChanges) -> Result<ContactSubmission> {
        let row = sqlx::query_as::<_, ContactSubmission>(
            "UPDATE contact_submissions
             SET name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 company = COALESCE($4, company),
                 message = COALESCE($5, message),
                 status = COALESCE($6, status),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.company)
        .bind(&changes.message)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Contact submission")
    }

    async fn reply(&self, id: i64, reply: String) -> Result<ContactSubmission> {
        let row = sqlx::query_as::<_, ContactSubmission>(
            "UPDATE contact_submissions
             SET reply_message = $2, replied_at = NOW(), status = 'replied', is_read = TRUE,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&reply)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Contact submission")
    }

    async fn mark_read(&self, id: i64) -> Result<ContactSubmission> {
        let row = sqlx::query_as::<_, ContactSubmission>(
            "UPDATE contact_submissions
             SET is_read = TRUE,
                 status = CASE WHEN status = 'new' THEN 'read' ELSE status END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Contact submission")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM contact_submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        deleted(result.rows_affected(), "Contact submission")
    }

    async fn statistics(&self) -> Result<ContactStats> {
        Ok(sqlx::query_as::<_, ContactStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE NOT is_read) AS unread_count,
                COUNT(*) FILTER (WHERE status = 'replied') AS replied_count,
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '7 days') AS last_7_days
             FROM contact_submissions",
        )
        .fetch_one(&self.pool)
        .await?)
    }

    async fn count(&self) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_submissions")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ContactSubmission>> {
        ContactRepository::list(self, limit, 0).await
    }
}

#[async_trait]
impl SettingsRepository for PgStore {
    async fn list(&self) -> Result<Vec<Setting>> {
        Ok(sqlx::query_as::<_, Setting>("SELECT * FROM system_settings ORDER BY key")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Setting>> {
        Ok(sqlx::query_as::<_, Setting>("SELECT * FROM system_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update(&self, key: &str, value: String) -> Result<Setting> {
        let row = sqlx::query_as::<_, Setting>(
            "UPDATE system_settings SET value = $2, updated_at = NOW() WHERE key = $1 RETURNING *",
        )
        .bind(key)
        .bind(&value)
        .fetch_optional(&self.pool)
        .await?;
        found(row, &format!("Setting '{}'", key))
    }

    async fn update_many(&self, values: HashMap<String, String>) -> Result<Vec<Setting>> {
        let mut entries: Vec<(String, String)> = values.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        // Dropping `tx` without commit rolls back and returns the connection.
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let row = sqlx::query_as::<_, Setting>(
                "UPDATE system_settings SET value = $2, updated_at = NOW() WHERE key = $1 RETURNING *",
            )
            .bind(&key)
            .bind(&value)
            .fetch_optional(&mut *tx)
            .await?;
            updated.push(found(row, &format!("Setting '{}'", key))?);
        }
        tx.commit().await?;

        Ok(updated)
    }
}
