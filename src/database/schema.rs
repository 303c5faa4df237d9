//! Table definitions and sample data.
//!
//! `migrate` is idempotent and safe to run on every start. `seed` only inserts
//! rows that are not there yet.

use sqlx::PgPool;
use tracing::info;

use crate::database::DatabaseError;

const TABLES: &[(&str, &str)] = &[
    (
        "users",
        "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name TEXT,
            avatar TEXT,
            role TEXT NOT NULL DEFAULT 'client' CHECK (role IN ('admin', 'team', 'client')),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            banned_at TIMESTAMPTZ,
            ban_reason TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CHECK ((banned_at IS NULL) = is_active AND (banned_at IS NULL) = (ban_reason IS NULL))
        )",
    ),
    (
        "portfolio_categories",
        "CREATE TABLE IF NOT EXISTS portfolio_categories (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "portfolio_projects",
        "CREATE TABLE IF NOT EXISTS portfolio_projects (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            client TEXT,
            category TEXT,
            image TEXT,
            description TEXT,
            duration TEXT,
            featured BOOLEAN NOT NULL DEFAULT FALSE,
            status TEXT NOT NULL DEFAULT 'published' CHECK (status IN ('draft', 'published', 'archived')),
            published_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "projects",
        "CREATE TABLE IF NOT EXISTS projects (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT,
            image TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            assigned_to BIGINT REFERENCES users(id) ON DELETE SET NULL,
            deadline TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "orders",
        "CREATE TABLE IF NOT EXISTS orders (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            project_id BIGINT REFERENCES portfolio_projects(id) ON DELETE SET NULL,
            amount DOUBLE PRECISION NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'pending',
            details TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "messages",
        "CREATE TABLE IF NOT EXISTS messages (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            sender_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            message_type TEXT NOT NULL DEFAULT 'notification',
            is_read BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "favorites",
        "CREATE TABLE IF NOT EXISTS favorites (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            project_id BIGINT NOT NULL REFERENCES portfolio_projects(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, project_id)
        )",
    ),
    (
        "blog_posts",
        "CREATE TABLE IF NOT EXISTS blog_posts (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            content TEXT NOT NULL,
            excerpt TEXT,
            author_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
            status TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'published', 'archived')),
            featured_image TEXT,
            tags TEXT[] NOT NULL DEFAULT '{}',
            seo_title TEXT,
            seo_description TEXT,
            published_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "contact_submissions",
        "CREATE TABLE IF NOT EXISTS contact_submissions (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            company TEXT,
            message TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'new',
            is_read BOOLEAN NOT NULL DEFAULT FALSE,
            reply_message TEXT,
            replied_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "system_settings",
        "CREATE TABLE IF NOT EXISTS system_settings (
            id BIGSERIAL PRIMARY KEY,
            key TEXT NOT NULL UNIQUE,
            value TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT 'string' CHECK (type IN ('string', 'number', 'boolean', 'json')),
            description TEXT,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
];

pub(crate) const SAMPLE_CATEGORIES: &[(&str, &str)] = &[
    ("web", "Web Development Projects"),
    ("mobile", "Mobile App Development"),
    ("design", "UI/UX Design Projects"),
    ("ecommerce", "E-commerce Solutions"),
];

pub(crate) struct SamplePortfolio {
    pub title: &'static str,
    pub client: &'static str,
    pub category: &'static str,
    pub image: &'static str,
    pub description: &'static str,
    pub duration: &'static str,
    pub featured: bool,
}

pub(crate) const SAMPLE_PORTFOLIO: &[SamplePortfolio] = &[
    SamplePortfolio {
        title: "E-commerce Website",
        client: "TechCorp Solutions",
        category: "web",
        image: "/images/project1.jpg",
        description: "A modern e-commerce platform with React and Node.js",
        duration: "6 months",
        featured: true,
    },
    SamplePortfolio {
        title: "Mobile Banking App",
        client: "SecureBank Ltd",
        category: "mobile",
        image: "/images/project2.jpg",
        description: "Secure mobile banking application for iOS and Android",
        duration: "8 months",
        featured: true,
    },
    SamplePortfolio {
        title: "Portfolio Website",
        client: "CreativeStudio Pro",
        category: "design",
        image: "/images/project3.jpg",
        description: "Responsive portfolio website design",
        duration: "3 months",
        featured: false,
    },
    SamplePortfolio {
        title: "Online Store",
        client: "FashionHub Inc",
        category: "ecommerce",
        image: "/images/project4.jpg",
        description: "Complete e-commerce solution with payment integration",
        duration: "5 months",
        featured: true,
    },
];

/// (key, value, type, description)
pub(crate) const DEFAULT_SETTINGS: &[(&str, &str, &str, &str)] = &[
    ("site_name", "Artika Graphics", "string", "Public site name"),
    ("contact_email", "hello@artika.example", "string", "Where contact notifications go"),
    ("maintenance_mode", "false", "boolean", "Show the maintenance page"),
    ("items_per_page", "12", "number", "Default page size for listings"),
    ("social_links", "{}", "json", "Social profile URLs keyed by network"),
];

pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    for (table, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!("Ensured table {}", table);
    }
    info!("Schema is up to date ({} tables)", TABLES.len());
    Ok(())
}

pub async fn seed(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;

    for (name, description) in SAMPLE_CATEGORIES {
        sqlx::query(
            "INSERT INTO portfolio_categories (name, description) VALUES ($1, $2)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(&mut *tx)
        .await?;
    }

    for sample in SAMPLE_PORTFOLIO {
        sqlx::query(
            "INSERT INTO portfolio_projects (title, client, category, image, description, duration, featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (title) DO NOTHING",
        )
        .bind(sample.title)
        .bind(sample.client)
        .bind(sample.category)
        .bind(sample.image)
        .bind(sample.description)
        .bind(sample.duration)
        .bind(sample.featured)
        .execute(&mut *tx)
        .await?;
    }

    for (key, value, setting_type, description) in DEFAULT_SETTINGS {
        sqlx::query(
            "INSERT INTO system_settings (key, value, type, description) VALUES ($1, $2, $3, $4)
             ON CONFLICT (key) DO NOTHING",
        )
        .bind(key)
        .bind(value)
        .bind(setting_type)
        .bind(description)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Sample data inserted");
    Ok(())
}
