use serde_json::json;

use crate::cli::utils::{connect, output_success};
use crate::cli::OutputFormat;
use crate::database::schema;

pub async fn migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, database) = connect().await?;
    let result = schema::migrate(database.pool()).await;
    database.close().await;
    result?;

    output_success(&output_format, "Schema is up to date", None)
}

/// Migrates first so seeding a fresh database works in one step.
pub async fn seed(output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, database) = connect().await?;
    let result = async {
        schema::migrate(database.pool()).await?;
        schema::seed(database.pool()).await
    }
    .await;
    database.close().await;
    result?;

    output_success(
        &output_format,
        "Sample data inserted",
        Some(json!({
            "categories": schema::SAMPLE_CATEGORIES.len(),
            "portfolio_projects": schema::SAMPLE_PORTFOLIO.len(),
            "settings": schema::DEFAULT_SETTINGS.len(),
        })),
    )
}
