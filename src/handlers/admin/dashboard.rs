use axum::extract::State;
use serde::Serialize;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{ContactSubmission, PortfolioProject};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_projects: i64,
    pub total_contacts: i64,
}

#[derive(Debug, Serialize)]
pub struct RecentActivity {
    pub projects: Vec<PortfolioProject>,
    pub contacts: Vec<ContactSubmission>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub statistics: Totals,
    pub recent_activity: RecentActivity,
}

/// GET /api/admin/dashboard
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<AdminDashboard> {
    let store = &state.store;
    let (total_projects, total_contacts, projects, contacts) = tokio::try_join!(
        store.portfolio.count(),
        store.contacts.count(),
        store.portfolio.recent(5),
        store.contacts.recent(5),
    )?;

    Ok(ApiResponse::success(AdminDashboard {
        statistics: Totals {
            total_projects,
            total_contacts,
        },
        recent_activity: RecentActivity { projects, contacts },
    }))
}
