use axum::extract::State;
use serde::Serialize;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{FavoriteWithProject, Message, Order, Project};
use crate::middleware::AuthUser;
use crate::state::AppState;

const RECENT: usize = 5;

#[derive(Debug, Serialize)]
pub struct Section<T: Serialize> {
    pub count: usize,
    pub items: Vec<T>,
}

impl<T: Serialize> Section<T> {
    fn recent(mut all: Vec<T>) -> Self {
        let count = all.len();
        all.truncate(RECENT);
        Self { count, items: all }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSection {
    pub count: usize,
    pub unread_count: i64,
    pub items: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub projects: Section<Project>,
    pub messages: MessageSection,
    pub favorites: Section<FavoriteWithProject>,
    pub orders: Section<Order>,
}

/// GET /api/user/dashboard - counts and the five newest of each owned collection
pub async fn dashboard(State(state): State<AppState>, user: AuthUser) -> ApiResult<Dashboard> {
    let store = &state.store;
    let (projects, messages, favorites, orders, unread_count) = tokio::try_join!(
        store.projects.find_by_owner(user.id),
        store.messages.find_by_owner(user.id),
        store.favorites.find_by_owner(user.id),
        store.orders.find_by_owner(user.id),
        store.messages.unread_count(user.id),
    )?;

    let messages = Section::recent(messages);
    Ok(ApiResponse::success(Dashboard {
        projects: Section::recent(projects),
        messages: MessageSection {
            count: messages.count,
            unread_count,
            items: messages.items,
        },
        favorites: Section::recent(favorites),
        orders: Section::recent(orders),
    }))
}
