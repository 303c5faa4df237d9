use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult, AppJson};
use crate::database::models::{ContactSubmission, NewContact};
use crate::handlers::{required, valid_email};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub company: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// POST /api/contact - public contact form
pub async fn submit(
    State(state): State<AppState>,
    AppJson(body): AppJson<ContactRequest>,
) -> ApiResult<ContactSubmission> {
    let contact = NewContact {
        name: required("name", &body.name)?,
        email: valid_email(&body.email)?,
        company: body
            .company
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        message: required("message", &body.message)?,
    };

    let submission = state.store.contacts.create(contact).await?;
    tracing::info!("Contact submission {} received", submission.id);

    Ok(ApiResponse::created(submission)
        .with_message("Thank you for your message. We will get back to you soon."))
}
