//! The HTML form page.
//!
//! The page is stateless on the server: each POST carries every field, and a fresh
//! [`FormController`] is built for it, submitted, and rendered back.

use axum::{Form, extract::State, response::Html};
use std::collections::HashMap;
use tracing::debug;

use crate::AppState;
use crate::errors::{Error, Result};
use crate::form::FormController;
use crate::pages::render_form;

fn render(state: &AppState, controller: &FormController) -> Result<Html<String>> {
    render_form(&state.config.form, controller)
        .map(Html)
        .map_err(|e| Error::Internal {
            operation: format!("render form page: {e}"),
        })
}

/// GET /
#[tracing::instrument(skip_all)]
pub async fn show_form(State(state): State<AppState>) -> Result<Html<String>> {
    render(&state, &FormController::new())
}

/// POST /
///
/// Fields are reset in the re-rendered page only when the family was admitted.
#[tracing::instrument(skip_all)]
pub async fn submit_form(State(state): State<AppState>, Form(fields): Form<HashMap<String, String>>) -> Result<Html<String>> {
    let controller = FormController::new();
    for (name, value) in &fields {
        controller.update_field(name, value)?;
    }

    let status = controller.submit(&state.workflow).await.map_err(anyhow::Error::from)?;
    debug!(?status, "Form submission finished");

    render(&state, &controller)
}
