//! Static asset fallback handler
//!
//! Catches every request no other route claimed and resolves it against
//! the frontend build output.

use axum::{extract::State, http::Uri, response::Response};

use crate::state::AppState;

pub async fn serve_asset(State(state): State<AppState>, uri: Uri) -> Response {
    state.assets.serve(uri.path()).await
}
