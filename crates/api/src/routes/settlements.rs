use axum::routing::post;
use axum::Router;

use crate::handlers::settlements;
use crate::state::AppState;

/// Routes mounted at `/settlements`.
///
/// ```text
/// POST   /reconcile   -> reconcile
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/reconcile", post(settlements::reconcile))
}
