use axum::{extract::State, Json};
use tracing::{info, warn};

use onboard_core::{OnboardResponse, UserProfile};

use crate::extract::ValidatedJson;
use crate::router::AppState;

/// `POST /onboard`: prints the accepted profile and echoes it back.
pub async fn handle(
    State(state): State<AppState>,
    ValidatedJson(profile): ValidatedJson<UserProfile>,
) -> Json<OnboardResponse> {
    if let Err(err) = state.console().announce(&profile) {
        warn!(stage = "onboard", error = %err, "failed to write profile to console");
    }

    info!(
        stage = "onboard",
        name = %profile.name,
        skills = profile.skills.len(),
        "profile received"
    );

    Json(OnboardResponse::success(profile))
}
