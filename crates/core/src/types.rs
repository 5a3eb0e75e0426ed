use serde::{Deserialize, Serialize};

pub const SUCCESS_STATUS: &str = "success";
pub const SUCCESS_MESSAGE: &str = "Profile created successfully!";

/// Onboarding form submitted by a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    /// Not required by the form. Echoed back only when the client sent it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

/// Envelope returned for an accepted profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub data: UserProfile,
}

impl OnboardResponse {
    pub fn success(profile: UserProfile) -> Self {
        Self {
            status: SUCCESS_STATUS,
            message: SUCCESS_MESSAGE,
            data: profile,
        }
    }
}
