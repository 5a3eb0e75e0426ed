/// Wire types shared by the onboarding service.
///
/// The crate has no I/O of its own; the app crate owns HTTP and console output.
pub mod types;

pub use types::{OnboardResponse, UserProfile};
