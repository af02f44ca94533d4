pub mod dto;
pub mod handlers;
pub mod services;

pub use dto::{DietPreference, ProfileForm, Sex, UserProfile};
pub use handlers::ProfileController;
