//! API request handlers

pub mod export;
pub mod stats;
pub mod users;

pub use export::{export_users, public_key, ENVELOPE_CONTENT_TYPE};
pub use stats::{weekly_stats, WeeklyStatsResponse};
pub use users::{
    create_user, delete_user, get_user, update_user, AppState, CreateUserResponse,
    DeleteUserResponse, UpdateUserResponse,
};
