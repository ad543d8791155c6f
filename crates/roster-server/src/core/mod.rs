//! Core logic for the user service

pub mod users;
mod validation;

pub use users::{
    CreateUserRequest, DayCount, UpdateUserRequest, UserError, UserService, STATS_DAYS,
};
pub use validation::{validate_email, ValidationError};
