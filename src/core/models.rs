pub mod application;
pub mod common;
pub mod community;
pub mod membership;
pub mod task;
