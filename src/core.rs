pub mod application;
pub mod community;
pub mod membership;
pub mod models;
pub mod ports;
pub mod task;
