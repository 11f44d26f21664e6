//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers depend only on the driving ports bundled in [`state::HttpState`];
//! [`routes::configure`] mounts them under `/api/v1`.

pub mod admin;
pub mod cache_control;
pub mod dto;
pub mod error;
pub mod guards;
pub mod guest;
pub mod health;
pub mod logs;
pub mod overview;
pub mod push_subscriptions;
pub mod routes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
