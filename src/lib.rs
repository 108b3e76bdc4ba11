//! 监控控制台库
//! 角色管理与用户偏好

pub mod auth;
pub mod config;
pub mod datetime;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod request;
pub mod routes;
pub mod services;
pub mod telemetry;
