pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod persist;
pub mod scheduler;
pub mod service;
pub mod session;
pub mod tour_api;
pub mod util;
