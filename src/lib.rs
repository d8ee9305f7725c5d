/*
 * Responsibility
 * - module tree of the resource server
 * - exposed as a library so tests/ can drive the router without a socket
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
