//! newsdesk - a bearer-token protected JSON API over news and events
//!
//! Request flow: the auth gate verifies the bearer token, the query builder
//! turns list parameters into a store query, the data store runs it, and the
//! envelope builder shapes the response.

pub mod auth;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod logging;
pub mod query;
pub mod store;
