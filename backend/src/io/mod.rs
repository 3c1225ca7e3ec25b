//! # IO Module
//!
//! Adapters between the outside world and the domain layer.
//!
//! - **rest**: the JSON API served by `nutrition-server`
//! - **recipedb**: typed client for the external recipe API
//! - **proxy**: the relay served by `recipe-proxy`
//!
//! Handlers translate requests into domain calls and domain errors into
//! HTTP responses. They carry no business rules.

pub mod proxy;
pub mod recipedb;
pub mod rest;
