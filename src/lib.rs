//! Quill - A multi-user blogging web API
//!
//! This library provides the core functionality for the Quill blogging service.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
