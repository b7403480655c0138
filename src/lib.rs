//! Report Portal service library.
//!
//! Test item deletion with hierarchical cascade, the authorization rules
//! guarding it, and the background jobs that purge attachments afterwards.

pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod migration;
pub mod models;
pub mod repository;
pub mod services;
