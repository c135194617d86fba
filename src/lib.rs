//! Scheduled maintenance jobs for a small CRM database.
//!
//! The `crm-jobs` binary runs one job per invocation, typically from cron.
//! The library exposes the pieces it is built from so they can be driven
//! and tested directly.

pub mod activity_log;
pub mod config;
pub mod db;
pub mod jobs;
pub mod models;
pub mod observability;
pub mod project;
pub mod seed;
