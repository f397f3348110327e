//! Repository-level collaborators
//!
//! - `config`: git root, current prefix and DVC cache location
//! - `history`: committed file contents via `git show`
//! - `cache`: DVC's content-addressed cache
//! - `resolver`: tracked path + revision to cache blob
//! - `repository`: ties the above together for the commands

pub mod cache;
pub mod config;
pub mod history;
pub mod repository;
pub mod resolver;
