//! Student Wellness Tracker Library
//!
//! Energy estimation, macro allocation and daily habit logging.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod profile;
pub mod tools;
