// src/common.rs

pub mod db_utils;
pub mod error;
pub mod extract;
pub mod filters;
pub mod messages;
pub mod pagination;
