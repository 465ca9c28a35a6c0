// src/models.rs

pub mod auth;
pub mod company;
pub mod guidebook;
pub mod pagination;
