// src/services.rs

pub mod auth;
pub mod guidebook_service;
pub mod permission_service;
pub mod work_service;
