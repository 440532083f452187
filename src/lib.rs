pub mod config;
pub mod database;
pub mod decoder;
pub mod entities;
pub mod errors;
pub mod models;
pub mod services;
pub mod web;
