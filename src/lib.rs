//! campdir - a self-hostable REST backend for coding-bootcamp directories

pub mod auth;
pub mod cli;
pub mod config;
pub mod geo;
pub mod http;
pub mod listing;
pub mod models;
pub mod observability;
pub mod seed;
pub mod store;
pub mod uploads;
