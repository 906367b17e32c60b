pub mod columns;
pub mod config;
pub mod db;
pub mod error;
pub mod fbref;
pub mod http_client;
pub mod metadata;
pub mod models;
pub mod payload;
pub mod pipeline;
pub mod record;
pub mod repository;
pub mod sanitize;
pub mod service;
pub mod table;
