pub mod api;
pub mod app;
pub mod avatar;
pub mod cli;
pub mod config;
pub mod db;
pub mod global;
pub mod meeting;
pub mod video;
pub mod webhook;
