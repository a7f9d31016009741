pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod repository;
