pub mod config;
pub mod controllers;
pub mod draw;
pub mod models;
pub mod render;
pub mod services;
pub mod utilities;
pub mod views;
