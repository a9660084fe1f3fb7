pub mod composite;
pub mod config;
pub mod plan;
pub mod submit;
