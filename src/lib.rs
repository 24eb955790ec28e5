pub mod app;
pub mod config;
pub mod error;
pub mod infra;
pub mod module;
pub mod service;

pub type Hash32 = [u8; 32];

pub type Identity = [u8; 32];
