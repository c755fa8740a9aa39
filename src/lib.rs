#[macro_use]
mod macros;

pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod pages;
pub mod route;
pub mod session;
pub mod sync;
pub mod utils;
pub mod validation;

pub use app::{Activation, App, Page};
