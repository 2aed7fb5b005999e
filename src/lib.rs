pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
