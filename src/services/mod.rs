pub mod artist_service;
pub mod context;
pub mod crud;
pub mod listing;
pub mod show_service;
pub mod venue_service;

pub use context::ServiceContext;
