pub mod artist_dao;
pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod search;
pub mod show_dao;
pub mod venue_dao;

pub use artist_dao::{ArtistDao, ArtistWithGenres};
pub use base::{DaoBase, PaginatedResponse};
pub use base_traits::{RecordActiveModel, RecordColumns};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use show_dao::ShowDao;
pub use venue_dao::{VenueDao, VenueWithGenres};
