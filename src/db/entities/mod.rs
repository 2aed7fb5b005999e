#[allow(unused_imports)]
pub mod prelude {
    pub use super::artist::Entity as Artist;
    pub use super::artist_genre::Entity as ArtistGenre;
    pub use super::show::Entity as Show;
    pub use super::venue::Entity as Venue;
    pub use super::venue_genre::Entity as VenueGenre;
}

pub mod artist;
pub mod artist_genre;
pub mod show;
pub mod venue;
pub mod venue_genre;
