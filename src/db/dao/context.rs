use sea_orm::DatabaseConnection;

use super::{ArtistDao, DaoBase, ShowDao, VenueDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn venue(&self) -> VenueDao {
        DaoBase::new(&self.db)
    }

    pub fn artist(&self) -> ArtistDao {
        DaoBase::new(&self.db)
    }

    pub fn show(&self) -> ShowDao {
        DaoBase::new(&self.db)
    }
}
