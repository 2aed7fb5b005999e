use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    /// Foreign keys that point at rows which do not exist, as `(column, id)`.
    #[error("missing referenced rows: {}", format_references(.0))]
    MissingReferences(Vec<(&'static str, Uuid)>),
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

fn format_references(references: &[(&'static str, Uuid)]) -> String {
    references
        .iter()
        .map(|(column, id)| format!("{column}={id}"))
        .collect::<Vec<_>>()
        .join(", ")
}
