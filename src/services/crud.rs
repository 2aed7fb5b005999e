use uuid::Uuid;

use crate::db::dao::DaoLayerError;
use crate::error::{AppError, ValidationErrors};

/// User-facing messages for one record kind. Storage details never reach
/// these strings; they are logged instead.
#[derive(Clone, Copy)]
pub struct CrudErrors {
    /// Capitalized record kind, e.g. "Venue".
    pub kind: &'static str,
    pub find_failed: &'static str,
    pub not_found: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
}

impl CrudErrors {
    /// "An error occurred. Venue The Musical Hop could not be listed."
    pub fn create_failed(&self, name: Option<&str>) -> String {
        match name {
            Some(name) => format!("An error occurred. {} {name} could not be listed.", self.kind),
            None => format!("An error occurred. {} could not be listed.", self.kind),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum CrudOp {
    Create,
    Find,
    List,
    Update,
    Delete,
}

pub fn map_dao_error(errors: &CrudErrors, op: CrudOp, err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::Db(db_err) => {
            tracing::error!(?op, error = %db_err, "storage failure");
            match op {
                CrudOp::Create => AppError::persistence(errors.create_failed(None)),
                CrudOp::Find | CrudOp::List => AppError::persistence(errors.find_failed),
                CrudOp::Update => AppError::persistence(errors.update_failed),
                CrudOp::Delete => AppError::persistence(errors.delete_failed),
            }
        }
        DaoLayerError::NotFound { .. } => AppError::not_found(errors.not_found),
        DaoLayerError::MissingReferences(references) => {
            let mut validation = ValidationErrors::new();
            for (column, _) in references {
                validation.add(column, "No record exists with this id.");
            }
            AppError::Validation(validation)
        }
        DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
    }
}

/// Like [`map_dao_error`] for a create, with the submitted name in the
/// storage-failure notice.
pub fn map_create_error(errors: &CrudErrors, name: &str, err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::Db(db_err) => {
            tracing::error!(op = ?CrudOp::Create, name, error = %db_err, "storage failure");
            AppError::persistence(errors.create_failed(Some(name)))
        }
        other => map_dao_error(errors, CrudOp::Create, other),
    }
}

/// A show pointing at a venue or artist the same read could not see. The
/// foreign keys rule this out, so it is reported as a storage fault.
pub fn missing_counterpart(
    errors: &CrudErrors,
    show_id: Uuid,
    column: &'static str,
    id: Uuid,
) -> AppError {
    tracing::error!(%show_id, column, %id, "show references a missing record");
    AppError::persistence(errors.find_failed)
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use uuid::Uuid;

    use super::{CrudErrors, CrudOp, map_create_error, map_dao_error, missing_counterpart};
    use crate::db::dao::DaoLayerError;
    use crate::error::AppError;

    const VENUE: CrudErrors = CrudErrors {
        kind: "Venue",
        find_failed: "An error occurred. Venues could not be loaded.",
        not_found: "Venue not found",
        update_failed: "An error occurred. Venue could not be updated.",
        delete_failed: "Venue was not deleted successfully.",
    };

    #[test]
    fn storage_failures_become_generic_persistence_errors() {
        let err = map_dao_error(
            &VENUE,
            CrudOp::Create,
            DaoLayerError::Db(DbErr::Custom("duplicate key value".to_string())),
        );

        match err {
            AppError::Persistence(message) => {
                assert_eq!(message, "An error occurred. Venue could not be listed.");
                assert!(!message.contains("duplicate"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_references_name_the_fields() {
        let err = map_dao_error(
            &VENUE,
            CrudOp::Create,
            DaoLayerError::MissingReferences(vec![("artist_id", Uuid::new_v4())]),
        );

        match err {
            AppError::Validation(errors) => {
                assert!(errors.has("artist_id"));
                assert!(!errors.has("venue_id"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn not_found_uses_the_configured_message() {
        let err = map_dao_error(
            &VENUE,
            CrudOp::Delete,
            DaoLayerError::NotFound {
                entity: "venue",
                id: Uuid::new_v4(),
            },
        );
        assert!(matches!(err, AppError::NotFound(message) if message == "Venue not found"));
    }

    #[test]
    fn create_failures_name_the_record() {
        let err = map_create_error(
            &VENUE,
            "Park Square Live Music & Coffee",
            DaoLayerError::Db(DbErr::Custom("disk I/O error".to_string())),
        );

        match err {
            AppError::Persistence(message) => assert_eq!(
                message,
                "An error occurred. Venue Park Square Live Music & Coffee could not be listed."
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn create_validation_errors_pass_through_unnamed() {
        let err = map_create_error(
            &VENUE,
            "The Musical Hop",
            DaoLayerError::MissingReferences(vec![("venue_id", Uuid::new_v4())]),
        );
        assert!(matches!(err, AppError::Validation(errors) if errors.has("venue_id")));
    }

    #[test]
    fn missing_counterpart_is_a_load_failure() {
        let err = missing_counterpart(&VENUE, Uuid::new_v4(), "artist_id", Uuid::new_v4());
        assert!(matches!(
            err,
            AppError::Persistence(message) if message == "An error occurred. Venues could not be loaded."
        ));
    }
}
