use tracking::database::DatabaseError;

pub mod track_point;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    DatabaseError::other(why)
}
