pub mod allocation;
pub mod assets;
pub mod consumables;
pub mod delivery_notes;
pub mod lookup;
pub mod prv_devices;
pub mod prv_scheduler;
pub mod registry;
pub mod serial_stock;

use crate::errors::ServiceError;
use uuid::Uuid;

/// Remaps a write that matched no rows (`DbErr::RecordNotUpdated`): the
/// caller re-queries and a vanished row is NotFound, while a row that
/// still exists lost an optimistic race and is a ConcurrencyConflict.
pub(crate) fn stale_update_error(still_exists: bool, entity: &str, id: Uuid) -> ServiceError {
    if still_exists {
        ServiceError::ConcurrencyConflict(format!("{} {} was modified concurrently", entity, id))
    } else {
        ServiceError::NotFound(format!("{} {} not found", entity, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn vanished_row_is_not_found() {
        let err = stale_update_error(false, "site", Uuid::new_v4());
        assert_matches!(err, ServiceError::NotFound(_));
    }

    #[test]
    fn surviving_row_is_a_concurrency_conflict() {
        let err = stale_update_error(true, "site", Uuid::new_v4());
        assert_matches!(err, ServiceError::ConcurrencyConflict(_));
        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::CONFLICT
        );
    }
}
