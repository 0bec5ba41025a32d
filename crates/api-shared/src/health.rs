use crate::wire::{HealthRes, HEALTHY};
use patient_core::{timestamp_now, PatientStore, SystemClock};

/// Health service usable by any transport.
///
/// Reports liveness together with the number of records currently held.
#[derive(Clone, Copy, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Builds a health snapshot for `store`.
    ///
    /// # Returns
    /// A `HealthRes` with status `healthy`, the current UTC timestamp and the record count.
    pub fn check_health(store: &PatientStore) -> HealthRes {
        HealthRes {
            status: HEALTHY.into(),
            timestamp: timestamp_now(&SystemClock),
            total_patients: store.count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_core::Record;

    #[test]
    fn test_check_health_reports_count() {
        let store = PatientStore::default();
        assert_eq!(HealthService::check_health(&store).total_patients, 0);

        store.insert(Record::new());
        store.insert(Record::new());
        let res = HealthService::check_health(&store);
        assert_eq!(res.status, "healthy");
        assert_eq!(res.total_patients, 2);
        assert!(res.timestamp.ends_with('Z'));
    }
}
