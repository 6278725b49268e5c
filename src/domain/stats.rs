use crate::domain::Trip;

#[derive(Clone, Debug, PartialEq)]
pub struct TripListStats {
    pub trip_count: usize,
    pub active_plans: usize,
    pub total_budget: f64,
}

/// Recomputed on every render; never cached alongside the list.
pub fn compute_trip_list_stats(trips: &[Trip]) -> TripListStats {
    TripListStats {
        trip_count: trips.len(),
        active_plans: trips
            .iter()
            .filter(|trip| trip.status.is_active_plan())
            .count(),
        total_budget: trips.iter().map(|trip| trip.total_budget).sum(),
    }
}
