use crate::app::FetchTicket;
use crate::domain::{Trip, TripListStats, compute_trip_list_stats};
use crate::infra::HttpError;
use tracing::{debug, warn};

/// Backs the dashboard: the user's trips in server order plus derived totals.
#[derive(Clone, Debug, Default)]
pub struct TripListModel {
    trips: Vec<Trip>,
    loading: bool,
    generation: u64,
}

impl TripListModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> FetchTicket<()> {
        self.generation += 1;
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            key: (),
        }
    }

    /// Returns `false` when the result belonged to a superseded load.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket<()>,
        result: Result<Vec<Trip>, HttpError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                "dropping superseded trip list result"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(trips) => self.trips = trips,
            Err(error) => warn!(%error, "error fetching trips"),
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn stats(&self) -> TripListStats {
        compute_trip_list_stats(&self.trips)
    }
}
