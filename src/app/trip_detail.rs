use crate::app::FetchTicket;
use crate::domain::{Trip, TripId};
use crate::infra::HttpError;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq)]
pub enum TripDetailState {
    Loading,
    NotFound,
    Loaded(Box<Trip>),
}

/// Backs the trip page. Every load is keyed by trip id; only the latest
/// ticket may change what is displayed.
#[derive(Clone, Debug)]
pub struct TripDetailModel {
    trip_id: Option<TripId>,
    generation: u64,
    state: TripDetailState,
}

impl Default for TripDetailModel {
    fn default() -> Self {
        Self {
            trip_id: None,
            generation: 0,
            state: TripDetailState::Loading,
        }
    }
}

impl TripDetailModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self, trip_id: TripId) -> FetchTicket<TripId> {
        self.generation += 1;
        self.trip_id = Some(trip_id);
        self.state = TripDetailState::Loading;
        FetchTicket {
            generation: self.generation,
            key: trip_id,
        }
    }

    /// Returns `false` when the result was for a trip no longer displayed.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket<TripId>,
        result: Result<Trip, HttpError>,
    ) -> bool {
        if ticket.generation != self.generation || self.trip_id != Some(ticket.key) {
            debug!(
                trip_id = ticket.key,
                generation = ticket.generation,
                "dropping stale trip result"
            );
            return false;
        }

        self.state = match result {
            Ok(trip) => TripDetailState::Loaded(Box::new(trip)),
            Err(error) => {
                warn!(trip_id = ticket.key, %error, "error fetching trip");
                TripDetailState::NotFound
            }
        };
        true
    }

    pub fn state(&self) -> &TripDetailState {
        &self.state
    }

    pub fn trip(&self) -> Option<&Trip> {
        match &self.state {
            TripDetailState::Loaded(trip) => Some(trip.as_ref()),
            _ => None,
        }
    }
}
