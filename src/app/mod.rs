mod callback;
mod trip_create;
mod trip_detail;
mod trip_list;
mod worker;

pub use callback::*;
pub use trip_create::*;
pub use trip_detail::*;
pub use trip_list::*;
pub use worker::*;

/// Tags one fetch with the view-model generation and key that were current
/// when it started. A result is only applied while its ticket is still the
/// latest one issued.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FetchTicket<K> {
    pub generation: u64,
    pub key: K,
}
