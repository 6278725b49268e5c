use crate::app::FetchTicket;
use crate::infra::HttpError;
use std::sync::mpsc::Sender;

#[derive(Debug)]
pub struct Loaded<K, T> {
    pub ticket: FetchTicket<K>,
    pub result: Result<T, HttpError>,
}

/// Runs one blocking fetch off the caller's thread and reports back with the
/// ticket it was started under. The caller decides whether it still applies.
pub fn spawn_fetch<K, T, F>(ticket: FetchTicket<K>, tx: Sender<Loaded<K, T>>, fetch: F)
where
    K: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&K) -> Result<T, HttpError> + Send + 'static,
{
    std::thread::spawn(move || {
        let result = fetch(&ticket.key);
        let _ = tx.send(Loaded { ticket, result });
    });
}
