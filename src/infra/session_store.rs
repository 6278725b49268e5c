use crate::domain::{Identity, Session};
use crate::infra::{LoadStorageError, LocalStorage, SaveStorageError};
use std::path::Path;
use tracing::{debug, warn};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// The one owner of the current session. `login` and `logout` are the only
/// mutators; everything else reads.
#[derive(Debug)]
pub struct SessionStore {
    storage: LocalStorage,
    session: Option<Session>,
}

impl SessionStore {
    pub fn open(state_dir: &Path) -> Result<Self, LoadStorageError> {
        let storage = LocalStorage::open(state_dir)?;
        let session = restore_session(&storage);
        Ok(Self { storage, session })
    }

    pub fn login(&mut self, identity: Identity, token: &str) -> Result<(), SaveStorageError> {
        debug!(username = %identity.username, "storing session");
        let encoded = serde_json::to_string(&identity)?;
        self.storage
            .set_all(&[(USER_KEY, encoded.as_str()), (TOKEN_KEY, token)])?;
        self.session = Some(Session::new(identity, token));
        Ok(())
    }

    /// The in-memory session is dropped even when the stored copy cannot be
    /// cleared.
    pub fn logout(&mut self) -> Result<(), SaveStorageError> {
        self.session = None;
        self.storage.remove_all(&[TOKEN_KEY, USER_KEY])
    }

    pub fn current_user(&self) -> Option<&Identity> {
        self.authenticated().map(|session| &session.identity)
    }

    /// Bearer credential for outgoing requests, if any.
    pub fn token(&self) -> Option<&str> {
        self.authenticated().map(|session| session.token.as_str())
    }

    fn authenticated(&self) -> Option<&Session> {
        self.session
            .as_ref()
            .filter(|session| session.is_authenticated())
    }
}

fn restore_session(storage: &LocalStorage) -> Option<Session> {
    let token = storage.get(TOKEN_KEY)?;
    let raw_user = storage.get(USER_KEY)?;
    match serde_json::from_str::<Identity>(raw_user) {
        Ok(identity) => Some(Session::new(identity, token)),
        Err(error) => {
            warn!(%error, "ignoring unreadable stored user");
            None
        }
    }
}
