//! Session service.
//!
//! Wraps an [`IdentityProvider`] and keeps the resume document scoped to the
//! signed-in account: whenever the identity differs from the last one seen,
//! the document is reset so one account never sees another's data.

use super::store::DocumentStore;
use crate::domain::IdentityError;
use crate::infrastructure::{read_json, save_json, Identity, IdentityProvider, KeyValueStore, LAST_USER_KEY};
use std::rc::Rc;

pub struct SessionService {
    provider: Box<dyn IdentityProvider>,
    storage: Rc<dyn KeyValueStore>,
    current: Option<Identity>,
}

impl SessionService {
    pub fn new(provider: Box<dyn IdentityProvider>, storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            provider,
            storage,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Restores a persisted session at startup.
    pub fn restore(&mut self, store: &mut DocumentStore) -> Option<&Identity> {
        let identity = self.provider.restore();
        self.on_identity_changed(identity, store);
        self.current.as_ref()
    }

    pub fn register(&mut self, email: &str, password: &str, store: &mut DocumentStore) -> Result<Identity, IdentityError> {
        let identity = self.provider.register(email, password).inspect_err(|e| {
            tracing::info!(error = %e, "registration rejected");
        })?;
        self.on_identity_changed(Some(identity.clone()), store);
        Ok(identity)
    }

    pub fn login(&mut self, email: &str, password: &str, store: &mut DocumentStore) -> Result<Identity, IdentityError> {
        let identity = self.provider.login(email, password).inspect_err(|e| {
            tracing::info!(error = %e, "login rejected");
        })?;
        self.on_identity_changed(Some(identity.clone()), store);
        Ok(identity)
    }

    /// Signs out and removes the resume from durable storage.
    pub fn logout(&mut self, store: &mut DocumentStore) {
        self.provider.logout();
        self.on_identity_changed(None, store);
    }

    /// Single entry point for every identity transition.
    ///
    /// Resets the document when the identity differs from the last one
    /// recorded. Signing out also clears the stored document.
    pub fn on_identity_changed(&mut self, identity: Option<Identity>, store: &mut DocumentStore) {
        let last: Option<String> = read_json(self.storage.as_ref(), LAST_USER_KEY).ok().flatten();

        match &identity {
            Some(user) => {
                if last.as_deref() != Some(user.uid.as_str()) {
                    tracing::info!(uid = %user.uid, "account changed, resetting resume");
                    store.reset();
                }
                if let Err(e) = save_json(self.storage.as_ref(), LAST_USER_KEY, &user.uid) {
                    tracing::error!(error = %e, "failed to record last user");
                }
            }
            None => {
                if last.is_some() || self.current.is_some() {
                    tracing::info!("signed out, clearing resume");
                }
                store.clear_persisted();
                if let Err(e) = self.storage.remove(LAST_USER_KEY) {
                    tracing::error!(error = %e, "failed to forget last user");
                }
            }
        }
        self.current = identity;
    }
}
