use crate::{
    core::{
        Card,
        CardboxError,
        Identity,
        Namespace,
        VocabEntry,
    },
    persistence::Store,
};

/// Explicit session state: the current identity plus the collections loaded
/// for its namespace. The UI holds one of these and passes it around instead
/// of reading ambient globals.
#[derive(Debug)]
pub struct Session {
    identity: Option<Identity>,
    cards: Vec<Card>,
    vocabs: Vec<VocabEntry>,
}

impl Session {
    /// Restores the last session: reads the stored identity record and loads
    /// that namespace's collections.
    pub fn load(store: &Store) -> Self {
        let identity = store.current_identity();
        let namespace = Namespace::for_identity(identity.as_ref());
        Self {
            cards: store.load_cards(&namespace),
            vocabs: store.load_vocabs(&namespace),
            identity,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::for_identity(self.identity.as_ref())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn vocabs(&self) -> &[VocabEntry] {
        &self.vocabs
    }

    /// A local namespace switch. Any non-empty name is accepted; there are no
    /// credentials to check.
    pub fn login(&mut self, store: &Store, name: &str) -> Result<(), CardboxError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CardboxError::Validation("user name must not be empty".to_string()));
        }

        let identity = Identity { name: name.to_string() };
        store.set_identity(Some(&identity))?;
        self.identity = Some(identity);
        self.reload(store);
        Ok(())
    }

    pub fn logout(&mut self, store: &Store) -> Result<(), CardboxError> {
        store.set_identity(None)?;
        self.identity = None;
        self.reload(store);
        Ok(())
    }

    /// Refreshes the loaded collections, e.g. after a repository mutation.
    pub fn reload(&mut self, store: &Store) {
        let namespace = self.namespace();
        self.cards = store.load_cards(&namespace);
        self.vocabs = store.load_vocabs(&namespace);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        core::Subject,
        repository::CardRepository,
    };

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::with_root(dir.path());
        (dir, store)
    }

    #[test]
    fn fresh_session_is_anonymous_with_samples() {
        let (_dir, store) = temp_store();
        let session = Session::load(&store);
        assert!(session.identity().is_none());
        assert_eq!(session.namespace(), Namespace::Base);
        assert_eq!(session.cards().len(), 3);
    }

    #[test]
    fn login_switches_namespace_and_collections() {
        let (_dir, store) = temp_store();
        let mut session = Session::load(&store);

        session.login(&store, " alice ").unwrap();
        assert_eq!(session.identity().unwrap().name, "alice");
        assert_eq!(session.namespace(), Namespace::User("alice".to_string()));
        assert!(session.cards().is_empty());

        // The identity record survives a fresh load.
        let restored = Session::load(&store);
        assert_eq!(restored.identity().unwrap().name, "alice");
    }

    #[test]
    fn blank_login_is_rejected() {
        let (_dir, store) = temp_store();
        let mut session = Session::load(&store);
        let err = session.login(&store, "   ").unwrap_err();
        assert!(matches!(err, CardboxError::Validation(_)));
        assert!(session.identity().is_none());
    }

    #[test]
    fn logout_returns_to_base_collections() {
        let (_dir, store) = temp_store();
        let repo = CardRepository::new(&store);
        let mut session = Session::load(&store);

        session.login(&store, "alice").unwrap();
        repo.create(&session.namespace(), Subject::Math, "mine", "only alice sees this").unwrap();
        session.reload(&store);
        assert_eq!(session.cards().len(), 1);

        session.logout(&store).unwrap();
        assert!(session.identity().is_none());
        assert_eq!(session.cards().len(), 3);
        assert!(session.cards().iter().all(|c| c.title != "mine"));
    }
}
