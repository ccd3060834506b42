use chrono::Utc;

use crate::{
    core::{
        Card,
        CardboxError,
        Namespace,
        Subject,
    },
    persistence::Store,
};

/// Card CRUD plus star toggling, scoped by the caller-supplied namespace.
/// Every mutation is read-modify-write over the whole collection.
pub struct CardRepository<'s> {
    store: &'s Store,
}

impl<'s> CardRepository<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    pub fn list(&self, namespace: &Namespace) -> Vec<Card> {
        self.store.load_cards(namespace)
    }

    /// Creates a card and prepends it, so the collection stays newest-first.
    pub fn create(
        &self,
        namespace: &Namespace,
        subject: Subject,
        title: &str,
        content: &str,
    ) -> Result<Card, CardboxError> {
        let (title, content) = validated_fields(title, content)?;

        let card = Card::new(subject, title, content);
        let mut cards = self.store.load_cards(namespace);
        cards.insert(0, card.clone());
        self.store.save_cards(namespace, &cards)?;
        Ok(card)
    }

    /// Edits a card in place. `created_at` is bumped to the edit time, which
    /// makes the timestamp behave as "last modified" for sorting.
    pub fn update(
        &self,
        namespace: &Namespace,
        id: &str,
        subject: Subject,
        title: &str,
        content: &str,
    ) -> Result<Card, CardboxError> {
        let (title, content) = validated_fields(title, content)?;

        let mut cards = self.store.load_cards(namespace);
        let card = cards
            .iter_mut()
            .find(|card| card.id == id)
            .ok_or_else(|| CardboxError::NotFound(id.to_string()))?;

        card.subject = subject;
        card.title = title;
        card.content = content;
        card.created_at = Utc::now();
        let updated = card.clone();

        self.store.save_cards(namespace, &cards)?;
        Ok(updated)
    }

    /// Removes a card and prunes its star entry so no orphaned stars remain.
    /// Deleting an unknown id is an error, not a silent no-op.
    pub fn delete(&self, namespace: &Namespace, id: &str) -> Result<(), CardboxError> {
        let mut cards = self.store.load_cards(namespace);
        let position = cards
            .iter()
            .position(|card| card.id == id)
            .ok_or_else(|| CardboxError::NotFound(id.to_string()))?;

        cards.remove(position);
        self.store.save_cards(namespace, &cards)?;

        let mut stars = self.store.load_stars(namespace);
        if stars.remove(id) {
            self.store.save_stars(namespace, &stars)?;
        }
        Ok(())
    }

    /// Flips the star for `id` and returns the new state. The id is not
    /// checked against the card collection; stars are only pruned on delete.
    pub fn toggle_star(&self, namespace: &Namespace, id: &str) -> Result<bool, CardboxError> {
        let mut stars = self.store.load_stars(namespace);
        let starred = stars.toggle(id);
        self.store.save_stars(namespace, &stars)?;
        Ok(starred)
    }
}

fn validated_fields(title: &str, content: &str) -> Result<(String, String), CardboxError> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() {
        return Err(CardboxError::Validation("card title must not be empty".to_string()));
    }
    if content.is_empty() {
        return Err(CardboxError::Validation("card content must not be empty".to_string()));
    }
    Ok((title.to_string(), content.to_string()))
}
