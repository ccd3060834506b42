use chrono::Utc;

use crate::{
    core::{
        CardboxError,
        Namespace,
        VocabEntry,
    },
    persistence::Store,
};

/// Vocabulary CRUD. Mirrors the card repository without star support;
/// example sentences and their translations are optional.
pub struct VocabRepository<'s> {
    store: &'s Store,
}

impl<'s> VocabRepository<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    pub fn list(&self, namespace: &Namespace) -> Vec<VocabEntry> {
        self.store.load_vocabs(namespace)
    }

    pub fn create(
        &self,
        namespace: &Namespace,
        word: &str,
        meaning: &str,
        example: &str,
        example_translation: &str,
    ) -> Result<VocabEntry, CardboxError> {
        let (word, meaning) = validated_fields(word, meaning)?;

        let entry = VocabEntry::new(word, meaning, example.trim(), example_translation.trim());
        let mut vocabs = self.store.load_vocabs(namespace);
        vocabs.insert(0, entry.clone());
        self.store.save_vocabs(namespace, &vocabs)?;
        Ok(entry)
    }

    pub fn update(
        &self,
        namespace: &Namespace,
        id: &str,
        word: &str,
        meaning: &str,
        example: &str,
        example_translation: &str,
    ) -> Result<VocabEntry, CardboxError> {
        let (word, meaning) = validated_fields(word, meaning)?;

        let mut vocabs = self.store.load_vocabs(namespace);
        let entry = vocabs
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| CardboxError::NotFound(id.to_string()))?;

        entry.word = word;
        entry.meaning = meaning;
        entry.example = example.trim().to_string();
        entry.example_translation = example_translation.trim().to_string();
        entry.created_at = Utc::now();
        let updated = entry.clone();

        self.store.save_vocabs(namespace, &vocabs)?;
        Ok(updated)
    }

    /// Deleting an unknown id is an error, matching the card repository.
    pub fn delete(&self, namespace: &Namespace, id: &str) -> Result<(), CardboxError> {
        let mut vocabs = self.store.load_vocabs(namespace);
        let position = vocabs
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| CardboxError::NotFound(id.to_string()))?;

        vocabs.remove(position);
        self.store.save_vocabs(namespace, &vocabs)
    }
}

fn validated_fields(word: &str, meaning: &str) -> Result<(String, String), CardboxError> {
    let word = word.trim();
    let meaning = meaning.trim();
    if word.is_empty() {
        return Err(CardboxError::Validation("vocabulary word must not be empty".to_string()));
    }
    if meaning.is_empty() {
        return Err(CardboxError::Validation("vocabulary meaning must not be empty".to_string()));
    }
    Ok((word.to_string(), meaning.to_string()))
}
