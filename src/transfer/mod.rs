use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::{
        Card,
        CardboxError,
        Namespace,
        StarSet,
        VocabEntry,
    },
    persistence::Store,
};

pub const SCHEMA_VERSION: u32 = 1;

fn schema_version_default() -> u32 {
    SCHEMA_VERSION
}

/// A complete, self-describing export of one namespace. Imports tolerate
/// documents missing `vocabs` or `stars` (those collections are then left
/// untouched); `cards` is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "schema_version_default")]
    pub schema_version: u32,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub stars: Option<StarSet>,
    #[serde(default)]
    pub vocabs: Option<Vec<VocabEntry>>,
    #[serde(default = "Utc::now")]
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub identity_name: Option<String>,
}

impl Snapshot {
    /// Parses an import document. Structural problems (not JSON, `cards`
    /// missing or not an array, entries that don't match the card shape) are
    /// all reported as `Format` before anything is written.
    pub fn from_json(raw: &str) -> Result<Self, CardboxError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| CardboxError::Format(format!("not valid JSON: {}", e)))?;

        match value.get("cards") {
            Some(cards) if cards.is_array() => {}
            Some(_) => {
                return Err(CardboxError::Format("'cards' is not an array".to_string()));
            }
            None => {
                return Err(CardboxError::Format("missing 'cards' array".to_string()));
            }
        }

        serde_json::from_value(value).map_err(|e| CardboxError::Format(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CardboxError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested download name, embedding the identity and export time.
    pub fn suggested_filename(&self) -> String {
        let owner = self.identity_name.as_deref().unwrap_or("anon");
        format!("study_cards_export_{}_{}.json", owner, self.exported_at.timestamp_millis())
    }
}

/// Captures the full state of a namespace as a portable document.
pub fn export_snapshot(store: &Store, namespace: &Namespace) -> Snapshot {
    Snapshot {
        schema_version: SCHEMA_VERSION,
        cards: store.load_cards(namespace),
        stars: Some(store.load_stars(namespace)),
        vocabs: Some(store.load_vocabs(namespace)),
        exported_at: Utc::now(),
        identity_name: namespace.user_name().map(str::to_string),
    }
}

/// The reviewable half of an import: what would be replaced, and by how much.
/// Callers show this to the user for confirmation, then call [`ImportPlan::apply`].
#[derive(Debug)]
pub struct ImportPlan {
    namespace: Namespace,
    snapshot: Snapshot,
    pub incoming_cards: usize,
    pub incoming_vocabs: usize,
    pub replaced_cards: usize,
    pub replaced_vocabs: usize,
    pub replaces_stars: bool,
}

impl ImportPlan {
    pub fn prepare(store: &Store, namespace: &Namespace, snapshot: Snapshot) -> Self {
        Self {
            incoming_cards: snapshot.cards.len(),
            incoming_vocabs: snapshot.vocabs.as_ref().map_or(0, Vec::len),
            replaced_cards: store.load_cards(namespace).len(),
            replaced_vocabs: store.load_vocabs(namespace).len(),
            replaces_stars: snapshot.stars.is_some(),
            namespace: namespace.clone(),
            snapshot,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Destructive wholesale replace of the namespace's collections. Cards are
    /// always replaced; vocabs and stars only when the document carries them.
    pub fn apply(self, store: &Store) -> Result<(), CardboxError> {
        store.save_cards(&self.namespace, &self.snapshot.cards)?;
        if let Some(vocabs) = &self.snapshot.vocabs {
            store.save_vocabs(&self.namespace, vocabs)?;
        }
        if let Some(stars) = &self.snapshot.stars {
            store.save_stars(&self.namespace, stars)?;
        }
        Ok(())
    }
}
