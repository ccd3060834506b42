use std::{
    fmt::Write as _,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use log::{
    debug,
    warn,
};
use serde::{
    de::DeserializeOwned,
    Serialize,
};

use crate::core::{
    models::{
        default_cards,
        default_vocabs,
    },
    Card,
    CardboxError,
    Identity,
    Namespace,
    StarSet,
    VocabEntry,
};

const APP_NAME: &str = "cardbox";
const IDENTITY_FILE: &str = "current_user.json";

/// The three collection kinds a namespace is partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Cards,
    Vocabs,
    Stars,
}

impl StoreKind {
    fn label(&self) -> &'static str {
        match self {
            StoreKind::Cards => "cards",
            StoreKind::Vocabs => "vocabs",
            StoreKind::Stars => "stars",
        }
    }
}

/// File-backed namespaced storage. One JSON file per (kind, namespace) pair,
/// written whole on every save. This is the only module that touches the
/// filesystem; everything above it works on in-memory collections.
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Opens the store in the platform data directory
    /// (e.g. `~/.local/share/cardbox`), falling back to the working directory
    /// when no data dir is available.
    pub fn open_default() -> Self {
        let root = match dirs::data_local_dir() {
            Some(data_dir) => data_dir.join(APP_NAME),
            None => PathBuf::from("."),
        };
        Self::with_root(root)
    }

    /// Opens the store rooted at an explicit directory. Tests point this at a
    /// temporary dir to keep namespaces isolated per test.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let _ = fs::create_dir_all(&root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, kind: StoreKind, namespace: &Namespace) -> PathBuf {
        let file_name = match namespace {
            Namespace::Base => format!("{}_base.json", kind.label()),
            Namespace::User(name) => {
                format!("user_{}_{}.json", encode_component(name), kind.label())
            }
        };
        self.root.join(file_name)
    }

    /// Reads and parses a stored value. Absent or unreadable files and
    /// malformed JSON all come back as `None` so callers can self-heal with
    /// their defaults instead of surfacing an error to the user.
    fn read_value<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        if !path.exists() {
            return None;
        }

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("malformed data in {}: {}. Using defaults.", path.display(), e);
                None
            }
        }
    }

    fn write_value<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), CardboxError> {
        fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)?;
        debug!("data saved to {}", path.display());
        Ok(())
    }

    /// Loads a namespace's cards. A base namespace with nothing stored yet
    /// gets the built-in sample cards; a named user starts empty.
    pub fn load_cards(&self, namespace: &Namespace) -> Vec<Card> {
        self.read_value(&self.file_path(StoreKind::Cards, namespace)).unwrap_or_else(|| {
            match namespace {
                Namespace::Base => default_cards(),
                Namespace::User(_) => Vec::new(),
            }
        })
    }

    pub fn save_cards(&self, namespace: &Namespace, cards: &[Card]) -> Result<(), CardboxError> {
        self.write_value(&self.file_path(StoreKind::Cards, namespace), &cards)
    }

    pub fn load_vocabs(&self, namespace: &Namespace) -> Vec<VocabEntry> {
        self.read_value(&self.file_path(StoreKind::Vocabs, namespace)).unwrap_or_else(|| {
            match namespace {
                Namespace::Base => default_vocabs(),
                Namespace::User(_) => Vec::new(),
            }
        })
    }

    pub fn save_vocabs(
        &self,
        namespace: &Namespace,
        vocabs: &[VocabEntry],
    ) -> Result<(), CardboxError> {
        self.write_value(&self.file_path(StoreKind::Vocabs, namespace), &vocabs)
    }

    pub fn load_stars(&self, namespace: &Namespace) -> StarSet {
        self.read_value(&self.file_path(StoreKind::Stars, namespace)).unwrap_or_default()
    }

    pub fn save_stars(&self, namespace: &Namespace, stars: &StarSet) -> Result<(), CardboxError> {
        self.write_value(&self.file_path(StoreKind::Stars, namespace), stars)
    }

    /// The identity record: which user, if any, the next session starts as.
    pub fn current_identity(&self) -> Option<Identity> {
        self.read_value(&self.root.join(IDENTITY_FILE))
    }

    pub fn set_identity(&self, identity: Option<&Identity>) -> Result<(), CardboxError> {
        let path = self.root.join(IDENTITY_FILE);
        match identity {
            Some(identity) => self.write_value(&path, identity),
            None => {
                if path.exists() {
                    fs::remove_file(&path)?;
                }
                Ok(())
            }
        }
    }
}

/// Encodes a user name into a filename-safe component. Every byte outside
/// `[A-Za-z0-9-]` becomes `%XX`, so distinct names can never share a storage
/// file and names with separators or path characters stay unambiguous.
fn encode_component(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' => out.push(byte as char),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::core::Subject;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::with_root(dir.path());
        (dir, store)
    }

    #[test]
    fn base_namespace_starts_with_samples() {
        let (_dir, store) = temp_store();
        let cards = store.load_cards(&Namespace::Base);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].subject, Subject::Chinese);

        let vocabs = store.load_vocabs(&Namespace::Base);
        assert!(!vocabs.is_empty());
    }

    #[test]
    fn user_namespace_starts_empty() {
        let (_dir, store) = temp_store();
        let ns = Namespace::User("alice".to_string());
        assert!(store.load_cards(&ns).is_empty());
        assert!(store.load_vocabs(&ns).is_empty());
        assert!(store.load_stars(&ns).is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = temp_store();
        let ns = Namespace::User("alice".to_string());
        let cards = vec![Card::new(Subject::English, "title", "content")];
        store.save_cards(&ns, &cards).unwrap();
        assert_eq!(store.load_cards(&ns), cards);
    }

    #[test]
    fn malformed_file_self_heals_to_defaults() {
        let (_dir, store) = temp_store();
        let path = store.file_path(StoreKind::Cards, &Namespace::Base);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(store.load_cards(&Namespace::Base).len(), 3);

        let star_path = store.file_path(StoreKind::Stars, &Namespace::Base);
        fs::write(&star_path, "[1,2,3]").unwrap();
        assert!(store.load_stars(&Namespace::Base).is_empty());
    }

    #[test]
    fn namespaces_never_share_files() {
        let (_dir, store) = temp_store();
        let alice = Namespace::User("alice".to_string());
        let bob = Namespace::User("bob".to_string());

        store.save_cards(&alice, &[Card::new(Subject::Math, "a", "a")]).unwrap();
        store.save_cards(&bob, &[]).unwrap();

        assert_eq!(store.load_cards(&alice).len(), 1);
        assert!(store.load_cards(&bob).is_empty());
        assert_eq!(store.load_cards(&Namespace::Base).len(), 3);
    }

    #[test]
    fn hostile_user_names_stay_distinct() {
        // Names that would collide under naive string concatenation.
        let a = Namespace::User("x_cards".to_string());
        let b = Namespace::User("x".to_string());
        let (_dir, store) = temp_store();
        let path_a = store.file_path(StoreKind::Cards, &a);
        let path_b = store.file_path(StoreKind::Cards, &b);
        assert_ne!(path_a, path_b);

        // Path separators and unicode must not escape the root.
        let weird = Namespace::User("../怪/name".to_string());
        let path = store.file_path(StoreKind::Stars, &weird);
        assert_eq!(path.parent().unwrap(), store.root());
    }

    #[test]
    fn encode_component_is_injective_on_tricky_pairs() {
        let pairs = [("a_b", "a%b"), ("a b", "a-b"), ("名", "%E5")];
        for (left, right) in pairs {
            assert_ne!(encode_component(left), encode_component(right));
        }
        assert_eq!(encode_component("plain-name"), "plain-name");
    }

    #[test]
    fn identity_record_round_trips_and_clears() {
        let (_dir, store) = temp_store();
        assert!(store.current_identity().is_none());

        let identity = Identity { name: "alice".to_string() };
        store.set_identity(Some(&identity)).unwrap();
        assert_eq!(store.current_identity(), Some(identity));

        store.set_identity(None).unwrap();
        assert!(store.current_identity().is_none());
        // Clearing twice is fine.
        store.set_identity(None).unwrap();
    }
}
