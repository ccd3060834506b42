use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
};

use chrono::{
    DateTime,
    Duration,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

use super::CardboxError;

/// The eight fixed study subjects. Serialized by their short keys so stored
/// collections stay compatible with exports from older installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "ch")]
    Chinese,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ma")]
    Math,
    #[serde(rename = "chm")]
    Chemistry,
    #[serde(rename = "bio")]
    Biology,
    #[serde(rename = "phy")]
    Physics,
    #[serde(rename = "geo")]
    EarthScience,
    #[serde(rename = "soc")]
    SocialStudies,
}

impl Subject {
    pub const ALL: [Subject; 8] = [
        Subject::Chinese,
        Subject::English,
        Subject::Math,
        Subject::Chemistry,
        Subject::Biology,
        Subject::Physics,
        Subject::EarthScience,
        Subject::SocialStudies,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Subject::Chinese => "ch",
            Subject::English => "en",
            Subject::Math => "ma",
            Subject::Chemistry => "chm",
            Subject::Biology => "bio",
            Subject::Physics => "phy",
            Subject::EarthScience => "geo",
            Subject::SocialStudies => "soc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::Chinese => "國文",
            Subject::English => "英文",
            Subject::Math => "數學",
            Subject::Chemistry => "化學",
            Subject::Biology => "生物",
            Subject::Physics => "物理",
            Subject::EarthScience => "地科",
            Subject::SocialStudies => "社會",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Subject {
    type Err = CardboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .iter()
            .copied()
            .find(|subject| subject.key() == s)
            .ok_or_else(|| CardboxError::Validation(format!("unknown subject key: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub subject: Subject,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    // Entries written by older installs may lack a timestamp; default it at
    // parse time so sorting always has one to work with.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn new(subject: Subject, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", subject.key(), Uuid::new_v4()),
            subject,
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    pub id: String,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub example_translation: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl VocabEntry {
    pub fn new(
        word: impl Into<String>,
        meaning: impl Into<String>,
        example: impl Into<String>,
        example_translation: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("v-{}", Uuid::new_v4()),
            word: word.into(),
            meaning: meaning.into(),
            example: example.into(),
            example_translation: example_translation.into(),
            created_at: Utc::now(),
        }
    }
}

/// Per-namespace starred-card membership. Stored as `{ "<card id>": true }`
/// to stay readable by exports from the original storage format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarSet(HashMap<String, bool>);

impl StarSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_starred(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    /// Flips membership and returns the new starred state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.is_starred(id) {
            self.0.remove(id);
            false
        } else {
            self.0.insert(id.to_string(), true);
            true
        }
    }

    /// Removes the entry for `id`, returning whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.values().filter(|starred| **starred).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
}

/// The storage partition everything is scoped by: either the shared base
/// collections or a named user's own copies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    Base,
    User(String),
}

impl Namespace {
    pub fn for_identity(identity: Option<&Identity>) -> Self {
        match identity {
            Some(identity) => Namespace::User(identity.name.clone()),
            None => Namespace::Base,
        }
    }

    pub fn user_name(&self) -> Option<&str> {
        match self {
            Namespace::Base => None,
            Namespace::User(name) => Some(name),
        }
    }
}

/// The sample cards a fresh install starts from, before anything is saved.
/// Timestamps ascend in declaration order so an old-to-new sort keeps them
/// in place.
pub fn default_cards() -> Vec<Card> {
    let base = Utc::now();
    let sample = |offset: i64, id: &str, subject: Subject, title: &str, content: &str| Card {
        id: id.to_string(),
        subject,
        title: title.to_string(),
        content: content.to_string(),
        created_at: base - Duration::seconds(30 - offset),
    };

    vec![
        sample(0, "ch-1", Subject::Chinese, "文言常見詞彙", "「蓋」通常表示原因或解釋；注意句中功能。"),
        sample(1, "en-1", Subject::English, "時態重點", "現在完成式表過去到現在的影響，用 have/has + p.p."),
        sample(2, "ma-1", Subject::Math, "微分基本法則", "常見函數求導規則：和差、乘法、鏈式法則。"),
    ]
}

pub fn default_vocabs() -> Vec<VocabEntry> {
    let base = Utc::now();
    let sample = |offset: i64, id: &str, word: &str, meaning: &str, example: &str, translation: &str| {
        VocabEntry {
            id: id.to_string(),
            word: word.to_string(),
            meaning: meaning.to_string(),
            example: example.to_string(),
            example_translation: translation.to_string(),
            created_at: base - Duration::seconds(30 - offset),
        }
    };

    vec![
        sample(
            0,
            "v-1",
            "perseverance",
            "毅力；堅持",
            "Success in exams takes perseverance.",
            "考試的成功需要毅力。",
        ),
        sample(
            1,
            "v-2",
            "hypothesis",
            "假說；假設",
            "The experiment did not support the hypothesis.",
            "實驗結果不支持這個假說。",
        ),
    ]
}
