use chrono::{
    DateTime,
    Utc,
};

use crate::core::{
    Card,
    StarSet,
    Subject,
    VocabEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectFilter {
    All,
    Only(Subject),
}

impl SubjectFilter {
    fn admits(&self, subject: Subject) -> bool {
        match self {
            SubjectFilter::All => true,
            SubjectFilter::Only(wanted) => *wanted == subject,
        }
    }
}

impl Default for SubjectFilter {
    fn default() -> Self {
        SubjectFilter::All
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::NewestFirst
    }
}

/// View criteria for the card list. `query` is matched case-insensitively
/// against title and content; an empty query matches everything.
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    pub subject: SubjectFilter,
    pub only_starred: bool,
    pub query: String,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct VocabFilter {
    pub query: String,
    pub sort: SortOrder,
}

trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Timestamped for Card {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for VocabEntry {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Projects a borrowed card snapshot through filter, search and sort.
/// Never mutates the source; no matches is an empty vec, not an error.
pub fn project_cards<'a>(cards: &'a [Card], filter: &CardFilter, stars: &StarSet) -> Vec<&'a Card> {
    let query = filter.query.trim().to_lowercase();

    let mut selected: Vec<&Card> = cards
        .iter()
        .filter(|card| {
            filter.subject.admits(card.subject)
                && (!filter.only_starred || stars.is_starred(&card.id))
                && matches_query(&[&card.title, &card.content], &query)
        })
        .collect();

    sort_by_created(&mut selected, filter.sort);
    selected
}

pub fn project_vocabs<'a>(vocabs: &'a [VocabEntry], filter: &VocabFilter) -> Vec<&'a VocabEntry> {
    let query = filter.query.trim().to_lowercase();

    let mut selected: Vec<&VocabEntry> = vocabs
        .iter()
        .filter(|entry| {
            matches_query(
                &[&entry.word, &entry.meaning, &entry.example, &entry.example_translation],
                &query,
            )
        })
        .collect();

    sort_by_created(&mut selected, filter.sort);
    selected
}

fn matches_query(fields: &[&str], query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    fields.join(" ").to_lowercase().contains(query)
}

// Stable sort: entries with equal timestamps keep their collection order.
fn sort_by_created<T: Timestamped>(entries: &mut [&T], order: SortOrder) {
    entries.sort_by(|left, right| {
        let ordering = left.created_at().cmp(&right.created_at());
        match order {
            SortOrder::OldestFirst => ordering,
            SortOrder::NewestFirst => ordering.reverse(),
        }
    });
}
