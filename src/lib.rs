pub mod core;
pub mod persistence;
pub mod query;
pub mod repository;
pub mod session;
pub mod transfer;

pub use crate::{
    core::{
        Card,
        CardboxError,
        Identity,
        Namespace,
        StarSet,
        Subject,
        VocabEntry,
    },
    persistence::Store,
    repository::{
        CardRepository,
        VocabRepository,
    },
    session::Session,
    transfer::{
        export_snapshot,
        ImportPlan,
        Snapshot,
    },
};
