pub mod errors;
pub mod models;

pub use errors::CardboxError;
pub use models::{
    Card,
    Identity,
    Namespace,
    StarSet,
    Subject,
    VocabEntry,
};
