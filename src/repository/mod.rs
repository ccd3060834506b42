pub mod cards;
pub mod vocab;

pub use cards::CardRepository;
pub use vocab::VocabRepository;
