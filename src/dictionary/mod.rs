pub mod catalog;
pub mod model;
pub mod normalize;
pub mod validate;

pub use model::{Example, Meaning, NewWord, Note, Word, WordSummary, WordUpdate};
pub use normalize::{letter_for, normalize};
