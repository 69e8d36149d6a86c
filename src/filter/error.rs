use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Query is too long: {0} characters (max {1})")]
    QueryTooLong(usize, usize),

    #[error("Invalid letter: {0}")]
    InvalidLetter(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(String),
}
