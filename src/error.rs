use thiserror::Error;

/// Input the pipeline refuses to treat as a document.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("input is not text: {suspect} of {total} characters are NUL or undecodable")]
    NotText { suspect: usize, total: usize },
}
