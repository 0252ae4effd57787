use thiserror::Error;

/// Errors raised while configuring a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("R-tree max capacity must be greater than 1, got {max}")]
    InvalidConfiguration { max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
