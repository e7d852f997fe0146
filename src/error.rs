use thiserror::Error;

use crate::roster::SectionId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("section id {0:?} is used for more than one role")]
    DuplicateSectionId(SectionId),

    #[error("section id {0:?} is not present in the roster")]
    MissingSection(SectionId),
}

pub type Result<T> = std::result::Result<T, MapError>;
