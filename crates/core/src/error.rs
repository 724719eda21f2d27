use thiserror::Error;

use crate::model::{CourseError, IdParseError, ModuleError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error(transparent)]
    Id(#[from] IdParseError),
}
