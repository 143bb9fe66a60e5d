use chime_domain::ID;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RepoError {
    #[error("entity with id {0} was not found")]
    NotFound(ID),
    #[error("entity with id {0} already exists")]
    AlreadyExists(ID),
}
