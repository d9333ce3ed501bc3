use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("account is inactive")]
    InactiveAccount,
    #[error("role is not permitted to perform this action")]
    WrongRole,
    #[error("record belongs to another account")]
    NotOwner,
    #[error("record owner is not supervised by this account")]
    NotSupervisorOfOwner,
    #[error("resource not found")]
    ResourceNotFound,
    #[error("record is locked for editing")]
    RecordLocked,
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),
    #[error("invalid account: {0}")]
    InvalidAccount(String),
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("invalid role: {0}")]
    InvalidRole(String),
    #[error("invalid resource kind: {0}")]
    InvalidKind(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
