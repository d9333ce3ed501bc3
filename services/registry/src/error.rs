use crate::store::StoreError;
use sims_authz::{AccountId, AuthzError, ResourceStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("denied: {0}")]
    Denied(AuthzError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cannot move record from {from} to {to}")]
    InvalidTransition {
        from: ResourceStatus,
        to: ResourceStatus,
    },
    #[error("pg {0} has no supervisor to review submissions")]
    NoSupervisor(AccountId),
}

impl From<AuthzError> for RegistryError {
    fn from(err: AuthzError) -> Self {
        RegistryError::Denied(err)
    }
}

impl RegistryError {
    /// The policy error behind this failure, whether it came from the resolver
    /// or from store-side validation.
    pub fn authz(&self) -> Option<&AuthzError> {
        match self {
            RegistryError::Denied(err) | RegistryError::Store(StoreError::Rejected(err)) => {
                Some(err)
            }
            _ => None,
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authz_reaches_through_store_rejections() {
        let err = RegistryError::from(StoreError::Rejected(AuthzError::InvalidAssignment(
            "self".to_string(),
        )));
        assert!(matches!(err.authz(), Some(AuthzError::InvalidAssignment(_))));
        assert_eq!(
            RegistryError::from(AuthzError::WrongRole).authz(),
            Some(&AuthzError::WrongRole)
        );
        assert!(
            RegistryError::from(StoreError::NotFound("x".into()))
                .authz()
                .is_none()
        );
    }

    #[test]
    fn transition_message_names_statuses() {
        let err = RegistryError::InvalidTransition {
            from: ResourceStatus::Approved,
            to: ResourceStatus::Submitted,
        };
        assert_eq!(err.to_string(), "cannot move record from approved to submitted");
    }
}
