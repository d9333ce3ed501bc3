use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    NotAuthenticated,
    InactiveAccount,
    WrongRole,
    NotOwner,
    NotSupervisorOfOwner,
    ResourceNotFound,
    RecordLocked,
}

/// What the calling view layer should show for a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    LoginRequired,
    Forbidden,
    NotFound,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "not_authenticated",
            DenyReason::InactiveAccount => "inactive_account",
            DenyReason::WrongRole => "wrong_role",
            DenyReason::NotOwner => "not_owner",
            DenyReason::NotSupervisorOfOwner => "not_supervisor_of_owner",
            DenyReason::ResourceNotFound => "resource_not_found",
            DenyReason::RecordLocked => "record_locked",
        }
    }

    pub fn outcome(self) -> Outcome {
        match self {
            DenyReason::NotAuthenticated | DenyReason::InactiveAccount => Outcome::LoginRequired,
            DenyReason::ResourceNotFound => Outcome::NotFound,
            DenyReason::WrongRole
            | DenyReason::NotOwner
            | DenyReason::NotSupervisorOfOwner
            | DenyReason::RecordLocked => Outcome::Forbidden,
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DenyReason> for AuthzError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::NotAuthenticated => AuthzError::NotAuthenticated,
            DenyReason::InactiveAccount => AuthzError::InactiveAccount,
            DenyReason::WrongRole => AuthzError::WrongRole,
            DenyReason::NotOwner => AuthzError::NotOwner,
            DenyReason::NotSupervisorOfOwner => AuthzError::NotSupervisorOfOwner,
            DenyReason::ResourceNotFound => AuthzError::ResourceNotFound,
            DenyReason::RecordLocked => AuthzError::RecordLocked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn reason(self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }

    pub fn into_result(self) -> AuthzResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason.into()),
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Allow => f.write_str("allow"),
            Decision::Deny(reason) => write!(f, "deny({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_maps_to_error_variant() {
        let err = Decision::Deny(DenyReason::NotOwner)
            .into_result()
            .expect_err("denied");
        assert_eq!(err, AuthzError::NotOwner);
        assert!(Decision::Allow.into_result().is_ok());
    }

    #[test]
    fn outcomes_follow_reason_category() {
        assert_eq!(DenyReason::NotAuthenticated.outcome(), Outcome::LoginRequired);
        assert_eq!(DenyReason::InactiveAccount.outcome(), Outcome::LoginRequired);
        assert_eq!(DenyReason::ResourceNotFound.outcome(), Outcome::NotFound);
        assert_eq!(DenyReason::NotSupervisorOfOwner.outcome(), Outcome::Forbidden);
        assert_eq!(DenyReason::RecordLocked.outcome(), Outcome::Forbidden);
    }

    #[test]
    fn decision_rendering() {
        assert_eq!(Decision::Allow.to_string(), "allow");
        assert_eq!(
            Decision::Deny(DenyReason::WrongRole).to_string(),
            "deny(wrong_role)"
        );
        let json = serde_json::to_value(Decision::Deny(DenyReason::InactiveAccount))
            .expect("serialize");
        assert_eq!(json["decision"], "deny");
        assert_eq!(json["reason"], "inactive_account");
    }
}
