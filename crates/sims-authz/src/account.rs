//! Account records and role-specific profiles.
//!
//! # Purpose
//! Models an authenticated identity whose role is a closed tagged variant
//! carrying exactly the fields that role requires.
//!
//! # How it fits
//! The resolver reads the actor's profile to pick a rule row and reads the
//! record owner's profile to find the owner's current supervisor.
//!
//! # Key invariants
//! - The role is derived from the profile variant and never changes after
//!   construction; no method swaps the variant.
//! - Only PG profiles carry a supervisor reference, which keeps the
//!   supervisor graph a depth-1 forest.
//! - Deactivation flips `active`; accounts are never removed.
//!
//! # Examples
//! ```rust
//! use sims_authz::{Account, Role, Specialty, TrainingYear};
//!
//! let carol = Account::supervisor("carol", "Dr. Carol", Specialty::Surgery);
//! let dave = Account::pg(
//!     "dave",
//!     "Dave",
//!     Specialty::Surgery,
//!     TrainingYear::new(2).unwrap(),
//!     Some(carol.id.clone()),
//! );
//! assert_eq!(dave.role(), Role::Pg);
//! assert!(dave.is_supervised_by(&carol.id));
//! ```
use crate::{AccountId, AuthzError, AuthzResult, Role};
use serde::{Deserialize, Serialize};

/// Medical specialty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Medicine,
    Surgery,
    Pediatrics,
    Gynecology,
    Orthopedics,
    Cardiology,
    Neurology,
    Psychiatry,
    Dermatology,
    Radiology,
    Anesthesia,
    Pathology,
    Microbiology,
    Pharmacology,
    CommunityMedicine,
    ForensicMedicine,
    Other,
}

impl Specialty {
    pub fn label(self) -> &'static str {
        match self {
            Specialty::Medicine => "Internal Medicine",
            Specialty::Surgery => "Surgery",
            Specialty::Pediatrics => "Pediatrics",
            Specialty::Gynecology => "Gynecology & Obstetrics",
            Specialty::Orthopedics => "Orthopedics",
            Specialty::Cardiology => "Cardiology",
            Specialty::Neurology => "Neurology",
            Specialty::Psychiatry => "Psychiatry",
            Specialty::Dermatology => "Dermatology",
            Specialty::Radiology => "Radiology",
            Specialty::Anesthesia => "Anesthesia",
            Specialty::Pathology => "Pathology",
            Specialty::Microbiology => "Microbiology",
            Specialty::Pharmacology => "Pharmacology",
            Specialty::CommunityMedicine => "Community Medicine",
            Specialty::ForensicMedicine => "Forensic Medicine",
            Specialty::Other => "Other",
        }
    }
}

/// PG training year, 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TrainingYear(u8);

impl TrainingYear {
    pub const MAX: u8 = 4;

    pub fn new(year: u8) -> AuthzResult<Self> {
        if (1..=Self::MAX).contains(&year) {
            Ok(Self(year))
        } else {
            Err(AuthzError::InvalidAccount(format!(
                "training year must be 1..={}, got {year}",
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for TrainingYear {
    type Error = AuthzError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrainingYear> for u8 {
    fn from(value: TrainingYear) -> Self {
        value.0
    }
}

/// Role-specific account data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Profile {
    Admin,
    Supervisor {
        specialty: Specialty,
    },
    Pg {
        specialty: Specialty,
        year: TrainingYear,
        #[serde(default)]
        supervisor: Option<AccountId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub display_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(flatten)]
    profile: Profile,
}

fn default_active() -> bool {
    true
}

impl Account {
    pub fn new(id: impl Into<AccountId>, display_name: impl Into<String>, profile: Profile) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            active: true,
            profile,
        }
    }

    pub fn admin(id: impl Into<AccountId>, display_name: impl Into<String>) -> Self {
        Self::new(id, display_name, Profile::Admin)
    }

    pub fn supervisor(
        id: impl Into<AccountId>,
        display_name: impl Into<String>,
        specialty: Specialty,
    ) -> Self {
        Self::new(id, display_name, Profile::Supervisor { specialty })
    }

    pub fn pg(
        id: impl Into<AccountId>,
        display_name: impl Into<String>,
        specialty: Specialty,
        year: TrainingYear,
        supervisor: Option<AccountId>,
    ) -> Self {
        Self::new(
            id,
            display_name,
            Profile::Pg {
                specialty,
                year,
                supervisor,
            },
        )
    }

    pub fn role(&self) -> Role {
        match self.profile {
            Profile::Admin => Role::Admin,
            Profile::Supervisor { .. } => Role::Supervisor,
            Profile::Pg { .. } => Role::Pg,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn specialty(&self) -> Option<Specialty> {
        match self.profile {
            Profile::Admin => None,
            Profile::Supervisor { specialty } | Profile::Pg { specialty, .. } => Some(specialty),
        }
    }

    /// Current supervisor of a PG account; `None` for other roles.
    pub fn supervisor_id(&self) -> Option<&AccountId> {
        match &self.profile {
            Profile::Pg { supervisor, .. } => supervisor.as_ref(),
            _ => None,
        }
    }

    pub fn is_supervised_by(&self, supervisor: &AccountId) -> bool {
        self.supervisor_id() == Some(supervisor)
    }

    /// Rewrite the supervisor edge of a PG account.
    ///
    /// This only checks that the account is a PG. Cross-account rules live in
    /// [`crate::validate_assignment`], which callers run first.
    pub fn set_supervisor(&mut self, new_supervisor: Option<AccountId>) -> AuthzResult<()> {
        match &mut self.profile {
            Profile::Pg { supervisor, .. } => {
                *supervisor = new_supervisor;
                Ok(())
            }
            _ => Err(AuthzError::InvalidAssignment(format!(
                "{} is not a pg account",
                self.id
            ))),
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Check single-account invariants.
    pub fn validate(&self) -> AuthzResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(AuthzError::InvalidAccount("id must not be empty".to_string()));
        }
        if self.supervisor_id() == Some(&self.id) {
            return Err(AuthzError::InvalidAccount(
                "accounts cannot supervise themselves".to_string(),
            ));
        }
        Ok(())
    }
}
