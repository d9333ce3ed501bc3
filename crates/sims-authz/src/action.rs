use crate::AuthzError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Review,
    List,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::Review,
        Action::List,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Review => "review",
            Action::List => "list",
        }
    }

    /// Whether the action addresses a resource class rather than one record.
    pub fn targets_kind(self) -> bool {
        matches!(self, Action::Create | Action::List)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view" => Ok(Action::View),
            "create" => Ok(Action::Create),
            "edit" => Ok(Action::Edit),
            "delete" => Ok(Action::Delete),
            "review" => Ok(Action::Review),
            "list" => Ok(Action::List),
            _ => Err(AuthzError::InvalidAction(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Action;

    #[test]
    fn action_string_roundtrip() {
        for action in Action::ALL {
            let as_str = action.as_str();
            assert_eq!(as_str.parse::<Action>().ok(), Some(action));
            assert_eq!(action.to_string(), as_str);
        }
    }

    #[test]
    fn action_from_str_invalid() {
        assert!("approve".parse::<Action>().is_err());
    }

    #[test]
    fn only_create_and_list_target_kinds() {
        let kinds: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|action| action.targets_kind())
            .collect();
        assert_eq!(kinds, vec![Action::Create, Action::List]);
    }
}
