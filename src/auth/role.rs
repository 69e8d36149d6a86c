use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff roles, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Lexicographer,
    Editor,
    Admin,
    Superadmin,
}

impl Role {
    /// Every role that may open editor mode.
    pub const EDITOR_ROLES: [Role; 4] = [Role::Lexicographer, Role::Editor, Role::Admin, Role::Superadmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Lexicographer => "lexicographer",
            Role::Editor => "editor",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    pub fn is_editor_role(&self) -> bool {
        Self::EDITOR_ROLES.contains(self)
    }

    pub fn can_edit_any(&self) -> bool {
        *self >= Role::Editor
    }

    pub fn can_review(&self) -> bool {
        *self >= Role::Editor
    }

    pub fn can_publish(&self) -> bool {
        *self >= Role::Editor
    }

    pub fn can_assign(&self) -> bool {
        *self >= Role::Editor
    }

    pub fn can_delete_words(&self) -> bool {
        *self >= Role::Admin
    }

    pub fn can_manage_users(&self) -> bool {
        *self >= Role::Admin
    }

    /// Managers act on roles strictly below their own; a superadmin acts on anyone.
    pub fn can_manage_role(&self, target: Role) -> bool {
        match self {
            Role::Superadmin => true,
            role if role.can_manage_users() => target < *role,
            _ => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicographer" => Ok(Role::Lexicographer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privileges_grow_with_role() {
        assert!(!Role::Lexicographer.can_edit_any());
        assert!(Role::Editor.can_publish());
        assert!(!Role::Editor.can_delete_words());
        assert!(Role::Admin.can_manage_users());
    }

    #[test]
    fn managers_only_act_below_themselves() {
        assert!(Role::Admin.can_manage_role(Role::Editor));
        assert!(!Role::Admin.can_manage_role(Role::Admin));
        assert!(!Role::Admin.can_manage_role(Role::Superadmin));
        assert!(Role::Superadmin.can_manage_role(Role::Superadmin));
        assert!(!Role::Editor.can_manage_role(Role::Lexicographer));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
    }
}
