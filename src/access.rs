//! Role to visibility-rank mapping.
//!
//! Lower rank means more privilege: admin = 1, manager = 2, developer = 3.
//! A caller sees an entry when `entry.access >= caller_rank`, so admins see
//! everything, managers see manager- and developer-level entries, and
//! developers see only developer-level entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Visibility rank of the least privileged role, and the default for
/// ingested entries that do not carry one.
pub const LOWEST_PRIVILEGE_RANK: i16 = 3;
pub const HIGHEST_PRIVILEGE_RANK: i16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Developer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Developer => "developer",
        }
    }

    pub fn rank(&self) -> i16 {
        match self {
            Role::Admin => 1,
            Role::Manager => 2,
            Role::Developer => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "developer" => Ok(Role::Developer),
            other => Err(AppError::UnknownRole(other.to_string())),
        }
    }
}

pub fn rank_of(role: &str) -> Result<i16, AppError> {
    role.parse::<Role>().map(|r| r.rank())
}

pub fn is_visible(caller_rank: i16, entry_access: i16) -> bool {
    entry_access >= caller_rank
}

/// Pull an ingested rank into the range some role can see.
pub fn clamp_access(access: i64) -> i16 {
    access.clamp(HIGHEST_PRIVILEGE_RANK as i64, LOWEST_PRIVILEGE_RANK as i64) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rank_table() {
        assert_eq!(rank_of("admin").unwrap(), 1);
        assert_eq!(rank_of("manager").unwrap(), 2);
        assert_eq!(rank_of("developer").unwrap(), 3);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = rank_of("root").unwrap_err();
        assert!(matches!(err, AppError::UnknownRole(ref r) if r == "root"));
        assert!(rank_of("Admin").is_err());
        assert!(rank_of("").is_err());
    }

    #[test]
    fn developer_cannot_see_admin_entries() {
        assert!(!is_visible(Role::Developer.rank(), 1));
        assert!(!is_visible(Role::Developer.rank(), 2));
        assert!(is_visible(Role::Developer.rank(), 3));
    }

    #[test]
    fn admin_sees_everything() {
        for access in 1..=3 {
            assert!(is_visible(Role::Admin.rank(), access));
        }
    }

    #[test]
    fn visibility_is_monotonic_in_privilege() {
        let roles = [Role::Admin, Role::Manager, Role::Developer];
        for access in 1..=3 {
            for pair in roles.windows(2) {
                let (more, less) = (pair[0], pair[1]);
                if is_visible(less.rank(), access) {
                    assert!(is_visible(more.rank(), access));
                }
            }
        }
    }

    #[test]
    fn out_of_range_access_is_clamped() {
        assert_eq!(clamp_access(0), 1);
        assert_eq!(clamp_access(-4), 1);
        assert_eq!(clamp_access(2), 2);
        assert_eq!(clamp_access(9), 3);
    }

    #[test]
    fn role_serde_is_lowercase() {
        assert_eq!(serde_json::to_value(Role::Manager).unwrap(), "manager");
        let role: Role = serde_json::from_value(serde_json::json!("admin")).unwrap();
        assert_eq!(role, Role::Admin);
    }
}
