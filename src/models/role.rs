//! Role domain models

use crate::models::form::{FieldKind, FieldView, FormView};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Upper bound on role name length
pub const MAX_ROLE_NAME_CHARS: usize = 64;

/// Permission mapping of a role (INI keys inside the role's section)
pub type RoleValues = BTreeMap<String, String>;

/// Role as stored in roles.ini
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub values: RoleValues,
}

/// Create/update role request (form submit)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RoleRequest {
    #[serde(default)]
    #[validate(length(max = 64, message = "Role name must be at most 64 characters"))]
    pub name: String,
    #[serde(default)]
    pub values: RoleValues,
}

impl RoleRequest {
    /// Trimmed name plus values with blank keys/values dropped
    pub fn normalized(&self) -> (String, RoleValues) {
        let values = self
            .values
            .iter()
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty() && k != "name")
            .collect();
        (self.name.trim().to_string(), values)
    }
}

/// Editable representation of a role
#[derive(Debug, Clone, Serialize)]
pub struct RoleForm {
    pub name: String,
    pub values: RoleValues,
}

impl RoleForm {
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            values: RoleValues::new(),
        }
    }

    pub fn from_role(role: Role) -> Self {
        Self {
            name: role.name,
            values: role.values,
        }
    }

    /// Build the view with the given submit label
    pub fn to_view(&self, submit_label: &str) -> FormView {
        let mut form = FormView::new("form_role", submit_label);
        form.push(
            FieldView::new("name", "Role Name", FieldKind::Text, self.name.clone()).required(true),
        );
        for (key, value) in &self.values {
            form.push(FieldView::new(key, key, FieldKind::Text, value.clone()));
        }
        form
    }
}

/// Role list entry for the overview page
#[derive(Debug, Serialize)]
pub struct RoleSummary {
    pub name: String,
    pub values: RoleValues,
}

impl From<Role> for RoleSummary {
    fn from(role: Role) -> Self {
        Self {
            name: role.name,
            values: role.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_drops_blank_values() {
        let mut values = RoleValues::new();
        values.insert(" users ".to_string(), " alice ".to_string());
        values.insert("groups".to_string(), "   ".to_string());
        values.insert("name".to_string(), "sneaky".to_string());
        let req = RoleRequest {
            name: "  admins ".to_string(),
            values,
        };

        let (name, values) = req.normalized();
        assert_eq!(name, "admins");
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("users").map(String::as_str), Some("alice"));
    }

    #[test]
    fn test_name_length_validation() {
        let req = RoleRequest {
            name: "x".repeat(MAX_ROLE_NAME_CHARS + 1),
            values: RoleValues::new(),
        };
        assert!(req.validate().is_err());

        let ok = RoleRequest {
            name: "x".repeat(MAX_ROLE_NAME_CHARS),
            values: RoleValues::new(),
        };
        assert!(ok.validate().is_ok());
    }
}
