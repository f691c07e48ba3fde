use serde::{Deserialize, Serialize};

// Roles as stored in the users.role column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole{
    Customer,
    Staff,
    Admin
}

impl UserRole{
    pub fn parse(role: &str) -> Result<UserRole, String>{
        match role {
            "customer" => Ok(UserRole::Customer),
            "staff" => Ok(UserRole::Staff),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("{} is not a valid role", other))
        }
    }

    pub fn as_str(&self) -> &'static str{
        match self {
            UserRole::Customer => "customer",
            UserRole::Staff => "staff",
            UserRole::Admin => "admin"
        }
    }

    // Staff-level actions are open to admins too.
    pub fn is_staff_level(&self) -> bool{
        matches!(self, UserRole::Staff | UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
