//! Role DTOs - Data Transfer Objects for roles

use crate::entities::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDTO {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RoleDTO {
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl From<Role> for RoleDTO {
    fn from(value: Role) -> Self {
        Self {
            id: Some(value.id),
            name: Some(value.name),
            created_at: Some(value.created_at),
            updated_at: Some(value.updated_at),
        }
    }
}

/// Body of `POST /api/v1/roles`; timestamps default to the time of insertion
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct CreateRoleRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 155, message = "name must be between 1 and 155 characters"))]
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleDTO {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CreateRoleRequest> for CreateRoleDTO {
    fn from(value: CreateRoleRequest) -> Self {
        let now = Utc::now();
        Self {
            name: value.name,
            created_at: value.created_at.unwrap_or(now),
            updated_at: value.updated_at.unwrap_or(now),
        }
    }
}

impl CreateRoleDTO {
    pub fn into_entity(self, id: i64) -> Role {
        Role {
            id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
