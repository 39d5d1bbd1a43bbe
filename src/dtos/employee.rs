//! Employee DTOs - Data Transfer Objects for employees

use crate::entities::Employee;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Employee as exposed to clients.
///
/// Bulk deletion answers with id-only values, so every field is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeDTO {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub age: Option<i16>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl EmployeeDTO {
    /// Id-only projection, used to report deleted rows
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl From<Employee> for EmployeeDTO {
    fn from(value: Employee) -> Self {
        Self {
            id: Some(value.id),
            name: Some(value.name),
            surname: Some(value.surname),
            age: Some(value.age),
            created_at: Some(value.created_at),
            updated_at: Some(value.updated_at),
        }
    }
}

/// Body of `POST /api/v1/employees`.
///
/// Missing fields deserialize to empty values so that they surface as
/// validation errors rather than as body parsing failures.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 155, message = "name must be between 2 and 155 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 2, max = 155, message = "surname must be between 2 and 155 characters"))]
    pub surname: String,

    // same bounds as the table CHECK (age > 16 AND age < 91)
    #[serde(default)]
    #[validate(range(min = 17, max = 90, message = "age must be between 17 and 90"))]
    pub age: i16,

    #[validate(required(message = "created_at is required"))]
    pub created_at: Option<DateTime<Utc>>,

    #[validate(required(message = "updated_at is required"))]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row to insert (no id, assigned by the database)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateEmployeeDTO {
    pub name: String,
    pub surname: String,
    pub age: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CreateEmployeeRequest> for CreateEmployeeDTO {
    // timestamps are enforced by validation; `now` only covers unvalidated callers
    fn from(value: CreateEmployeeRequest) -> Self {
        let now = Utc::now();
        Self {
            name: value.name,
            surname: value.surname,
            age: value.age,
            created_at: value.created_at.unwrap_or(now),
            updated_at: value.updated_at.unwrap_or(now),
        }
    }
}

impl From<&Employee> for CreateEmployeeDTO {
    // an omitted timestamp deserializes to the epoch; store the insertion time instead
    fn from(value: &Employee) -> Self {
        let now = Utc::now();
        let or_now = |at: DateTime<Utc>| if at == DateTime::<Utc>::UNIX_EPOCH { now } else { at };
        Self {
            name: value.name.clone(),
            surname: value.surname.clone(),
            age: value.age,
            created_at: or_now(value.created_at),
            updated_at: or_now(value.updated_at),
        }
    }
}

impl CreateEmployeeDTO {
    /// Builds the stored entity once the database has assigned `id`
    pub fn into_entity(self, id: i64) -> Employee {
        Employee {
            id,
            name: self.name,
            surname: self.surname,
            age: self.age,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            name: "John".to_string(),
            surname: "Doe".to_string(),
            age: 25,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_name_length_bounds() {
        let mut request = valid_request();
        request.name = "J".to_string();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        request.name = "x".repeat(156);
        assert!(request.validate().is_err());

        request.name = "x".repeat(155);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_age_boundaries() {
        let mut request = valid_request();
        for (age, ok) in [(16, false), (17, true), (90, true), (91, false)] {
            request.age = age;
            assert_eq!(request.validate().is_ok(), ok, "age {age}");
        }
    }

    #[test]
    fn test_missing_fields_become_validation_errors() {
        let request: CreateEmployeeRequest = serde_json::from_value(json!({})).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("surname"));
        assert!(fields.contains_key("age"));
        assert!(fields.contains_key("created_at"));
        assert!(fields.contains_key("updated_at"));
    }

    #[test]
    fn test_entity_without_timestamps_gets_insertion_time() {
        let entity: Employee =
            serde_json::from_value(json!({"name": "Carla", "surname": "Verdi", "age": 40})).unwrap();
        let before = Utc::now();

        let data = CreateEmployeeDTO::from(&entity);

        assert!(data.created_at >= before);
        assert_eq!(data.created_at, data.updated_at);
    }

    #[test]
    fn test_entity_timestamps_are_kept() {
        let at = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let entity = Employee {
            name: "Carla".to_string(),
            surname: "Verdi".to_string(),
            age: 40,
            created_at: at,
            updated_at: at,
            ..Employee::default()
        };

        let data = CreateEmployeeDTO::from(&entity);

        assert_eq!(data.created_at, at);
        assert_eq!(data.updated_at, at);
    }

    #[test]
    fn test_deleted_projection_carries_only_id() {
        let dto = EmployeeDTO::with_id(7);
        assert_eq!(dto.id, Some(7));
        assert!(dto.name.is_none());
        assert!(dto.created_at.is_none());
    }
}
