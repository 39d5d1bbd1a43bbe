//! Common repository traits
//!
//! This module defines generic interfaces for database operations. They are
//! declared through `async_trait` so that the returned futures are `Send` and
//! the services holding them can be shared across axum handlers.

use super::RepositoryResult;
use crate::dtos::{CreateEmployeeDTO, CreateRoleDTO};
use crate::entities::{Employee, Role};
use async_trait::async_trait;

/// Trait for creating new entities in the database
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the database)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
#[async_trait]
pub trait Create<Entity, CreateDTO> {
    /// Creates a new entity in the database
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with ID assigned by the database
    /// * `Err(RepositoryError)` - Error during insertion
    async fn create(&self, data: &CreateDTO) -> RepositoryResult<Entity>;
}

/// Trait for reading a single entity by primary key
#[async_trait]
pub trait Read<Entity, Id> {
    /// Reads an entity from the database by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    /// * `Err(RepositoryError)` - Error during reading
    async fn read(&self, id: &Id) -> RepositoryResult<Option<Entity>>;
}

/// Trait for reading multiple entities by list of primary keys
#[async_trait]
pub trait ReadMany<Entity, Id> {
    /// Reads every entity whose key is in `ids`
    ///
    /// # Returns
    /// * `Ok(Vec<Entity>)` - Found entities ordered by key; missing ids are omitted
    /// * `Err(RepositoryError::EmptyArgument)` - `ids` was empty, nothing was queried
    async fn read_many(&self, ids: &[Id]) -> RepositoryResult<Vec<Entity>>;
}

/// Trait for reading a whole table, ordered by primary key
#[async_trait]
pub trait ReadAll<Entity> {
    async fn read_all(&self) -> RepositoryResult<Vec<Entity>>;
}

/// Trait for deleting entities
#[async_trait]
pub trait Delete<Id> {
    /// Deletes an entity from the database
    ///
    /// # Returns
    /// * `Ok(true)` - A row was removed
    /// * `Ok(false)` - No row had that key (not an error)
    /// * `Err(RepositoryError)` - Error during deletion
    async fn delete(&self, id: &Id) -> RepositoryResult<bool>;
}

/// Trait for deleting a set of entities in one statement
#[async_trait]
pub trait DeleteMany<Id> {
    /// # Returns
    /// * `Ok(Vec<Id>)` - Exactly the keys that were removed, a subset of `ids`
    /// * `Err(RepositoryError::EmptyArgument)` - `ids` was empty, nothing was queried
    async fn delete_many(&self, ids: &[Id]) -> RepositoryResult<Vec<Id>>;
}

/// Transaction lifecycle primitives.
///
/// `commit` and `rollback` take the handle by value: once one of them has been
/// called the transaction can no longer be used. A handle dropped without
/// either must roll back.
#[async_trait]
pub trait Transactional {
    type Tx: Send;

    async fn begin_transaction(&self) -> RepositoryResult<Self::Tx>;
    async fn commit(&self, tx: Self::Tx) -> RepositoryResult<()>;
    async fn rollback(&self, tx: Self::Tx) -> RepositoryResult<()>;
}

/// Everything the employee service needs from storage
#[async_trait]
pub trait EmployeeRepo:
    Transactional
    + Read<Employee, i64>
    + ReadMany<Employee, i64>
    + ReadAll<Employee>
    + Delete<i64>
    + DeleteMany<i64>
    + Send
    + Sync
{
    /// Existence of a row with this exact (name, surname), seen from inside `tx`
    async fn exists_by_name_and_surname(
        &self,
        tx: &mut Self::Tx,
        name: &str,
        surname: &str,
    ) -> RepositoryResult<bool>;

    /// Inserts within `tx` and returns the generated id
    async fn insert(&self, tx: &mut Self::Tx, data: &CreateEmployeeDTO) -> RepositoryResult<i64>;

    /// One page ordered by id plus the number of rows matching `filter`.
    ///
    /// `filter` is a case-insensitive substring of `name`; the page and the
    /// count share the same predicate. `None` or `""` matches every row.
    async fn find_page(
        &self,
        limit: i64,
        offset: i64,
        filter: Option<&str>,
    ) -> RepositoryResult<(Vec<Employee>, i64)>;
}

/// Everything the role service needs from storage
pub trait RoleRepo:
    Create<Role, CreateRoleDTO>
    + Read<Role, i64>
    + ReadMany<Role, i64>
    + ReadAll<Role>
    + Delete<i64>
    + DeleteMany<i64>
    + Send
    + Sync
{
}

impl<T> RoleRepo for T where
    T: Create<Role, CreateRoleDTO>
        + Read<Role, i64>
        + ReadMany<Role, i64>
        + ReadAll<Role>
        + Delete<i64>
        + DeleteMany<i64>
        + Send
        + Sync
{
}
