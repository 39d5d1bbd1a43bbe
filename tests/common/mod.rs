#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use idm::core::{AppState, IdmRole, encode_jwt};
use idm::dtos::{CreateEmployeeDTO, CreateRoleDTO};
use idm::entities::{Employee, Role};
use idm::repositories::{
    Create, Delete, DeleteMany, EmployeeRepo, HealthCheck, Read, ReadAll, ReadMany,
    RepositoryError, RepositoryResult, Transactional,
};
use idm::services::{EmployeeService, QueryDeadlines, RoleService};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";
pub const TEST_APP_NAME: &str = "idm-test";
pub const TEST_APP_VERSION: &str = "1.0.0";

#[derive(Default)]
struct EmployeeStore {
    rows: Vec<Employee>,
    next_id: i64,
}

/// Employee storage held in memory.
///
/// Inserts are staged on the transaction and only become visible to other
/// callers on commit, like a PostgreSQL transaction at READ COMMITTED.
#[derive(Default)]
pub struct InMemoryEmployees {
    store: Mutex<EmployeeStore>,
    /// Added before every listing query, to exercise deadlines
    delay: Option<Duration>,
}

pub struct StagedTx {
    staged: Vec<Employee>,
}

impl InMemoryEmployees {
    /// Same rows as `fixtures/employees.sql`
    pub fn seeded() -> Self {
        let repo = Self::default();
        {
            let mut store = repo.store.lock().unwrap();
            let people = [
                ("Name_1", "Surname_1", 25),
                ("Name_2", "Surname_2", 31),
                ("Name_3", "Surname_3", 44),
                ("Name_4", "Surname_4", 52),
                ("Name_5", "Surname_5", 60),
                ("Alice", "Rossi", 29),
                ("Bob", "Bianchi", 38),
            ];
            let now = Utc::now();
            for (name, surname, age) in people {
                store.next_id += 1;
                let id = store.next_id;
                store.rows.push(Employee {
                    id,
                    name: name.to_string(),
                    surname: surname.to_string(),
                    age,
                    created_at: now,
                    updated_at: now,
                });
            }
        }
        repo
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Transactional for InMemoryEmployees {
    type Tx = StagedTx;

    async fn begin_transaction(&self) -> RepositoryResult<StagedTx> {
        Ok(StagedTx { staged: Vec::new() })
    }

    async fn commit(&self, tx: StagedTx) -> RepositoryResult<()> {
        self.store.lock().unwrap().rows.extend(tx.staged);
        Ok(())
    }

    async fn rollback(&self, _tx: StagedTx) -> RepositoryResult<()> {
        Ok(())
    }
}

#[async_trait]
impl Read<Employee, i64> for InMemoryEmployees {
    async fn read(&self, id: &i64) -> RepositoryResult<Option<Employee>> {
        let store = self.store.lock().unwrap();
        Ok(store.rows.iter().find(|e| e.id == *id).cloned())
    }
}

#[async_trait]
impl ReadMany<Employee, i64> for InMemoryEmployees {
    async fn read_many(&self, ids: &[i64]) -> RepositoryResult<Vec<Employee>> {
        if ids.is_empty() {
            return Err(RepositoryError::EmptyArgument("employee ids"));
        }
        let store = self.store.lock().unwrap();
        Ok(store.rows.iter().filter(|e| ids.contains(&e.id)).cloned().collect())
    }
}

#[async_trait]
impl ReadAll<Employee> for InMemoryEmployees {
    async fn read_all(&self) -> RepositoryResult<Vec<Employee>> {
        self.wait().await;
        Ok(self.store.lock().unwrap().rows.clone())
    }
}

#[async_trait]
impl Delete<i64> for InMemoryEmployees {
    async fn delete(&self, id: &i64) -> RepositoryResult<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.rows.len();
        store.rows.retain(|e| e.id != *id);
        Ok(store.rows.len() < before)
    }
}

#[async_trait]
impl DeleteMany<i64> for InMemoryEmployees {
    async fn delete_many(&self, ids: &[i64]) -> RepositoryResult<Vec<i64>> {
        if ids.is_empty() {
            return Err(RepositoryError::EmptyArgument("employee ids"));
        }
        let mut store = self.store.lock().unwrap();
        let removed = store
            .rows
            .iter()
            .map(|e| e.id)
            .filter(|id| ids.contains(id))
            .collect();
        store.rows.retain(|e| !ids.contains(&e.id));
        Ok(removed)
    }
}

#[async_trait]
impl EmployeeRepo for InMemoryEmployees {
    async fn exists_by_name_and_surname(
        &self,
        tx: &mut StagedTx,
        name: &str,
        surname: &str,
    ) -> RepositoryResult<bool> {
        let same = |e: &Employee| e.name == name && e.surname == surname;
        let store = self.store.lock().unwrap();
        Ok(store.rows.iter().any(same) || tx.staged.iter().any(same))
    }

    async fn insert(&self, tx: &mut StagedTx, data: &CreateEmployeeDTO) -> RepositoryResult<i64> {
        let id = {
            let mut store = self.store.lock().unwrap();
            store.next_id += 1;
            store.next_id
        };
        tx.staged.push(data.clone().into_entity(id));
        Ok(id)
    }

    async fn find_page(
        &self,
        limit: i64,
        offset: i64,
        filter: Option<&str>,
    ) -> RepositoryResult<(Vec<Employee>, i64)> {
        self.wait().await;
        let needle = filter.unwrap_or_default().to_lowercase();
        let store = self.store.lock().unwrap();
        let matching: Vec<Employee> = store
            .rows
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }
}

/// Role storage held in memory
#[derive(Default)]
pub struct InMemoryRoles {
    rows: Mutex<Vec<Role>>,
}

#[async_trait]
impl Create<Role, CreateRoleDTO> for InMemoryRoles {
    async fn create(&self, data: &CreateRoleDTO) -> RepositoryResult<Role> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let role = data.clone().into_entity(id);
        rows.push(role.clone());
        Ok(role)
    }
}

#[async_trait]
impl Read<Role, i64> for InMemoryRoles {
    async fn read(&self, id: &i64) -> RepositoryResult<Option<Role>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == *id).cloned())
    }
}

#[async_trait]
impl ReadMany<Role, i64> for InMemoryRoles {
    async fn read_many(&self, ids: &[i64]) -> RepositoryResult<Vec<Role>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|r| ids.contains(&r.id)).cloned().collect())
    }
}

#[async_trait]
impl ReadAll<Role> for InMemoryRoles {
    async fn read_all(&self) -> RepositoryResult<Vec<Role>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[async_trait]
impl Delete<i64> for InMemoryRoles {
    async fn delete(&self, id: &i64) -> RepositoryResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != *id);
        Ok(rows.len() < before)
    }
}

#[async_trait]
impl DeleteMany<i64> for InMemoryRoles {
    async fn delete_many(&self, ids: &[i64]) -> RepositoryResult<Vec<i64>> {
        let mut rows = self.rows.lock().unwrap();
        let removed = rows
            .iter()
            .map(|r| r.id)
            .filter(|id| ids.contains(id))
            .collect();
        rows.retain(|r| !ids.contains(&r.id));
        Ok(removed)
    }
}

/// Health probe with a fixed answer
pub struct StaticHealth(pub bool);

#[async_trait]
impl HealthCheck for StaticHealth {
    async fn ping(&self) -> RepositoryResult<()> {
        if self.0 {
            Ok(())
        } else {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        }
    }
}

/// Creates an AppState over in-memory storage
///
/// # Arguments
/// * `employees` - Employee storage, see [`InMemoryEmployees::seeded`]
/// * `deadlines` - Listing deadlines applied by the employee service
/// * `healthy` - Answer of the database probe
pub fn create_test_state_with(
    employees: InMemoryEmployees,
    deadlines: QueryDeadlines,
    healthy: bool,
) -> Arc<AppState> {
    Arc::new(AppState {
        employees: Arc::new(EmployeeService::new(employees, deadlines)),
        roles: Arc::new(RoleService::new(InMemoryRoles::default())),
        health: Arc::new(StaticHealth(healthy)),
        app_name: TEST_APP_NAME.to_string(),
        app_version: TEST_APP_VERSION.to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
    })
}

/// AppState with the fixture employees, default deadlines and a healthy database
pub fn create_test_state() -> Arc<AppState> {
    create_test_state_with(InMemoryEmployees::seeded(), QueryDeadlines::default(), true)
}

/// Creates a TestServer running the full router
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = idm::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Signs a token valid for one hour carrying `roles`
pub fn create_test_jwt(subject: &str, roles: &[IdmRole]) -> String {
    encode_jwt(subject, roles, TEST_JWT_SECRET, chrono::Duration::hours(1))
        .expect("Failed to create JWT token")
}

pub fn admin_token() -> String {
    create_test_jwt("admin", &[IdmRole::Admin])
}

pub fn user_token() -> String {
    create_test_jwt("user", &[IdmRole::User])
}
