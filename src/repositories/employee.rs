//! EmployeeRepository - PostgreSQL storage for employees

use super::{
    Delete, DeleteMany, EmployeeRepo, Read, ReadAll, ReadMany, RepositoryError,
    RepositoryResult, Transactional,
};
use crate::dtos::CreateEmployeeDTO;
use crate::entities::Employee;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument};

const SELECT_EMPLOYEE: &str =
    "SELECT id, name, surname, age, created_at, updated_at FROM employee";

// shared by the page query and the count query, $1 is the ILIKE pattern or NULL
const NAME_FILTER: &str = "($1::text IS NULL OR name ILIKE $1)";

// EMPLOYEE REPOSITORY
pub struct EmployeeRepository {
    connection_pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

/// Turns a free-text filter into an `ILIKE` substring pattern.
///
/// LIKE metacharacters are escaped so the filter always matches literally;
/// an empty filter yields `None` (no filtering).
pub(crate) fn substring_pattern(filter: Option<&str>) -> Option<String> {
    let filter = filter.filter(|f| !f.is_empty())?;
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[async_trait]
impl Transactional for EmployeeRepository {
    type Tx = Transaction<'static, Postgres>;

    #[instrument(skip(self))]
    async fn begin_transaction(&self) -> RepositoryResult<Self::Tx> {
        debug!("Beginning transaction");
        Ok(self.connection_pool.begin().await?)
    }

    #[instrument(skip(self, tx))]
    async fn commit(&self, tx: Self::Tx) -> RepositoryResult<()> {
        tx.commit().await?;
        debug!("Transaction committed");
        Ok(())
    }

    #[instrument(skip(self, tx))]
    async fn rollback(&self, tx: Self::Tx) -> RepositoryResult<()> {
        tx.rollback().await?;
        debug!("Transaction rolled back");
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepo for EmployeeRepository {
    #[instrument(skip(self, tx))]
    async fn exists_by_name_and_surname(
        &self,
        tx: &mut Self::Tx,
        name: &str,
        surname: &str,
    ) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employee WHERE name = $1 AND surname = $2)",
        )
        .bind(name)
        .bind(surname)
        .fetch_one(&mut **tx)
        .await?;

        debug!(exists, "Checked employee existence");
        Ok(exists)
    }

    #[instrument(skip(self, tx, data), fields(name = %data.name, surname = %data.surname))]
    async fn insert(&self, tx: &mut Self::Tx, data: &CreateEmployeeDTO) -> RepositoryResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO employee (name, surname, age, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&data.name)
        .bind(&data.surname)
        .bind(data.age)
        .bind(data.created_at)
        .bind(data.updated_at)
        .fetch_one(&mut **tx)
        .await?;

        info!("Employee inserted with id {}", id);
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn find_page(
        &self,
        limit: i64,
        offset: i64,
        filter: Option<&str>,
    ) -> RepositoryResult<(Vec<Employee>, i64)> {
        let pattern = substring_pattern(filter);

        let page_query =
            format!("{SELECT_EMPLOYEE} WHERE {NAME_FILTER} ORDER BY id ASC LIMIT $2 OFFSET $3");
        let employees = sqlx::query_as::<_, Employee>(&page_query)
            .bind(pattern.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.connection_pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM employee WHERE {NAME_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(pattern.as_deref())
            .fetch_one(&self.connection_pool)
            .await?;

        debug!("Fetched {} of {} matching employees", employees.len(), total);
        Ok((employees, total))
    }
}

#[async_trait]
impl Read<Employee, i64> for EmployeeRepository {
    #[instrument(skip(self), fields(employee_id = %id))]
    async fn read(&self, id: &i64) -> RepositoryResult<Option<Employee>> {
        debug!("Reading employee by id");
        let employee = sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await?;

        if employee.is_none() {
            debug!("Employee not found");
        }
        Ok(employee)
    }
}

#[async_trait]
impl ReadMany<Employee, i64> for EmployeeRepository {
    #[instrument(skip(self), fields(count = ids.len()))]
    async fn read_many(&self, ids: &[i64]) -> RepositoryResult<Vec<Employee>> {
        if ids.is_empty() {
            return Err(RepositoryError::EmptyArgument("employee ids"));
        }
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "{SELECT_EMPLOYEE} WHERE id = ANY($1) ORDER BY id ASC"
        ))
        .bind(ids)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("Found {} of {} requested employees", employees.len(), ids.len());
        Ok(employees)
    }
}

#[async_trait]
impl ReadAll<Employee> for EmployeeRepository {
    #[instrument(skip(self))]
    async fn read_all(&self) -> RepositoryResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} ORDER BY id ASC"))
            .fetch_all(&self.connection_pool)
            .await?;
        Ok(employees)
    }
}

#[async_trait]
impl Delete<i64> for EmployeeRepository {
    #[instrument(skip(self), fields(employee_id = %id))]
    async fn delete(&self, id: &i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM employee WHERE id = $1")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Employee deleted");
        }
        Ok(deleted)
    }
}

#[async_trait]
impl DeleteMany<i64> for EmployeeRepository {
    #[instrument(skip(self), fields(count = ids.len()))]
    async fn delete_many(&self, ids: &[i64]) -> RepositoryResult<Vec<i64>> {
        if ids.is_empty() {
            return Err(RepositoryError::EmptyArgument("employee ids"));
        }
        let deleted = sqlx::query_scalar::<_, i64>(
            "DELETE FROM employee WHERE id = ANY($1) RETURNING id",
        )
        .bind(ids)
        .fetch_all(&self.connection_pool)
        .await?;

        info!("Deleted {} of {} requested employees", deleted.len(), ids.len());
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /*------------------------------------------- */
    /* Unit tests: substring_pattern              */
    /*------------------------------------------- */

    #[test]
    fn test_substring_pattern_wraps_filter() {
        assert_eq!(substring_pattern(Some("ali")), Some("%ali%".to_string()));
    }

    #[test]
    fn test_substring_pattern_escapes_like_metacharacters() {
        assert_eq!(substring_pattern(Some("name_")), Some("%name\\_%".to_string()));
        assert_eq!(substring_pattern(Some("50%")), Some("%50\\%%".to_string()));
        assert_eq!(substring_pattern(Some("a\\b")), Some("%a\\\\b%".to_string()));
    }

    #[test]
    fn test_substring_pattern_empty_means_no_filter() {
        assert_eq!(substring_pattern(None), None);
        assert_eq!(substring_pattern(Some("")), None);
    }

    /*------------------------------------------- */
    /* Database tests (need DATABASE_URL)         */
    /*------------------------------------------- */

    fn new_employee(name: &str, surname: &str) -> CreateEmployeeDTO {
        CreateEmployeeDTO {
            name: name.to_string(),
            surname: surname.to_string(),
            age: 25,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// The existence check runs on the transaction's connection
    #[sqlx::test]
    #[ignore = "requires PostgreSQL reachable through DATABASE_URL"]
    async fn test_exists_sees_rows_of_same_transaction(pool: PgPool) -> sqlx::Result<()> {
        let repo = EmployeeRepository::new(pool);
        let mut tx = repo.begin_transaction().await.unwrap();

        assert!(!repo.exists_by_name_and_surname(&mut tx, "John", "Doe").await.unwrap());
        let id = repo.insert(&mut tx, &new_employee("John", "Doe")).await.unwrap();
        assert!(repo.exists_by_name_and_surname(&mut tx, "John", "Doe").await.unwrap());
        repo.commit(tx).await.unwrap();

        let stored = repo.read(&id).await.unwrap().unwrap();
        assert_eq!(stored.name, "John");
        assert_eq!(stored.surname, "Doe");
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL reachable through DATABASE_URL"]
    async fn test_rollback_discards_insert(pool: PgPool) -> sqlx::Result<()> {
        let repo = EmployeeRepository::new(pool);
        let mut tx = repo.begin_transaction().await.unwrap();
        let id = repo.insert(&mut tx, &new_employee("Jane", "Roe")).await.unwrap();
        repo.rollback(tx).await.unwrap();

        assert!(repo.read(&id).await.unwrap().is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("employees")))]
    #[ignore = "requires PostgreSQL reachable through DATABASE_URL"]
    async fn test_find_page_filter_and_total(pool: PgPool) -> sqlx::Result<()> {
        let repo = EmployeeRepository::new(pool);

        let (first, total) = repo.find_page(3, 0, Some("name_")).await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(total, 5);

        let (second, total) = repo.find_page(3, 3, Some("name_")).await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(total, 5);
        assert!(first.last().unwrap().id < second.first().unwrap().id);

        let (beyond, total) = repo.find_page(3, 30, Some("name_")).await.unwrap();
        assert!(beyond.is_empty());
        assert_eq!(total, 5);

        let (_, unfiltered) = repo.find_page(100, 0, None).await.unwrap();
        assert_eq!(unfiltered, 7);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("employees")))]
    #[ignore = "requires PostgreSQL reachable through DATABASE_URL"]
    async fn test_pages_cover_every_row_once(pool: PgPool) -> sqlx::Result<()> {
        let repo = EmployeeRepository::new(pool);
        let all: Vec<i64> = repo.read_all().await.unwrap().into_iter().map(|e| e.id).collect();

        let mut paged = Vec::new();
        for page in 0..3 {
            let (rows, _) = repo.find_page(3, page * 3, None).await.unwrap();
            paged.extend(rows.into_iter().map(|e| e.id));
        }
        assert_eq!(paged, all);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("employees")))]
    #[ignore = "requires PostgreSQL reachable through DATABASE_URL"]
    async fn test_delete_is_idempotent(pool: PgPool) -> sqlx::Result<()> {
        let repo = EmployeeRepository::new(pool);

        assert!(repo.delete(&1).await.unwrap());
        assert!(!repo.delete(&1).await.unwrap());
        assert!(!repo.delete(&9999).await.unwrap());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("employees")))]
    #[ignore = "requires PostgreSQL reachable through DATABASE_URL"]
    async fn test_delete_many_returns_removed_subset(pool: PgPool) -> sqlx::Result<()> {
        let repo = EmployeeRepository::new(pool);

        let mut deleted = repo.delete_many(&[1, 2, 999]).await.unwrap();
        deleted.sort_unstable();
        assert_eq!(deleted, vec![1, 2]);
        assert!(repo.delete_many(&[1, 2, 999]).await.unwrap().is_empty());

        let found = repo.read_many(&[1, 3, 4]).await.unwrap();
        assert_eq!(found.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3, 4]);
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires PostgreSQL reachable through DATABASE_URL"]
    async fn test_empty_id_sets_are_rejected(pool: PgPool) -> sqlx::Result<()> {
        let repo = EmployeeRepository::new(pool);

        assert!(matches!(
            repo.delete_many(&[]).await,
            Err(RepositoryError::EmptyArgument(_))
        ));
        assert!(matches!(
            repo.read_many(&[]).await,
            Err(RepositoryError::EmptyArgument(_))
        ));
        Ok(())
    }
}
