//! Employee service - creation workflow, lookup, pagination and deletion

use super::error::repository_error;
use super::{QueryDeadlines, ServiceError, ServiceResult, with_deadline};
use crate::dtos::{CreateEmployeeDTO, CreateEmployeeRequest, EmployeeDTO, PageRequest, PageResponse};
use crate::entities::Employee;
use crate::entities::employee::{MAX_AGE, MIN_AGE};
use crate::repositories::{
    Delete, DeleteMany, EmployeeRepo, Read, ReadAll, ReadMany, Transactional,
};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

type TxOf<R> = <R as Transactional>::Tx;

/// Employee operations exposed to the HTTP layer
#[async_trait]
pub trait EmployeeOps: Send + Sync {
    /// Validates the request, then inserts it unless an employee with the
    /// same (name, surname) exists. Returns the new id.
    async fn create_employee(&self, request: CreateEmployeeRequest) -> ServiceResult<i64>;

    /// Same workflow as [`EmployeeOps::create_employee`] for a full entity.
    /// The incoming id is ignored.
    async fn add(&self, employee: Employee) -> ServiceResult<EmployeeDTO>;

    async fn find_by_id(&self, id: i64) -> ServiceResult<EmployeeDTO>;
    async fn find_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<EmployeeDTO>>;
    async fn find_all(&self) -> ServiceResult<Vec<EmployeeDTO>>;
    async fn find_page(&self, request: PageRequest) -> ServiceResult<PageResponse>;

    /// Deletes one employee; `NotFound` when no row had that id
    async fn delete_by_id(&self, id: i64) -> ServiceResult<EmployeeDTO>;

    /// Deletes a set of employees and returns id-only DTOs for the rows
    /// actually removed
    async fn delete_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<EmployeeDTO>>;
}

pub struct EmployeeService<R> {
    repo: R,
    deadlines: QueryDeadlines,
}

impl<R: EmployeeRepo> EmployeeService<R> {
    pub fn new(repo: R, deadlines: QueryDeadlines) -> Self {
        Self { repo, deadlines }
    }

    /// Check-then-insert inside one transaction.
    ///
    /// The transaction ends exactly once: committed on success, rolled back
    /// on any error or panic raised between begin and commit.
    async fn create_unique(&self, data: &CreateEmployeeDTO) -> ServiceResult<i64> {
        let mut tx = self
            .repo
            .begin_transaction()
            .await
            .map_err(ServiceError::TransactionBegin)?;

        let outcome = AssertUnwindSafe(self.insert_if_absent(&mut tx, data))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(id)) => {
                // a panicking commit has already consumed the handle; dropping
                // an unfinished sqlx transaction rolls it back
                match AssertUnwindSafe(self.repo.commit(tx)).catch_unwind().await {
                    Ok(Ok(())) => {
                        info!("Employee created with id {}", id);
                        Ok(id)
                    }
                    Ok(Err(err)) => {
                        error!("Commit failed after inserting employee {}: {}", id, err);
                        Err(ServiceError::Commit(err))
                    }
                    Err(payload) => {
                        let message = panic_message(&*payload);
                        error!("Commit panicked: {}", message);
                        Err(ServiceError::Panicked(message))
                    }
                }
            }
            Ok(Err(err)) => Err(self.abort(tx, err).await),
            Err(payload) => {
                let message = panic_message(&*payload);
                error!("Employee creation panicked: {}", message);
                Err(self.abort(tx, ServiceError::Panicked(message)).await)
            }
        }
    }

    async fn insert_if_absent(
        &self,
        tx: &mut TxOf<R>,
        data: &CreateEmployeeDTO,
    ) -> ServiceResult<i64> {
        let exists = self
            .repo
            .exists_by_name_and_surname(tx, &data.name, &data.surname)
            .await
            .map_err(repository_error(format!(
                "checking existence of employee '{} {}'",
                data.name, data.surname
            )))?;

        if exists {
            warn!("Employee '{} {}' already exists", data.name, data.surname);
            return Err(ServiceError::AlreadyExists {
                name: data.name.clone(),
                surname: data.surname.clone(),
            });
        }

        self.repo
            .insert(tx, data)
            .await
            .map_err(|source| ServiceError::Insert {
                name: data.name.clone(),
                surname: data.surname.clone(),
                source,
            })
    }

    /// Rolls back and returns the error to report. A failed rollback wraps
    /// the original cause.
    async fn abort(&self, tx: TxOf<R>, cause: ServiceError) -> ServiceError {
        match self.repo.rollback(tx).await {
            Ok(()) => {
                debug!("Transaction rolled back: {}", cause);
                cause
            }
            Err(source) => {
                error!("Rollback failed: {} (cause: {})", source, cause);
                ServiceError::Rollback {
                    cause: Box::new(cause),
                    source,
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn validate_id(id: i64) -> ServiceResult<()> {
    if id <= 0 {
        return Err(ServiceError::Validation(format!("wrong employee id: {id}")));
    }
    Ok(())
}

fn validate_entity(employee: &Employee) -> ServiceResult<()> {
    if employee.is_empty() {
        return Err(ServiceError::Validation("employee is empty".to_string()));
    }
    let mut problems = Vec::new();
    if employee.name.is_empty() {
        problems.push("name must not be empty".to_string());
    }
    if employee.surname.is_empty() {
        problems.push("surname must not be empty".to_string());
    }
    if !employee.has_valid_age() {
        problems.push(format!("age must be between {MIN_AGE} and {MAX_AGE}"));
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(problems.join(", ")))
    }
}

#[async_trait]
impl<R: EmployeeRepo> EmployeeOps for EmployeeService<R> {
    #[instrument(skip(self, request), fields(name = %request.name, surname = %request.surname))]
    async fn create_employee(&self, request: CreateEmployeeRequest) -> ServiceResult<i64> {
        request.validate()?;
        let data = CreateEmployeeDTO::from(request);
        self.create_unique(&data).await
    }

    #[instrument(skip(self, employee), fields(name = %employee.name, surname = %employee.surname))]
    async fn add(&self, employee: Employee) -> ServiceResult<EmployeeDTO> {
        validate_entity(&employee)?;
        let data = CreateEmployeeDTO::from(&employee);
        let id = self.create_unique(&data).await?;
        Ok(EmployeeDTO::from(data.into_entity(id)))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> ServiceResult<EmployeeDTO> {
        validate_id(id)?;
        self.repo
            .read(&id)
            .await
            .map_err(repository_error(format!("finding employee with id {id}")))?
            .map(EmployeeDTO::from)
            .ok_or_else(|| ServiceError::NotFound(format!("employee with id {id}")))
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<EmployeeDTO>> {
        if ids.is_empty() {
            return Err(ServiceError::EmptyArgument("employee ids"));
        }
        let employees = self
            .repo
            .read_many(ids)
            .await
            .map_err(repository_error(format!("finding employees with ids {ids:?}")))?;
        debug!("Found {} of {} requested employees", employees.len(), ids.len());
        Ok(employees.into_iter().map(EmployeeDTO::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> ServiceResult<Vec<EmployeeDTO>> {
        let employees = with_deadline("find_all", self.deadlines.find_all, self.repo.read_all())
            .await?
            .map_err(repository_error("finding all employees"))?;
        Ok(employees.into_iter().map(EmployeeDTO::from).collect())
    }

    #[instrument(skip(self), fields(page = request.page_number, size = request.page_size))]
    async fn find_page(&self, request: PageRequest) -> ServiceResult<PageResponse> {
        request.validate()?;
        let filter = request.text_filter.as_deref();
        let (employees, total) = with_deadline(
            "find_page",
            self.deadlines.find_page,
            self.repo.find_page(request.page_size, request.offset(), filter),
        )
        .await?
        .map_err(repository_error(format!(
            "finding employees page {} of size {} with filter {:?}",
            request.page_number, request.page_size, filter
        )))?;

        Ok(PageResponse {
            result: employees.into_iter().map(EmployeeDTO::from).collect(),
            page_size: request.page_size,
            page_num: request.page_number,
            total,
            text_filter: request.text_filter,
        })
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> ServiceResult<EmployeeDTO> {
        validate_id(id)?;
        let deleted = self
            .repo
            .delete(&id)
            .await
            .map_err(repository_error(format!("deleting employee with id {id}")))?;
        if !deleted {
            return Err(ServiceError::NotFound(format!("employee with id {id}")));
        }
        info!("Employee {} deleted", id);
        Ok(EmployeeDTO::with_id(id))
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn delete_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<EmployeeDTO>> {
        if ids.is_empty() {
            return Err(ServiceError::EmptyArgument("employee ids"));
        }
        let deleted = self
            .repo
            .delete_many(ids)
            .await
            .map_err(repository_error(format!("deleting employees with ids {ids:?}")))?;
        info!("Deleted {} of {} requested employees", deleted.len(), ids.len());
        Ok(deleted.into_iter().map(EmployeeDTO::with_id).collect())
    }
}
