use std::sync::Arc;

use tracing::info;

use crate::core::traits::{Page, Repository};
use crate::core::{AppError, Result};
use crate::modules::processes::models::{CreateProcessRequest, Process, UpdateProcessRequest};

/// Service for process business logic
pub struct ProcessService {
    repository: Arc<dyn Repository<Process, i64>>,
}

impl ProcessService {
    pub fn new(repository: Arc<dyn Repository<Process, i64>>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateProcessRequest) -> Result<Process> {
        let process = Process::new(request.name, request.description);
        process.validate()?;

        let created = self.repository.create(process).await?;
        info!(process_id = created.id, name = %created.name, "Process created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Process> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("process not found"))
    }

    pub async fn list(&self, page: Page) -> Result<Vec<Process>> {
        self.repository.list(page).await
    }

    /// Apply the non-empty fields of `request` to an existing process
    pub async fn update(&self, id: i64, request: UpdateProcessRequest) -> Result<Process> {
        let mut process = self.get(id).await?;

        if !request.name.is_empty() {
            process.rename(request.name)?;
        }
        if !request.description.is_empty() {
            process.description = request.description;
        }
        process.validate()?;

        let updated = self.repository.update(id, process).await?;
        info!(process_id = id, "Process updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        // Existence check first so a missing process reports 404, not a DB error
        self.get(id).await?;
        self.repository.delete(id).await?;
        info!(process_id = id, "Process deleted");
        Ok(())
    }
}
