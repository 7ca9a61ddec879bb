use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::AppError;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;

/// Manufacturing process step (dyeing, finishing, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Process {
    /// New, unsaved process; the ID is assigned on insert
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), AppError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::validation("process name cannot be empty"));
    }

    let chars = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        return Err(AppError::validation(format!(
            "process name must be between {} and {} characters",
            NAME_MIN_CHARS, NAME_MAX_CHARS
        )));
    }

    Ok(())
}

/// Body of `POST /process`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcessRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /process/{id}`; empty fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcessRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}
