use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::form_data::FormData;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read profile store {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse profile store {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no saved application with id '{0}'")]
    NotFound(String),

    #[error("application '{id}' is {status:?}, only approved applications can be used to fill")]
    NotApproved { id: String, status: ApplicationStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Approved,
    Pending,
    Draft,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// An application the user completed earlier, with the answers to reuse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedApplication {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub completeness: u8,
    #[serde(default)]
    pub form_data: FormData,
}

/// Either a bare list of applications or `{ applications: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoreFile {
    List(Vec<SavedApplication>),
    Wrapped { applications: Vec<SavedApplication> },
}

#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    pub applications: Vec<SavedApplication>,
}

impl ProfileStore {
    /// Load a store from YAML or JSON (JSON parses as YAML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: display.clone(),
            source: e,
        })?;

        Self::parse(&content).map_err(|e| StoreError::Parse {
            path: display,
            source: e,
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let applications = match serde_yaml::from_str::<StoreFile>(content)? {
            StoreFile::List(list) => list,
            StoreFile::Wrapped { applications } => applications,
        };
        Ok(Self { applications })
    }

    pub fn approved(&self) -> impl Iterator<Item = &SavedApplication> {
        self.applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Approved)
    }

    pub fn get(&self, id: &str) -> Option<&SavedApplication> {
        self.applications.iter().find(|a| a.id == id)
    }

    /// Profile answers for `id`, refusing applications that are not approved.
    pub fn form_data_for(&self, id: &str) -> Result<&FormData, StoreError> {
        let application = self
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if application.status != ApplicationStatus::Approved {
            return Err(StoreError::NotApproved {
                id: id.to_string(),
                status: application.status,
            });
        }

        Ok(&application.form_data)
    }
}

/// Read a flat profile (`key: value` map) from YAML or JSON.
pub fn load_profile(path: impl AsRef<Path>) -> Result<FormData, StoreError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: display.clone(),
        source: e,
    })?;

    serde_yaml::from_str(&content).map_err(|e| StoreError::Parse {
        path: display,
        source: e,
    })
}
