use super::ConfigError;
use crate::path::join_paths;
use serde::{Deserialize, Serialize};

/// One remote-to-virtual-filesystem mapping
///
/// Either a single file (`from`, optionally renamed by `to_file`) or a list
/// of `files` found under `from`. Everything lands in `to_folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchDescriptor {
    #[serde(default)]
    pub from: String,
    #[serde(default = "default_to_folder")]
    pub to_folder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

fn default_to_folder() -> String {
    ".".to_string()
}

impl Default for FetchDescriptor {
    fn default() -> Self {
        Self {
            from: String::new(),
            to_folder: default_to_folder(),
            to_file: None,
            files: None,
        }
    }
}

impl FetchDescriptor {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            ..Self::default()
        }
    }

    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.to_folder = folder.into();
        self
    }

    pub fn rename_to(mut self, file: impl Into<String>) -> Self {
        self.to_file = Some(file.into());
        self
    }

    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.files.is_some() && self.to_file.is_some() {
            return Err(ConfigError::FilesWithToFile);
        }
        if self.files.is_none() && self.to_file.is_none() && self.from.ends_with('/') {
            return Err(ConfigError::UndeterminedFilename(self.from.clone()));
        }
        Ok(())
    }

    fn expand(&self) -> Vec<ResolvedFetch> {
        if let Some(files) = &self.files {
            return files
                .iter()
                .map(|file| ResolvedFetch {
                    url: join_paths(&[self.from.as_str(), file.as_str()]),
                    path: join_paths(&[self.to_folder.as_str(), file.as_str()]),
                })
                .collect();
        }

        // An empty `to_file` passes validation but still falls back to `from`
        let filename = match self.to_file.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.from.rsplit('/').next().unwrap_or_default(),
        };
        vec![ResolvedFetch {
            url: self.from.clone(),
            path: join_paths(&[self.to_folder.as_str(), filename]),
        }]
    }
}

/// An ordered fetch list, as it appears in interpreter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchConfig(pub Vec<FetchDescriptor>);

impl FetchConfig {
    pub fn new(descriptors: Vec<FetchDescriptor>) -> Self {
        Self(descriptors)
    }

    pub fn descriptors(&self) -> &[FetchDescriptor] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<FetchDescriptor>> for FetchConfig {
    fn from(descriptors: Vec<FetchDescriptor>) -> Self {
        Self(descriptors)
    }
}

/// A single URL to fetch and the virtual path to store it at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFetch {
    pub url: String,
    pub path: String,
}

/// Validate every descriptor, then expand them into concrete fetches
///
/// Validation covers the whole list before anything is expanded, so a bad
/// descriptor anywhere fails the call.
pub fn calculate_fetch_paths(
    descriptors: &[FetchDescriptor],
) -> Result<Vec<ResolvedFetch>, ConfigError> {
    for descriptor in descriptors {
        descriptor.validate()?;
    }

    Ok(descriptors.iter().flat_map(FetchDescriptor::expand).collect())
}
