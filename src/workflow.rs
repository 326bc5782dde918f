use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

const WORKFLOWS_TOML: &str = include_str!("workflows.toml");
const WILDCARD_STATUS: &str = "*";

pub const PROJECT_WORKFLOW: &str = "project";
pub const TASK_WORKFLOW: &str = "task";
pub const INVOICE_WORKFLOW: &str = "invoice";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowDefinition {
    pub id: String,
    pub initial_status: String,
    pub statuses: Vec<String>,
    pub terminal_statuses: Vec<String>,
    pub transitions: Vec<StatusTransition>,
}

impl WorkflowDefinition {
    pub fn has_status(&self, status: &str) -> bool {
        self.statuses.iter().any(|known| known == status)
    }

    #[allow(dead_code)]
    pub fn is_terminal(&self, status: &str) -> bool {
        self.terminal_statuses.iter().any(|known| known == status)
    }

    pub fn allows(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        self.transitions.iter().any(|transition| {
            (transition.from == from || transition.from == WILDCARD_STATUS) && transition.to == to
        })
    }

    pub fn validate_change(&self, from: &str, to: &str, force: bool) -> Result<(), WorkflowError> {
        if !self.has_status(to) {
            return Err(WorkflowError::UnknownStatus {
                workflow: self.id.clone(),
                value: to.to_string(),
            });
        }
        // A hand-edited document may hold a status we no longer list; any
        // listed target is reachable from such a status.
        if self.has_status(from) && !force && !self.allows(from, to) {
            return Err(WorkflowError::InvalidChange {
                workflow: self.id.clone(),
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    pub fn parse_status(&self, raw: &str) -> Result<String, WorkflowError> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        if self.has_status(&normalized) {
            Ok(normalized)
        } else {
            Err(WorkflowError::UnknownStatus {
                workflow: self.id.clone(),
                value: raw.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WorkflowFile {
    workflow: Vec<WorkflowDefinition>,
}

#[derive(Debug, Clone)]
pub struct WorkflowRegistry {
    workflows: Vec<WorkflowDefinition>,
}

impl WorkflowRegistry {
    pub fn load() -> Result<Self, WorkflowError> {
        Self::from_toml(WORKFLOWS_TOML)
    }

    fn from_toml(raw: &str) -> Result<Self, WorkflowError> {
        let file: WorkflowFile = toml::from_str(raw).map_err(WorkflowError::Parse)?;
        let registry = Self {
            workflows: file.workflow,
        };
        registry.validate()?;
        Ok(registry)
    }

    pub fn require(&self, id: &str) -> Result<&WorkflowDefinition, WorkflowError> {
        self.workflows
            .iter()
            .find(|workflow| workflow.id == id)
            .ok_or_else(|| WorkflowError::UnknownWorkflow(id.to_string()))
    }

    fn validate(&self) -> Result<(), WorkflowError> {
        let mut seen = HashSet::new();
        for workflow in &self.workflows {
            if !seen.insert(workflow.id.as_str()) {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "duplicate workflow id '{}'",
                    workflow.id
                )));
            }
            if !workflow.has_status(&workflow.initial_status) {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "workflow '{}' initial status '{}' is not a listed status",
                    workflow.id, workflow.initial_status
                )));
            }
            for terminal in &workflow.terminal_statuses {
                if !workflow.has_status(terminal) {
                    return Err(WorkflowError::InvalidDefinition(format!(
                        "workflow '{}' terminal status '{}' is not a listed status",
                        workflow.id, terminal
                    )));
                }
            }
            for transition in &workflow.transitions {
                let from_known =
                    transition.from == WILDCARD_STATUS || workflow.has_status(&transition.from);
                if !from_known || !workflow.has_status(&transition.to) {
                    return Err(WorkflowError::InvalidDefinition(format!(
                        "workflow '{}' transition {} -> {} references an unknown status",
                        workflow.id, transition.from, transition.to
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum WorkflowError {
    Parse(toml::de::Error),
    UnknownWorkflow(String),
    UnknownStatus {
        workflow: String,
        value: String,
    },
    InvalidChange {
        workflow: String,
        from: String,
        to: String,
    },
    InvalidDefinition(String),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Parse(err) => write!(f, "workflow definitions failed to parse: {}", err),
            WorkflowError::UnknownWorkflow(id) => write!(f, "unknown workflow '{}'", id),
            WorkflowError::UnknownStatus { workflow, value } => {
                write!(f, "unknown {} status '{}'", workflow, value)
            }
            WorkflowError::InvalidChange { workflow, from, to } => {
                write!(
                    f,
                    "invalid {} status change: {} -> {} (use --force to override)",
                    workflow, from, to
                )
            }
            WorkflowError::InvalidDefinition(message) => f.write_str(message),
        }
    }
}

impl Error for WorkflowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkflowError::Parse(err) => Some(err),
            _ => None,
        }
    }
}
