//! Two-level category taxonomy attached to every ledger.
//!
//! Parents and children carry small numeric ids that transactions refer to.
//! The taxonomy is stored as JSON text on the ledger row.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub parents: Vec<ParentCategory>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentCategory {
    pub id: u8,
    pub name: String,
    pub children: Vec<ChildCategory>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildCategory {
    pub id: u8,
    pub name: String,
}

impl Categories {
    /// Parent ids are unique in the ledger, child ids unique per parent.
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        let mut parents = HashSet::new();
        for parent in &self.parents {
            if !parents.insert(parent.id) {
                return Err(EngineError::Validation(format!(
                    "duplicate parent type id {}",
                    parent.id
                )));
            }
            let mut children = HashSet::new();
            for child in &parent.children {
                if !children.insert(child.id) {
                    return Err(EngineError::Validation(format!(
                        "duplicate child type id {} under parent type {}",
                        child.id, parent.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn to_json(&self) -> ResultEngine<String> {
        serde_json::to_string(self)
            .map_err(|err| EngineError::Internal(format!("failed to encode categories: {err}")))
    }

    pub(crate) fn from_json(raw: &str) -> ResultEngine<Self> {
        serde_json::from_str(raw)
            .map_err(|err| EngineError::Internal(format!("failed to decode categories: {err}")))
    }
}
