//! Atomic write batches

use crate::social::store::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One write inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum WriteOp {
    /// Create or overwrite a document.
    Set {
        collection: String,
        id: String,
        data: Map<String, Value>,
    },
    /// Delete a document; deleting an absent document is not an error.
    Delete { collection: String, id: String },
}

impl WriteOp {
    pub fn collection(&self) -> &str {
        match self {
            WriteOp::Set { collection, .. } | WriteOp::Delete { collection, .. } => collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            WriteOp::Set { id, .. } | WriteOp::Delete { id, .. } => id,
        }
    }
}

/// A set of writes applied as one indivisible unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        data: Map<String, Value>,
    ) -> &mut Self {
        self.ops.push(WriteOp::Set {
            collection: collection.into(),
            id: id.into(),
            data,
        });
        self
    }

    pub fn delete(&mut self, collection: impl Into<String>, id: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Delete {
            collection: collection.into(),
            id: id.into(),
        });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Checked by every adapter before the first write.
    pub fn validate(&self) -> Result<(), StoreError> {
        for (i, op) in self.ops.iter().enumerate() {
            if op.collection().is_empty() {
                return Err(StoreError::InvalidBatch(format!(
                    "operation {} has an empty collection",
                    i
                )));
            }
            if op.id().is_empty() {
                return Err(StoreError::InvalidBatch(format!(
                    "operation {} on {} has an empty document id",
                    i,
                    op.collection()
                )));
            }
        }
        Ok(())
    }
}
