use thiserror::Error;

use crate::recognition::domain::identity_record::{IdentityRecord, RecordId};

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("invalid signature: {0}")]
    InvalidInput(String),
    #[error("signature dimension mismatch: got {got}, store holds {want}")]
    DimensionMismatch { got: usize, want: usize },
}

/// Ordered, append-only collection of enrolled signatures.
///
/// Every record shares one dimensionality, fixed by the first enrollment
/// and released again by [`clear`](Self::clear). Insertion order is the
/// scan order used by matching and persistence.
///
/// Single-writer: callers sharing a store across threads must serialize
/// access themselves (e.g. behind a `Mutex`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignatureStore {
    records: Vec<IdentityRecord>,
}

impl SignatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records in order, enforcing the same checks as
    /// [`enroll`](Self::enroll).
    pub fn from_records(records: Vec<IdentityRecord>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for record in records {
            store.enroll(record.name, record.signature)?;
        }
        Ok(store)
    }

    /// Appends a record. Duplicate names are accepted.
    pub fn enroll(
        &mut self,
        name: impl Into<String>,
        signature: Vec<f32>,
    ) -> Result<RecordId, StoreError> {
        if signature.is_empty() {
            return Err(StoreError::InvalidInput("signature is empty".into()));
        }
        if signature.iter().any(|v| !v.is_finite()) {
            return Err(StoreError::InvalidInput(
                "signature contains non-finite values".into(),
            ));
        }
        if let Some(want) = self.dimension() {
            if signature.len() != want {
                return Err(StoreError::DimensionMismatch {
                    got: signature.len(),
                    want,
                });
            }
        }

        let id = RecordId(self.records.len());
        self.records.push(IdentityRecord::new(name, signature));
        Ok(id)
    }

    pub fn all(&self) -> &[IdentityRecord] {
        &self.records
    }

    /// Dimensionality shared by all records, `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.records.first().map(IdentityRecord::dimension)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Swaps in the contents of `other` wholesale.
    pub fn replace_with(&mut self, other: SignatureStore) {
        self.records = other.records;
    }
}
