/// Position of a record in its store's insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub usize);

/// One enrolled sample: a name and the face signature extracted for it.
///
/// Names need not be unique; enrolling the same person several times adds
/// independent samples.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityRecord {
    pub name: String,
    pub signature: Vec<f32>,
}

impl IdentityRecord {
    pub fn new(name: impl Into<String>, signature: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }

    pub fn dimension(&self) -> usize {
        self.signature.len()
    }
}
