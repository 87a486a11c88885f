use rdf_loom_store::StoreError;

/// An error raised while validating or executing a query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryError {
    /// A part's pattern constrains nothing and would select the entire
    /// store; callers must never be allowed to do this implicitly.
    #[error("pattern constrains no slot and would select the entire store")]
    UnconstrainedPattern,
    /// A backing-source failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
