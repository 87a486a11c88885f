/// An error raised when a term occupies a slot its kind does not allow.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("a literal cannot occupy a subject, predicate, or context position")]
    LiteralInEntitySlot,
}
