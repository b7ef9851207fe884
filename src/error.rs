use core::fmt;

use crate::tag::TypeTag;

/// Error of a reference-returning cast: the container does not currently
/// hold a value of the requested type.
///
/// Carries both identities for diagnostics. `stored` is `None` when the
/// container was empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeMismatch {
    stored: Option<TypeTag>,
    requested: TypeTag,
}

impl TypeMismatch {
    pub(crate) fn new(stored: Option<TypeTag>, requested: TypeTag) -> Self {
        TypeMismatch { stored, requested }
    }

    /// Identity of the value the container held, if any.
    pub fn stored(&self) -> Option<TypeTag> {
        self.stored
    }

    /// Identity of the type the caller asked for.
    pub fn requested(&self) -> TypeTag {
        self.requested
    }
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stored {
            Some(stored) => write!(
                f,
                "type mismatch: requested `{}`, stored `{}`",
                self.requested, stored
            ),
            None => write!(
                f,
                "type mismatch: requested `{}`, container is empty",
                self.requested
            ),
        }
    }
}

impl core::error::Error for TypeMismatch {}
