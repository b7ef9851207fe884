use core::any::{type_name, TypeId};
use core::fmt;
use core::mem::size_of;

/// Identity token of a stored type.
///
/// Tokens compare equal iff they identify the same type. The name is
/// purely diagnostic and never participates in comparison, since
/// `type_name` output is not guaranteed to be unique or stable.
#[derive(Clone, Copy, Debug)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
    size: usize,
}

impl TypeTag {
    /// Returns the identity token of `T`.
    pub fn of<T: 'static>() -> TypeTag {
        TypeTag {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            size: size_of::<T>(),
        }
    }

    /// Returns `true` if this token identifies `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Opaque identity of the type, comparable for equality.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Size in bytes of a value of the identified type.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
