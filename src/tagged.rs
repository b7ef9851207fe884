use crate::error::TypeMismatch;
use crate::storage::RawStorage;
use crate::tag::TypeTag;

/// Tagged flavor of [`TrivialAny`](crate::TrivialAny): `Copy` payloads
/// with an identity token stored beside the buffer, so retrieval is
/// type-checked and the empty state is observable.
///
/// No dispatcher is needed, `Copy` types have no destructors or clone
/// logic, so the container stays `Copy` itself.
///
/// # Example
///
/// ```
/// use stany::TaggedAny;
///
/// let mut a: TaggedAny<16> = TaggedAny::new(77i32);
///
/// assert!(a.is::<i32>());
/// assert_eq!(a.get::<i32>().unwrap(), &77);
///
/// a.set(3.25f64);
///
/// assert!(!a.is::<i32>());
/// assert!(a.get::<i32>().is_err());
/// assert_eq!(a.get::<f64>().unwrap(), &3.25);
/// ```
#[derive(Clone, Copy)]
pub struct TaggedAny<const N: usize> {
    /// `None` iff the buffer holds no value.
    tag: Option<TypeTag>,
    storage: RawStorage<N>,
}

impl<const N: usize> Default for TaggedAny<N> {
    #[inline(always)]
    fn default() -> Self {
        TaggedAny::empty()
    }
}

impl<const N: usize> TaggedAny<N> {
    /// Returns `true` if a value of type `T` can be stored.
    pub const fn fits<T>() -> bool {
        RawStorage::<N>::fits::<T>()
    }

    /// Construct an empty container.
    #[inline]
    pub const fn empty() -> Self {
        TaggedAny {
            tag: None,
            storage: RawStorage::new(),
        }
    }

    /// Construct a container holding `value`.
    #[inline]
    pub fn new<T>(value: T) -> Self
    where
        T: Copy + 'static,
    {
        let mut any = TaggedAny::empty();
        any.set(value);
        any
    }

    /// Replace the contents with `value`.
    ///
    /// Fails to compile when `T` does not fit the capacity.
    #[inline]
    pub fn set<T>(&mut self, value: T)
    where
        T: Copy + 'static,
    {
        const {
            assert!(TaggedAny::<N>::fits::<T>(), "type does not fit the capacity");
        }

        self.storage.as_mut::<T>().write(value);
        self.tag = Some(TypeTag::of::<T>());
    }

    /// Returns `true` if the container holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tag.is_none()
    }

    /// Returns `true` if the stored value is of type `T`.
    /// Always `false` when empty.
    #[inline]
    pub fn is<T>(&self) -> bool
    where
        T: 'static,
    {
        match self.tag {
            Some(tag) => tag.is::<T>(),
            None => false,
        }
    }

    /// Identity token of the stored value, or `None` when empty.
    #[inline]
    pub fn tag(&self) -> Option<TypeTag> {
        self.tag
    }

    /// Size in bytes of the stored value, or 0 when empty.
    #[inline]
    pub fn value_size(&self) -> usize {
        self.tag.map_or(0, |tag| tag.size())
    }

    /// Declared capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns some reference to the stored value if it is of type `T`.
    /// Otherwise returns none.
    #[inline]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: 'static,
    {
        if self.is::<T>() {
            // Safety: the tag says the buffer holds an initialized `T`.
            Some(unsafe { self.storage.as_ref::<T>().assume_init_ref() })
        } else {
            None
        }
    }

    /// Returns some mutable reference to the stored value if it is of
    /// type `T`. Otherwise returns none.
    #[inline]
    pub fn downcast_mut<T>(&mut self) -> Option<&mut T>
    where
        T: 'static,
    {
        if self.is::<T>() {
            // Safety: the tag says the buffer holds an initialized `T`.
            Some(unsafe { self.storage.as_mut::<T>().assume_init_mut() })
        } else {
            None
        }
    }

    /// Returns a reference to the stored value, or a [`TypeMismatch`]
    /// carrying both identities.
    #[inline]
    pub fn get<T>(&self) -> Result<&T, TypeMismatch>
    where
        T: 'static,
    {
        match self.downcast_ref::<T>() {
            Some(value) => Ok(value),
            None => Err(TypeMismatch::new(self.tag, TypeTag::of::<T>())),
        }
    }

    /// Returns a mutable reference to the stored value, or a
    /// [`TypeMismatch`].
    #[inline]
    pub fn get_mut<T>(&mut self) -> Result<&mut T, TypeMismatch>
    where
        T: 'static,
    {
        if self.is::<T>() {
            // Safety: the tag says the buffer holds an initialized `T`.
            Ok(unsafe { self.storage.as_mut::<T>().assume_init_mut() })
        } else {
            Err(TypeMismatch::new(self.tag, TypeTag::of::<T>()))
        }
    }

    /// Forget the contents. `Copy` types need no destruction.
    #[inline]
    pub fn clear(&mut self) {
        self.tag = None;
    }
}
