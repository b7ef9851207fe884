use core::any::TypeId;
use core::fmt;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr;

use crate::error::TypeMismatch;
use crate::storage::RawStorage;
use crate::tag::TypeTag;
use crate::vtable::VTable;

/// Type-erased value with `N` bytes of inline storage and no heap fallback.
///
/// Holds at most one value of any `Clone + 'static` type whose size fits
/// the capacity. The occupying type is tracked by a per-type dispatcher
/// reference, which is also the sole emptiness discriminant.
///
/// Oversized types are rejected at compile time, at every insertion point.
///
/// Like any plain value type, the container has no internal
/// synchronization. It may hold `!Send` values such as `Rc`, so it is
/// never `Send` or `Sync` itself:
///
/// ```compile_fail
/// fn require_send<T: Send>(_: T) {}
/// require_send(stany::StaticAny::<8>::empty());
/// ```
///
/// # Example
///
/// ```
/// use stany::StaticAny;
///
/// let mut a: StaticAny<32> = StaticAny::new(1234i32);
///
/// assert_eq!(a.get::<i32>().unwrap(), &1234);
///
/// a.set(String::from("Hello world"));
///
/// assert!(!a.is::<i32>());
/// assert_eq!(a.get::<String>().unwrap().as_str(), "Hello world");
/// ```
pub struct StaticAny<const N: usize> {
    /// `None` iff no live occupant in `storage`.
    vtable: Option<&'static VTable>,
    storage: RawStorage<N>,
    unsend: PhantomData<*mut u8>,
}

impl<const N: usize> Drop for StaticAny<N> {
    #[inline(always)]
    fn drop(&mut self) {
        self.clear();
    }
}

impl<const N: usize> Default for StaticAny<N> {
    #[inline(always)]
    fn default() -> Self {
        StaticAny::empty()
    }
}

impl<const N: usize> StaticAny<N> {
    /// Returns `true` if a value of type `T` can be stored in a
    /// capacity-`N` container.
    ///
    /// # Example
    ///
    /// ```
    /// # use stany::StaticAny;
    /// assert!(StaticAny::<32>::fits::<[u8; 32]>());
    /// assert!(!StaticAny::<32>::fits::<[u8; 33]>());
    /// ```
    pub const fn fits<T>() -> bool {
        RawStorage::<N>::fits::<T>()
    }

    /// Construct an empty container.
    #[inline]
    pub const fn empty() -> Self {
        StaticAny {
            vtable: None,
            storage: RawStorage::new(),
            unsend: PhantomData,
        }
    }

    /// Construct a container holding `value`.
    ///
    /// Fails to compile when `T` does not fit the capacity.
    ///
    /// # Example
    ///
    /// ```
    /// # use stany::StaticAny;
    /// let a: StaticAny<8> = StaticAny::new(42u32);
    ///
    /// assert_eq!(a.get::<u32>().unwrap(), &42);
    /// ```
    #[inline]
    pub fn new<T>(value: T) -> Self
    where
        T: Clone + 'static,
    {
        let mut any = StaticAny::empty();
        any.set(value);
        any
    }

    /// Replace the occupant with `value`, destroying the previous one.
    ///
    /// `value` is fully constructed before this call, so the operation
    /// cannot fail partway: the container always ends up holding `value`.
    ///
    /// Fails to compile when `T` does not fit the capacity:
    ///
    /// ```compile_fail
    /// # use stany::StaticAny;
    /// let mut a: StaticAny<8> = StaticAny::empty();
    /// a.set([0u8; 64]);
    /// ```
    #[inline]
    pub fn set<T>(&mut self, value: T)
    where
        T: Clone + 'static,
    {
        const {
            assert!(StaticAny::<N>::fits::<T>(), "type does not fit the capacity");
        }

        self.clear();
        self.storage.as_mut::<T>().write(value);
        self.vtable = Some(VTable::of::<T>());
    }

    /// Destroy the current occupant and construct a `T` in place from the
    /// result of `f`, returning a reference to it.
    ///
    /// Unlike [`set`](StaticAny::set) and [`assign_from`](StaticAny::assign_from),
    /// this does not preserve the old value on failure: if `f` panics the
    /// previous occupant is already destroyed and the container ends up
    /// empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use stany::StaticAny;
    /// let mut a: StaticAny<16> = StaticAny::new(5u32);
    ///
    /// let v = a.emplace_with(|| [1u32, 2]);
    /// v[0] += 1;
    ///
    /// assert_eq!(a.get::<[u32; 2]>().unwrap(), &[2, 2]);
    /// ```
    #[inline]
    pub fn emplace_with<T, F>(&mut self, f: F) -> &mut T
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        const {
            assert!(StaticAny::<N>::fits::<T>(), "type does not fit the capacity");
        }

        self.clear();
        let value = f();
        self.storage.as_mut::<T>().write(value);
        self.vtable = Some(VTable::of::<T>());

        // Safety: just initialized as `T`.
        unsafe { self.storage.as_mut::<T>().assume_init_mut() }
    }

    /// Clone the occupant of `source` into `self`, destroying the previous
    /// occupant. The source capacity must not exceed ours; the check is at
    /// compile time. Assigning from an empty source empties `self`.
    ///
    /// The clone is performed through the source's dispatcher into a
    /// staging arena first, and committed only on success: if `T::clone`
    /// panics, `self` still holds its previous value.
    ///
    /// Assigning from a larger capacity fails to compile:
    ///
    /// ```compile_fail
    /// # use stany::StaticAny;
    /// let mut small: StaticAny<8> = StaticAny::empty();
    /// let large: StaticAny<32> = StaticAny::new(7u32);
    /// small.assign_from(&large);
    /// ```
    pub fn assign_from<const M: usize>(&mut self, source: &StaticAny<M>) {
        const {
            assert!(M <= N, "source capacity exceeds target capacity");
        }

        match source.vtable {
            None => self.clear(),
            Some(vtable) => {
                let mut staging = RawStorage::<N>::new();

                // Safety: the source occupant is a live value of the
                // vtable's type, and staging fits it (M <= N).
                // A panic here propagates with `self` untouched.
                unsafe { (vtable.clone)(source.storage.as_ptr(), staging.as_mut_ptr()) };

                self.clear();

                // Safety: staging holds the freshly cloned value; moving
                // it is a byte copy. `staging` is plain uninitialized
                // memory afterwards and is not dropped.
                unsafe {
                    ptr::copy_nonoverlapping(
                        staging.as_ptr(),
                        self.storage.as_mut_ptr(),
                        (vtable.tag)().size(),
                    );
                }

                self.vtable = Some(vtable);
            }
        }
    }

    /// Move the occupant into a container of larger capacity `M`.
    ///
    /// The reverse direction fails to compile:
    ///
    /// ```compile_fail
    /// # use stany::StaticAny;
    /// let large: StaticAny<32> = StaticAny::new(7u32);
    /// let small: StaticAny<8> = large.widen();
    /// ```
    ///
    /// # Example
    ///
    /// ```
    /// # use stany::StaticAny;
    /// let small: StaticAny<8> = StaticAny::new(7u64);
    /// let large: StaticAny<64> = small.widen();
    ///
    /// assert_eq!(large.get::<u64>().unwrap(), &7);
    /// ```
    pub fn widen<const M: usize>(self) -> StaticAny<M> {
        const {
            assert!(N <= M, "target capacity is smaller than source capacity");
        }

        // Ownership of the occupant transfers bytewise; `self` must not
        // run its destructor.
        let mut this = ManuallyDrop::new(self);
        let mut widened = StaticAny::empty();

        if let Some(vtable) = this.vtable.take() {
            // Safety: the occupant is live and fits the target (N <= M).
            unsafe {
                ptr::copy_nonoverlapping(
                    this.storage.as_ptr(),
                    widened.storage.as_mut_ptr(),
                    (vtable.tag)().size(),
                );
            }
            widened.vtable = Some(vtable);
        }

        widened
    }

    /// Returns `true` if the container holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vtable.is_none()
    }

    /// Returns `true` if the stored value is of type `T`.
    /// Always `false` when empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use stany::StaticAny;
    /// let a: StaticAny<8> = StaticAny::new(42u32);
    /// assert!(a.is::<u32>());
    /// assert!(!a.is::<u64>());
    /// ```
    #[inline]
    pub fn is<T>(&self) -> bool
    where
        T: 'static,
    {
        match self.vtable {
            Some(vtable) => vtable.matches::<T>(),
            None => false,
        }
    }

    /// Identity token of the stored value, or `None` when empty.
    #[inline]
    pub fn tag(&self) -> Option<TypeTag> {
        self.vtable.map(|vtable| (vtable.tag)())
    }

    /// Type id of the stored value, or `None` when empty.
    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.tag().map(|tag| tag.id())
    }

    /// Diagnostic name of the stored type, or `None` when empty.
    #[inline]
    pub fn type_name(&self) -> Option<&'static str> {
        self.tag().map(|tag| tag.name())
    }

    /// Size in bytes of the stored value, or 0 when empty.
    #[inline]
    pub fn value_size(&self) -> usize {
        self.tag().map_or(0, |tag| tag.size())
    }

    /// Declared capacity in bytes. Invariant for the container's lifetime.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns some reference to the stored value if it is of type `T`.
    /// Otherwise returns none.
    ///
    /// # Example
    ///
    /// ```
    /// # use stany::StaticAny;
    /// let a: StaticAny<8> = StaticAny::new(42u32);
    ///
    /// assert_eq!(a.downcast_ref::<u32>(), Some(&42));
    /// assert_eq!(a.downcast_ref::<u64>(), None);
    /// ```
    #[inline]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: 'static,
    {
        if self.is::<T>() {
            // Safety: occupant is a live `T`.
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
            // Safety: occupant is a live `T`.
            Some(unsafe { self.storage.as_mut::<T>().assume_init_mut() })
        } else {
            None
        }
    }

    /// Returns a reference to the stored value, or a [`TypeMismatch`]
    /// carrying both the stored and the requested identity.
    ///
    /// # Example
    ///
    /// ```
    /// # use stany::StaticAny;
    /// let a: StaticAny<8> = StaticAny::new(42u32);
    ///
    /// let err = a.get::<i64>().unwrap_err();
    /// assert_eq!(err.requested().name(), "i64");
    /// ```
    #[inline]
    pub fn get<T>(&self) -> Result<&T, TypeMismatch>
    where
        T: 'static,
    {
        match self.downcast_ref::<T>() {
            Some(value) => Ok(value),
            None => Err(TypeMismatch::new(self.tag(), TypeTag::of::<T>())),
        }
    }

    /// Returns a mutable reference to the stored value, or a
    /// [`TypeMismatch`]. Allows in-place mutation without reassignment.
    #[inline]
    pub fn get_mut<T>(&mut self) -> Result<&mut T, TypeMismatch>
    where
        T: 'static,
    {
        if self.is::<T>() {
            // Safety: occupant is a live `T`.
            Ok(unsafe { self.storage.as_mut::<T>().assume_init_mut() })
        } else {
            Err(TypeMismatch::new(self.tag(), TypeTag::of::<T>()))
        }
    }

    /// Take the stored value out if it is of type `T`, leaving the
    /// container empty. Otherwise returns none and leaves it intact.
    ///
    /// # Example
    ///
    /// ```
    /// # use stany::StaticAny;
    /// let mut a: StaticAny<8> = StaticAny::new(42u32);
    ///
    /// assert_eq!(a.take::<u64>(), None);
    /// assert_eq!(a.take::<u32>(), Some(42));
    /// assert!(a.is_empty());
    /// ```
    #[inline]
    pub fn take<T>(&mut self) -> Option<T>
    where
        T: 'static,
    {
        if !self.is::<T>() {
            return None;
        }

        // Clear the discriminant first so the occupant is not dropped
        // again; its ownership moves to the caller.
        self.vtable = None;

        // Safety: occupant is a live `T`, read out exactly once.
        Some(unsafe { self.storage.as_ref::<T>().assume_init_read() })
    }

    /// Returns the stored value if it is of type `T`.
    /// Otherwise return self back.
    ///
    /// # Example
    ///
    /// ```
    /// # use stany::StaticAny;
    /// let a: StaticAny<8> = StaticAny::new(42u32);
    ///
    /// let Ok(value) = a.downcast::<u32>() else {
    ///     panic!();
    /// };
    /// assert_eq!(value, 42);
    /// ```
    #[inline]
    pub fn downcast<T>(mut self) -> Result<T, Self>
    where
        T: 'static,
    {
        match self.take() {
            Some(value) => Ok(value),
            None => Err(self),
        }
    }

    /// Destroy the current occupant, if any. The container becomes empty.
    #[inline]
    pub fn clear(&mut self) {
        if let Some(vtable) = self.vtable.take() {
            // Safety: occupant is a live value of the vtable's type.
            unsafe { (vtable.drop)(self.storage.as_mut_ptr()) };
        }
    }
}

impl<const N: usize> Clone for StaticAny<N> {
    fn clone(&self) -> Self {
        let mut clone = StaticAny::empty();
        clone.assign_from(self);
        clone
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign_from(source);
    }
}

impl<const N: usize> fmt::Debug for StaticAny<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "StaticAny<{}> {{ {} }}", N, tag),
            None => write!(f, "StaticAny<{}> {{ empty }}", N),
        }
    }
}
