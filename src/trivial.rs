use crate::storage::RawStorage;

/// Trivial-only flavor of [`StaticAny`](crate::StaticAny): `N` bytes that
/// can hold one `Copy` value, with nothing stored beside them.
///
/// There is no occupant tag and no destructor bookkeeping, so the
/// container is itself `Copy` and `size_of::<TrivialAny<N>>() == N`
/// (for `N` a multiple of the storage alignment). The price is that
/// retrieval cannot be checked: the caller vouches for the type.
///
/// # Example
///
/// ```
/// use stany::TrivialAny;
///
/// let mut a: TrivialAny<16> = TrivialAny::new();
/// a.set(0xdeadbeef_u32);
///
/// // Safety: a `u32` was stored last.
/// assert_eq!(unsafe { a.get::<u32>() }, 0xdeadbeef);
/// ```
#[derive(Clone, Copy)]
pub struct TrivialAny<const N: usize> {
    storage: RawStorage<N>,
}

impl<const N: usize> Default for TrivialAny<N> {
    #[inline(always)]
    fn default() -> Self {
        TrivialAny::new()
    }
}

impl<const N: usize> TrivialAny<N> {
    /// Returns `true` if a value of type `T` can be stored.
    pub const fn fits<T>() -> bool {
        RawStorage::<N>::fits::<T>()
    }

    /// Construct a container with uninitialized contents.
    #[inline]
    pub const fn new() -> Self {
        TrivialAny {
            storage: RawStorage::new(),
        }
    }

    /// Construct a container holding `value`.
    #[inline]
    pub fn of<T>(value: T) -> Self
    where
        T: Copy + 'static,
    {
        let mut any = TrivialAny::new();
        any.set(value);
        any
    }

    /// Overwrite the contents with `value`. The previous contents need no
    /// destruction, `Copy` types have none.
    ///
    /// Fails to compile when `T` does not fit the capacity:
    ///
    /// ```compile_fail
    /// # use stany::TrivialAny;
    /// let mut a: TrivialAny<8> = TrivialAny::new();
    /// a.set([0u8; 64]);
    /// ```
    #[inline]
    pub fn set<T>(&mut self, value: T)
    where
        T: Copy + 'static,
    {
        const {
            assert!(TrivialAny::<N>::fits::<T>(), "type does not fit the capacity");
        }

        self.storage.as_mut::<T>().write(value);
    }

    /// Declared capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Read the stored value.
    ///
    /// # Safety
    ///
    /// A value of exactly type `T` must have been stored by the latest
    /// [`set`](TrivialAny::set) (or [`of`](TrivialAny::of)).
    #[inline]
    pub unsafe fn get<T>(&self) -> T
    where
        T: Copy + 'static,
    {
        // Safety: the caller vouches a `T` is stored.
        unsafe { self.storage.as_ref::<T>().assume_init_read() }
    }

    /// Reference to the stored value.
    ///
    /// # Safety
    ///
    /// Same contract as [`get`](TrivialAny::get).
    #[inline]
    pub unsafe fn get_ref<T>(&self) -> &T
    where
        T: Copy + 'static,
    {
        // Safety: the caller vouches a `T` is stored.
        unsafe { self.storage.as_ref::<T>().assume_init_ref() }
    }

    /// Mutable reference to the stored value.
    ///
    /// # Safety
    ///
    /// Same contract as [`get`](TrivialAny::get).
    #[inline]
    pub unsafe fn get_mut<T>(&mut self) -> &mut T
    where
        T: Copy + 'static,
    {
        // Safety: the caller vouches a `T` is stored.
        unsafe { self.storage.as_mut::<T>().assume_init_mut() }
    }
}
