use core::mem::{align_of, size_of, MaybeUninit};

/// Alignment of every storage arena, regardless of capacity.
/// Types with stricter alignment do not fit, whatever their size.
pub(crate) const STORAGE_ALIGN: usize = 8;

/// Uninitialized byte arena of capacity `N` that can hold one value
/// of any type with size at most `N` and alignment at most [`STORAGE_ALIGN`].
///
/// All reinterpretation of the bytes as typed values goes through here;
/// the containers never touch the buffer directly.
#[repr(C, align(8))] // alignment value is in sync with `STORAGE_ALIGN`
#[derive(Clone, Copy)]
pub(crate) struct RawStorage<const N: usize> {
    bytes: MaybeUninit<[u8; N]>,
}

impl<const N: usize> RawStorage<N> {
    /// Construct new storage without initializing any value in it.
    pub const fn new() -> Self {
        RawStorage {
            bytes: MaybeUninit::uninit(),
        }
    }

    /// Returns `true` if a value of type `T` fits into the storage.
    pub const fn fits<T>() -> bool {
        size_of::<T>() <= N && align_of::<T>() <= STORAGE_ALIGN
    }

    /// Returns reference to the potentially uninitialized value.
    /// Type must be not larger than `N` and not more aligned than `STORAGE_ALIGN`.
    ///
    /// The caller is responsible to ensure that the type is correct and the
    /// value is initialized before accessing it.
    pub fn as_ref<T>(&self) -> &MaybeUninit<T> {
        // This can't be const, because then it'll be checked in branches that are not taken.
        assert!(size_of::<T>() <= N);
        assert!(align_of::<T>() <= STORAGE_ALIGN);

        // Safety: This cast is safe due to the size and alignment constraints.
        unsafe { &*self.bytes.as_ptr().cast() }
    }

    /// Returns mutable reference to the potentially uninitialized value.
    /// Type must be not larger than `N` and not more aligned than `STORAGE_ALIGN`.
    ///
    /// The caller is responsible to ensure that the type is correct and the
    /// value is initialized before accessing it.
    pub fn as_mut<T>(&mut self) -> &mut MaybeUninit<T> {
        // This can't be const, because then it'll be checked in branches that are not taken.
        assert!(size_of::<T>() <= N);
        assert!(align_of::<T>() <= STORAGE_ALIGN);

        // Safety: This cast is safe due to the size and alignment constraints.
        unsafe { &mut *self.bytes.as_mut_ptr().cast() }
    }

    /// First byte of the arena, for dispatcher calls.
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr().cast()
    }

    /// First byte of the arena, mutable, for dispatcher calls.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr().cast()
    }
}
