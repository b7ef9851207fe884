use core::ptr;

use crate::tag::TypeTag;

unsafe fn clone_in_place<T: Clone>(src: *const u8, dst: *mut u8) {
    // Safety: `src` points to a live `T`.
    let value: &T = unsafe { &*src.cast() };

    // `T::clone` may panic. Nothing has been written to `dst` at that
    // point, so the destination stays uninitialized.
    let clone = value.clone();

    // Safety: `dst` points to uninitialized storage fit for `T`.
    unsafe { dst.cast::<T>().write(clone) };
}

unsafe fn drop_occupant<T>(target: *mut u8) {
    // Safety: `target` points to a live `T`. Destructors must not panic.
    unsafe { ptr::drop_in_place(target.cast::<T>()) };
}

/// Operation dispatcher for one concrete type, working on opaque byte
/// addresses. The container carries one of these per occupant and has no
/// per-type code path of its own.
///
/// There is no move operation: moves in Rust are plain byte copies, so
/// the container relocates occupants itself with `copy_nonoverlapping`
/// of `tag().size()` bytes.
pub(crate) struct VTable {
    pub tag: fn() -> TypeTag,
    pub clone: unsafe fn(src: *const u8, dst: *mut u8),
    pub drop: unsafe fn(*mut u8),
}

impl VTable {
    /// Returns the dispatcher for `T`.
    pub fn of<T>() -> &'static VTable
    where
        T: Clone + 'static,
    {
        &VTable {
            tag: TypeTag::of::<T>,
            clone: clone_in_place::<T>,
            drop: drop_occupant::<T>,
        }
    }

    /// Returns `true` if this dispatcher belongs to `T`.
    ///
    /// Dispatcher functions are instantiated per codegen unit, so two
    /// separately compiled artifacts may hold distinct addresses for the
    /// same `T`. The address comparison is only a fast path; inequality
    /// never proves mismatch by itself, the portable identity token is
    /// compared before concluding that.
    #[allow(unknown_lints)]
    #[allow(unpredictable_function_pointer_comparisons)]
    pub fn matches<T: 'static>(&self) -> bool {
        if self.tag == TypeTag::of::<T> as fn() -> TypeTag {
            return true;
        }

        (self.tag)().is::<T>()
    }
}
