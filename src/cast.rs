use crate::any::StaticAny;
use crate::error::TypeMismatch;

/// Pointer-flavor cast: `None` on mismatch or emptiness, never panics.
///
/// # Example
///
/// ```
/// use stany::{cast_ref, StaticAny};
///
/// let a: StaticAny<8> = StaticAny::new(42u32);
///
/// assert_eq!(cast_ref::<u32, 8>(&a), Some(&42));
/// assert_eq!(cast_ref::<u64, 8>(&a), None);
/// ```
#[inline]
pub fn cast_ref<T, const N: usize>(any: &StaticAny<N>) -> Option<&T>
where
    T: 'static,
{
    any.downcast_ref()
}

/// Pointer-flavor cast, mutable.
#[inline]
pub fn cast_mut<T, const N: usize>(any: &mut StaticAny<N>) -> Option<&mut T>
where
    T: 'static,
{
    any.downcast_mut()
}

/// Reference-flavor cast: on mismatch fails with a [`TypeMismatch`]
/// naming both the stored and the requested type.
#[inline]
pub fn try_cast_ref<T, const N: usize>(any: &StaticAny<N>) -> Result<&T, TypeMismatch>
where
    T: 'static,
{
    any.get()
}

/// Reference-flavor cast, mutable.
#[inline]
pub fn try_cast_mut<T, const N: usize>(any: &mut StaticAny<N>) -> Result<&mut T, TypeMismatch>
where
    T: 'static,
{
    any.get_mut()
}
