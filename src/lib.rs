//! Fixed-capacity type-erased value containers with inline storage and
//! no heap allocation, ever: a type that does not fit the declared
//! capacity is rejected at compile time instead of being boxed.
//!
//! Three flavors, trading checking for overhead:
//!
//! - [`StaticAny<N>`](StaticAny) stores any `Clone + 'static` value of
//!   size up to `N`, tracks the occupying type through a per-type
//!   dispatcher, runs destructors, and supports copying, in-place
//!   emplacement and moving values into containers of larger capacity.
//! - [`TaggedAny<N>`](TaggedAny) stores `Copy` values with a type tag
//!   beside the buffer, so retrieval stays checked but the container is
//!   `Copy`.
//! - [`TrivialAny<N>`](TrivialAny) stores `Copy` values with nothing
//!   beside the buffer at all; retrieval is unchecked and `unsafe`.
//!
//! ## Usage
//!
//! ```
//! use stany::StaticAny;
//!
//! // 32 bytes of inline storage.
//! let mut a: StaticAny<32> = StaticAny::new(1234i32);
//!
//! assert_eq!(a.get::<i32>().unwrap(), &1234);
//! assert_eq!(a.value_size(), core::mem::size_of::<i32>());
//!
//! // Reassignment destroys the old occupant first.
//! a.set(String::from("Hello world"));
//!
//! assert!(!a.is::<i32>());
//! assert_eq!(a.get::<String>().unwrap().as_str(), "Hello world");
//!
//! // A failed cast reports both types.
//! let err = a.get::<i32>().unwrap_err();
//! assert_eq!(err.requested().name(), "i32");
//!
//! a.clear();
//! assert!(a.is_empty());
//! assert_eq!(a.value_size(), 0);
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

mod any;
mod cast;
mod error;
mod storage;
mod tag;
mod tagged;
mod trivial;
mod vtable;

pub use self::any::StaticAny;
pub use self::cast::{cast_mut, cast_ref, try_cast_mut, try_cast_ref};
pub use self::error::TypeMismatch;
pub use self::tag::TypeTag;
pub use self::tagged::TaggedAny;
pub use self::trivial::TrivialAny;

#[cfg(test)]
mod tests;
