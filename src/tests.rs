use core::cell::Cell;
use core::mem::size_of;

use std::format;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::string::{String, ToString};

use crate::{cast_mut, cast_ref, try_cast_mut, try_cast_ref, StaticAny, TaggedAny, TrivialAny, TypeTag};

/// Counts clone and drop calls of every `Probe` sharing the cell.
#[derive(Default)]
struct Counters {
    clones: Cell<u32>,
    drops: Cell<u32>,
}

struct Probe {
    counters: Rc<Counters>,
    value: i32,
}

impl Probe {
    fn new(counters: &Rc<Counters>, value: i32) -> Probe {
        Probe {
            counters: counters.clone(),
            value,
        }
    }
}

impl Clone for Probe {
    fn clone(&self) -> Self {
        self.counters.clones.set(self.counters.clones.get() + 1);
        Probe {
            counters: self.counters.clone(),
            value: self.value,
        }
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.counters.drops.set(self.counters.drops.get() + 1);
    }
}

struct PanicOnClone;

impl Clone for PanicOnClone {
    fn clone(&self) -> Self {
        panic!("clone failed");
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Pair {
    a: i64,
    b: f64,
}

impl Default for Pair {
    fn default() -> Self {
        Pair { a: 12, b: 0.34 }
    }
}

#[test]
fn test_roundtrip_primitive() {
    let mut any: StaticAny<8> = StaticAny::new(42u32);
    assert_eq!(any.is::<u32>(), true);
    assert_eq!(any.is::<u64>(), false);
    assert_eq!(any.downcast_ref::<u32>(), Some(&42));
    assert_eq!(any.downcast_ref::<u64>(), None);
    assert_eq!(any.downcast_mut::<u32>(), Some(&mut 42));
    assert_eq!(any.downcast_mut::<u64>(), None);
}

#[test]
fn test_roundtrip_string() {
    let any: StaticAny<32> = StaticAny::new(String::from("foobar"));
    assert!(any.is::<String>());
    assert_eq!(any.get::<String>().unwrap().as_str(), "foobar");
}

#[test]
fn test_empty_lifecycle() {
    let mut any: StaticAny<16> = StaticAny::empty();
    assert!(any.is_empty());
    assert_eq!(any.value_size(), 0);
    assert_eq!(any.tag(), None);
    assert_eq!(any.type_id(), None);
    assert_eq!(any.type_name(), None);
    assert!(!any.is::<u32>());

    any.set(7u32);
    assert!(!any.is_empty());
    assert_eq!(any.value_size(), size_of::<u32>());
    assert_eq!(any.type_name(), Some("u32"));

    any.clear();
    assert!(any.is_empty());
    assert_eq!(any.value_size(), 0);

    // Clearing twice is fine.
    any.clear();
    assert!(any.is_empty());
}

#[test]
fn test_default_is_empty() {
    let any: StaticAny<16> = StaticAny::default();
    assert!(any.is_empty());
}

#[test]
fn test_reassignment_switches_type() {
    let mut any: StaticAny<16> = StaticAny::new(7u32);
    assert!(any.is::<u32>());
    assert!(!any.is::<f64>());

    any.set(3.5f64);
    assert!(!any.is::<u32>());
    assert!(any.is::<f64>());
    assert_eq!(any.get::<f64>().unwrap(), &3.5);
}

#[test]
fn test_capacity_is_invariant() {
    let mut any: StaticAny<32> = StaticAny::empty();
    assert_eq!(any.capacity(), 32);
    any.set(1u8);
    assert_eq!(any.capacity(), 32);
    assert_eq!(any.value_size(), 1);
}

#[test]
fn test_fits() {
    assert!(StaticAny::<32>::fits::<[u8; 32]>());
    assert!(!StaticAny::<32>::fits::<[u8; 33]>());
}

#[test]
fn test_in_place_mutation() {
    let mut any: StaticAny<32> = StaticAny::new(String::from("Hello"));
    any.get_mut::<String>().unwrap().push_str(" world");
    assert_eq!(any.get::<String>().unwrap().as_str(), "Hello world");
}

#[test]
fn test_scenario_int_then_string() {
    let mut any: StaticAny<32> = StaticAny::new(1234i32);
    assert_eq!(any.get::<i32>().unwrap(), &1234);
    assert_eq!(any.value_size(), size_of::<i32>());

    any.set("Hello world".to_string());
    assert!(!any.is::<i32>());
    assert_eq!(any.get::<String>().unwrap().as_str(), "Hello world");

    any.clear();
    assert!(any.is_empty());
    assert_eq!(any.value_size(), 0);
}

#[test]
fn test_moving_in_performs_no_clones() {
    let counters = Rc::new(Counters::default());

    let any: StaticAny<16> = StaticAny::new(Probe::new(&counters, 1));
    assert_eq!(counters.clones.get(), 0);
    assert_eq!(counters.drops.get(), 0);

    drop(any);
    assert_eq!(counters.clones.get(), 0);
    assert_eq!(counters.drops.get(), 1);
}

#[test]
fn test_cloning_container_clones_occupant_once() {
    let counters = Rc::new(Counters::default());

    let any: StaticAny<16> = StaticAny::new(Probe::new(&counters, 7));
    let copy = any.clone();
    assert_eq!(counters.clones.get(), 1);
    assert_eq!(copy.get::<Probe>().unwrap().value, 7);

    drop(any);
    drop(copy);
    assert_eq!(counters.drops.get(), 2);
}

#[test]
fn test_reassignment_drops_old_occupant() {
    let counters = Rc::new(Counters::default());

    let mut any: StaticAny<16> = StaticAny::new(Probe::new(&counters, 1));
    any.set(42u32);
    assert_eq!(counters.drops.get(), 1);
    assert!(any.is::<u32>());
}

#[test]
fn test_take_performs_no_clones() {
    let counters = Rc::new(Counters::default());

    let mut any: StaticAny<16> = StaticAny::new(Probe::new(&counters, 9));
    let probe = any.take::<Probe>().unwrap();
    assert_eq!(probe.value, 9);
    assert_eq!(counters.clones.get(), 0);
    assert_eq!(counters.drops.get(), 0);
    assert!(any.is_empty());

    drop(probe);
    assert_eq!(counters.drops.get(), 1);
}

#[test]
fn test_failed_assignment_preserves_old_value() {
    let mut target: StaticAny<32> = StaticAny::new(777i64);
    let source: StaticAny<32> = StaticAny::new(PanicOnClone);

    let result = catch_unwind(AssertUnwindSafe(|| target.assign_from(&source)));
    assert!(result.is_err());

    // Still occupied with the previous value, not empty, not corrupted.
    assert!(target.is::<i64>());
    assert_eq!(target.get::<i64>().unwrap(), &777);
}

#[test]
fn test_failed_clone_from_preserves_old_value() {
    let counters = Rc::new(Counters::default());

    let mut target: StaticAny<16> = StaticAny::new(Probe::new(&counters, 5));
    let source: StaticAny<16> = StaticAny::new(PanicOnClone);

    let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(result.is_err());

    assert_eq!(target.get::<Probe>().unwrap().value, 5);
    assert_eq!(counters.drops.get(), 0);
}

#[test]
fn test_failed_emplace_leaves_empty() {
    let mut any: StaticAny<16> = StaticAny::new(5u32);

    let result = catch_unwind(AssertUnwindSafe(|| {
        any.emplace_with::<u32, _>(|| panic!("constructor failed"));
    }));
    assert!(result.is_err());

    assert!(any.is_empty());
}

#[test]
fn test_emplace_defaults_and_arguments() {
    let mut any: StaticAny<32> = StaticAny::empty();

    any.emplace_with(Pair::default);
    assert_eq!(any.get::<Pair>().unwrap(), &Pair { a: 12, b: 0.34 });

    let pair = any.emplace_with(|| Pair { a: 77, b: 88.0 });
    pair.a += 1;
    assert_eq!(any.get::<Pair>().unwrap(), &Pair { a: 78, b: 88.0 });
}

#[test]
fn test_assign_from_smaller_capacity() {
    let small: StaticAny<8> = StaticAny::new(7u32);
    let mut large: StaticAny<32> = StaticAny::new("replace me".to_string());

    large.assign_from(&small);
    assert!(large.is::<u32>());
    assert_eq!(large.get::<u32>().unwrap(), &7);

    // The source keeps its value.
    assert_eq!(small.get::<u32>().unwrap(), &7);
}

#[test]
fn test_assign_from_empty_empties_target() {
    let empty: StaticAny<8> = StaticAny::empty();
    let mut target: StaticAny<32> = StaticAny::new(1u8);

    target.assign_from(&empty);
    assert!(target.is_empty());
}

#[test]
fn test_widen_preserves_value_and_type() {
    let small: StaticAny<8> = StaticAny::new(7u64);
    let large: StaticAny<64> = small.widen();
    assert_eq!(large.get::<u64>().unwrap(), &7);
    assert_eq!(large.capacity(), 64);
}

#[test]
fn test_widen_non_trivial_occupant() {
    let counters = Rc::new(Counters::default());

    let small: StaticAny<16> = StaticAny::new(Probe::new(&counters, 3));
    let large: StaticAny<32> = small.widen();

    // A widening move neither clones nor drops the occupant.
    assert_eq!(counters.clones.get(), 0);
    assert_eq!(counters.drops.get(), 0);
    assert_eq!(large.get::<Probe>().unwrap().value, 3);

    drop(large);
    assert_eq!(counters.drops.get(), 1);
}

#[test]
fn test_widen_empty() {
    let small: StaticAny<8> = StaticAny::empty();
    let large: StaticAny<16> = small.widen();
    assert!(large.is_empty());
}

#[test]
fn test_downcast_owned() {
    let any: StaticAny<8> = StaticAny::new(42u32);

    let any = match any.downcast::<u64>() {
        Ok(_) => panic!("expected downcast to fail"),
        Err(any) => any,
    };

    match any.downcast::<u32>() {
        Ok(value) => assert_eq!(value, 42),
        Err(_) => panic!("expected downcast to succeed"),
    }
}

#[test]
fn test_take_string() {
    let mut any: StaticAny<32> = StaticAny::new(String::from("gone"));
    assert_eq!(any.take::<u32>(), None);

    let value = any.take::<String>().unwrap();
    assert_eq!(value, "gone");
    assert!(any.is_empty());
}

#[test]
fn test_mismatch_error_identities() {
    let any: StaticAny<8> = StaticAny::new(42u32);

    let err = any.get::<i64>().unwrap_err();
    assert_eq!(err.requested(), TypeTag::of::<i64>());
    assert_eq!(err.stored(), Some(TypeTag::of::<u32>()));

    let message = format!("{err}");
    assert!(message.contains("i64"));
    assert!(message.contains("u32"));
}

#[test]
fn test_mismatch_error_on_empty() {
    let any: StaticAny<8> = StaticAny::empty();

    let err = any.get::<u32>().unwrap_err();
    assert_eq!(err.stored(), None);
    assert!(format!("{err}").contains("empty"));
}

#[test]
fn test_free_casts() {
    let mut any: StaticAny<8> = StaticAny::new(42u32);

    assert_eq!(cast_ref::<u32, 8>(&any), Some(&42));
    assert_eq!(cast_ref::<u64, 8>(&any), None);

    *cast_mut::<u32, 8>(&mut any).unwrap() = 43;
    assert_eq!(try_cast_ref::<u32, 8>(&any).unwrap(), &43);
    assert!(try_cast_ref::<u64, 8>(&any).is_err());

    *try_cast_mut::<u32, 8>(&mut any).unwrap() += 1;
    assert_eq!(any.get::<u32>().unwrap(), &44);
}

#[test]
fn test_debug_output() {
    let any: StaticAny<16> = StaticAny::new(1u8);
    assert_eq!(format!("{any:?}"), "StaticAny<16> { u8 }");

    let empty: StaticAny<16> = StaticAny::empty();
    assert_eq!(format!("{empty:?}"), "StaticAny<16> { empty }");
}

#[test]
fn test_type_tag_identity() {
    assert_eq!(TypeTag::of::<u32>(), TypeTag::of::<u32>());
    assert_ne!(TypeTag::of::<u32>(), TypeTag::of::<i32>());
    assert!(TypeTag::of::<u32>().is::<u32>());
    assert_eq!(TypeTag::of::<u32>().size(), 4);
    assert_eq!(TypeTag::of::<u32>().name(), "u32");
}

#[test]
fn test_tagged_lifecycle() {
    let mut any: TaggedAny<16> = TaggedAny::empty();
    assert!(any.is_empty());
    assert!(any.get::<i32>().is_err());

    any.set(77i32);
    assert!(!any.is_empty());
    assert!(any.is::<i32>());
    assert!(!any.is::<f64>());
    assert_eq!(any.get::<i32>().unwrap(), &77);
    assert_eq!(any.value_size(), size_of::<i32>());

    any.set(3.5f64);
    assert!(!any.is::<i32>());
    assert!(any.is::<f64>());

    any.clear();
    assert!(any.is_empty());
    assert_eq!(any.value_size(), 0);
}

#[test]
fn test_tagged_mutable_get() {
    let mut any: TaggedAny<16> = TaggedAny::new(7i32);
    *any.get_mut::<i32>().unwrap() = 6;
    assert_eq!(any.get::<i32>().unwrap(), &6);
}

#[test]
fn test_tagged_is_copy() {
    let any: TaggedAny<16> = TaggedAny::new(3.5f64);
    let copy = any;
    assert_eq!(any.get::<f64>().unwrap(), &3.5);
    assert_eq!(copy.get::<f64>().unwrap(), &3.5);
}

#[test]
fn test_tagged_mismatch_reports_stored_type() {
    let any: TaggedAny<16> = TaggedAny::new(7i32);
    let err = any.get::<f64>().unwrap_err();
    assert_eq!(err.stored(), Some(TypeTag::of::<i32>()));
    assert_eq!(err.requested(), TypeTag::of::<f64>());
}

#[test]
fn test_trivial_roundtrip() {
    let mut any: TrivialAny<16> = TrivialAny::new();
    any.set(0xdeadbeef_u32);

    // Safety: a `u32` was stored last.
    unsafe {
        assert_eq!(any.get::<u32>(), 0xdeadbeef);
        assert_eq!(any.get_ref::<u32>(), &0xdeadbeef);
    }

    any.set([1u16, 2, 3]);

    // Safety: a `[u16; 3]` was stored last.
    unsafe {
        assert_eq!(any.get::<[u16; 3]>(), [1, 2, 3]);
        any.get_mut::<[u16; 3]>()[0] = 4;
        assert_eq!(any.get::<[u16; 3]>(), [4, 2, 3]);
    }
}

#[test]
fn test_trivial_is_copy() {
    let any = TrivialAny::<16>::of(1234i32);
    let copy = any;

    // Safety: an `i32` was stored last, in both copies.
    unsafe {
        assert_eq!(any.get::<i32>(), 1234);
        assert_eq!(copy.get::<i32>(), 1234);
    }
}

#[test]
fn test_trivial_layout() {
    // No tag beside the buffer: the container is exactly its capacity.
    assert_eq!(size_of::<TrivialAny<16>>(), 16);
    assert_eq!(size_of::<TrivialAny<32>>(), 32);
}

#[test]
fn test_stores_non_send_value() {
    let rc = Rc::new(42u32);
    let any: StaticAny<8> = StaticAny::new(rc.clone());
    assert_eq!(**any.get::<Rc<u32>>().unwrap(), 42);
    drop(any);
    assert_eq!(Rc::strong_count(&rc), 1);
}
