//! Process-wide arithmetic registry keyed by value type.
//!
//! Call [`init`] once at startup to register the built-ins. [`register`]
//! installs or replaces an implementation (last registration wins).
//! Lookups after `init()` returns never race the built-in registration.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Once, OnceLock, PoisonError, RwLock};

use super::{Arith, ColorArith, EuclidArith, ScalarArith, Shared};
use crate::error::ArithError;

/// Which implementation family an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithTag {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Color,
    Radians,
    Degrees,
    Custom,
}

impl ArithTag {
    pub fn name(self) -> &'static str {
        match self {
            ArithTag::Scalar => "scalar",
            ArithTag::Vec2 => "vec2",
            ArithTag::Vec3 => "vec3",
            ArithTag::Vec4 => "vec4",
            ArithTag::Color => "color",
            ArithTag::Radians => "radians",
            ArithTag::Degrees => "degrees",
            ArithTag::Custom => "custom",
        }
    }
}

impl fmt::Display for ArithTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct Entry {
    tag: ArithTag,
    type_name: &'static str,
    // always a `Shared<T>` for the keyed `T`
    arith: Box<dyn Any + Send + Sync>,
}

type Table = RwLock<HashMap<TypeId, Entry>>;

fn table() -> &'static Table {
    static TABLE: OnceLock<Table> = OnceLock::new();
    TABLE.get_or_init(|| RwLock::new(HashMap::new()))
}

fn entry<T: Copy + fmt::Debug + 'static>(shared: Shared<T>) -> Entry {
    Entry {
        tag: shared.tag(),
        type_name: type_name::<T>(),
        arith: Box::new(shared),
    }
}

fn insert_default<A>(tag: ArithTag, arith: A)
where
    A: Arith + Send + Sync + 'static,
{
    let mut map = table().write().unwrap_or_else(PoisonError::into_inner);
    map.entry(TypeId::of::<A::Value>())
        .or_insert_with(|| entry(Shared::new(tag, arith)));
}

/// Register the built-in implementations: `f32`, 2/3/4-dimensional vectors
/// and [`Color`](super::Color). Idempotent. Does not overwrite an implementation that was
/// registered for the same type beforehand.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        insert_default(ArithTag::Scalar, ScalarArith);
        insert_default(ArithTag::Vec2, EuclidArith::<2>);
        insert_default(ArithTag::Vec3, EuclidArith::<3>);
        insert_default(ArithTag::Vec4, EuclidArith::<4>);
        insert_default(ArithTag::Color, ColorArith);
        tracing::debug!(entries = len(), "arithmetic registry initialised");
    });
}

/// Install `arith` for `A::Value`, replacing any previous entry.
pub fn register<A>(tag: ArithTag, arith: A)
where
    A: Arith + Send + Sync + 'static,
{
    let shared = Shared::new(tag, arith);
    let mut map = table().write().unwrap_or_else(PoisonError::into_inner);
    if let Some(old) = map.insert(TypeId::of::<A::Value>(), entry(shared)) {
        tracing::debug!(
            value_type = old.type_name,
            old = %old.tag,
            new = %tag,
            "arithmetic replaced"
        );
    }
}

/// Fetch the implementation registered for `T`.
pub fn lookup<T: Copy + fmt::Debug + 'static>() -> Result<Shared<T>, ArithError> {
    let map = table().read().unwrap_or_else(PoisonError::into_inner);
    map.get(&TypeId::of::<T>())
        .and_then(|e| e.arith.downcast_ref::<Shared<T>>())
        .cloned()
        .ok_or(ArithError::Unregistered {
            type_name: type_name::<T>(),
        })
}

/// Like [`lookup`], for callers that treat a missing registration as a bug.
///
/// # Panics
/// If nothing is registered for `T`; the message names the type.
pub fn expect<T: Copy + fmt::Debug + 'static>() -> Shared<T> {
    match lookup::<T>() {
        Ok(a) => a,
        Err(e) => panic!("{e}"),
    }
}

pub fn registered_tag<T: 'static>() -> Option<ArithTag> {
    let map = table().read().unwrap_or_else(PoisonError::into_inner);
    map.get(&TypeId::of::<T>()).map(|e| e.tag)
}

/// Registered `(tag, type name)` pairs, in no particular order.
pub fn entries() -> Vec<(ArithTag, &'static str)> {
    let map = table().read().unwrap_or_else(PoisonError::into_inner);
    map.values().map(|e| (e.tag, e.type_name)).collect()
}

fn len() -> usize {
    table().read().unwrap_or_else(PoisonError::into_inner).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::Color;
    use nalgebra::{Vector2, Vector3};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Meters(f32);

    #[derive(Default)]
    struct MetersArith(f32);

    impl Arith for MetersArith {
        type Value = Meters;
        fn zero(&self) -> Meters {
            Meters(0.0)
        }
        fn add(&self, a: Meters, b: Meters) -> Meters {
            Meters(a.0 + b.0 + self.0)
        }
        fn scale(&self, k: f32, a: Meters) -> Meters {
            Meters(k * a.0)
        }
        fn dot(&self, a: Meters, b: Meters) -> f32 {
            a.0 * b.0
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Unknown;

    #[test]
    fn init_registers_builtins_and_is_idempotent() {
        init();
        init();
        assert!(lookup::<Vector3<f32>>().is_ok());
        assert_eq!(registered_tag::<Vector2<f32>>(), Some(ArithTag::Vec2));
        assert_eq!(registered_tag::<Color>(), Some(ArithTag::Color));
    }

    #[test]
    fn unregistered_lookup_names_type() {
        let err = lookup::<Unknown>().unwrap_err();
        assert!(err.to_string().contains("Unknown"), "{err}");
    }

    #[test]
    #[should_panic(expected = "Unknown")]
    fn expect_panics_naming_type() {
        let _ = expect::<Unknown>();
    }

    #[test]
    fn last_registration_wins() {
        register(ArithTag::Custom, MetersArith(0.0));
        assert_eq!(expect::<Meters>().add(Meters(1.0), Meters(2.0)), Meters(3.0));
        register(ArithTag::Custom, MetersArith(10.0));
        assert_eq!(expect::<Meters>().add(Meters(1.0), Meters(2.0)), Meters(13.0));
        assert!(entries().iter().any(|(_, n)| n.contains("Meters")));
    }
}
