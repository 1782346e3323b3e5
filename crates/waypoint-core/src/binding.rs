#![forbid(unsafe_code)]

//! Binding declarations: keys, the shared-object capability, and the
//! enumerable request list a subject exposes.
//!
//! # Design
//!
//! A subject (typically a view-model) declares its shared-object
//! dependencies as a fixed list of [`BindingRequest`]s, one per embedded
//! [`Binding<T>`] slot. A `Bag` walks that list, materializes one shared
//! instance per concrete type, and indexes each instance in the shared
//! registry under the slot's [`BindingKey`]. Declaration is explicit and
//! enumerable; there is no runtime field inspection.
//!
//! # Invariants
//!
//! 1. Every minted [`BindingKey`] is unique for the life of the process.
//! 2. A [`Binding<T>`] always requests the capability `T` it was
//!    declared with; key and capability cannot drift apart.
//! 3. [`BindingObject::create`] takes no arguments; shared objects are
//!    constructible without context.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique key minted per declared dependency slot.
///
/// Keys index the shared registry independently of the concrete object
/// type, so two slots of the same capability keep distinct registry
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey(u64);

impl BindingKey {
    /// Mint the next key.
    #[must_use]
    pub fn mint() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Capability marker for objects that can be lazily created and shared
/// by key.
pub trait BindingObject: Any {
    /// No-argument constructor used for lazy materialization.
    fn create() -> Self
    where
        Self: Sized;
}

/// One declared dependency slot: a minted key plus the capability type
/// it requests.
#[derive(Clone, Copy)]
pub struct BindingRequest {
    key: BindingKey,
    capability: TypeId,
    capability_name: &'static str,
}

impl BindingRequest {
    /// A request for capability `T` under `key`.
    #[must_use]
    pub fn of<T: BindingObject>(key: BindingKey) -> Self {
        Self {
            key,
            capability: TypeId::of::<T>(),
            capability_name: type_name::<T>(),
        }
    }

    /// The slot's key.
    #[must_use]
    pub fn key(&self) -> BindingKey {
        self.key
    }

    /// The requested capability's type id.
    #[must_use]
    pub fn capability(&self) -> TypeId {
        self.capability
    }

    /// Diagnostic name of the requested capability.
    #[must_use]
    pub fn capability_name(&self) -> &'static str {
        self.capability_name
    }

    /// Whether this slot requests the capability `T`.
    #[must_use]
    pub fn requests<T: BindingObject>(&self) -> bool {
        self.capability == TypeId::of::<T>()
    }
}

impl fmt::Debug for BindingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRequest")
            .field("key", &self.key)
            .field("capability", &self.capability_name)
            .finish()
    }
}

/// Fixed, enumerable list of binding requests a subject exposes.
///
/// Implementations return one request per embedded [`Binding<T>`] slot,
/// in declaration order.
pub trait BindingDeclarations {
    fn binding_requests(&self) -> Vec<BindingRequest>;
}

/// Typed declaration helper a subject embeds, one per dependency slot.
///
/// Mints its key at construction; the key stays stable for the slot's
/// lifetime, so repeated binds resolve to the same registry entry.
pub struct Binding<T: BindingObject> {
    key: BindingKey,
    _capability: PhantomData<fn() -> T>,
}

impl<T: BindingObject> Binding<T> {
    /// Declare a new slot with a freshly minted key.
    #[must_use]
    pub fn declare() -> Self {
        Self {
            key: BindingKey::mint(),
            _capability: PhantomData,
        }
    }

    /// The slot's key.
    #[must_use]
    pub fn key(&self) -> BindingKey {
        self.key
    }

    /// The slot as a [`BindingRequest`].
    #[must_use]
    pub fn request(&self) -> BindingRequest {
        BindingRequest::of::<T>(self.key)
    }
}

impl<T: BindingObject> Default for Binding<T> {
    fn default() -> Self {
        Self::declare()
    }
}

impl<T: BindingObject> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("capability", &type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    struct Session;

    impl BindingObject for Session {
        fn create() -> Self {
            Session
        }
    }

    struct Profile;

    impl BindingObject for Profile {
        fn create() -> Self {
            Profile
        }
    }

    #[test]
    fn minted_keys_are_unique() {
        let keys: HashSet<BindingKey> = (0..1000).map(|_| BindingKey::mint()).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn request_matches_declared_capability() {
        let slot = Binding::<Session>::declare();
        let request = slot.request();
        assert_eq!(request.key(), slot.key());
        assert!(request.requests::<Session>());
        assert!(!request.requests::<Profile>());
    }

    #[test]
    fn request_is_stable_across_calls() {
        let slot = Binding::<Session>::declare();
        assert_eq!(slot.request().key(), slot.request().key());
    }

    #[test]
    fn declarations_enumerate_slots() {
        struct ViewModel {
            session: Binding<Session>,
            profile: Binding<Profile>,
        }

        impl BindingDeclarations for ViewModel {
            fn binding_requests(&self) -> Vec<BindingRequest> {
                vec![self.session.request(), self.profile.request()]
            }
        }

        let vm = ViewModel {
            session: Binding::declare(),
            profile: Binding::declare(),
        };
        let requests = vm.binding_requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].requests::<Session>());
        assert!(requests[1].requests::<Profile>());
        assert_ne!(requests[0].key(), requests[1].key());
    }

    proptest! {
        #[test]
        fn keys_from_interleaved_mints_never_collide(n in 1usize..64) {
            let a: Vec<BindingKey> = (0..n).map(|_| BindingKey::mint()).collect();
            let b: Vec<BindingKey> = (0..n).map(|_| BindingKey::mint()).collect();
            let all: HashSet<BindingKey> = a.iter().chain(b.iter()).copied().collect();
            prop_assert_eq!(all.len(), n * 2);
        }
    }
}
