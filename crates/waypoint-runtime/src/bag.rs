#![forbid(unsafe_code)]

//! Scoped shared-object registry.
//!
//! # Design
//!
//! Two layers:
//!
//! - [`SharedRegistry`]: the cross-scope index from [`BindingKey`] to
//!   materialized object, created once per application scope and passed
//!   explicitly to every [`Bag`] that participates in it.
//! - [`Bag`]: one navigation flow's scope. It materializes at most one
//!   instance per concrete object type (singleton-within-scope), indexes
//!   every instance it hands out in the shared registry under the
//!   requesting slot's key, and retracts those keys when dropped.
//!
//! Distinct Bags over the same registry materialize independent
//! instances; sharing happens only by key through the registry while the
//! owning Bag lives.
//!
//! # Invariants
//!
//! 1. Within one Bag, at most one live instance exists per concrete
//!    object type.
//! 2. A key present in the shared registry was registered by some
//!    still-living Bag.
//! 3. Dropping a Bag removes every key it ever registered from the
//!    shared registry, including a key another Bag has since re-bound
//!    (the takeover caveat: the original scope always wins the
//!    retraction).
//!
//! # Failure Modes
//!
//! - Lookup of an absent key, or of a key whose object is not the
//!   requested concrete type, returns `None`. No diagnostics beyond a
//!   `trace` event; absent shared state is not an error here.

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use waypoint_core::binding::{Binding, BindingDeclarations, BindingKey, BindingObject};

/// Cheaply cloneable handle to the cross-Bag index from binding key to
/// materialized object.
pub struct SharedRegistry {
    objects: Rc<RefCell<HashMap<BindingKey, Rc<dyn Any>>>>,
}

impl Clone for SharedRegistry {
    fn clone(&self) -> Self {
        Self {
            objects: Rc::clone(&self.objects),
        }
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("len", &self.len())
            .finish()
    }
}

impl SharedRegistry {
    /// Create an empty registry for a new application scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Typed lookup by binding key. `None` when the key is absent or the
    /// registered object is not a `T`.
    #[must_use]
    pub fn object<T: BindingObject>(&self, key: BindingKey) -> Option<Rc<T>> {
        let object = self.objects.borrow().get(&key).cloned()?;
        object.downcast::<T>().ok()
    }

    /// Typed lookup through a declared slot.
    #[must_use]
    pub fn resolve<T: BindingObject>(&self, binding: &Binding<T>) -> Option<Rc<T>> {
        self.object(binding.key())
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.borrow().len()
    }

    /// Whether no keys are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.borrow().is_empty()
    }

    fn insert(&self, key: BindingKey, object: Rc<dyn Any>) {
        self.objects.borrow_mut().insert(key, object);
    }

    fn remove(&self, key: BindingKey) {
        self.objects.borrow_mut().remove(&key);
    }
}

/// One navigation flow's shared-object scope.
pub struct Bag {
    registry: SharedRegistry,
    /// Every key this Bag registered, in registration order; retracted
    /// on drop.
    keys: RefCell<Vec<BindingKey>>,
    /// Local cache, at most one instance per concrete type.
    objects: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl fmt::Debug for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bag")
            .field("keys", &self.keys.borrow().len())
            .field("types", &self.objects.borrow().len())
            .finish()
    }
}

impl Bag {
    /// Create a fresh scope over `registry`.
    #[must_use]
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            keys: RefCell::new(Vec::new()),
            objects: RefCell::new(HashMap::new()),
        }
    }

    /// The registry this Bag registers into.
    #[must_use]
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Materialize the subject's declared dependencies of capability `T`.
    ///
    /// Walks the subject's binding requests; for each slot requesting
    /// `T`, resolves or creates the shared instance for that slot's key
    /// and invokes `execute` with it. Slots requesting other
    /// capabilities are skipped silently.
    pub fn bind_declared<T: BindingObject>(
        &self,
        subject: &dyn BindingDeclarations,
        mut execute: impl FnMut(&Rc<T>),
    ) {
        for request in subject.binding_requests() {
            if !request.requests::<T>() {
                trace!(
                    requested = request.capability_name(),
                    capability = type_name::<T>(),
                    "skipping non-matching slot"
                );
                continue;
            }
            if let Some(object) = self.materialize::<T>(request.key()) {
                execute(&object);
            }
        }
    }

    /// Resolve or create this Bag's instance of `T`, indexing it in the
    /// shared registry under `key`.
    fn materialize<T: BindingObject>(&self, key: BindingKey) -> Option<Rc<T>> {
        let type_key = TypeId::of::<T>();

        if let Some(existing) = self.objects.borrow().get(&type_key).cloned() {
            let object = existing.downcast::<T>().ok()?;
            self.register(key, Rc::clone(&object) as Rc<dyn Any>);
            return Some(object);
        }

        let object = Rc::new(T::create());
        debug!(capability = type_name::<T>(), "materialized shared object");
        self.objects
            .borrow_mut()
            .insert(type_key, Rc::clone(&object) as Rc<dyn Any>);
        self.register(key, Rc::clone(&object) as Rc<dyn Any>);
        Some(object)
    }

    fn register(&self, key: BindingKey, object: Rc<dyn Any>) {
        self.registry.insert(key, object);
        self.keys.borrow_mut().push(key);
    }
}

impl Drop for Bag {
    fn drop(&mut self) {
        for key in self.keys.borrow().iter() {
            self.registry.remove(*key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::binding::BindingRequest;

    struct Session {
        id: u32,
    }

    impl BindingObject for Session {
        fn create() -> Self {
            use std::cell::Cell;
            thread_local! {
                static NEXT: Cell<u32> = const { Cell::new(0) };
            }
            let id = NEXT.with(|next| {
                let id = next.get();
                next.set(id + 1);
                id
            });
            Session { id }
        }
    }

    struct Profile;

    impl BindingObject for Profile {
        fn create() -> Self {
            Profile
        }
    }

    struct ViewModel {
        session: Binding<Session>,
        backup_session: Binding<Session>,
        profile: Binding<Profile>,
    }

    impl ViewModel {
        fn new() -> Self {
            Self {
                session: Binding::declare(),
                backup_session: Binding::declare(),
                profile: Binding::declare(),
            }
        }
    }

    impl BindingDeclarations for ViewModel {
        fn binding_requests(&self) -> Vec<BindingRequest> {
            vec![
                self.session.request(),
                self.backup_session.request(),
                self.profile.request(),
            ]
        }
    }

    #[test]
    fn one_instance_per_type_within_a_bag() {
        let registry = SharedRegistry::new();
        let bag = Bag::new(registry.clone());
        let vm = ViewModel::new();

        let mut seen = Vec::new();
        bag.bind_declared::<Session>(&vm, |session| seen.push(session.id));

        // Two session slots, one shared instance.
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);

        let a = registry.resolve(&vm.session).unwrap();
        let b = registry.resolve(&vm.backup_session).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn non_matching_slots_are_skipped() {
        let registry = SharedRegistry::new();
        let bag = Bag::new(registry.clone());
        let vm = ViewModel::new();

        let mut calls = 0;
        bag.bind_declared::<Profile>(&vm, |_| calls += 1);
        assert_eq!(calls, 1);
        assert!(registry.resolve(&vm.session).is_none());
        assert!(registry.resolve(&vm.profile).is_some());
    }

    #[test]
    fn distinct_bags_materialize_independent_instances() {
        let registry = SharedRegistry::new();
        let bag_a = Bag::new(registry.clone());
        let bag_b = Bag::new(registry.clone());
        let vm_a = ViewModel::new();
        let vm_b = ViewModel::new();

        let mut id_a = None;
        bag_a.bind_declared::<Session>(&vm_a, |session| id_a = Some(session.id));
        let mut id_b = None;
        bag_b.bind_declared::<Session>(&vm_b, |session| id_b = Some(session.id));

        assert_ne!(id_a.unwrap(), id_b.unwrap());
    }

    #[test]
    fn typed_lookup_rejects_mismatched_type() {
        let registry = SharedRegistry::new();
        let bag = Bag::new(registry.clone());
        let vm = ViewModel::new();

        bag.bind_declared::<Session>(&vm, |_| {});
        // The session slot's key holds a Session, not a Profile.
        assert!(registry.object::<Profile>(vm.session.key()).is_none());
        assert!(registry.object::<Session>(vm.session.key()).is_some());
    }

    #[test]
    fn drop_retracts_every_registered_key() {
        let registry = SharedRegistry::new();
        let vm = ViewModel::new();

        {
            let bag = Bag::new(registry.clone());
            bag.bind_declared::<Session>(&vm, |_| {});
            bag.bind_declared::<Profile>(&vm, |_| {});
            assert_eq!(registry.len(), 3);
        }

        assert!(registry.is_empty());
        assert!(registry.resolve(&vm.session).is_none());
    }

    #[test]
    fn drop_retracts_keys_taken_over_by_another_bag() {
        let registry = SharedRegistry::new();
        let vm = ViewModel::new();

        let bag_a = Bag::new(registry.clone());
        bag_a.bind_declared::<Session>(&vm, |_| {});

        // A second scope rebinds the same slots; its objects take over
        // the keys.
        let bag_b = Bag::new(registry.clone());
        bag_b.bind_declared::<Session>(&vm, |_| {});
        let taken_over = registry.resolve(&vm.session).unwrap();

        // The original scope's drop still retracts the keys.
        drop(bag_a);
        assert!(registry.resolve(&vm.session).is_none());
        drop(taken_over);
        drop(bag_b);
    }

    #[test]
    fn rebinding_reuses_the_cached_instance() {
        let registry = SharedRegistry::new();
        let bag = Bag::new(registry.clone());
        let vm = ViewModel::new();

        let mut first = None;
        bag.bind_declared::<Session>(&vm, |session| first = Some(session.id));
        let mut second = None;
        bag.bind_declared::<Session>(&vm, |session| second = Some(session.id));

        assert_eq!(first.unwrap(), second.unwrap());
    }
}
