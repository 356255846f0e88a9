use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Shared objects for the fixtures of one run, at most one instance per type.
///
/// Fixture constructors receive the context, so helpers such as connection pools or
/// set-up caches can be shared across tables. `clear` starts over.
#[derive(Default)]
pub struct Context {
    instances: HashMap<TypeId, Box<dyn Any>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored instance of `T`, creating it with `T::default()` on first use.
    pub fn get_or_create<T: Default + 'static>(&mut self) -> &mut T {
        self.get_or_create_with(T::default)
    }

    pub fn get_or_create_with<T: 'static, F: FnOnce() -> T>(&mut self, create: F) -> &mut T {
        let slot = self
            .instances
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(create()));
        match slot.downcast_mut::<T>() {
            Some(value) => value,
            None => unreachable!("context slot keyed by the wrong type"),
        }
    }

    /// Stores `value`, replacing any instance of the same type.
    pub fn inject<T: 'static>(&mut self, value: T) {
        self.instances.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.instances.get(&TypeId::of::<T>())?.downcast_ref()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.instances.contains_key(&TypeId::of::<T>())
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Service {
        calls: u32,
    }

    trait Greeter {
        fn greet(&self) -> &'static str;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> &'static str {
            "hello"
        }
    }

    #[test]
    fn get_or_create_returns_the_same_instance() {
        let mut context = Context::new();
        context.get_or_create::<Service>().calls += 1;
        context.get_or_create::<Service>().calls += 1;
        assert_eq!(context.get::<Service>().map(|s| s.calls), Some(2));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn injected_instance_wins_over_factory() {
        let mut context = Context::new();
        context.inject(Service { calls: 7 });
        let service = context.get_or_create_with(|| Service { calls: 0 });
        assert_eq!(service.calls, 7);
    }

    #[test]
    fn trait_objects_are_stored_by_their_box_type() {
        let mut context = Context::new();
        let greeter =
            context.get_or_create_with::<Box<dyn Greeter>, _>(|| Box::new(English));
        assert_eq!(greeter.greet(), "hello");
        assert!(context.contains::<Box<dyn Greeter>>());
        assert!(!context.contains::<English>());
    }

    #[test]
    fn clear_drops_everything() {
        let mut context = Context::new();
        context.get_or_create::<Service>().calls = 3;
        context.clear();
        assert!(context.is_empty());
        assert_eq!(context.get_or_create::<Service>().calls, 0);
    }
}
