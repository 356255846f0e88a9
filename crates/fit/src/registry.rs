use crate::context::Context;
use crate::error::FixtureError;
use crate::fixture::{Fixture, IgnoringFixture};
use std::collections::HashMap;

pub type FixtureFactory = Box<dyn Fn(&mut Context) -> Box<dyn Fixture>>;

/// Maps fixture class names, as written in table headers, to constructors.
#[derive(Default)]
pub struct FixtureRegistry {
    factories: HashMap<String, FixtureFactory>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry knowing `fit.Fixture`, which ignores every cell.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("fit.Fixture", |_| IgnoringFixture);
        registry
    }

    pub fn register<F, C>(&mut self, name: &str, constructor: C)
    where
        F: Fixture + 'static,
        C: Fn(&mut Context) -> F + 'static,
    {
        log::trace!(target: "fit.registry", "registering {name}");
        let factory: FixtureFactory =
            Box::new(move |context: &mut Context| -> Box<dyn Fixture> {
                Box::new(constructor(context))
            });
        self.factories.insert(name.to_string(), factory);
    }

    /// Looks `name` up exactly, then by its simple name (the part after the last `.`).
    ///
    /// A bare name also matches a single qualified registration with that simple name;
    /// when several qualified names share it, the lookup fails. A qualified name never
    /// resolves to a registration under another package.
    fn factory(&self, name: &str) -> Option<&FixtureFactory> {
        let name = name.trim();
        if let Some(found) = self.factories.get(name) {
            return Some(found);
        }
        let simple = simple_name(name);
        if let Some(found) = self.factories.get(simple) {
            return Some(found);
        }
        if simple != name {
            return None;
        }
        let mut matches = self
            .factories
            .iter()
            .filter(|(registered, _)| simple_name(registered) == simple);
        let (_, found) = matches.next()?;
        if matches.next().is_some() {
            log::warn!(target: "fit.registry", "ambiguous fixture name {name}");
            return None;
        }
        Some(found)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factory(name).is_some()
    }

    pub fn create(
        &self,
        name: &str,
        context: &mut Context,
    ) -> Result<Box<dyn Fixture>, FixtureError> {
        match self.factory(name) {
            Some(factory) => Ok(factory(context)),
            None => Err(FixtureError::UnknownFixture {
                name: name.to_string(),
            }),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
