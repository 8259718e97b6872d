use std::collections::BTreeMap;

use crate::slideshow::Slideshow;
use crate::surface::{ElementId, Surface};

/// Key accepted by lookups: an identifier or an element carrying one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Id(&'a str),
    Element(ElementId),
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(id: &'a str) -> Self {
        Lookup::Id(id)
    }
}

impl<'a> From<&'a String> for Lookup<'a> {
    fn from(id: &'a String) -> Self {
        Lookup::Id(id.as_str())
    }
}

impl From<ElementId> for Lookup<'_> {
    fn from(el: ElementId) -> Self {
        Lookup::Element(el)
    }
}

impl Lookup<'_> {
    /// Identifier this key names, if any.
    pub fn resolve(&self, surface: &dyn Surface) -> Option<String> {
        match self {
            Lookup::Id(id) => Some((*id).to_string()),
            Lookup::Element(el) => surface.attribute(*el, "id"),
        }
    }
}

#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: BTreeMap<String, Slideshow>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `show` under its id, handing back whatever it replaced.
    pub fn insert(&mut self, show: Slideshow) -> Option<Slideshow> {
        self.instances.insert(show.id().to_string(), show)
    }

    pub fn remove(&mut self, id: &str) -> Option<Slideshow> {
        self.instances.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Slideshow> {
        self.instances.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Slideshow> {
        self.instances.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
