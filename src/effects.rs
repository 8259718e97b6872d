use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::constants::*;
use crate::surface::{ElementId, Surface};

pub type Effect = Rc<dyn Fn(&mut dyn Surface, ElementId)>;

/// Effect name -> effect function. Shared by every slideshow of a host.
#[derive(Clone)]
pub struct EffectRegistry {
    effects: HashMap<String, Effect>,
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRegistry").field("effects", &self.names()).finish()
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("fade", |s: &mut dyn Surface, el| s.add_class(el, CLASS_FX_FADE));
        registry.register("slide", |s: &mut dyn Surface, el| s.add_class(el, CLASS_FX_SLIDE));
        registry.register("none", |s: &mut dyn Surface, el| s.set_opacity(el, 1.0));
        registry
    }
}

impl EffectRegistry {
    pub fn empty() -> Self {
        Self { effects: HashMap::new() }
    }

    pub fn register<F>(&mut self, name: &str, effect: F)
    where
        F: Fn(&mut dyn Surface, ElementId) + 'static,
    {
        self.effects.insert(name.to_string(), Rc::new(effect));
    }

    pub fn get(&self, name: &str) -> Option<Effect> {
        self.effects.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.effects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Applies `name` to `el`. Unknown names do nothing.
    pub fn apply(&self, name: &str, surface: &mut dyn Surface, el: ElementId) {
        if let Some(effect) = self.effects.get(name) {
            effect(surface, el);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Page;

    #[test]
    fn builtins_mark_the_slide() {
        let registry = EffectRegistry::default();
        assert_eq!(registry.names(), vec!["fade", "none", "slide"]);

        let mut page = Page::new();
        let el = page.create_element("div");
        registry.apply("fade", &mut page, el);
        registry.apply("slide", &mut page, el);
        registry.apply("none", &mut page, el);
        assert!(page.has_class(el, CLASS_FX_FADE));
        assert!(page.has_class(el, CLASS_FX_SLIDE));
        assert_eq!(page.opacity(el), Some(1.0));
    }

    #[test]
    fn unknown_effect_is_ignored() {
        let registry = EffectRegistry::default();
        let mut page = Page::new();
        let el = page.create_element("div");
        registry.apply("spin", &mut page, el);
        assert!(page.classes(el).is_empty());
        assert_eq!(page.opacity(el), None);
    }

    #[test]
    fn register_overwrites() {
        let mut registry = EffectRegistry::empty();
        registry.register("fade", |s: &mut dyn Surface, el| s.add_class(el, "custom-fade"));
        let mut page = Page::new();
        let el = page.create_element("div");
        registry.apply("fade", &mut page, el);
        assert_eq!(page.classes(el), ["custom-fade".to_string()]);
    }
}
