use std::collections::HashMap;

use crate::config::parse_int;
use crate::constants::*;
use crate::surface::{ElementId, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Prev,
    Next,
    Go,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    Prev,
    Next,
    Go(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDescriptor {
    pub element: ElementId,
    pub kind: TriggerKind,
    pub target: String,
    /// Literal index of a `Go` trigger; `None` when it does not parse.
    pub index: Option<i64>,
}

impl TriggerDescriptor {
    pub fn action(&self) -> Option<TriggerAction> {
        match self.kind {
            TriggerKind::Prev => Some(TriggerAction::Prev),
            TriggerKind::Next => Some(TriggerAction::Next),
            TriggerKind::Go => self.index.map(TriggerAction::Go),
        }
    }
}

/// Something that can route a click on `element` to a slideshow action.
pub trait ClickRegistrar {
    fn register_click(&mut self, element: ElementId, target: &str, action: TriggerAction);
}

/// Finds every trigger in the document aimed at slideshow `id`.
pub fn scan(surface: &dyn Surface, id: &str) -> Vec<TriggerDescriptor> {
    let mut triggers = Vec::new();
    for element in surface.query_attribute(ATTR_PREV, Some(id)) {
        triggers.push(TriggerDescriptor { element, kind: TriggerKind::Prev, target: id.to_string(), index: None });
    }
    for element in surface.query_attribute(ATTR_NEXT, Some(id)) {
        triggers.push(TriggerDescriptor { element, kind: TriggerKind::Next, target: id.to_string(), index: None });
    }
    for element in surface.query_attribute(ATTR_TARGET, Some(id)) {
        if let Some(raw) = surface.attribute(element, ATTR_GO) {
            triggers.push(TriggerDescriptor {
                element,
                kind: TriggerKind::Go,
                target: id.to_string(),
                index: parse_int(&raw),
            });
        }
    }
    triggers
}

/// Registers each descriptor; returns how many were bound.
pub fn bind(descriptors: &[TriggerDescriptor], registrar: &mut dyn ClickRegistrar) -> usize {
    let mut bound = 0;
    for descriptor in descriptors {
        match descriptor.action() {
            Some(action) => {
                registrar.register_click(descriptor.element, &descriptor.target, action);
                bound += 1;
            }
            None => log::warn!(
                "Ignoring go-to trigger {} for '{}': index is not a number",
                descriptor.element,
                descriptor.target
            ),
        }
    }
    bound
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub target: String,
    pub action: TriggerAction,
}

/// Click routing table. Binding an element again replaces its previous action.
#[derive(Debug, Default)]
pub struct ControlBindings {
    bindings: HashMap<ElementId, Binding>,
}

impl ControlBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element: ElementId) -> Option<&Binding> {
        self.bindings.get(&element)
    }

    /// Bindings ordered by element.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Binding)> {
        let mut entries: Vec<(ElementId, &Binding)> = self.bindings.iter().map(|(el, b)| (*el, b)).collect();
        entries.sort_by_key(|(el, _)| *el);
        entries.into_iter()
    }

    /// Drops every binding aimed at `target`.
    pub fn unbind_target(&mut self, target: &str) {
        self.bindings.retain(|_, b| b.target != target);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl ClickRegistrar for ControlBindings {
    fn register_click(&mut self, element: ElementId, target: &str, action: TriggerAction) {
        self.bindings.insert(element, Binding { target: target.to_string(), action });
    }
}
