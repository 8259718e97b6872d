use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait Surface {
    fn tag_name(&self, el: ElementId) -> String;

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);

    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);
    fn has_class(&self, el: ElementId, class: &str) -> bool;

    /// `display: block` when true, `display: none` otherwise.
    fn set_visible(&mut self, el: ElementId, visible: bool);
    fn is_visible(&self, el: ElementId) -> bool;
    fn set_opacity(&mut self, el: ElementId, opacity: f32);

    /// Height the element currently occupies; zero while hidden.
    fn rendered_height(&self, el: ElementId) -> f32;
    fn set_height(&mut self, el: ElementId, px: f32);

    fn children(&self, el: ElementId) -> Vec<ElementId>;
    fn append_child(&mut self, parent: ElementId, child: ElementId);
    fn remove_child(&mut self, parent: ElementId, child: ElementId);
    fn clear_children(&mut self, parent: ElementId);

    /// True when `el` is `ancestor` or sits somewhere below it.
    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        ancestor == el || self.children(ancestor).into_iter().any(|child| self.contains(child, el))
    }

    /// Every element carrying `name` (and equal to `value` when given), in document order.
    fn query_attribute(&self, name: &str, value: Option<&str>) -> Vec<ElementId>;

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.query_attribute("id", Some(id)).into_iter().next()
    }

    /// Resolves a selector to its first match. The default understands `#id`
    /// and a bare id.
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        let selector = selector.trim();
        self.element_by_id(selector.strip_prefix('#').unwrap_or(selector))
    }
}
