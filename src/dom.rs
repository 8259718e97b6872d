//! In-memory page model.
//!
//! [`Page`] is a small element tree implementing [`Surface`]. It is what the
//! tests, the `simulate` command and the viewer render into. Pages are built
//! programmatically or loaded from a JSON fixture:
//!
//! ```json
//! { "elements": [
//!     { "tag": "div", "id": "gallery", "attrs": { "data-slide-fx": "slide" },
//!       "children": [ { "tag": "img", "height": 240 } ] }
//! ] }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::PageError;
use crate::surface::{ElementId, Surface};

/// Fixture root.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Natural rendered height in pixels.
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    display: Option<bool>,
    opacity: Option<f32>,
    style_height: Option<f32>,
    natural_height: f32,
    text: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            display: None,
            opacity: None,
            style_height: None,
            natural_height: 0.0,
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Element tree rooted at a `body` element.
///
/// Detached elements stay in the arena so callers holding an [`ElementId`]
/// can still inspect or re-attach them, but they no longer show up in queries.
#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<Node>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self { nodes: vec![Node::new("body")] }
    }

    pub fn body(&self) -> ElementId {
        ElementId(0)
    }

    pub fn from_spec(spec: &PageSpec) -> Result<Self, PageError> {
        let mut page = Page::new();
        let mut seen = HashSet::new();
        let body = page.body();
        for element in &spec.elements {
            page.build(body, element, &mut seen)?;
        }
        Ok(page)
    }

    pub fn from_json(json: &str) -> Result<Self, PageError> {
        let spec: PageSpec = serde_json::from_str(json)?;
        Self::from_spec(&spec)
    }

    pub fn load(path: &Path) -> Result<Self, PageError> {
        let json = fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn build(&mut self, parent: ElementId, spec: &ElementSpec, seen: &mut HashSet<String>) -> Result<ElementId, PageError> {
        let el = self.create_element(&spec.tag);
        for (name, value) in &spec.attrs {
            self.set_attribute(el, name, value);
        }
        if let Some(id) = spec.id.as_deref().or_else(|| spec.attrs.get("id").map(String::as_str)) {
            if !seen.insert(id.to_string()) {
                return Err(PageError::DuplicateId(id.to_string()));
            }
            self.set_attribute(el, "id", id);
        }
        for class in &spec.classes {
            self.add_class(el, class);
        }
        self.set_natural_height(el, spec.height);
        if let Some(text) = &spec.text {
            self.set_text(el, text);
        }
        self.append_child(parent, el);
        for child in &spec.children {
            self.build(el, child, seen)?;
        }
        Ok(el)
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.push(Node::new(tag));
        ElementId(self.nodes.len() - 1)
    }

    pub fn set_natural_height(&mut self, el: ElementId, px: f32) {
        self.nodes[el.0].natural_height = px;
    }

    pub fn set_text(&mut self, el: ElementId, text: &str) {
        self.nodes[el.0].text = Some(text.to_string());
    }

    pub fn text(&self, el: ElementId) -> Option<&str> {
        self.nodes[el.0].text.as_deref()
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.nodes[el.0].parent
    }

    pub fn opacity(&self, el: ElementId) -> Option<f32> {
        self.nodes[el.0].opacity
    }

    pub fn style_height(&self, el: ElementId) -> Option<f32> {
        self.nodes[el.0].style_height
    }

    pub fn classes(&self, el: ElementId) -> &[String] {
        &self.nodes[el.0].classes
    }

    /// True while the element is reachable from `body`.
    pub fn is_attached(&self, el: ElementId) -> bool {
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            if current == self.body() {
                return true;
            }
            cursor = self.nodes[current.0].parent;
        }
        false
    }

    /// Attached elements in document order, `body` excluded.
    pub fn descendants(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.nodes[0].children.iter().rev().copied().collect();
        while let Some(el) = stack.pop() {
            out.push(el);
            stack.extend(self.nodes[el.0].children.iter().rev().copied());
        }
        out
    }

    /// Indented one-line-per-element dump of `root` and its subtree.
    pub fn outline(&self, root: ElementId) -> String {
        let mut lines = Vec::new();
        self.outline_into(root, 0, &mut lines);
        lines.join("\n")
    }

    fn outline_into(&self, el: ElementId, depth: usize, lines: &mut Vec<String>) {
        let node = &self.nodes[el.0];
        let mut line = format!("{}{}", "  ".repeat(depth), node.tag);
        if let Some(id) = node.attrs.get("id") {
            line.push('#');
            line.push_str(id);
        }
        for class in &node.classes {
            line.push('.');
            line.push_str(class);
        }
        if node.display == Some(false) {
            line.push_str(" hidden");
        }
        for (name, value) in node.attrs.iter().filter(|(name, _)| name.as_str() != "id") {
            line.push_str(&format!(" {name}=\"{value}\""));
        }
        if let Some(height) = node.style_height {
            line.push_str(&format!(" height={height}"));
        }
        if let Some(opacity) = node.opacity {
            line.push_str(&format!(" opacity={opacity}"));
        }
        lines.push(line);
        for child in &node.children {
            self.outline_into(*child, depth + 1, lines);
        }
    }

    fn detach(&mut self, child: ElementId) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != child);
        }
    }
}

impl Surface for Page {
    fn tag_name(&self, el: ElementId) -> String {
        self.nodes[el.0].tag.clone()
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.nodes[el.0].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        self.nodes[el.0].attrs.insert(name.to_string(), value.to_string());
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        let classes = &mut self.nodes[el.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        self.nodes[el.0].classes.retain(|c| c != class);
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.nodes[el.0].classes.iter().any(|c| c == class)
    }

    fn set_visible(&mut self, el: ElementId, visible: bool) {
        self.nodes[el.0].display = Some(visible);
    }

    fn is_visible(&self, el: ElementId) -> bool {
        self.nodes[el.0].display != Some(false)
    }

    fn set_opacity(&mut self, el: ElementId, opacity: f32) {
        self.nodes[el.0].opacity = Some(opacity);
    }

    fn rendered_height(&self, el: ElementId) -> f32 {
        let node = &self.nodes[el.0];
        if node.display == Some(false) {
            return 0.0;
        }
        node.style_height.unwrap_or(node.natural_height)
    }

    fn set_height(&mut self, el: ElementId, px: f32) {
        self.nodes[el.0].style_height = Some(px);
    }

    fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.nodes[el.0].children.clone()
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if self.contains(child, parent) {
            log::warn!("Refusing to append {child} under its own descendant {parent}");
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn remove_child(&mut self, parent: ElementId, child: ElementId) {
        if self.nodes[child.0].parent == Some(parent) {
            self.detach(child);
        }
    }

    fn clear_children(&mut self, parent: ElementId) {
        for child in std::mem::take(&mut self.nodes[parent.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    /// Resolves `#id`, `.class` or a bare tag name to the first match.
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            return self.element_by_id(id);
        }
        if let Some(class) = selector.strip_prefix('.') {
            return self.descendants().into_iter().find(|el| self.has_class(*el, class));
        }
        let tag = selector.to_ascii_lowercase();
        self.descendants().into_iter().find(|el| self.nodes[el.0].tag == tag)
    }

    fn query_attribute(&self, name: &str, value: Option<&str>) -> Vec<ElementId> {
        self.descendants()
            .into_iter()
            .filter(|el| match (self.nodes[el.0].attrs.get(name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            })
            .collect()
    }
}

/// Maps a dataset key to its attribute name: `slideIndex` -> `data-slide-index`.
pub fn dataset_attribute(key: &str) -> String {
    let mut name = String::from("data-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "elements": [
            { "tag": "div", "id": "gallery", "classes": ["slideshow"], "children": [
                { "tag": "img", "height": 120 },
                { "tag": "SCRIPT" }
            ] },
            { "tag": "button", "attrs": { "data-slide-next": "gallery" } }
        ]
    }"#;

    #[test]
    fn loads_fixture_tree() {
        let page = Page::from_json(FIXTURE).unwrap();
        let gallery = page.element_by_id("gallery").unwrap();
        let children = page.children(gallery);
        assert_eq!(children.len(), 2);
        assert_eq!(page.tag_name(children[1]), "script");
        assert_eq!(page.rendered_height(children[0]), 120.0);
        assert_eq!(page.query_selector(".slideshow"), Some(gallery));
        assert_eq!(page.query_selector("button").map(|b| page.attribute(b, "data-slide-next")), Some(Some("gallery".to_string())));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"{ "elements": [ { "tag": "div", "id": "a" }, { "tag": "p", "id": "a" } ] }"#;
        assert!(matches!(Page::from_json(json), Err(PageError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn hidden_elements_have_no_height() {
        let mut page = Page::new();
        let el = page.create_element("div");
        page.set_natural_height(el, 80.0);
        assert_eq!(page.rendered_height(el), 80.0);
        page.set_visible(el, false);
        assert_eq!(page.rendered_height(el), 0.0);
    }

    #[test]
    fn detached_elements_leave_queries() {
        let mut page = Page::new();
        let body = page.body();
        let el = page.create_element("div");
        page.set_attribute(el, "data-slide-prev", "x");
        assert!(page.query_attribute("data-slide-prev", None).is_empty());
        page.append_child(body, el);
        assert_eq!(page.query_attribute("data-slide-prev", Some("x")), vec![el]);
        page.clear_children(body);
        assert!(!page.is_attached(el));
        assert!(page.query_attribute("data-slide-prev", Some("x")).is_empty());
    }

    #[test]
    fn appending_an_ancestor_is_ignored() {
        let mut page = Page::from_json(FIXTURE).unwrap();
        let gallery = page.element_by_id("gallery").unwrap();
        let img = page.children(gallery)[0];

        page.append_child(gallery, gallery);
        page.append_child(img, gallery);
        assert_eq!(page.parent(gallery), Some(page.body()));
        assert_eq!(page.parent(img), Some(gallery));
        assert!(page.is_attached(gallery));
        assert_eq!(page.outline(gallery).lines().count(), 3);
    }

    #[test]
    fn dataset_keys_become_kebab_attributes() {
        assert_eq!(dataset_attribute("caption"), "data-caption");
        assert_eq!(dataset_attribute("slideIndex"), "data-slide-index");
        assert_eq!(dataset_attribute("photoCreditURL"), "data-photo-credit-u-r-l");
    }
}
