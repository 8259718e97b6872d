use crate::constants::*;
use crate::state::SlideState;
use crate::surface::{ElementId, Surface};

/// One frame of a slideshow: the element plus its position in the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub element: ElementId,
    pub ordinal: usize,
}

impl Slide {
    /// Marks `element` as a slide frame at `ordinal`.
    pub fn attach(surface: &mut dyn Surface, element: ElementId, ordinal: usize, visible: bool, track_state: bool) -> Self {
        surface.add_class(element, CLASS_FRAME);
        surface.set_visible(element, visible);
        let slide = Self { element, ordinal };
        slide.write_ordinal(surface);
        if track_state {
            slide.set_state(surface, SlideState::from_visible(visible));
        }
        slide
    }

    pub fn renumber(&mut self, surface: &mut dyn Surface, ordinal: usize) {
        self.ordinal = ordinal;
        self.write_ordinal(surface);
    }

    fn write_ordinal(&self, surface: &mut dyn Surface) {
        surface.set_attribute(self.element, ATTR_INDEX, &self.ordinal.to_string());
    }

    pub fn set_state(&self, surface: &mut dyn Surface, state: SlideState) {
        surface.set_attribute(self.element, ATTR_STATE, state.as_str());
    }

    pub fn caption(&self, surface: &dyn Surface) -> Option<String> {
        surface.attribute(self.element, ATTR_CAPTION).filter(|c| !c.is_empty())
    }

    /// Recorded state; slides that never had one recorded read as active.
    pub fn state(&self, surface: &dyn Surface) -> SlideState {
        surface
            .attribute(self.element, ATTR_STATE)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

/// Snapshot returned by `slide_meta`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideMeta {
    pub index: usize,
    pub caption: Option<String>,
    pub state: SlideState,
    pub element: ElementId,
}
