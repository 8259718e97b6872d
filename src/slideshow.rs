use crate::config::SlideshowConfig;
use crate::constants::*;
use crate::dom::dataset_attribute;
use crate::effects::EffectRegistry;
use crate::slide::{Slide, SlideMeta};
use crate::state::SlideState;
use crate::surface::{ElementId, Surface};
use crate::timer::{TimerId, TimerQueue};

pub struct Context<'a> {
    pub surface: &'a mut dyn Surface,
    pub effects: &'a EffectRegistry,
    pub timers: &'a mut TimerQueue,
}

#[derive(Debug)]
pub struct Slideshow {
    config: SlideshowConfig,
    container: ElementId,
    slides: Vec<Slide>,
    current_slide_index: usize,
    timer: Option<TimerId>,
}

impl Slideshow {
    /// Turns every non-script child of `container` into a slide, first one
    /// visible. Does not render effects or start autoplay.
    pub fn new(surface: &mut dyn Surface, container: ElementId, config: SlideshowConfig) -> Self {
        let frames: Vec<ElementId> = surface
            .children(container)
            .into_iter()
            .filter(|child| !surface.tag_name(*child).eq_ignore_ascii_case(SCRIPT_TAG))
            .collect();

        let slides = frames
            .into_iter()
            .enumerate()
            .map(|(i, element)| Slide::attach(surface, element, i, i == 0, config.meta))
            .collect();

        Self {
            config,
            container,
            slides,
            current_slide_index: 0,
            timer: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &SlideshowConfig {
        &self.config
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide_index
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    /// Makes slide `i` the only visible one and applies the configured effect.
    fn show(&self, cx: &mut Context<'_>, i: usize) {
        let Some(shown) = self.slides.get(i) else {
            return;
        };

        for (j, slide) in self.slides.iter().enumerate() {
            let visible = j == i;
            cx.surface.set_visible(slide.element, visible);
            cx.surface.remove_class(slide.element, CLASS_FX_FADE);
            cx.surface.remove_class(slide.element, CLASS_FX_SLIDE);
            if visible {
                cx.effects.apply(&self.config.fx, &mut *cx.surface, slide.element);
            }
            if self.config.meta {
                slide.set_state(&mut *cx.surface, SlideState::from_visible(visible));
            }
        }

        if self.config.autoheight {
            let height = cx.surface.rendered_height(shown.element);
            cx.surface.set_height(self.container, height);
        }
        if self.config.meta {
            cx.surface.set_attribute(self.container, ATTR_INDEX, &i.to_string());
        }

        log::debug!("{}: showing slide {}/{}", self.config.id, i + 1, self.slides.len());
    }

    pub fn refresh(&self, cx: &mut Context<'_>) {
        self.show(cx, self.current_slide_index);
    }

    pub fn next(&mut self, cx: &mut Context<'_>) {
        let count = self.slides.len();
        if count == 0 {
            return;
        }
        self.current_slide_index = (self.current_slide_index + 1) % count;
        self.refresh(cx);
    }

    pub fn prev(&mut self, cx: &mut Context<'_>) {
        let count = self.slides.len();
        if count == 0 {
            return;
        }
        self.current_slide_index = (self.current_slide_index + count - 1) % count;
        self.refresh(cx);
    }

    /// Jumps to `i` modulo the slide count; negative indices count back from the end.
    pub fn go(&mut self, cx: &mut Context<'_>, i: i64) {
        let count = self.slides.len();
        if count == 0 {
            return;
        }
        self.current_slide_index = i.rem_euclid(count as i64) as usize;
        self.refresh(cx);
    }

    /// Starts autoplay. Already playing: nothing changes.
    pub fn play(&mut self, timers: &mut TimerQueue) {
        if self.timer.is_none() {
            self.timer = Some(timers.set_interval(&self.config.id, self.config.timeout_ms));
        }
    }

    pub fn pause(&mut self, timers: &mut TimerQueue) {
        if let Some(timer) = self.timer.take() {
            timers.clear(timer);
        }
    }

    /// Stops autoplay and empties the container. The slideshow is unusable afterwards.
    pub fn teardown(mut self, cx: &mut Context<'_>) {
        self.pause(cx.timers);
        cx.surface.clear_children(self.container);
        self.slides.clear();
    }

    pub fn slide_meta(&self, surface: &dyn Surface) -> Option<SlideMeta> {
        let slide = self.slides.get(self.current_slide_index)?;
        Some(SlideMeta {
            index: self.current_slide_index,
            caption: slide.caption(surface),
            state: slide.state(surface),
            element: slide.element,
        })
    }

    /// Appends `node` as a hidden last slide, copying `metadata` onto it as
    /// `data-*` attributes. The current slide does not change. Returns false
    /// when `node` is the container or one of its ancestors.
    pub fn add_slide<I, K, V>(&mut self, surface: &mut dyn Surface, node: ElementId, metadata: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if surface.contains(node, self.container) {
            log::warn!("Slideshow '{}' cannot take {node} as a slide: it encloses the container", self.config.id);
            return false;
        }
        let slide = Slide::attach(surface, node, self.slides.len(), false, self.config.meta);
        for (key, value) in metadata {
            surface.set_attribute(node, &dataset_attribute(key.as_ref()), value.as_ref());
        }
        surface.append_child(self.container, node);
        self.slides.push(slide);
        true
    }

    /// Removes slide `i` from the page and the sequence. Returns false when `i`
    /// is out of range.
    pub fn remove_slide(&mut self, cx: &mut Context<'_>, i: usize) -> bool {
        if i >= self.slides.len() {
            return false;
        }
        let removed = self.slides.remove(i);
        cx.surface.remove_child(self.container, removed.element);
        for (ordinal, slide) in self.slides.iter_mut().enumerate().skip(i) {
            slide.renumber(&mut *cx.surface, ordinal);
        }
        if self.current_slide_index >= self.slides.len() {
            self.current_slide_index = 0;
        }
        self.refresh(cx);
        true
    }

    pub fn set_fx(&mut self, effects: &EffectRegistry, name: &str) -> bool {
        if !effects.contains(name) {
            return false;
        }
        self.config.fx = name.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Page;

    struct Fixture {
        page: Page,
        effects: EffectRegistry,
        timers: TimerQueue,
        show: Slideshow,
    }

    impl Fixture {
        fn new(count: usize, meta: bool) -> Self {
            let mut page = Page::new();
            let body = page.body();
            let container = page.create_element("div");
            page.append_child(body, container);
            for i in 0..count {
                let el = page.create_element("section");
                page.set_natural_height(el, 100.0 + i as f32 * 10.0);
                page.append_child(container, el);
            }
            let config = SlideshowConfig {
                id: "deck".into(),
                fx: "fade".into(),
                timeout_ms: 3000,
                autoheight: true,
                meta,
            };
            let show = Slideshow::new(&mut page, container, config);
            Self { page, effects: EffectRegistry::default(), timers: TimerQueue::new(), show }
        }

        fn run(&mut self, f: impl FnOnce(&mut Slideshow, &mut Context<'_>)) {
            let mut cx = Context { surface: &mut self.page, effects: &self.effects, timers: &mut self.timers };
            f(&mut self.show, &mut cx);
        }

        fn visible(&self) -> Vec<bool> {
            self.show.slides().iter().map(|s| self.page.is_visible(s.element)).collect()
        }
    }

    #[test]
    fn next_cycles_through_every_slide() {
        let mut fx = Fixture::new(4, false);
        for step in 1..=8 {
            fx.run(|s, cx| s.next(cx));
            assert_eq!(fx.show.current_slide(), step % 4);
            assert!(fx.show.current_slide() < 4);
        }
    }

    #[test]
    fn prev_wraps_to_last() {
        let mut fx = Fixture::new(3, false);
        fx.run(|s, cx| {
            s.go(cx, 0);
            s.prev(cx);
        });
        assert_eq!(fx.show.current_slide(), 2);
        assert_eq!(fx.visible(), vec![false, false, true]);
    }

    #[test]
    fn go_normalises_out_of_range_indices() {
        let mut fx = Fixture::new(3, false);
        fx.run(|s, cx| s.go(cx, 7));
        assert_eq!(fx.show.current_slide(), 1);
        fx.run(|s, cx| s.go(cx, -1));
        assert_eq!(fx.show.current_slide(), 2);
        fx.run(|s, cx| s.go(cx, -7));
        assert_eq!(fx.show.current_slide(), 2);
    }

    #[test]
    fn show_marks_effect_height_and_state() {
        let mut fx = Fixture::new(3, true);
        fx.run(|s, cx| s.next(cx));
        let slides = fx.show.slides().to_vec();
        assert!(fx.page.has_class(slides[1].element, CLASS_FX_FADE));
        assert!(!fx.page.has_class(slides[0].element, CLASS_FX_FADE));
        assert_eq!(fx.page.style_height(fx.show.container()), Some(110.0));
        assert_eq!(fx.page.attribute(slides[1].element, ATTR_STATE).as_deref(), Some("active"));
        assert_eq!(fx.page.attribute(slides[0].element, ATTR_STATE).as_deref(), Some("inactive"));
        assert_eq!(fx.page.attribute(fx.show.container(), ATTR_INDEX).as_deref(), Some("1"));
    }

    #[test]
    fn zero_slides_make_navigation_a_no_op() {
        let mut fx = Fixture::new(0, true);
        fx.run(|s, cx| {
            s.next(cx);
            s.prev(cx);
            s.go(cx, 5);
            assert!(!s.remove_slide(cx, 0));
        });
        assert_eq!(fx.show.current_slide(), 0);
        assert!(fx.show.slide_meta(&fx.page).is_none());
    }

    #[test]
    fn play_is_idempotent_and_pause_stops() {
        let mut fx = Fixture::new(2, false);
        fx.show.play(&mut fx.timers);
        fx.show.play(&mut fx.timers);
        assert_eq!(fx.timers.active_count(), 1);
        fx.show.pause(&mut fx.timers);
        assert!(!fx.show.is_playing());
        assert_eq!(fx.timers.active_count(), 0);
    }

    #[test]
    fn remove_slide_renumbers_and_resets_index() {
        let mut fx = Fixture::new(3, false);
        fx.run(|s, cx| s.go(cx, 2));
        fx.run(|s, cx| assert!(s.remove_slide(cx, 2)));
        assert_eq!(fx.show.current_slide(), 0);
        assert_eq!(fx.visible(), vec![true, false]);

        fx.run(|s, cx| assert!(s.remove_slide(cx, 0)));
        let remaining = fx.show.slides()[0].clone();
        assert_eq!(remaining.ordinal, 0);
        assert_eq!(fx.page.attribute(remaining.element, ATTR_INDEX).as_deref(), Some("0"));
    }

    #[test]
    fn set_fx_requires_a_registered_effect() {
        let mut fx = Fixture::new(2, false);
        assert!(!fx.show.set_fx(&fx.effects, "nonexistent"));
        assert_eq!(fx.show.config().fx, "fade");
        assert!(fx.show.set_fx(&fx.effects, "slide"));
        fx.run(|s, cx| s.next(cx));
        let el = fx.show.slides()[1].element;
        assert!(fx.page.has_class(el, CLASS_FX_SLIDE));
        assert!(!fx.page.has_class(el, CLASS_FX_FADE));
    }
}
