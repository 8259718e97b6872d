use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::config::SlideshowConfig;
use crate::constants::*;
use crate::controls::{self, ControlBindings, TriggerAction};
use crate::effects::EffectRegistry;
use crate::registry::{InstanceRegistry, Lookup};
use crate::slide::SlideMeta;
use crate::slideshow::{Context, Slideshow};
use crate::surface::{ElementId, Surface};
use crate::timer::TimerQueue;

#[derive(Debug)]
pub struct SlideshowHost<S: Surface> {
    surface: S,
    effects: EffectRegistry,
    instances: InstanceRegistry,
    timers: TimerQueue,
    controls: ControlBindings,
}

impl<S: Surface> SlideshowHost<S> {
    pub fn new(surface: S) -> Self {
        Self::with_registries(surface, EffectRegistry::default(), InstanceRegistry::new())
    }

    pub fn with_registries(surface: S, effects: EffectRegistry, instances: InstanceRegistry) -> Self {
        Self {
            surface,
            effects,
            instances,
            timers: TimerQueue::new(),
            controls: ControlBindings::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }

    pub fn controls(&self) -> &ControlBindings {
        &self.controls
    }

    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub fn register_effect<F>(&mut self, name: &str, effect: F)
    where
        F: Fn(&mut dyn Surface, ElementId) + 'static,
    {
        self.effects.register(name, effect);
    }

    pub fn slideshow<'a>(&self, key: impl Into<Lookup<'a>>) -> Option<&Slideshow> {
        let id = key.into().resolve(&self.surface)?;
        self.instances.get(&id)
    }

    pub fn get<'a>(&mut self, key: impl Into<Lookup<'a>>) -> Option<SlideshowApi<'_, S>> {
        let id = key.into().resolve(&self.surface)?;
        if !self.instances.contains(&id) {
            return None;
        }
        Some(SlideshowApi { id, host: self })
    }

    /// Resolves `selector` and boots a slideshow on it; `None` when nothing matches.
    pub fn select(&mut self, selector: &str) -> Option<SlideshowApi<'_, S>> {
        let container = self.surface.query_selector(selector)?;
        Some(self.init(container))
    }

    /// Boots every container marked `data-slideshow`, in document order.
    pub fn init_declared(&mut self) -> Vec<String> {
        self.surface
            .query_attribute(ATTR_DECLARED, None)
            .into_iter()
            .map(|container| self.init(container).id().to_string())
            .collect()
    }

    /// Turns `container` into a slideshow: reads its configuration, marks its
    /// slides, wires declarative triggers, shows the first slide and starts
    /// autoplay.
    pub fn init(&mut self, container: ElementId) -> SlideshowApi<'_, S> {
        let id = match self.surface.attribute(container, "id").filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => self.generate_id(),
        };
        self.surface.set_attribute(container, "id", &id);

        if self.instances.contains(&id) {
            log::warn!("Slideshow '{id}' initialized again, replacing the live instance");
            self.retire(&id);
        }

        let config = SlideshowConfig::from_container(&self.surface, container, id.clone());
        let mut show = Slideshow::new(&mut self.surface, container, config);

        let triggers = controls::scan(&self.surface, &id);
        let bound = controls::bind(&triggers, &mut self.controls);

        let config = show.config();
        log::info!(
            "Slideshow initialized: {id} (slides: {}, effect: {}, timeout: {}ms, autoheight: {}, triggers: {bound})",
            show.slide_count(),
            config.fx,
            config.timeout_ms,
            config.autoheight,
        );

        let mut cx = Context {
            surface: &mut self.surface,
            effects: &self.effects,
            timers: &mut self.timers,
        };
        show.refresh(&mut cx);
        show.play(&mut self.timers);
        self.instances.insert(show);

        SlideshowApi { id, host: self }
    }

    fn generate_id(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let mut id = format!("{GENERATED_ID_PREFIX}{millis}");
        let mut rng = rand::rng();
        while self.instances.contains(&id) || self.surface.element_by_id(&id).is_some() {
            id = format!("{GENERATED_ID_PREFIX}{millis}-{:04x}", rng.random::<u16>());
        }
        id
    }

    /// Stops a replaced instance's timer and triggers without touching its container.
    fn retire(&mut self, id: &str) {
        if let Some(mut old) = self.instances.remove(id) {
            old.pause(&mut self.timers);
        }
        self.controls.unbind_target(id);
    }

    // --- Autoplay and triggers ---

    /// Advances virtual time, moving every slideshow whose autoplay fires.
    /// Returns how many advances happened.
    pub fn tick(&mut self, elapsed_ms: u64) -> usize {
        let deadline = self.timers.now() + elapsed_ms;
        let mut advanced = 0;
        while let Some(fired) = self.timers.pop_due(deadline) {
            match self.instances.get_mut(&fired.owner) {
                Some(show) => {
                    let mut cx = Context {
                        surface: &mut self.surface,
                        effects: &self.effects,
                        timers: &mut self.timers,
                    };
                    show.next(&mut cx);
                    advanced += 1;
                }
                None => self.timers.clear(fired.timer),
            }
        }
        self.timers.settle(deadline);
        advanced
    }

    /// Dispatches a click on `element`. Returns false when it is not a bound trigger.
    pub fn click(&mut self, element: ElementId) -> bool {
        let Some(binding) = self.controls.get(element).cloned() else {
            return false;
        };
        let Some(mut api) = self.get(binding.target.as_str()) else {
            return false;
        };
        match binding.action {
            TriggerAction::Prev => api.prev(),
            TriggerAction::Next => api.next(),
            TriggerAction::Go(i) => api.go(i),
        }
        true
    }

    /// Destroys the slideshow named by `key`. Missing slideshows are ignored.
    pub fn destroy<'a>(&mut self, key: impl Into<Lookup<'a>>) -> bool {
        match self.get(key) {
            Some(api) => {
                api.destroy();
                true
            }
            None => false,
        }
    }
}

/// Control handle for one live slideshow.
///
/// The handle borrows the host, so it lives only as long as no other host
/// operation runs; [`destroy`](Self::destroy) consumes it.
#[derive(Debug)]
pub struct SlideshowApi<'h, S: Surface> {
    id: String,
    host: &'h mut SlideshowHost<S>,
}

impl<S: Surface> SlideshowApi<'_, S> {
    fn with<R>(&mut self, f: impl FnOnce(&mut Slideshow, &mut Context<'_>) -> R) -> Option<R> {
        let host = &mut *self.host;
        let show = host.instances.get_mut(&self.id)?;
        let mut cx = Context {
            surface: &mut host.surface,
            effects: &host.effects,
            timers: &mut host.timers,
        };
        Some(f(show, &mut cx))
    }

    fn inspect<R>(&self, f: impl FnOnce(&Slideshow) -> R) -> Option<R> {
        self.host.instances.get(&self.id).map(f)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn next(&mut self) {
        self.with(|show, cx| show.next(cx));
    }

    pub fn prev(&mut self) {
        self.with(|show, cx| show.prev(cx));
    }

    pub fn go(&mut self, i: i64) {
        self.with(|show, cx| show.go(cx, i));
    }

    pub fn refresh(&mut self) {
        self.with(|show, cx| show.refresh(cx));
    }

    pub fn play(&mut self) {
        self.with(|show, cx| show.play(cx.timers));
    }

    pub fn pause(&mut self) {
        self.with(|show, cx| show.pause(cx.timers));
    }

    /// Stops autoplay, clears the container, unbinds triggers and forgets the slideshow.
    pub fn destroy(self) {
        let host = self.host;
        if let Some(show) = host.instances.remove(&self.id) {
            let mut cx = Context {
                surface: &mut host.surface,
                effects: &host.effects,
                timers: &mut host.timers,
            };
            show.teardown(&mut cx);
        }
        host.controls.unbind_target(&self.id);
        log::debug!("Slideshow destroyed: {}", self.id);
    }

    pub fn current_slide(&self) -> usize {
        self.inspect(Slideshow::current_slide).unwrap_or_default()
    }

    pub fn slide_count(&self) -> usize {
        self.inspect(Slideshow::slide_count).unwrap_or_default()
    }

    pub fn is_playing(&self) -> bool {
        self.inspect(Slideshow::is_playing).unwrap_or_default()
    }

    pub fn config(&self) -> Option<SlideshowConfig> {
        self.inspect(|show| show.config().clone())
    }

    pub fn container(&self) -> Option<ElementId> {
        self.inspect(Slideshow::container)
    }

    pub fn slide_meta(&self) -> Option<SlideMeta> {
        let show = self.host.instances.get(&self.id)?;
        show.slide_meta(&self.host.surface)
    }

    pub fn add_slide<I, K, V>(&mut self, node: ElementId, metadata: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.with(|show, cx| show.add_slide(&mut *cx.surface, node, metadata)).unwrap_or(false)
    }

    pub fn remove_slide(&mut self, i: usize) -> bool {
        self.with(|show, cx| show.remove_slide(cx, i)).unwrap_or(false)
    }

    pub fn set_fx(&mut self, name: &str) -> bool {
        self.with(|show, cx| show.set_fx(cx.effects, name)).unwrap_or(false)
    }

    pub fn surface(&self) -> &S {
        &self.host.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.host.surface
    }
}
