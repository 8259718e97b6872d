//! Declarative slideshows for page containers.
//!
//! A container's children become a cycling slide sequence configured through
//! `data-slide-*` attributes: transition effect, autoplay interval, automatic
//! height and per-slide state tracking. Trigger elements elsewhere on the page
//! navigate a slideshow through `data-slide-prev`, `data-slide-next` and
//! `data-slide-go` attributes.
//!
//! Rendering goes through the [`Surface`] trait; [`Page`] is the in-memory
//! implementation used by the tests, the simulator and the viewer.

pub mod config;
pub mod constants;
pub mod controls;
pub mod dom;
pub mod effects;
pub mod error;
pub mod host;
pub mod registry;
pub mod slide;
pub mod slideshow;
pub mod state;
pub mod surface;
pub mod timer;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use config::SlideshowConfig;
pub use dom::Page;
pub use effects::{Effect, EffectRegistry};
pub use error::PageError;
pub use host::{SlideshowApi, SlideshowHost};
pub use registry::{InstanceRegistry, Lookup};
pub use slide::{Slide, SlideMeta};
pub use slideshow::{Context, Slideshow};
pub use state::SlideState;
pub use surface::{ElementId, Surface};
