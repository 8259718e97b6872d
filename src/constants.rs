pub const DEFAULT_FX: &str = "fade";            // Effect used when the container names none
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;          // Autoplay interval when unset or malformed
pub const GENERATED_ID_PREFIX: &str = "slide-";    // Prefix for ids derived from the clock

// --- Container attributes ---
pub const ATTR_FX: &str = "data-slide-fx";
pub const ATTR_TIMEOUT: &str = "data-slide-timeout";
pub const ATTR_AUTOHEIGHT: &str = "data-slide-autoheight";
pub const ATTR_META: &str = "data-slide-meta";
pub const ATTR_DECLARED: &str = "data-slideshow";  // Marks containers booted by `init_declared`

// --- Slide attributes ---
pub const ATTR_INDEX: &str = "data-slide-index";   // Also written on the container when tracking
pub const ATTR_STATE: &str = "data-slide-state";
pub const ATTR_CAPTION: &str = "data-caption";

// --- Trigger attributes ---
pub const ATTR_PREV: &str = "data-slide-prev";
pub const ATTR_NEXT: &str = "data-slide-next";
pub const ATTR_GO: &str = "data-slide-go";
pub const ATTR_TARGET: &str = "data-slide-target";

// --- Classes ---
pub const CLASS_FRAME: &str = "slide-frame";
pub const CLASS_FX_FADE: &str = "fx-fade";
pub const CLASS_FX_SLIDE: &str = "fx-slide";

pub const SCRIPT_TAG: &str = "script";             // Children with this tag never become slides
