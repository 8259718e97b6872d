use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Visibility state recorded on a slide when metadata tracking is enabled.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum SlideState {
    #[default]
    Active,         // The slide currently shown
    Inactive,       // Every other slide
    Custom(String), // Anything else written to data-slide-state
}

impl SlideState {
    pub fn from_visible(visible: bool) -> Self {
        if visible { SlideState::Active } else { SlideState::Inactive }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SlideState::Active => "active",
            SlideState::Inactive => "inactive",
            SlideState::Custom(raw) => raw,
        }
    }
}

impl fmt::Display for SlideState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlideState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "active" => SlideState::Active,
            "inactive" => SlideState::Inactive,
            other => SlideState::Custom(other.to_string()),
        })
    }
}
