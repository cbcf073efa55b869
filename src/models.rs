#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark { Theme::Dark } else { Theme::Light }
    }

    /// Anything other than the literal `dark` reads as light.
    pub fn from_stored(value: &str) -> Self {
        Self::from_dark(value == "dark")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Pending,
    Entered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    Instant,
    #[default]
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    #[default]
    Reader,
    Landing,
    Toc,
    Search,
    Formulas,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

/// Where a section starts in the laid-out document, in host units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAnchor {
    pub id: Option<String>,
    pub offset: i64,
}

/// A section's top edge relative to the viewport top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGeometry {
    pub id: Option<String>,
    pub top: i64,
}

impl SectionGeometry {
    pub fn new(id: &str, top: i64) -> Self {
        Self {
            id: Some(id.to_string()),
            top,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub section_id: Option<String>,
    pub trigger_label: String,
    pub text: String,
}
