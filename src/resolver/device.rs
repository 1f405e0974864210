//! Device classification from the User-Agent header

use regex::Regex;
use std::sync::OnceLock;

static MOBILE_PATTERN: OnceLock<Regex> = OnceLock::new();
static TABLET_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Gets the compiled mobile signature regex.
///
/// The pattern is a compile-time constant; `test_patterns_are_valid` covers it.
pub(crate) fn mobile_pattern() -> &'static Regex {
    MOBILE_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)Android|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
            .expect("Invalid mobile regex - this is a compile-time bug")
    })
}

fn tablet_pattern() -> &'static Regex {
    TABLET_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)iPad|Android").expect("Invalid tablet regex - this is a compile-time bug")
    })
}

/// Coarse device class inferred from the User-Agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Classify a User-Agent string
    ///
    /// The mobile check runs first and wins. A tablet is a tablet-signature
    /// match that is not also a mobile match, so every iPad and Android
    /// agent classifies as mobile.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let ua = user_agent.unwrap_or_default();

        let is_mobile = mobile_pattern().is_match(ua);
        let is_tablet = tablet_pattern().is_match(ua) && !is_mobile;

        if is_mobile {
            DeviceClass::Mobile
        } else if is_tablet {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        }
    }
}
