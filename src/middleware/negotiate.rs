use crate::constants::{
    HEADER_CSP, HEADER_CSP_REPORT_ONLY, HEADER_WEBKIT_CSP, HEADER_WEBKIT_CSP_REPORT_ONLY,
    HEADER_X_CSP, HEADER_X_CSP_REPORT_ONLY,
};
use actix_web::http::header::HeaderName;
use regex::Regex;
use std::sync::OnceLock;

/// The header names used for the enforce and report-only policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPair {
    enforce: HeaderName,
    report_only: HeaderName,
}

impl HeaderPair {
    #[inline]
    pub fn standard() -> Self {
        Self::from_static(HEADER_CSP, HEADER_CSP_REPORT_ONLY)
    }

    #[inline]
    pub fn webkit() -> Self {
        Self::from_static(HEADER_WEBKIT_CSP, HEADER_WEBKIT_CSP_REPORT_ONLY)
    }

    #[inline]
    pub fn mozilla() -> Self {
        Self::from_static(HEADER_X_CSP, HEADER_X_CSP_REPORT_ONLY)
    }

    #[inline]
    fn from_static(enforce: &'static str, report_only: &'static str) -> Self {
        Self {
            enforce: HeaderName::from_static(enforce),
            report_only: HeaderName::from_static(report_only),
        }
    }

    #[inline]
    pub fn enforce(&self) -> &HeaderName {
        &self.enforce
    }

    #[inline]
    pub fn report_only(&self) -> &HeaderName {
        &self.report_only
    }
}

impl Default for HeaderPair {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderVariant {
    Standard,
    /// `X-WebKit-CSP`
    WebKit,
    /// `X-Content-Security-Policy`
    Mozilla,
}

impl HeaderVariant {
    #[inline]
    pub fn pair(&self) -> HeaderPair {
        match self {
            HeaderVariant::Standard => HeaderPair::standard(),
            HeaderVariant::WebKit => HeaderPair::webkit(),
            HeaderVariant::Mozilla => HeaderPair::mozilla(),
        }
    }

    /// Picks the variant a user agent understands. Unknown or missing agents
    /// get the standard names.
    pub fn detect(user_agent: Option<&str>) -> Self {
        let Some((family, version)) = user_agent.and_then(agent_version) else {
            return HeaderVariant::Standard;
        };

        AGENT_RULES
            .iter()
            .find(|rule| rule.family == family && (rule.min..=rule.max).contains(&version))
            .map_or(HeaderVariant::Standard, |rule| rule.variant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgentFamily {
    Firefox,
    Chrome,
    Safari,
    Msie,
}

struct AgentRule {
    family: AgentFamily,
    min: u64,
    max: u64,
    variant: HeaderVariant,
}

// Vendor-prefixed headers as shipped by each engine.
static AGENT_RULES: &[AgentRule] = &[
    AgentRule {
        family: AgentFamily::Chrome,
        min: 14,
        max: 24,
        variant: HeaderVariant::WebKit,
    },
    AgentRule {
        family: AgentFamily::Safari,
        min: 6,
        max: u64::MAX,
        variant: HeaderVariant::WebKit,
    },
    AgentRule {
        family: AgentFamily::Firefox,
        min: 4,
        max: 22,
        variant: HeaderVariant::Mozilla,
    },
    AgentRule {
        family: AgentFamily::Msie,
        min: 10,
        max: 19,
        variant: HeaderVariant::Mozilla,
    },
];

fn agent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(Firefox|Chrome|Safari)/(\d+)|(MSIE) (1\d)").expect("valid user agent pattern")
    })
}

/// The first agent token in `user_agent` with its major version.
fn agent_version(user_agent: &str) -> Option<(AgentFamily, u64)> {
    let captures = agent_pattern().captures(user_agent)?;

    let (family, version) = match (captures.get(1), captures.get(3)) {
        (Some(name), _) => (name.as_str(), captures.get(2)?),
        (None, Some(name)) => (name.as_str(), captures.get(4)?),
        (None, None) => return None,
    };

    let family = match family {
        "Firefox" => AgentFamily::Firefox,
        "Chrome" => AgentFamily::Chrome,
        "Safari" => AgentFamily::Safari,
        _ => AgentFamily::Msie,
    };

    // Only digits are captured, so a failed parse is an overflow.
    let version = version.as_str().parse().unwrap_or(u64::MAX);
    Some((family, version))
}

/// Header names for the client identified by `user_agent`.
#[inline]
pub fn negotiate(user_agent: Option<&str>) -> HeaderPair {
    HeaderVariant::detect(user_agent).pair()
}
