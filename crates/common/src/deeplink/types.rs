//! Deep-link kinds and payloads

/// Typed payload extracted from a deep link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deeplink {
    /// OAuth redirect carrying the authorization code
    OAuthCode(String),
    /// Open an account profile by id
    Profile(String),
    /// Open a status by id
    Post(String),
    /// Open the home timeline
    Home,
}

/// Link kinds, keyed by the URI host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeeplinkKind {
    OAuth,
    Profile,
    Post,
    Home,
}

impl DeeplinkKind {
    pub const ALL: [Self; 4] = [Self::OAuth, Self::Profile, Self::Post, Self::Home];

    #[must_use]
    pub const fn host(self) -> &'static str {
        match self {
            Self::OAuth => "oauth",
            Self::Profile => "profile",
            Self::Post => "post",
            Self::Home => "home",
        }
    }

    /// Matches a URI host, ignoring ASCII case
    #[must_use]
    pub fn from_host(host: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.host().eq_ignore_ascii_case(host))
    }

    /// The single named parameter this kind needs, if any
    #[must_use]
    pub const fn required_parameter(self) -> Option<&'static str> {
        match self {
            Self::OAuth => Some("code"),
            Self::Profile | Self::Post => Some("id"),
            Self::Home => None,
        }
    }

    #[must_use]
    pub const fn expected_parameters(self) -> usize {
        match self.required_parameter() {
            Some(_) => 1,
            None => 0,
        }
    }

    pub(crate) fn payload(self, value: String) -> Deeplink {
        match self {
            Self::OAuth => Deeplink::OAuthCode(value),
            Self::Profile => Deeplink::Profile(value),
            Self::Post => Deeplink::Post(value),
            Self::Home => Deeplink::Home,
        }
    }
}
