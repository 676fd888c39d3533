/* src/config.rs */

/// Forwarding headers consulted when the caller supplies none, highest priority first.
///
/// `fowarded` is misspelled on purpose: some proxies emit it that way.
pub const DEFAULT_HEADERS: [&str; 7] = [
    "x-client-ip",
    "x-forwarded-for",
    "x-real-ip",
    "x-cluster-client-ip",
    "x-forwarded",
    "forwarded-for",
    "fowarded",
];

/// Caller-supplied overrides.
///
/// Every field is optional. A field left as `None` keeps the default; a field
/// that is set replaces the default outright.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Header names to check, in order of preference. `Some(vec![])` disables
    /// header lookup entirely.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub headers: Option<Vec<String>>,
}

impl Options {
    /// Options that keep every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the header list.
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }
}

/// Effective configuration for a single resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Header names to check, in order of preference.
    pub headers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headers: DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl Config {
    /// Shallow merge: each field set in `options` replaces the one in `self`.
    ///
    /// Lists are replaced, never concatenated.
    pub fn merge(&self, options: &Options) -> Config {
        Config {
            headers: match &options.headers {
                Some(headers) => headers.clone(),
                None => self.headers.clone(),
            },
        }
    }
}

impl From<&Options> for Config {
    fn from(options: &Options) -> Self {
        Config::default().merge(options)
    }
}

impl From<Options> for Config {
    fn from(options: Options) -> Self {
        Config::from(&options)
    }
}
