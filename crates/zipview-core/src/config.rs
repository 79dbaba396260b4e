//! Configuration for resolving and serving archive entries.

/// Route prefix the boundary handler strips before resolution.
pub const DEFAULT_ROUTE_PREFIX: &str = "/unzip";

/// File extension (without the dot) that marks an archive under the root.
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "zip";

/// Configuration shared by the resolver and the boundary handler.
///
/// The values are fixed for the lifetime of a handler. Pass by reference
/// (`&ServeConfig`); wrap in `Arc` when sharing across threads.
///
/// # Examples
///
/// ```
/// use zipview_core::ServeConfig;
///
/// let config = ServeConfig::default();
/// assert_eq!(config.archive_extension, "zip");
///
/// let custom = ServeConfig {
///     route_prefix: "/results/unzip".to_string(),
///     ..Default::default()
/// };
/// assert!(custom.strip_route_prefix("/results/unzip/r.zip/a.txt").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    /// Prefix removed from the request URL path before resolution.
    pub route_prefix: String,

    /// Extension the first request segment must carry. Compared
    /// case-sensitively.
    pub archive_extension: String,

    /// Maximum number of segments (archive plus entry path) in a request.
    pub max_path_depth: usize,
}

impl Default for ServeConfig {
    /// Default values:
    /// - `route_prefix`: `/unzip`
    /// - `archive_extension`: `zip`
    /// - `max_path_depth`: 32
    fn default() -> Self {
        Self {
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            max_path_depth: 32,
        }
    }
}

impl ServeConfig {
    /// Removes the route prefix from a URL path.
    ///
    /// Returns `None` when the path is not under the prefix. The prefix must
    /// be followed by `/` or the end of the path, so `/unzipped` does not
    /// match `/unzip`.
    #[must_use]
    pub fn strip_route_prefix<'a>(&self, url_path: &'a str) -> Option<&'a str> {
        let prefix = self.route_prefix.trim_end_matches('/');
        let rest = url_path.strip_prefix(prefix)?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Returns `true` if `extension` is the configured archive extension.
    #[must_use]
    pub fn is_archive_extension(&self, extension: &str) -> bool {
        extension == self.archive_extension
    }
}
