//! Engine-level interop configuration.

/// Configuration for host interop behavior.
///
/// # Example
///
/// ```
/// use hostbridge::InteropOptions;
///
/// let options = InteropOptions::default()
///     .with_strict(true)
///     .with_isolated_cache(true);
/// assert!(options.strict);
/// assert!(!options.expando_members);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteropOptions {
    /// Failed writes (read-only slot, unknown member) raise a `TypeError`
    /// instead of being silently ignored.
    pub strict: bool,

    /// A non-strict write to a name that resolves to nothing installs a
    /// plain data slot on the wrapper instead of being dropped.
    pub expando_members: bool,

    /// Use a resolution cache private to the engine instead of the
    /// process-wide one.
    pub isolated_cache: bool,
}

impl InteropOptions {
    /// Create options with every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable strict-mode writes.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable or disable expando members on host object wrappers.
    pub fn with_expando_members(mut self, expando: bool) -> Self {
        self.expando_members = expando;
        self
    }

    /// Enable or disable an engine-private resolution cache.
    pub fn with_isolated_cache(mut self, isolated: bool) -> Self {
        self.isolated_cache = isolated;
        self
    }
}
