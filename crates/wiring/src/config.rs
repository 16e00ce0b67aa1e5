//! Container and definition configuration

/// Configuration for a container.
///
/// Fixed when the container is created and consulted on every resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Maximum nesting of `get` calls through one container.
    ///
    /// Cycles are caught by reference tracking, not by this limit. It only
    /// keeps a pathologically deep acyclic graph from overflowing the stack.
    pub max_depth: usize,

    /// Whether to log every executed pipeline action at debug level
    pub trace: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            trace: false,
        }
    }
}

impl ContainerConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with a custom depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    /// Enable or disable action tracing (builder pattern)
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Options accepted by a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionOptions {
    /// Cache the first resolved value and reuse it (singleton), or rebuild
    /// the value on every request (factory)
    pub shared: bool,
}

impl Default for DefinitionOptions {
    fn default() -> Self {
        Self { shared: true }
    }
}
