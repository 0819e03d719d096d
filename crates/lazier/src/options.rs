/// Default bound on how many lazy layers a single force may peel off.
pub const DEFAULT_MAX_UNWRAP_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// How many nested lazy values are unwrapped before giving up with
    /// [`Error::UnwrapDepthExceeded`](crate::Error::UnwrapDepthExceeded).
    pub max_unwrap_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_unwrap_depth: DEFAULT_MAX_UNWRAP_DEPTH,
        }
    }
}

impl Options {
    pub fn with_max_unwrap_depth(mut self, max_unwrap_depth: usize) -> Self {
        self.max_unwrap_depth = max_unwrap_depth;
        self
    }
}
