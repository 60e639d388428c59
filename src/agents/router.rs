//! Router: decides whether a rejected solution gets another generator pass.

use crate::models::record::HazardRecord;

/// Generator passes allowed before the workflow reports a best-effort result.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Where the workflow goes after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Loop back for another generator pass.
    Generate,
    /// Proceed to the reporter.
    Report,
}

/// Pure routing rule over the validation result and attempt count.
///
/// ```rust
/// use squirrelgraph::agents::router::{route, Route};
///
/// assert_eq!(route(false, 1, 3), Route::Generate);
/// assert_eq!(route(false, 3, 3), Route::Report);
/// assert_eq!(route(true, 1, 3), Route::Report);
/// ```
pub fn route(is_valid: bool, attempts: u32, max_attempts: u32) -> Route {
    if is_valid || attempts >= max_attempts {
        Route::Report
    } else {
        Route::Generate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    max_attempts: u32,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Change the attempt cap. A cap of zero behaves like one: the first
    /// rejected solution is reported.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn decide(&self, record: &HazardRecord) -> Route {
        route(record.is_valid, record.attempts, self.max_attempts)
    }
}
