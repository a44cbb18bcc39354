//! Search options.

/// Options for [`SimilaritySearch`](super::SimilaritySearch).
///
/// # Defaults
///
/// - `limit_results`: 5
/// - `delta_e_limit`: 2.0 (a difference most people will not notice)
/// - `tight_search`: enabled
/// - `max_delta_e`: 10.0
///
/// # Example
///
/// ```
/// use pigment_mix::SearchOptions;
///
/// let options = SearchOptions::new()
///     .limit_results(10)
///     .tight_search(false);
/// assert_eq!(options.limit_results, 10);
/// assert_eq!(options.max_delta_e, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Most matches returned.
    pub limit_results: usize,

    /// Distance regarded as a good enough match.
    ///
    /// With `tight_search`, enumeration stops as soon as `limit_results`
    /// matches at or below this distance have been found.
    pub delta_e_limit: f64,

    /// Stop early once the result list is full of good enough matches.
    pub tight_search: bool,

    /// Candidates further than this are never returned.
    pub max_delta_e: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit_results: 5,
            delta_e_limit: 2.0,
            tight_search: true,
            max_delta_e: 10.0,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit_results(mut self, limit: usize) -> Self {
        self.limit_results = limit;
        self
    }

    pub fn delta_e_limit(mut self, limit: f64) -> Self {
        self.delta_e_limit = limit;
        self
    }

    pub fn tight_search(mut self, enabled: bool) -> Self {
        self.tight_search = enabled;
        self
    }

    pub fn max_delta_e(mut self, max: f64) -> Self {
        self.max_delta_e = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.limit_results, 5);
        assert_eq!(options.delta_e_limit, 2.0);
        assert!(options.tight_search);
        assert_eq!(options.max_delta_e, 10.0);
    }

    #[test]
    fn test_builder_chain() {
        let options = SearchOptions::new()
            .limit_results(3)
            .delta_e_limit(1.0)
            .tight_search(false)
            .max_delta_e(25.0);
        assert_eq!(
            options,
            SearchOptions {
                limit_results: 3,
                delta_e_limit: 1.0,
                tight_search: false,
                max_delta_e: 25.0,
            }
        );
    }
}
