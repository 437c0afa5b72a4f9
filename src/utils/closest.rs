//! Closest-path matching by shared leading path components.
//!
//! ```text
//! registered: /a/b/c  /a/b/d  /x/y
//! query:      /a/b/e  -> /a/b/c   (2 shared, earliest registered wins ties)
//! query:      /x/z    -> /x/y     (1 shared)
//! ```

use smallvec::SmallVec;

type Components<'a> = SmallVec<[&'a str; 8]>;

/// Split a path on `/`, dropping empty components (leading, trailing, doubled slashes).
fn split(path: &str) -> Components<'_> {
    path.split('/').filter(|c| !c.is_empty()).collect()
}

/// Count equal leading components of two component lists.
fn shared_prefix_len(a: &[&str], b: &[String]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| **x == y.as_str()).count()
}

/// A registered candidate path with its pre-split components.
#[derive(Debug, Clone)]
struct Candidate {
    path: String,
    components: Vec<String>,
}

/// Finds the registered path sharing the longest leading component run with a query.
///
/// Ties are broken in favor of the earliest registered candidate.
#[derive(Debug, Clone, Default)]
pub struct ClosestPathMatcher {
    candidates: Vec<Candidate>,
}

impl ClosestPathMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate path. Registering the same path twice is a no-op.
    pub fn add_path(&mut self, path: &str) {
        if self.candidates.iter().any(|c| c.path == path) {
            return;
        }
        let components = split(path).iter().map(|c| (*c).to_string()).collect();
        self.candidates.push(Candidate {
            path: path.to_string(),
            components,
        });
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Return the registered path closest to `path`.
    ///
    /// # Panics
    ///
    /// Panics if no path has been registered.
    pub fn closest_path(&self, path: &str) -> &str {
        self.closest_with_score(path).0
    }

    /// Return the closest registered path and its number of shared leading components.
    ///
    /// # Panics
    ///
    /// Panics if no path has been registered.
    pub fn closest_with_score(&self, path: &str) -> (&str, usize) {
        let Some((first, rest)) = self.candidates.split_first() else {
            panic!("ClosestPathMatcher queried before any path was registered");
        };
        let query = split(path);

        let mut best = (first, shared_prefix_len(&query, &first.components));
        for candidate in rest {
            let score = shared_prefix_len(&query, &candidate.components);
            // Strictly greater keeps the earliest candidate on ties
            if score > best.1 {
                best = (candidate, score);
            }
        }

        (best.0.path.as_str(), best.1)
    }

    /// Return the longest registered path whose components all prefix `path`.
    ///
    /// Unlike [`closest_path`](Self::closest_path), a candidate that only
    /// partially matches never shadows a shorter one that fully matches.
    pub fn closest_prefix(&self, path: &str) -> Option<&str> {
        let query = split(path);
        let mut best: Option<&Candidate> = None;
        for candidate in &self.candidates {
            let len = candidate.components.len();
            if shared_prefix_len(&query, &candidate.components) != len {
                continue;
            }
            // Strictly longer keeps the earliest candidate on ties
            if best.is_none_or(|b| len > b.components.len()) {
                best = Some(candidate);
            }
        }
        best.map(|c| c.path.as_str())
    }
}
