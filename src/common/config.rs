//! Configuration for the B-tree index.

use crate::common::{Error, Result};

/// Smallest legal minimum degree.
///
/// With `t = 2` every node holds 1..=3 keys and 2..=4 children (a 2-3-4 tree).
/// Anything lower cannot split a full node into two legal halves.
pub const MIN_DEGREE_LOWER_BOUND: usize = 2;

/// Largest legal minimum degree.
///
/// `max_children(t) = 2t` must fit in a `usize`.
pub const MIN_DEGREE_UPPER_BOUND: usize = usize::MAX / 2;

/// Minimum degree used when none is configured.
pub const DEFAULT_MIN_DEGREE: usize = 2;

/// Environment variable read by [`TreeConfig::from_env`] for the minimum degree.
pub const MIN_DEGREE_ENV: &str = "BTREE_MIN_DEGREE";

/// Environment variable read by [`TreeConfig::from_env`] for the node budget.
pub const MAX_NODES_ENV: &str = "BTREE_MAX_NODES";

/// Maximum number of keys a node may hold for minimum degree `t`.
#[inline]
pub const fn max_keys(t: usize) -> usize {
    2 * t - 1
}

/// Minimum number of keys a non-root node must hold for minimum degree `t`.
#[inline]
pub const fn min_keys(t: usize) -> usize {
    t - 1
}

/// Maximum number of children an internal node may hold for minimum degree `t`.
#[inline]
pub const fn max_children(t: usize) -> usize {
    2 * t
}

/// Construction parameters for a [`BTree`](crate::BTree).
///
/// # Example
/// ```
/// use btree_index::TreeConfig;
///
/// let config = TreeConfig::new(3).with_max_nodes(128);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.min_degree, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Minimum degree `t`, fixed for the lifetime of the tree.
    pub min_degree: usize,

    /// Upper bound on simultaneously live nodes, or `None` for unbounded.
    ///
    /// Inserts that would need more nodes fail with
    /// [`Error::AllocationFailure`] and leave the tree untouched.
    pub max_nodes: Option<usize>,
}

impl TreeConfig {
    /// Config with the given minimum degree and no node budget.
    pub fn new(min_degree: usize) -> Self {
        Self {
            min_degree,
            max_nodes: None,
        }
    }

    /// Cap the number of live nodes.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Check that the parameters describe a buildable tree.
    ///
    /// # Errors
    /// - `Error::InvalidMinDegree` if `min_degree` is outside
    ///   `MIN_DEGREE_LOWER_BOUND..=MIN_DEGREE_UPPER_BOUND`
    /// - `Error::InvalidConfig` if `max_nodes` is zero
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DEGREE_LOWER_BOUND..=MIN_DEGREE_UPPER_BOUND).contains(&self.min_degree) {
            return Err(Error::InvalidMinDegree(self.min_degree));
        }
        if self.max_nodes == Some(0) {
            return Err(Error::InvalidConfig(
                "max_nodes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables.
    ///
    /// - `BTREE_MIN_DEGREE`: minimum degree (default: `2`)
    /// - `BTREE_MAX_NODES`: node budget (default: unbounded)
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` when a variable is set but cannot be
    /// parsed, and the errors of [`TreeConfig::validate`] otherwise.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`TreeConfig::from_env`] but reading through `lookup`.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let min_degree = match lookup(MIN_DEGREE_ENV) {
            Some(raw) => parse_usize(MIN_DEGREE_ENV, &raw)?,
            None => DEFAULT_MIN_DEGREE,
        };
        let max_nodes = match lookup(MAX_NODES_ENV) {
            Some(raw) => Some(parse_usize(MAX_NODES_ENV, &raw)?),
            None => None,
        };

        let config = Self {
            min_degree,
            max_nodes,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DEGREE)
    }
}

fn parse_usize(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| Error::InvalidConfig(format!("{name}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_bounds_for_t2() {
        assert_eq!(max_keys(2), 3);
        assert_eq!(min_keys(2), 1);
        assert_eq!(max_children(2), 4);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = TreeConfig::default();
        assert_eq!(config.min_degree, DEFAULT_MIN_DEGREE);
        assert_eq!(config.max_nodes, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_small_degree() {
        assert_eq!(
            TreeConfig::new(1).validate(),
            Err(Error::InvalidMinDegree(1))
        );
        assert_eq!(
            TreeConfig::new(0).validate(),
            Err(Error::InvalidMinDegree(0))
        );
    }

    #[test]
    fn test_validate_rejects_huge_degree() {
        let too_big = MIN_DEGREE_UPPER_BOUND + 1;
        assert_eq!(
            TreeConfig::new(too_big).validate(),
            Err(Error::InvalidMinDegree(too_big))
        );
        assert_eq!(
            TreeConfig::new(usize::MAX).validate(),
            Err(Error::InvalidMinDegree(usize::MAX))
        );

        assert!(TreeConfig::new(MIN_DEGREE_UPPER_BOUND).validate().is_ok());
        assert_eq!(max_children(MIN_DEGREE_UPPER_BOUND), usize::MAX - 1);
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let result = TreeConfig::new(2).with_max_nodes(0).validate();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = TreeConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, TreeConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = TreeConfig::from_lookup(|name| match name {
            MIN_DEGREE_ENV => Some("4".to_string()),
            MAX_NODES_ENV => Some(" 64 ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.min_degree, 4);
        assert_eq!(config.max_nodes, Some(64));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result = TreeConfig::from_lookup(|name| {
            (name == MIN_DEGREE_ENV).then(|| "three".to_string())
        });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = TreeConfig::from_lookup(|name| {
            (name == MIN_DEGREE_ENV).then(|| "1".to_string())
        });
        assert_eq!(result, Err(Error::InvalidMinDegree(1)));
    }
}
