//! Pluggable admission check for guest/host pairs.

/// Failure raised by a predicate; aborts the enclosing search.
pub type PredicateError = Box<dyn std::error::Error + Send + Sync>;

/// Decides whether a guest element may be bound to a host element.
///
/// The matcher consults `compare_vertices` after its own cheap structural
/// checks (injectivity, degrees) and `compare_edges` before binding an edge.
/// An `Err` is treated as trusted-code failure: the search stops and the error
/// is handed to the caller exactly once.
///
/// Every closure `Fn(&V, &V) -> bool` is an infallible vertex predicate that
/// accepts all edges.
pub trait Predicate<V, E = ()> {
    /// Compares a guest vertex value with a host vertex value.
    fn compare_vertices(&self, guest: &V, host: &V) -> Result<bool, PredicateError>;

    /// Compares a guest edge value with a host edge value.
    fn compare_edges(&self, _guest: &E, _host: &E) -> Result<bool, PredicateError> {
        Ok(true)
    }
}

impl<V, E, F> Predicate<V, E> for F
where
    F: Fn(&V, &V) -> bool,
{
    fn compare_vertices(&self, guest: &V, host: &V) -> Result<bool, PredicateError> {
        Ok(self(guest, host))
    }
}

/// Accepts every pair; matching becomes purely structural.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyVertex;

impl<V, E> Predicate<V, E> for AnyVertex {
    fn compare_vertices(&self, _guest: &V, _host: &V) -> Result<bool, PredicateError> {
        Ok(true)
    }
}
