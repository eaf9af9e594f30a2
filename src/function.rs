//! The unit of business logic adapted by this crate.
//!
//! A [`Function`] takes one input value and asynchronously produces one
//! output value or fails. It knows nothing about events, envelopes, or the
//! host runtime, so it can be exercised directly in tests:
//!
//! ```rust
//! use remote_function::{BoxError, BoxFuture, Function};
//!
//! struct DoubleFunction;
//!
//! impl Function for DoubleFunction {
//!     type Input = i64;
//!     type Output = i64;
//!
//!     fn execute(&self, input: i64) -> BoxFuture<'_, Result<i64, BoxError>> {
//!         Box::pin(async move { Ok(input * 2) })
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! assert_eq!(DoubleFunction.execute(7).await.unwrap(), 14);
//! # }
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future used by the function and sink traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The opaque error type a [`Function`] may fail with.
///
/// This is the same shape as `lambda_runtime::Error`, so `?` works on any
/// `std::error::Error + Send + Sync` inside an implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An async transform from `Input` to `Output`.
///
/// Implementations own whatever resources they need (HTTP clients,
/// configuration) and must be safe to call concurrently through `&self`.
pub trait Function: Send + Sync + 'static {
    /// The value the function is invoked with.
    type Input: Send + 'static;

    /// The value the function produces.
    type Output: Send + 'static;

    /// Run the function once.
    fn execute(&self, input: Self::Input) -> BoxFuture<'_, Result<Self::Output, BoxError>>;
}

impl<F: Function> Function for Arc<F> {
    type Input = F::Input;
    type Output = F::Output;

    fn execute(&self, input: Self::Input) -> BoxFuture<'_, Result<Self::Output, BoxError>> {
        (**self).execute(input)
    }
}

// ---------------------------------------------------------------------------
// Convenience: implement Function for async closures via a wrapper
// ---------------------------------------------------------------------------

/// A function constructed from an async closure.
///
/// ```rust
/// use remote_function::FnFunction;
///
/// let count = FnFunction::new(|input: String| async move {
///     Ok::<_, remote_function::BoxError>(input.chars().count())
/// });
/// # let _ = count;
/// ```
pub struct FnFunction<F, I, O> {
    f: F,
    _marker: PhantomData<fn(I) -> O>,
}

impl<F, Fut, I, O> FnFunction<F, I, O>
where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, BoxError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F, Fut, I, O> Function for FnFunction<F, I, O>
where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, BoxError>> + Send + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    type Input = I;
    type Output = O;

    fn execute(&self, input: I) -> BoxFuture<'_, Result<O, BoxError>> {
        Box::pin((self.f)(input))
    }
}
