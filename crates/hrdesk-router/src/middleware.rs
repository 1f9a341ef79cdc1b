//! Pre-handler hooks.
//!
//! A middleware inspects the request and either lets it through (possibly
//! leaving values in `ctx.extensions` for later stages) or rejects it with an
//! [`AppError`]. Middlewares are synchronous and run in list order; the first
//! rejection stops the chain.

use std::sync::Arc;

use hrdesk_core::AppError;

use crate::context::RequestContext;

pub trait Middleware<S>: Send + Sync + 'static {
    fn handle(&self, ctx: &mut RequestContext, state: &S) -> Result<(), AppError>;
}

impl<S, F> Middleware<S> for F
where
    F: Fn(&mut RequestContext, &S) -> Result<(), AppError> + Send + Sync + 'static,
{
    fn handle(&self, ctx: &mut RequestContext, state: &S) -> Result<(), AppError> {
        self(ctx, state)
    }
}

pub type BoxedMiddleware<S> = Arc<dyn Middleware<S>>;

pub fn boxed<S, M: Middleware<S>>(middleware: M) -> BoxedMiddleware<S> {
    Arc::new(middleware)
}

/// Runs `chain` in order, stopping at the first rejection.
pub fn run_chain<S: 'static>(
    chain: &[BoxedMiddleware<S>],
    ctx: &mut RequestContext,
    state: &S,
) -> Result<(), AppError> {
    chain.iter().try_for_each(|middleware| middleware.handle(ctx, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use axum::http::Uri;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    struct Tag(&'static str);

    #[test]
    fn test_values_flow_to_later_middlewares() {
        let chain: Vec<BoxedMiddleware<()>> = vec![
            boxed(|ctx: &mut RequestContext, _: &()| -> Result<(), AppError> {
                ctx.extensions.insert(Tag("claims"));
                Ok(())
            }),
            boxed(|ctx: &mut RequestContext, _: &()| -> Result<(), AppError> {
                match ctx.extension::<Tag>() {
                    Some(Tag("claims")) => Ok(()),
                    _ => Err(AppError::unauthorized("no claims")),
                }
            }),
        ];

        let mut ctx = RequestContext::new(Method::Get, Uri::from_static("/"));
        assert!(run_chain(&chain, &mut ctx, &()).is_ok());
    }

    #[test]
    fn test_first_rejection_short_circuits() {
        let later = Arc::new(AtomicUsize::new(0));
        let counter = later.clone();

        let chain: Vec<BoxedMiddleware<()>> = vec![
            boxed(|_: &mut RequestContext, _: &()| -> Result<(), AppError> {
                Err(AppError::unauthorized("stop"))
            }),
            boxed(move |_: &mut RequestContext, _: &()| -> Result<(), AppError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        ];

        let mut ctx = RequestContext::new(Method::Get, Uri::from_static("/"));
        let err = run_chain(&chain, &mut ctx, &()).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }
}
