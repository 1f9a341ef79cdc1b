//! Route registration.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::dispatcher::{CompiledRoute, Dispatcher, MethodRoutes};
use crate::error::RouteError;
use crate::handler::Handler;
use crate::method::Method;
use crate::middleware::BoxedMiddleware;
use crate::path::{PathPattern, normalize_path};

pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Identifies the `group` call a route was registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u32);

/// One registration, as stored before [`RouteTable::build`].
pub struct Route<S> {
    pub method: Method,
    pub pattern: String,
    pub group: Option<GroupId>,
    pub(crate) handler: Arc<dyn Handler<S>>,
    pub(crate) middlewares: Vec<BoxedMiddleware<S>>,
}

impl<S> Route<S> {
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }
}

/// Mutable builder for the routing table.
///
/// Routes are collected here, then validated and frozen by [`build`](Self::build)
/// into a [`Dispatcher`] that is shared read-only between requests.
pub struct RouteTable<S> {
    routes: Vec<Route<S>>,
    scope: Vec<BoxedMiddleware<S>>,
    current_group: Option<GroupId>,
    next_group: u32,
    not_found: Option<Arc<dyn Handler<S>>>,
    base_path: Option<String>,
    max_body_bytes: usize,
}

impl<S> Default for RouteTable<S> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            scope: Vec::new(),
            current_group: None,
            next_group: 0,
            not_found: None,
            base_path: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl<S> RouteTable<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix removed from every request path before matching.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        let base = normalize_path(&base_path.into());
        self.base_path = (base != "/").then_some(base);
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Registers `handler` for `method` and `pattern`, tagged with the
    /// middlewares of every enclosing [`group`](Self::group).
    pub fn route<H: Handler<S>>(&mut self, method: Method, pattern: &str, handler: H) -> &mut Self {
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            group: self.current_group,
            handler: Arc::new(handler),
            middlewares: self.scope.clone(),
        });
        self
    }

    pub fn get<H: Handler<S>>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::Get, pattern, handler)
    }

    pub fn post<H: Handler<S>>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::Post, pattern, handler)
    }

    pub fn put<H: Handler<S>>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::Put, pattern, handler)
    }

    pub fn delete<H: Handler<S>>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::Delete, pattern, handler)
    }

    /// Runs `register` with `middlewares` appended to the current chain.
    ///
    /// Groups nest: a route registered in an inner group runs the outer
    /// group's middlewares first, then the inner ones.
    pub fn group<F>(&mut self, middlewares: Vec<BoxedMiddleware<S>>, register: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let outer_len = self.scope.len();
        let outer_group = self.current_group;

        self.scope.extend(middlewares);
        self.current_group = Some(GroupId(self.next_group));
        self.next_group += 1;

        register(self);

        self.scope.truncate(outer_len);
        self.current_group = outer_group;
        self
    }

    /// Handler used when nothing matches.
    pub fn not_found<H: Handler<S>>(&mut self, handler: H) -> &mut Self {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Routes registered for `method`, in registration order.
    pub fn lookup(&self, method: Method) -> Vec<&Route<S>> {
        self.routes.iter().filter(|r| r.method == method).collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Validates every pattern and freezes the table.
    ///
    /// Fails on the first invalid pattern or on two registrations of the same
    /// method and pattern shape (`/a/:id` and `/a/:key` count as the same).
    pub fn build(self) -> Result<Dispatcher<S>, RouteError> {
        let mut seen = HashSet::new();
        let mut routes = Vec::with_capacity(self.routes.len());
        let mut by_method: HashMap<Method, MethodRoutes> = HashMap::new();

        for route in self.routes {
            let pattern = PathPattern::parse(&route.pattern)?;

            if !seen.insert((route.method, pattern.shape())) {
                return Err(RouteError::Conflict {
                    method: route.method,
                    pattern: pattern.as_str().to_string(),
                });
            }

            let index = routes.len();
            let entry = by_method.entry(route.method).or_default();
            if pattern.is_static() {
                entry.statics.insert(pattern.as_str().to_string(), index);
            } else {
                entry.dynamics.push(index);
            }

            routes.push(CompiledRoute {
                method: route.method,
                pattern,
                group: route.group,
                handler: route.handler,
                middlewares: route.middlewares.into(),
            });
        }

        Ok(Dispatcher::new(
            routes,
            by_method,
            self.not_found,
            self.base_path,
            self.max_body_bytes,
        ))
    }
}
