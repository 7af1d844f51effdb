//! Request label set derived from dispatch metadata.

/// Identifies the logical endpoint that handles a request.
///
/// Integrations supply both names from route metadata resolved at
/// registration time. Values are used verbatim as label values.
pub trait DispatchTarget {
    /// Declaring controller, e.g. `OrdersController`.
    fn controller(&self) -> &str;
    /// Handler within the controller, e.g. `create`.
    fn handler(&self) -> &str;
}

/// Static route metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub controller: &'static str,
    pub handler: &'static str,
}

impl Endpoint {
    pub const fn new(controller: &'static str, handler: &'static str) -> Self {
        Self { controller, handler }
    }
}

impl DispatchTarget for Endpoint {
    fn controller(&self) -> &str {
        self.controller
    }

    fn handler(&self) -> &str {
        self.handler
    }
}

impl<T: DispatchTarget + ?Sized> DispatchTarget for &T {
    fn controller(&self) -> &str {
        (**self).controller()
    }

    fn handler(&self) -> &str {
        (**self).handler()
    }
}

/// Labels of one request, computed once and reused for every metric update
/// belonging to that request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLabels {
    controller: String,
    handler: String,
}

impl RequestLabels {
    pub fn from_target<T: DispatchTarget + ?Sized>(target: &T) -> Self {
        Self {
            controller: target.controller().to_string(),
            handler: target.handler().to_string(),
        }
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Values in histogram label order: `handler`, `controller`.
    pub(crate) fn latency_values(&self) -> [&str; 2] {
        [&self.handler, &self.controller]
    }

    /// Values in failure counter label order: `handler`, `controller`, `error`.
    pub(crate) fn failure_values<'a>(&'a self, error: &'a str) -> [&'a str; 3] {
        [&self.handler, &self.controller, error]
    }
}
