//! Dispatcher core module - target resolution, binding and legality checks.

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::error::DispatchError;
use crate::binder::{bind_arguments, BoundArguments, DataSources};
use crate::config::DispatchConfig;
use crate::ids::RequestId;
use crate::meta::ParamMetaList;
use crate::registry::{Operation, Registry};
use crate::request::RequestContext;
use crate::router::{RouteMatch, Router, TargetRef};

/// A fully resolved and validated call, ready to invoke.
///
/// A `Dispatch` only exists once every check has passed, so holding one means
/// the operation may be invoked with exactly [`Dispatch::arguments`].
#[derive(Debug, Clone)]
pub struct Dispatch {
    request_id: RequestId,
    target: TargetRef,
    residue: Vec<String>,
    operation: Arc<Operation>,
    arguments: BoundArguments,
}

impl Dispatch {
    #[must_use]
    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    /// Path segments left after module and operation
    #[must_use]
    pub fn residue(&self) -> &[String] {
        &self.residue
    }

    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Parameter metadata the arguments were bound from
    #[must_use]
    pub fn params(&self) -> &ParamMetaList {
        self.operation.params()
    }

    #[must_use]
    pub fn arguments(&self) -> &BoundArguments {
        &self.arguments
    }

    /// Invoke the operation with the bound arguments, in declared order and
    /// without a receiver.
    ///
    /// # Errors
    ///
    /// Whatever the handler returns is passed through unchanged; the
    /// dispatcher neither catches nor wraps handler failures.
    pub fn invoke(&self) -> anyhow::Result<Value> {
        info!(
            request_id = %self.request_id,
            module = %self.target.module,
            operation = %self.target.operation,
            args_count = self.arguments.len(),
            "Invoking operation"
        );
        let start = Instant::now();
        let result = self.operation.call(&self.arguments);
        debug!(
            request_id = %self.request_id,
            operation = %self.target.operation,
            ok = result.is_ok(),
            execution_time_us = start.elapsed().as_micros() as u64,
            "Operation returned"
        );
        result
    }
}

/// Resolves requests against a [`Registry`].
///
/// The dispatcher holds no per-request state: every call to
/// [`Dispatcher::dispatch`] returns a fresh [`Dispatch`], so one instance can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    router: Router,
    script_path: Option<String>,
    clear_request: bool,
}

impl Dispatcher {
    /// Create a dispatcher for modules under an optional namespace.
    #[must_use]
    pub fn new(registry: Arc<Registry>, namespace: Option<&str>) -> Self {
        Self {
            registry,
            router: Router::new(namespace),
            script_path: None,
            clear_request: true,
        }
    }

    /// Strip `script_path` from URI paths in [`Dispatcher::dispatch_http`].
    #[must_use]
    pub fn with_script_path(mut self, script_path: Option<&str>) -> Self {
        self.script_path = script_path.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    /// Create a dispatcher from loaded configuration.
    #[must_use]
    pub fn from_config(registry: Arc<Registry>, config: &DispatchConfig) -> Self {
        Self {
            registry,
            router: Router::new(config.namespace.as_deref()),
            script_path: None,
            clear_request: config.clear_request,
        }
        .with_script_path(config.script_path.as_deref())
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn script_path(&self) -> Option<&str> {
        self.script_path.as_deref()
    }

    /// Default for the clear-request switch used by [`Dispatcher::dispatch_and_clear`]
    #[must_use]
    pub fn clear_request(&self) -> bool {
        self.clear_request
    }

    /// Resolve, bind and validate a request.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::TargetNotFound`] when no module has the resolved name
    /// - [`DispatchError::NotDispatchable`] when the module lacks the marker
    /// - [`DispatchError::OperationNotFound`] when the module has no such operation
    /// - [`DispatchError::IllegalInvocation`] when the operation is not public
    ///   static or fewer arguments were bound than it requires
    pub fn dispatch(&self, ctx: &RequestContext) -> Result<Dispatch, DispatchError> {
        let verb = ctx.verb();
        let RouteMatch { target, residue } = self.router.route(&ctx.path_info, &verb);

        let operation = self.resolve_operation(ctx, &target)?;

        let sources = DataSources {
            body: &ctx.body,
            query: &ctx.query,
            path: &residue,
        };
        let arguments = bind_arguments(operation.params(), &sources);

        debug!(
            request_id = %ctx.request_id,
            module = %target.module,
            operation = %target.operation,
            declared = operation.params().len(),
            bound = ?arguments.names().collect::<Vec<_>>(),
            "Arguments bound"
        );

        if let Err(e) = check_legality(&operation, &arguments, &ctx.path_info) {
            warn!(
                request_id = %ctx.request_id,
                module = %target.module,
                operation = %target.operation,
                error = %e,
                "Illegal invocation rejected"
            );
            return Err(e);
        }

        info!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path_info = %ctx.path_info,
            module = %target.module,
            operation = %target.operation,
            args_count = arguments.len(),
            "Dispatch resolved"
        );

        Ok(Dispatch {
            request_id: ctx.request_id,
            target,
            residue,
            operation,
            arguments,
        })
    }

    /// Build a [`RequestContext`] from an `http::Request`, stripping the
    /// configured script path.
    #[must_use]
    pub fn request_context<B: AsRef<[u8]>>(&self, req: &http::Request<B>) -> RequestContext {
        RequestContext::from_http(req, self.script_path.as_deref())
    }

    /// [`Dispatcher::dispatch`] for an `http::Request`.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`].
    pub fn dispatch_http<B: AsRef<[u8]>>(
        &self,
        req: &http::Request<B>,
    ) -> Result<Dispatch, DispatchError> {
        self.dispatch(&self.request_context(req))
    }

    /// [`Dispatcher::dispatch`], then clear the context's query and body data
    /// when `clear_request` is set and dispatch succeeded.
    ///
    /// Clearing happens before invocation and does not affect the bound
    /// arguments of the returned [`Dispatch`].
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`]; on error the context is left untouched.
    pub fn dispatch_request(
        &self,
        ctx: &mut RequestContext,
        clear_request: bool,
    ) -> Result<Dispatch, DispatchError> {
        let dispatch = self.dispatch(ctx)?;
        if clear_request {
            debug!(request_id = %ctx.request_id, "Clearing request data");
            ctx.clear();
        }
        Ok(dispatch)
    }

    /// [`Dispatcher::dispatch_request`] with the configured clear-request default.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`].
    pub fn dispatch_and_clear(&self, ctx: &mut RequestContext) -> Result<Dispatch, DispatchError> {
        self.dispatch_request(ctx, self.clear_request)
    }

    fn resolve_operation(
        &self,
        ctx: &RequestContext,
        target: &TargetRef,
    ) -> Result<Arc<Operation>, DispatchError> {
        let Some(module) = self.registry.module(&target.module) else {
            warn!(
                request_id = %ctx.request_id,
                module = %target.module,
                path_info = %ctx.path_info,
                "Module not found"
            );
            return Err(DispatchError::TargetNotFound {
                module: target.module.clone(),
                path_info: ctx.path_info.clone(),
            });
        };

        if !self.registry.implements_marker(module) {
            warn!(
                request_id = %ctx.request_id,
                module = %target.module,
                path_info = %ctx.path_info,
                "Module is not dispatchable"
            );
            return Err(DispatchError::NotDispatchable {
                module: target.module.clone(),
                path_info: ctx.path_info.clone(),
            });
        }

        match module.get_operation(&target.operation) {
            Some(op) => Ok(Arc::clone(op)),
            None => {
                warn!(
                    request_id = %ctx.request_id,
                    module = %target.module,
                    operation = %target.operation,
                    available_operations = ?module.operation_names().collect::<Vec<_>>(),
                    "Operation not found"
                );
                Err(DispatchError::OperationNotFound {
                    module: target.module.clone(),
                    operation: target.operation.clone(),
                    path_info: ctx.path_info.clone(),
                })
            }
        }
    }
}

/// Accept or reject a call before invocation.
///
/// Only the count of bound arguments is compared with the required arity;
/// argument names and types are the handler's contract.
///
/// # Errors
///
/// [`DispatchError::IllegalInvocation`] when the operation is not both public
/// and static, or fewer arguments are bound than it requires.
pub fn check_legality(
    operation: &Operation,
    arguments: &BoundArguments,
    path_info: &str,
) -> Result<(), DispatchError> {
    let required = operation.required_params();
    if !operation.is_public() || !operation.is_static() || arguments.len() < required {
        return Err(DispatchError::IllegalInvocation {
            operation: operation.name().to_string(),
            required,
            bound: arguments.len(),
            path_info: path_info.to_string(),
        });
    }
    Ok(())
}
