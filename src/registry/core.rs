use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::binder::BoundArguments;
use crate::meta::{MetadataError, MetadataResolver, ParamMetaList};

/// Handler invoked with the bound arguments of a dispatch.
///
/// Handlers are free functions: they receive no module instance. Errors are
/// returned to the caller of [`Dispatch::invoke`](crate::dispatcher::Dispatch::invoke)
/// unchanged.
pub type HandlerFn = Arc<dyn Fn(&BoundArguments) -> anyhow::Result<Value> + Send + Sync>;

/// Visibility of an operation to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// A formal parameter of an operation's signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalParam {
    pub name: String,
    /// Optional parameters do not count towards the required arity
    pub optional: bool,
}

/// Descriptor of a single invocable operation.
///
/// Operations start out public and static (invocable without a receiver).
/// Both flags are checked before every invocation; clearing either one makes
/// the operation undispatchable while keeping it registered.
#[derive(Clone)]
pub struct Operation {
    name: String,
    params: ParamMetaList,
    formals: Vec<FormalParam>,
    visibility: Visibility,
    is_static: bool,
    handler: HandlerFn,
}

impl Operation {
    pub fn new<F>(name: &str, handler: F) -> Self
    where
        F: Fn(&BoundArguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            params: ParamMetaList::new(),
            formals: Vec::new(),
            visibility: Visibility::Public,
            is_static: true,
            handler: Arc::new(handler),
        }
    }

    /// Resolve the operation's declaration text into parameter metadata.
    ///
    /// # Errors
    ///
    /// Propagates the resolver's [`MetadataError`] for malformed declarations,
    /// so broken declarations surface at registration rather than per request.
    pub fn declare(
        mut self,
        declaration: &str,
        resolver: &dyn MetadataResolver,
    ) -> Result<Self, MetadataError> {
        self.params = resolver.resolve(declaration)?;
        Ok(self)
    }

    /// Set parameter metadata directly.
    #[must_use]
    pub fn with_params(mut self, params: ParamMetaList) -> Self {
        self.params = params;
        self
    }

    /// Append a required formal parameter.
    #[must_use]
    pub fn formal(mut self, name: &str) -> Self {
        self.formals.push(FormalParam {
            name: name.to_string(),
            optional: false,
        });
        self
    }

    /// Append an optional formal parameter.
    #[must_use]
    pub fn formal_optional(mut self, name: &str) -> Self {
        self.formals.push(FormalParam {
            name: name.to_string(),
            optional: true,
        });
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Mark the operation as requiring a receiver.
    #[must_use]
    pub fn instance(mut self) -> Self {
        self.is_static = false;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &ParamMetaList {
        &self.params
    }

    #[must_use]
    pub fn formals(&self) -> &[FormalParam] {
        &self.formals
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Number of formal parameters that are not optional
    #[must_use]
    pub fn required_params(&self) -> usize {
        self.formals.iter().filter(|p| !p.optional).count()
    }

    pub(crate) fn call(&self, args: &BoundArguments) -> anyhow::Result<Value> {
        (self.handler)(args)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("formals", &self.formals)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}

/// A named module grouping operations.
///
/// Only modules carrying the dispatchable marker ([`Module::callable`]) can be
/// targeted by a request; other modules may be registered for lookup but are
/// rejected by the dispatcher.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    callable: bool,
    operations: HashMap<String, Arc<Operation>>,
}

impl Module {
    /// Create a module under its fully qualified name (e.g. `shop::catalog`).
    #[must_use]
    pub fn new(qualified_name: &str) -> Self {
        Self {
            name: qualified_name.to_string(),
            callable: false,
            operations: HashMap::new(),
        }
    }

    /// Attach the dispatchable marker.
    #[must_use]
    pub fn callable(mut self) -> Self {
        self.callable = true;
        self
    }

    /// Add an operation, replacing any operation of the same name.
    #[must_use]
    pub fn operation(mut self, op: Operation) -> Self {
        let op_name = op.name().to_string();
        if self.operations.insert(op_name.clone(), Arc::new(op)).is_some() {
            warn!(
                module = %self.name,
                operation = %op_name,
                "Replaced existing operation"
            );
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_callable(&self) -> bool {
        self.callable
    }

    #[must_use]
    pub fn get_operation(&self, name: &str) -> Option<&Arc<Operation>> {
        self.operations.get(name)
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }
}

/// Table of modules keyed by fully qualified name, built once at startup and
/// shared read-only by dispatchers.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: HashMap<String, Module>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module.
    ///
    /// If a module with the same name already exists, it is replaced.
    pub fn register(&mut self, module: Module) {
        let module_name = module.name().to_string();
        let operations_count = module.operations.len();

        if self.modules.remove(&module_name).is_some() {
            warn!(
                module = %module_name,
                total_modules = self.modules.len(),
                "Replaced existing module"
            );
        }

        info!(
            module = %module_name,
            callable = module.is_callable(),
            operations_count = operations_count,
            total_modules = self.modules.len() + 1,
            "Module registered"
        );

        self.modules.insert(module_name, module);
    }

    /// Builder-style [`Registry::register`].
    #[must_use]
    pub fn with_module(mut self, module: Module) -> Self {
        self.register(module);
        self
    }

    #[must_use]
    pub fn module(&self, qualified_name: &str) -> Option<&Module> {
        self.modules.get(qualified_name)
    }

    /// Dispatchable-capability check for a resolved module.
    #[must_use]
    pub fn implements_marker(&self, module: &Module) -> bool {
        module.is_callable()
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
