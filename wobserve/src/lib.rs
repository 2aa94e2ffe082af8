//! Observability hooks for conversation runs and tool execution.
//!
//! ```rust
//! use wobserve::{MetricsObservabilityHooks, SafeChatHooks, TracingObservabilityHooks};
//!
//! let _chat_hooks = SafeChatHooks::new(TracingObservabilityHooks);
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{CombinedHooks, SafeChatHooks, SafeToolHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        CombinedHooks, MetricsObservabilityHooks, SafeChatHooks, SafeToolHooks,
        TracingObservabilityHooks,
    };
}

#[cfg(test)]
mod tests;
