//! Web plumbing shared by the account API and the web front-end:
//! request tracing middleware, CORS, task-local trace context, PII-safe
//! log formatting and the tracing subscriber setup.

pub mod middleware;
pub mod pii;
pub mod telemetry;
pub mod trace_ctx;

pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::trace_span::TraceSpan;
pub use pii::Redacted;
