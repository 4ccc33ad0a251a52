pub mod trace_id;

pub use trace_id::{make_span_with_trace_id, trace_id_middleware, TraceId, TRACE_ID_HEADER};
