mod resolve_error;

pub use resolve_error::{ResolveError, ResolveErrorKind};
