//! HTTP middleware stages
//!
//! Each stage is a hand-written tower `Layer`/`Service` pair: given a
//! request and the rest of the chain (`inner`), produce a response. The
//! composition order is fixed in [`crate::routes`]: request-id injection
//! outermost, then request logging, then error translation innermost.

pub mod error_translation;
pub mod request_id;
pub mod request_log;
pub mod validation;

pub use error_translation::ErrorTranslationLayer;
pub use request_id::{REQUEST_ID_HEADER, RequestIdLayer};
pub use request_log::RequestLogLayer;
pub use validation::ValidatedJson;
