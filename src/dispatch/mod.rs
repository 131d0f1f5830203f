//! Dispatcher-facing types
//!
//! The command dispatcher itself is an external collaborator; this module
//! defines the interface the connector presents to it:
//! - [`Request`]: the bag of named parameters a matched invocation carries
//! - [`CommandDescriptor`] and [`ModuleRegistration`]: the declarative
//!   registration records built once at startup
//! - [`create_handler`]: the generic adapter from typed async operations to
//!   the dispatcher's uniform handler signature

pub mod descriptor;
pub mod handler;
pub mod request;

// Re-export commonly used types
pub use descriptor::{CommandDescriptor, Method, ModuleRegistration, TypeDecl, endpoint_params};
pub use handler::{CommandHandler, HandlerFuture, create_handler};
pub use request::{DocumentParam, ParamValue, Request};
