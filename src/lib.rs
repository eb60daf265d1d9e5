//! Class-hierarchy code generation from TL schemas.
//!
//! A parsed TL schema (types, constructors, functions) is turned into one
//! source file in an object-oriented target language: a base class per type,
//! a concrete class per constructor and function, constructors, identifier
//! tags for boxed types, and a recursive debug printer.
//!
//! ```text
//! schema JSON ─> Schema ─> driver ──hooks──> Backend (java) ─> source text
//!                            │
//!                            └─ filter / naming / types / vars
//! ```
//!
//! # Example
//!
//! ```
//! use tl_classgen::backend::GenConfig;
//! use tl_classgen::schema::{Combinator, Schema, Type, TypeTree};
//!
//! let ready = Combinator::new(
//!     "authorizationStateReady",
//!     -1834871737,
//!     vec![],
//!     TypeTree::concrete("AuthorizationState"),
//! );
//! let schema = Schema::new(vec![Type::new("AuthorizationState", vec![ready])], vec![]).unwrap();
//! let backend = tl_classgen::get_backend("java").unwrap();
//!
//! let java = tl_classgen::generate(backend, &schema, &GenConfig::default()).unwrap();
//! assert!(java.contains("public static class AuthorizationStateReady extends AuthorizationState {"));
//! ```

pub mod backend;
pub mod cli;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod filter;
pub mod naming;
pub mod path_de;
pub mod preview;
pub mod registry;
pub mod schema;
pub mod types;
pub mod vars;

pub use backend::{Backend, GenConfig};
pub use driver::generate;
pub use error::{GenError, GenResult, SchemaError};
pub use registry::{backend_names, get_backend, register_backend};
