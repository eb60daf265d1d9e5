//! Registry of code generation backends.
//!
//! A backend is picked once by name at startup and then handed to the
//! driver; nothing else consults the registry.

use crate::backend::Backend;
use std::sync::{OnceLock, RwLock};

static BACKENDS: RwLock<Vec<&'static dyn Backend>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom backend.
///
/// Built-in backends are registered automatically on first use.
pub fn register_backend(backend: &'static dyn Backend) {
    init_builtin();
    BACKENDS.write().unwrap_or_else(|e| e.into_inner()).push(backend);
}

fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        let mut backends = BACKENDS.write().unwrap_or_else(|e| e.into_inner());
        backends.push(&crate::backend::java::JAVA_BACKEND);
    });
}

/// Get a backend by name.
pub fn get_backend(name: &str) -> Option<&'static dyn Backend> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .iter()
        .find(|b| b.name() == name)
        .copied()
}

/// List all registered backend names.
pub fn backend_names() -> Vec<&'static str> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .iter()
        .map(|b| b.name())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_is_built_in() {
        assert!(backend_names().contains(&"java"));
        let java = get_backend("java").unwrap();
        assert_eq!(java.extension(), "java");
        assert!(get_backend("cobol").is_none());
    }
}
