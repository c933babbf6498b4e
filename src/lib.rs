//! Workspace root package. It carries no code; it exists so `rusty-hook`
//! can install the pre-commit hooks declared in the root `Cargo.toml`.
