//! # PyRpc Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # In-memory sessions and session directory
//! └── integration/      # Cross-crate flows
//!     ├── dispatch.rs   # decode → registry → isolated handlers
//!     ├── concurrency.rs# registration racing dispatch
//!     └── send_path.rs  # encode once, fan out, read back
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pyrpc-tests
//! cargo test -p pyrpc-tests integration::concurrency::
//!
//! # Benchmarks
//! cargo bench -p pyrpc-tests
//! ```

pub mod fixtures;
pub mod integration;
