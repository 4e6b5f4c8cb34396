//! # Merkle-Points Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (proof size, build, verify)
//! └── src/integration/  # Cross-crate flows
//!     ├── flows.rs      # creation, update, batch
//!     ├── tamper.rs     # every rejection path end to end
//!     └── devnet.rs     # host-ledger lifecycle, racing builders
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mp-tests
//! cargo test -p mp-tests integration::tamper
//! cargo bench -p mp-tests
//! ```

pub mod integration;
