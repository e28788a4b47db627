// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public-facing API of the fdf library. It owns the validated
// configuration and the registries, and wires the naming, tree, resolution and
// buffer layers together.
//
// Data Flow (Reading):
//
//   1. [Stateful Facade (FdfContext::parse_tree)] -> Receives file paths
//         |
//         `-> a. NameFilter + NameGrammar turn each file name into an ArrayDescriptor
//         |
//         `-> b. TreeAssembler nests them and synthesizes virtual parents
//
//   2. [FdfContext::resolve] -> Receives one tree
//         |
//         `-> a. check_syntax rejects invalid marker combinations
//         |
//         `-> b. Resolver loads every node through compression + backend and folds
//                children (transformers, extensions, buffer reassembly)
//
//   3. Returns `FdfValue` (usually an Arrow array)
//
//
// Data Flow (Writing):
//
//   1. [FdfContext::extract_buffers] -> Receives `&dyn Array`
//         |
//         `-> BufferExtractor returns a `__buffers__` subtree with in-memory payloads
//
//   2. [FdfContext::dump] -> Encodes each payload through its backend and writes it
//                            through its compression strategy
//
// ====================================================================================
mod context;
mod dump;
pub mod format;
pub mod stateless_api;

// --- High-Level Stateful API ---
pub use context::FdfContext;

// --- Low-Level Stateless API ---
pub use stateless_api::{parse_tree, resolve};
