//! # Abriss Core Library
//!
//! A library for preparing and batching large pulldown screens of
//! protein-structure-prediction jobs against an external folding engine.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear separation of concerns,
//! making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`FastaEntry`, `JobDescriptor`),
//!   the streaming FASTA reader/writer, and the fold-specification store that canonicalizes raw
//!   specification text into deduplicated sequence sets.
//!
//! - **[`engine`]: The Logic Core.** This layer holds the batching logic: the feature resolver
//!   boundary, the length clusterer that groups jobs into homogeneous padding bins, and the
//!   registry of pluggable folding backends exposing the `predict`/`postprocess` contract.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing layer. It ties the
//!   `engine` and `core` together to execute complete procedures, such as splitting a multi-FASTA
//!   into per-sequence files or clustering fold jobs into a batch table. It provides a simple and
//!   powerful entry point for end-users of the library.

pub mod core;
pub mod engine;
pub mod workflows;
