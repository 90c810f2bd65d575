// playbook-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contrats d'entrée/sortie : DatasetSource, StateStore
pub mod ports;

// 2. Domain (Cœur du métier)
// Tables, scoring qualité, état de session, snapshots.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, échantillon synthétique, fichiers de config, stockage JSON
pub mod infrastructure;

// 4. Application (Use Cases)
// Analyse, persistance, exports
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// Permet d'importer l'erreur principale facilement : use playbook_core::PlaybookError;
pub use error::PlaybookError;
