pub mod config;
pub mod error;

pub mod catalog;
pub mod pairing;
pub mod slot;

pub use catalog::{SymbolCatalog, SymbolDefinition, STANDARD_CATALOG_VERSION};
pub use pairing::{
    pair, pair_with, Annotation, MarkerColoring, PairRecord, PairingResult, Role, PALETTE_SIZE,
};
pub use slot::ColorSlotAllocator;
