//! Clip loading.
//!
//! Resolves clip ids to decoded, format-conformed buffers, loading distinct
//! clips concurrently and recording failures instead of aborting.

mod assets;

pub use assets::{
    AssetLoadFailure, AssetLoader, LoadOutcome, LoaderConfig, DEFAULT_MAX_CONCURRENT_LOADS,
};
