//! A runtime for applying HFST optimized-lookup finite-state transducers to
//! input strings: binary loading, longest-match tokenization, and a
//! recursive backtracking search with flag-diacritic support.
//!
//! The entry point is [`transducer::Transducer::load`], followed by
//! [`transducer::Transducer::apply`] or
//! [`transducer::Transducer::apply_bulk`].

pub mod error;
pub mod tokenizer;
pub mod transducer;
pub mod types;

pub use error::Error;
pub use transducer::Transducer;
