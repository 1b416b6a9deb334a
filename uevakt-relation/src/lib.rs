//! # UE Relation Codec
//!
//! Crate for encoding and decoding the `fiveg_rfsim` relation payload
//! exchanged with the peer component that provides RF-simulation parameters.

pub mod rfsim;

pub use rfsim::{
    RelationState, RfsimCodec, RfsimData, RfsimDecodeError, SliceDiff, DEFAULT_RFSIM_PORT,
    SUPPORTED_VERSION,
};
