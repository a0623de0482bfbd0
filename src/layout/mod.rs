// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Layout math for the piano roll.
//!
//! Pure transforms from musical time and pitch to pixel geometry:
//! pitch range resolution, derived metrics and transport mapping.

pub mod metrics;
pub mod range;
pub mod transport;

pub use metrics::Metrics;
pub use range::{resolve_pitch_range, PitchRange};
pub use transport::{
    transport_time_to_x, CoordinateSpace, TransportTime, BEATS_PER_BAR, SIXTEENTHS_PER_BEAT,
};
