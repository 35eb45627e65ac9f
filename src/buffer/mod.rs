//! Fixed-size buffers shared by every pipeline stage
//!
//! - [`SampleBuffer`]: real-valued samples with basic statistics
//! - [`SpectralFrame`]: one analysis frame in polar form (magnitude + phase)
//!
//! Both are allocated once at construction and keep their length for their
//! whole lifetime.

pub mod sample_buffer;
pub mod spectral_frame;

pub use sample_buffer::SampleBuffer;
pub use spectral_frame::SpectralFrame;
