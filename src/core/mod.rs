// Core modules implementing acquisition, overflow resolution, classification, and errors.
pub mod buffer;
pub mod charset;
pub mod error;
pub mod resolve;
pub mod source;
pub mod validate;
