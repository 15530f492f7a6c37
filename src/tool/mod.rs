//! Location and invocation of the external diffing toolchain.

pub mod gcli;
pub mod labview;
