//! Built-in backend registrations
//!
//! One module per compiled-in backend. Each exposes a `register` function
//! that adds the backend's flag registrar and constructor to a
//! [`Registry`](crate::Registry); [`Registry::builtin`](crate::Registry::builtin)
//! calls them all, gated on the matching cargo feature.

#[cfg(feature = "dummy")]
pub(crate) mod dummy;

#[cfg(feature = "rtltcp")]
pub(crate) mod rtltcp;
