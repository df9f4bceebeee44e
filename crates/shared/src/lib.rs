//! Types shared between the game controller and its front ends: identifiers,
//! board geometry, move directions and the remote authority's wire format.

pub mod domain;
pub mod error;
pub mod protocol;
