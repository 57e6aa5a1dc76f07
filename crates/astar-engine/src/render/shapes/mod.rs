//! Shape renderers.
//!
//! Each renderer follows the same frame protocol, driven by `SceneRenderer`:
//! `prepare` → `push`* → `upload` → `draw`* (one call per paint-order run).

mod common;

pub mod circle;
pub mod line;
pub mod text;

pub(crate) use common::QuadBuffers;
