//! Core math types: glam re-exports and axis-aligned bounding boxes.

pub use glam::{Vec2, Vec3, vec2, vec3};

pub mod aabb;

pub use aabb::Aabb;
