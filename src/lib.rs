//! Limb Match - IK/FK limb capture and matching for rigged characters

pub mod command;
pub mod core;
pub mod matcher;
pub mod record;
pub mod scene;
pub mod store;
