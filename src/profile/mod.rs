//! Profile layer
//!
//! Storage seam plus the validated macro save/adjust flow.

pub mod service;
pub mod store;

pub use service::{
    adjust_pair, adjust_position, adjust_step, load_macro_allocation, save_macro_allocation,
    save_macro_settings, MacroPlan, ProfileError, ProfileResult,
};
pub use store::ProfileStore;

#[cfg(test)]
pub use store::MockProfileStore;
