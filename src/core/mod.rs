pub mod config;
pub mod error;
pub mod types;

pub use config::{MatchConfig, StoreBackend};
pub use error::{MatchError, Result, SceneError, SceneResult};
pub use types::{AlignmentHandle, AttrRef, Bound, Pose, SceneRef, CHAIN_LEN};
