pub mod engine;
pub mod icons;
pub mod index;
pub mod projection;

pub use engine::{ClusterEngine, EngineAction, EngineConfig, ExpandState, RenderPlan};
pub use icons::{IconCache, MarkerIcon};
pub use index::{ClusterId, ClusterIndex, ClusterNode, GeoBounds};
pub use projection::PixelPoint;
