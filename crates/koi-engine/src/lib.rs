pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{ConfigError, Engine, EngineContext, SimConfig, Simulation};
pub use api::types::EntityId;
pub use assets::manifest::{ManifestError, PrototypeDescriptor, SpriteGrid, SpriteManifest};
pub use assets::prototypes::{EntityPrototype, PrototypeRegistry, SpawnError};
pub use assets::registry::PixmapRegistry;
pub use components::entity::Entity;
pub use components::layer::RenderLayer;
pub use components::sprite::SpriteVisual;
pub use core::compose::{compose, ComposeError, Overlay};
pub use core::geometry::{
    angle_diff, bearing, distance, normalize_degrees, rotate_vec, sin_cos_degrees, turn_toward,
};
pub use core::pixmap::{Pixmap, Rgba8};
pub use core::scene::Scene;
pub use core::time::Ticks;
pub use systems::render::{render_scene, PaintOrder};
