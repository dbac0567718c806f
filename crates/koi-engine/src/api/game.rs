use thiserror::Error;

use crate::api::types::EntityId;
use crate::assets::prototypes::{PrototypeRegistry, SpawnError};
use crate::assets::registry::PixmapRegistry;
use crate::core::pixmap::{Pixmap, Rgba8};
use crate::core::scene::Scene;
use crate::core::time::Ticks;
use crate::systems::render::{render_scene, PaintOrder};

/// Configuration for the engine, provided by the simulation and validated
/// once at startup.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Canvas width in pixels (the low-resolution frame buffer; any
    /// upscaling happens outside the engine).
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Color the canvas is cleared to before each render pass.
    pub background: Rgba8,
    /// Optional fine-grained draw ordering within layers.
    pub paint_order: Option<PaintOrder>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            canvas_width: 160,
            canvas_height: 120,
            background: Rgba8::opaque(0, 0, 0),
            paint_order: None,
        }
    }
}

impl SimConfig {
    /// Reject configurations the engine cannot run with. Called once by
    /// [`Engine::new`]; simulations never see a half-configured engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::ZeroCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("canvas must have a positive size, got {width}x{height}")]
    ZeroCanvas { width: u32, height: u32 },
}

/// The core contract every simulation must fulfill.
pub trait Simulation {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> SimConfig {
        SimConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The per-tick logic step. Mutate entities, spawn/despawn, steer fish.
    /// Runs before the render pass; `ticks` is read-only time.
    fn update(&mut self, ctx: &mut EngineContext, ticks: Ticks);
}

/// Mutable access to engine state, passed to Simulation::init and
/// Simulation::update.
pub struct EngineContext {
    pub scene: Scene,
    /// Named images available to the simulation.
    pub images: PixmapRegistry,
    /// Entity prototypes available to [`EngineContext::spawn_kind`].
    pub prototypes: PrototypeRegistry,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            images: PixmapRegistry::new(),
            prototypes: PrototypeRegistry::new(),
            next_id: 1,
        }
    }

    /// Create a context with preloaded images and prototypes.
    pub fn with_assets(images: PixmapRegistry, prototypes: PrototypeRegistry) -> Self {
        Self {
            scene: Scene::new(),
            images,
            prototypes,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Build an entity from a registered prototype and spawn it.
    /// Returns the new entity's ID.
    pub fn spawn_kind(&mut self, kind: &str) -> Result<EntityId, SpawnError> {
        let id = self.next_id();
        let entity = self.prototypes.build(kind, id, &self.images)?;
        self.scene.spawn(entity);
        Ok(id)
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the tick loop: one `step` advances the tick counter, runs the
/// simulation's logic update, then runs exactly one render pass onto the
/// shared canvas. Everything is synchronous and single-threaded; entity
/// state only ever changes inside `update`.
pub struct Engine<S: Simulation> {
    sim: S,
    ctx: EngineContext,
    canvas: Pixmap,
    ticks: Ticks,
    background: Rgba8,
    paint_order: Option<PaintOrder>,
}

impl<S: Simulation> Engine<S> {
    /// Validate the simulation's config, then let it populate a fresh
    /// context.
    pub fn new(sim: S) -> Result<Self, ConfigError> {
        Self::with_context(sim, EngineContext::new())
    }

    /// Like [`Engine::new`], but with a pre-built context (typically one
    /// whose registries were already loaded from a manifest).
    pub fn with_context(mut sim: S, mut ctx: EngineContext) -> Result<Self, ConfigError> {
        let config = sim.config();
        config.validate()?;
        sim.init(&mut ctx);
        Ok(Self {
            sim,
            ctx,
            canvas: Pixmap::new(config.canvas_width, config.canvas_height),
            ticks: Ticks::new(),
            background: config.background,
            paint_order: config.paint_order,
        })
    }

    /// Run one full tick: logic update, then the render pass.
    pub fn step(&mut self) {
        self.ticks.advance();
        self.sim.update(&mut self.ctx, self.ticks);
        self.canvas.fill(self.background);
        render_scene(&self.ctx.scene, &mut self.canvas, self.paint_order.as_ref());
    }

    /// The frame produced by the last step.
    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    pub fn ticks(&self) -> Ticks {
        self.ticks
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn simulation(&self) -> &S {
        &self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use crate::components::layer::RenderLayer;
    use glam::DVec2;

    struct Blinker;

    impl Simulation for Blinker {
        fn config(&self) -> SimConfig {
            SimConfig {
                canvas_width: 8,
                canvas_height: 8,
                ..SimConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let mut image = Pixmap::new(2, 2);
            image.fill(Rgba8::opaque(255, 0, 0));
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id, RenderLayer::Fish)
                    .with_image(image)
                    .with_pos(DVec2::new(4.0, 4.0)),
            );
        }

        fn update(&mut self, ctx: &mut EngineContext, ticks: Ticks) {
            // Visible on even ticks only.
            let entity = ctx.scene.get_mut(EntityId(1)).unwrap();
            entity.set_visible(ticks.count() % 2 == 0);
        }
    }

    #[test]
    fn zero_canvas_is_rejected_at_startup() {
        struct Broken;
        impl Simulation for Broken {
            fn config(&self) -> SimConfig {
                SimConfig {
                    canvas_width: 0,
                    ..SimConfig::default()
                }
            }
            fn init(&mut self, _ctx: &mut EngineContext) {}
            fn update(&mut self, _ctx: &mut EngineContext, _ticks: Ticks) {}
        }
        assert!(matches!(
            Engine::new(Broken),
            Err(ConfigError::ZeroCanvas { .. })
        ));
    }

    #[test]
    fn step_ticks_and_renders_once_per_call() {
        let mut engine = Engine::new(Blinker).unwrap();
        assert_eq!(engine.ticks().count(), 0);

        engine.step(); // tick 1: hidden
        assert_eq!(engine.ticks().count(), 1);
        assert_eq!(engine.canvas().get(4, 4), Rgba8::opaque(0, 0, 0));

        engine.step(); // tick 2: visible
        assert_eq!(engine.canvas().get(4, 4), Rgba8::opaque(255, 0, 0));
    }

    #[test]
    fn spawn_kind_allocates_ids_and_spawns() {
        let manifest = crate::assets::manifest::SpriteManifest::from_json(
            r##"{
                "palette": { "o": "#112233" },
                "sprites": { "dot": { "rows": ["o"] } },
                "prototypes": { "mote": { "image": "dot", "layer": 0 } }
            }"##,
        )
        .unwrap();
        let images = PixmapRegistry::from_manifest(&manifest).unwrap();
        let prototypes = PrototypeRegistry::from_manifest(&manifest).unwrap();
        let mut ctx = EngineContext::with_assets(images, prototypes);

        let a = ctx.spawn_kind("mote").unwrap();
        let b = ctx.spawn_kind("mote").unwrap();
        assert_ne!(a, b);
        assert_eq!(ctx.scene.len(), 2);
        assert!(ctx.spawn_kind("whale").is_err());
    }
}
