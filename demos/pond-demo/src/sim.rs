use glam::DVec2;
use koi_engine::api::game::{EngineContext, SimConfig, Simulation};
use koi_engine::{compose, turn_toward, EntityId, Overlay, PaintOrder, Rgba8, Ticks};

const CANVAS_W: u32 = 64;
const CANVAS_H: u32 = 32;
const SWIM_SPEED: f64 = 0.6;
const TURN_RATE: f64 = 6.0;

/// All pond artwork and prototypes, inline. A real game would load this
/// from a file; the engine only ever sees the parsed manifest.
pub const MANIFEST: &str = r##"{
    "palette": {
        ".": "transparent",
        "o": "#E8862A",
        "w": "#F4F0E6",
        "g": "#3F7D45",
        "s": "#8A8F98",
        "r": "#C23B22"
    },
    "sprites": {
        "koi": {
            "rows": [
                "..oo....w",
                "oooooowww",
                "..oo....w"
            ]
        },
        "reed": {
            "rows": ["g.", ".g", "g.", ".g", "g."]
        },
        "hook": {
            "rows": ["..s", "..s", "s.s", "sss"]
        },
        "worm": {
            "rows": ["rr", ".r"]
        }
    },
    "prototypes": {
        "koi": { "image": "koi", "layer": 3 },
        "reed": { "image": "reed", "layer": 1 },
        "hook": { "image": "hook", "layer": 4, "center": [1, 3] }
    }
}"##;

struct Swimmer {
    id: EntityId,
    route: [DVec2; 2],
}

/// A handful of koi cruising between the reeds while a baited hook bobs on
/// the right. Headless: each tick is pure logic plus one render pass.
pub struct PondSim {
    swimmers: Vec<Swimmer>,
}

impl PondSim {
    pub fn new() -> Self {
        Self {
            swimmers: Vec::new(),
        }
    }
}

impl Simulation for PondSim {
    fn config(&self) -> SimConfig {
        SimConfig {
            canvas_width: CANVAS_W,
            canvas_height: CANVAS_H,
            background: Rgba8::opaque(0x14, 0x2B, 0x3D),
            // Reeds behind koi wherever the layers tie.
            paint_order: Some(PaintOrder::new(["reed", "koi"])),
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        for x in [6.0, 44.0] {
            let id = ctx.spawn_kind("reed").expect("reed prototype");
            ctx.scene.get_mut(id).expect("just spawned").pos = DVec2::new(x, 26.0);
        }

        let routes = [
            [DVec2::new(8.0, 8.0), DVec2::new(50.0, 12.0)],
            [DVec2::new(52.0, 24.0), DVec2::new(12.0, 20.0)],
            [DVec2::new(30.0, 6.0), DVec2::new(26.0, 26.0)],
        ];
        for (i, route) in routes.into_iter().enumerate() {
            let id = ctx.spawn_kind("koi").expect("koi prototype");
            let fish = ctx.scene.get_mut(id).expect("just spawned");
            fish.pos = route[0];
            fish.set_heading_towards(route[1].x, route[1].y);
            fish.set_transparency(255 - (i as u8) * 40);
            self.swimmers.push(Swimmer { id, route });
        }

        // The hook wears its bait as an overlay; the composited image
        // replaces the plain hook, and the pivot shift keeps the rod-tip
        // anchor on the same pixel of the hook.
        let id = ctx.spawn_kind("hook").expect("hook prototype");
        let hook_image = ctx.images.get("hook").expect("hook sprite").clone();
        let worm = ctx.images.get("worm").expect("worm sprite").clone();
        let (baited, shift) =
            compose(hook_image, &[Overlay::new(worm, -1, 3)]).expect("bait overlay");
        let hook = ctx.scene.get_mut(id).expect("just spawned");
        hook.pos = DVec2::new(56.0, 10.0);
        hook.set_image(baited);
        hook.set_center_of_rotation(1 + shift.x, 3 + shift.y);
    }

    fn update(&mut self, ctx: &mut EngineContext, ticks: Ticks) {
        for swimmer in &mut self.swimmers {
            let Some(fish) = ctx.scene.get_mut(swimmer.id) else {
                continue;
            };

            // Swap waypoints when the current one is reached.
            if fish.pos.distance(swimmer.route[1]) < 1.0 {
                swimmer.route.swap(0, 1);
                let target = swimmer.route[1];
                fish.set_heading_towards(target.x, target.y);
            }

            // Ease the visual rotation toward the heading, keeping the
            // artwork upright by mirroring instead of turning past 90.
            let heading = fish.heading();
            let faces_left = heading > 90.0 && heading < 270.0;
            fish.set_mirror_x(faces_left);
            let visual_target = if faces_left { heading - 180.0 } else { heading };
            fish.set_rotation(turn_toward(fish.rotation(), visual_target, TURN_RATE));
            fish.advance(SWIM_SPEED);
        }

        // Bob the hook: a two-frame cycle driven by the tick counter.
        if let Some(hook) = ctx.scene.find_by_tag_mut("hook") {
            let bob = if ticks.frame(20, 2) == 0 { 0.15 } else { -0.15 };
            hook.pos.y += bob;
        }
    }
}
