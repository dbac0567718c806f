mod sim;

use std::error::Error;

use koi_engine::{Engine, EngineContext, Pixmap, PixmapRegistry, PrototypeRegistry, SpriteManifest};

use crate::sim::PondSim;

const STEPS: u64 = 120;
const DUMP_EVERY: u64 = 40;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("pond demo failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let manifest = SpriteManifest::from_json(sim::MANIFEST)?;
    let images = PixmapRegistry::from_manifest(&manifest)?;
    let prototypes = PrototypeRegistry::from_manifest(&manifest)?;
    let ctx = EngineContext::with_assets(images, prototypes);

    let mut engine = Engine::with_context(PondSim::new(), ctx)?;
    log::info!(
        "pond initialized: {} entities on a {}x{} canvas",
        engine.context().scene.len(),
        engine.canvas().width(),
        engine.canvas().height()
    );

    while engine.ticks().count() < STEPS {
        engine.step();
        if engine.ticks().every(DUMP_EVERY) {
            println!("--- tick {} ---", engine.ticks().count());
            print!("{}", ascii_frame(engine.canvas()));
        }
    }
    Ok(())
}

/// Crude luminance ramp so the frame is visible in a terminal.
fn ascii_frame(canvas: &Pixmap) -> String {
    const RAMP: &[u8] = b" .:-=+*#%@";
    let mut out = String::with_capacity(((canvas.width() + 1) * canvas.height()) as usize);
    for y in 0..canvas.height() as i32 {
        for x in 0..canvas.width() as i32 {
            let px = canvas.get(x, y);
            let luma = (px.r as u32 * 3 + px.g as u32 * 6 + px.b as u32) / 10;
            let idx = (luma as usize * (RAMP.len() - 1)) / 255;
            out.push(RAMP[idx] as char);
        }
        out.push('\n');
    }
    out
}
