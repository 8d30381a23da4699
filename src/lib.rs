//! Interactive fly-through starfield with notes anchored to some particles.
//!
//! The simulation core is target independent; the browser binding (Canvas 2D
//! drawing, note elements, timers and input listeners) is compiled for
//! `wasm32` only and started from [`start`].

pub mod activity;
pub mod camera;
pub mod constants;
pub mod context;
pub mod core;
pub mod input;
pub mod overlay;
pub mod render;
pub mod timers;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;

pub use activity::{ActivityPhase, ActivityState};
pub use camera::{project, CameraState, Projection, Viewport};
pub use context::SimulationContext;
pub use crate::core::{FieldError, FieldParams, Particle, ParticleField, ParticleKind};
pub use input::{CameraDelta, GestureController};
pub use overlay::{hit_test, Anchor, NoteId, NoteOverlay, NoteSurface, OpenOutcome, Placement};
pub use render::{DrawStats, DrawSurface, Rgba};
pub use timers::{ManualScheduler, Scheduler, TimerId, TimerTask};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("starfield starting");

    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = app::init().await {
            log::error!("[init] error: {:?}", e);
        }
    });
    Ok(())
}
