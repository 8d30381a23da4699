//! Render, gesture and timing constants.
//!
//! Values express intended behavior (cull margins, sensitivities, hold times)
//! and keep magic numbers out of the code. None of them are changed at runtime.

// Perspective: fov = min(width, height) * FOV_SCALE
pub const FOV_SCALE: f32 = 1.2;

// Culling
pub const CULL_MARGIN_PX: f32 = 50.0;

// Plain particle size and brightness, both grow with inverse depth
pub const STAR_RADIUS_SCALE: f32 = 2.4;
pub const STAR_RADIUS_MIN: f32 = 0.7;
pub const STAR_RADIUS_MAX: f32 = 40.0;
pub const STAR_ALPHA_BASE: f32 = 0.35;
pub const STAR_ALPHA_SCALE: f32 = 1.15;

// Plain particle tint: bluish far away, warmer up close
pub const TINT_RED_BASE: f32 = 180.0;
pub const TINT_RED_SCALE: f32 = 75.0;
pub const TINT_GREEN_BASE: f32 = 190.0;
pub const TINT_GREEN_SCALE: f32 = 65.0;
pub const TINT_BLUE_BASE: f32 = 200.0;
pub const TINT_BLUE_SCALE: f32 = 55.0;

// Decorative sprite sizing relative to the plain radius
pub const SPRITE_SIZE_SCALE: f32 = 2.2;
pub const SPRITE_SIZE_MIN: f32 = 6.0;
pub const SPRITE_SIZE_MAX: f32 = 14.0;
pub const SPRITE_ALPHA_BOOST: f32 = 0.15;

// Gestures
pub const WHEEL_SENSITIVITY: f32 = 0.0015;
pub const WHEEL_PINCH_EMULATION_FACTOR: f32 = 0.5; // ctrl+wheel from trackpad pinch
pub const PINCH_SENSITIVITY: f32 = 0.006;
pub const DRAG_Z_SENSITIVITY: f32 = 0.002;
pub const DRAG_PAN_MULT: f32 = 1.0;

// Notes
pub const HIT_RADIUS_PX: f32 = 18.0;
pub const NOTE_EDGE_PAD_PX: f32 = 10.0;
pub const NOTE_ANCHOR_OFFSET_PX: f32 = 14.0;
pub const NOTE_REMOVE_DELAY_MS: u32 = 180; // exit transition length
pub const MANUAL_CLOSE_MS: u32 = 5000;

// Idle + autoplay
pub const IDLE_MS: u32 = 10_000;
pub const AUTO_OPEN_MS: u32 = 2800;
pub const AUTO_GAP_MS: u32 = 600;
pub const AUTOPLAY_RETRY_MS: u32 = 1500;
pub const AUTOPLAY_MIN_VISIBLE: usize = 3;
pub const AUTOPLAY_PICK_MARGIN_PX: f32 = 20.0;

// Host page
pub const CANVAS_ID: &str = "starfield";
pub const NOTES_LAYER_ID: &str = "notes-layer";
pub const DEFAULT_SPRITE_URL: &str = "sunflower.svg";
pub const NOTE_CLASS: &str = "star-note";
pub const NOTE_OPEN_CLASS: &str = "open";
pub const NOTE_TO_RIGHT_CLASS: &str = "to-right";
pub const NOTE_TO_LEFT_CLASS: &str = "to-left";

pub const DEFAULT_PHRASES: &[&str] = &[
    "eu te amo",
    "você é incrível",
    "você é maravilhosa",
    "amor da minha vida todinha",
    "mais linda que um milhão de girassóis",
    "minha morada",
    "minha princesinha",
    "cachinhos mais lindos do mundo",
    "feito um astronauta vou amarte",
    "tatá❣️",
    "minha princesinha",
    "meu sonho não estaria completo sem você nele",
];
