// Simulation constants shared by the field, the projector and the tests.

// Depth range (world units). Particles live in (NEAR_Z, FAR_Z].
pub const NEAR_Z: f32 = 0.01;
pub const FAR_Z: f32 = 0.8;
pub const DEPTH_SPAN: f32 = FAR_Z - NEAR_Z;
// Smallest step kept above NEAR_Z when a wrap lands exactly on the boundary
pub const DEPTH_EPSILON: f32 = 1e-6;

// Initial depth distribution: z = NEAR_Z + u^BIAS * span, denser near the camera
pub const DEPTH_BIAS_EXPONENT: f32 = 2.4;

// Population
pub const DEFAULT_DENSITY: f32 = 0.002; // particles per CSS pixel
pub const MIN_PARTICLES: usize = 200;

// Per-particle flags rolled at spawn
pub const DECORATIVE_RATE: f32 = 0.09;
pub const MESSAGE_RATE: f32 = 0.01;
