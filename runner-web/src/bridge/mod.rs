//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod debug_ui;
mod session;

pub use session::{
    // WASM entry points
    update_pose,
    update_pose_json,
    clear_pose,
    tick,
    reset_calibration,
    restart_run,
    mark_lost,
    get_calibration_state,
    set_intent_source,
    key_down,
    key_up,
    set_speed_scale,
    configure,
    // Types
    BridgeError,
    RunnerFrame,
};

pub use debug_ui::{get_debug_overlay_text, set_frame_metrics, set_pose_latency};
