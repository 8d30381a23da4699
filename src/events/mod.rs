#![cfg(target_arch = "wasm32")]
pub mod pointer;
pub mod touch;
pub mod window;

use crate::app::AppRef;
use crate::dom;
use web_sys as web;

/// Attach every listener. Pointer Events are preferred; touch events are only
/// used where the browser lacks them.
pub fn wire_input_handlers(wnd: &web::Window, canvas: &web::HtmlCanvasElement, app: &AppRef) {
    window::wire_resize(wnd, app);
    window::wire_wheel(wnd, app);
    window::wire_click(wnd, app);
    if dom::supports_pointer_events(wnd) {
        pointer::wire_pointer_handlers(canvas, app);
    } else {
        touch::wire_touch_handlers(canvas, app);
    }
}
