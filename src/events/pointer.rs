use crate::app::{App, AppRef};
use crate::dom;
use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn client_pos(ev: &web::PointerEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

pub fn wire_pointer_handlers(canvas: &web::HtmlCanvasElement, app: &AppRef) {
    wire_pointerdown(canvas, app);
    wire_pointermove(canvas, app);
    for name in ["pointerup", "pointercancel", "pointerleave"] {
        wire_pointer_release(canvas, app, name);
    }
}

fn wire_pointerdown(canvas: &web::HtmlCanvasElement, app: &AppRef) {
    let app = app.clone();
    let canvas_capture = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        app.borrow_mut()
            .sim
            .on_pointer_down(ev.pointer_id(), client_pos(&ev));
        // capture is best effort; tracking continues without it
        _ = canvas_capture.set_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    dom::listen(canvas, "pointerdown", closure.as_ref().unchecked_ref(), false);
    closure.forget();
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, app: &AppRef) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut guard = app.borrow_mut();
        let App { sim, canvas } = &mut *guard;
        if sim.on_pointer_move(ev.pointer_id(), client_pos(&ev), canvas) {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    dom::listen(canvas, "pointermove", closure.as_ref().unchecked_ref(), false);
    closure.forget();
}

fn wire_pointer_release(canvas: &web::HtmlCanvasElement, app: &AppRef, name: &str) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        app.borrow_mut().sim.on_pointer_up(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    dom::listen(canvas, name, closure.as_ref().unchecked_ref(), true);
    closure.forget();
}
