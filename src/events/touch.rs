use crate::app::{App, AppRef};
use crate::dom;
use glam::Vec2;
use smallvec::SmallVec;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Touches = SmallVec<[Vec2; 4]>;

fn active_touches(ev: &web::TouchEvent) -> Touches {
    let list = ev.touches();
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
        .collect()
}

pub fn wire_touch_handlers(canvas: &web::HtmlCanvasElement, app: &AppRef) {
    wire_touchstart(canvas, app);
    wire_touchmove(canvas, app);
    for name in ["touchend", "touchcancel"] {
        wire_touch_release(canvas, app, name);
    }
}

fn wire_touchstart(canvas: &web::HtmlCanvasElement, app: &AppRef) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        let touches = active_touches(&ev);
        app.borrow_mut().sim.on_touch_start(&touches);
        if !touches.is_empty() {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    dom::listen(canvas, "touchstart", closure.as_ref().unchecked_ref(), false);
    closure.forget();
}

fn wire_touchmove(canvas: &web::HtmlCanvasElement, app: &AppRef) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        let touches = active_touches(&ev);
        let mut guard = app.borrow_mut();
        let App { sim, canvas } = &mut *guard;
        if sim.on_touch_move(&touches, canvas) {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    dom::listen(canvas, "touchmove", closure.as_ref().unchecked_ref(), false);
    closure.forget();
}

fn wire_touch_release(canvas: &web::HtmlCanvasElement, app: &AppRef, name: &str) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        app.borrow_mut().sim.on_touch_end(&active_touches(&ev));
    }) as Box<dyn FnMut(_)>);
    dom::listen(canvas, name, closure.as_ref().unchecked_ref(), true);
    closure.forget();
}
