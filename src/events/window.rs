use crate::app::{App, AppRef};
use crate::dom;
use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_resize(wnd: &web::Window, app: &AppRef) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move || {
        app.borrow_mut().resize_to_window();
    }) as Box<dyn FnMut()>);
    dom::listen(wnd, "resize", closure.as_ref().unchecked_ref(), true);
    closure.forget();
}

pub fn wire_wheel(wnd: &web::Window, app: &AppRef) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        // we own scroll/zoom on this page
        ev.prevent_default();
        let mut guard = app.borrow_mut();
        let App { sim, canvas } = &mut *guard;
        // browsers report trackpad pinch as ctrl+wheel
        sim.on_wheel(ev.delta_y() as f32, ev.ctrl_key(), canvas);
    }) as Box<dyn FnMut(_)>);
    dom::listen(wnd, "wheel", closure.as_ref().unchecked_ref(), false);
    closure.forget();
}

pub fn wire_click(wnd: &web::Window, app: &AppRef) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let pos = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
        app.borrow_mut().sim.on_click(pos);
    }) as Box<dyn FnMut(_)>);
    dom::listen(wnd, "click", closure.as_ref().unchecked_ref(), true);
    closure.forget();
}
