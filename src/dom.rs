#![cfg(target_arch = "wasm32")]
use crate::app::Bridge;
use crate::camera::Viewport;
use crate::constants::*;
use crate::overlay::{Anchor, NoteId, NoteSurface, Placement};
use crate::render::{DrawSurface, Rgba};
use fnv::FnvHashMap;
use glam::Vec2;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[inline]
pub fn listen(target: &web::EventTarget, event: &str, callback: &js_sys::Function, passive: bool) {
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(passive);
    _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        event, callback, &opts,
    );
}

#[inline]
pub fn supports_pointer_events(window: &web::Window) -> bool {
    js_sys::Reflect::has(window, &"PointerEvent".into()).unwrap_or(false)
}

/// Viewport size in CSS pixels and the device pixel ratio.
pub fn window_metrics(window: &web::Window) -> (f32, f32, f64) {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let dpr = window.device_pixel_ratio();
    let dpr = if dpr > 0.0 { dpr } else { 1.0 };
    (w as f32, h as f32, dpr)
}

/// Newline separated phrase list from `data-phrases`, or the built-in list.
pub fn phrases_from(canvas: &web::HtmlCanvasElement) -> Vec<String> {
    let custom: Vec<String> = canvas
        .get_attribute("data-phrases")
        .map(|raw| {
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    if custom.is_empty() {
        DEFAULT_PHRASES.iter().map(|s| s.to_string()).collect()
    } else {
        custom
    }
}

pub fn sprite_url_from(canvas: &web::HtmlCanvasElement) -> String {
    canvas
        .get_attribute("data-sprite")
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SPRITE_URL.to_owned())
}

// ---------------- Canvas 2D surface ----------------

pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    sprite: web::HtmlImageElement,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement, sprite_url: &str) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let sprite = web::HtmlImageElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        sprite.set_src(sprite_url);
        watch_sprite(sprite.clone(), sprite_url.to_owned());
        Ok(Self {
            canvas,
            ctx,
            sprite,
        })
    }

    /// Size the element in CSS pixels and its backing store in device pixels,
    /// then scale the transform so drawing stays in CSS pixels.
    pub fn resize_backing(&self, width: f32, height: f32, dpr: f64) {
        let style = self.canvas.style();
        _ = style.set_property("width", &format!("{}px", width));
        _ = style.set_property("height", &format!("{}px", height));
        self.canvas
            .set_width(((width as f64 * dpr).floor() as u32).max(1));
        self.canvas
            .set_height(((height as f64 * dpr).floor() as u32).max(1));
        _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }
}

fn watch_sprite(img: web::HtmlImageElement, url: String) {
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(img.decode()).await {
            Ok(_) => log::info!("[sprite] loaded {}", url),
            Err(e) => log::warn!("[sprite] {} unavailable, drawing plain points: {:?}", url, e),
        }
    });
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, viewport: &Viewport) {
        self.ctx
            .clear_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
    }

    fn sprite_ready(&self) -> bool {
        self.sprite.complete() && self.sprite.natural_width() > 0
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }

    fn draw_sprite(&mut self, center: Vec2, size: f32, alpha: f32) {
        let half = size as f64 * 0.5;
        self.ctx.set_global_alpha(alpha as f64);
        _ = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                &self.sprite,
                center.x as f64 - half,
                center.y as f64 - half,
                size as f64,
                size as f64,
            );
        self.ctx.set_global_alpha(1.0);
    }
}

// ---------------- Note elements ----------------

struct NoteElement {
    el: web::HtmlElement,
    _on_click: Closure<dyn FnMut(web::MouseEvent)>,
}

/// Note elements appended to the overlay container.
pub struct DomNoteLayer {
    document: web::Document,
    container: web::Element,
    bridge: Rc<Bridge>,
    elements: FnvHashMap<NoteId, NoteElement>,
}

impl DomNoteLayer {
    pub fn new(document: web::Document, container: web::Element, bridge: Rc<Bridge>) -> Self {
        Self {
            document,
            container,
            bridge,
            elements: FnvHashMap::default(),
        }
    }
}

impl NoteSurface for DomNoteLayer {
    fn create(&mut self, note: NoteId, text: &str) {
        let el = match self
            .document
            .create_element("div")
            .map(|e| e.dyn_into::<web::HtmlElement>())
        {
            Ok(Ok(el)) => el,
            _ => {
                log::warn!("[notes] could not create element for #{}", note.0);
                return;
            }
        };
        el.set_class_name(&format!("{} {}", NOTE_CLASS, NOTE_TO_RIGHT_CLASS));
        el.set_text_content(Some(text));
        _ = self.container.append_child(&el);

        let bridge = self.bridge.clone();
        let on_click = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            // keep the window click handler from hit-testing the same click
            ev.stop_propagation();
            bridge.with_app(|app| app.sim.on_note_clicked(note));
        }) as Box<dyn FnMut(_)>);
        _ = el.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
        self.elements.insert(
            note,
            NoteElement {
                el,
                _on_click: on_click,
            },
        );
    }

    fn place(&mut self, note: NoteId, placement: &Placement) {
        let Some(NoteElement { el, .. }) = self.elements.get(&note) else {
            return;
        };
        let to_right = placement.anchor == Anchor::Right;
        let cl = el.class_list();
        _ = cl.toggle_with_force(NOTE_TO_RIGHT_CLASS, to_right);
        _ = cl.toggle_with_force(NOTE_TO_LEFT_CLASS, !to_right);
        let style = el.style();
        _ = style.set_property("left", &format!("{}px", placement.left));
        _ = style.set_property("top", &format!("{}px", placement.top));
    }

    fn reveal(&mut self, note: NoteId) {
        let Some(NoteElement { el, .. }) = self.elements.get(&note) else {
            return;
        };
        let el = el.clone();
        let cb = Closure::once_into_js(move || {
            _ = el.class_list().add_1(NOTE_OPEN_CLASS);
        });
        if let Some(window) = web::window() {
            _ = window.request_animation_frame(cb.unchecked_ref());
        }
    }

    fn conceal(&mut self, note: NoteId) {
        if let Some(NoteElement { el, .. }) = self.elements.get(&note) {
            _ = el.class_list().remove_1(NOTE_OPEN_CLASS);
        }
    }

    fn remove(&mut self, note: NoteId) {
        if let Some(NoteElement { el, .. }) = self.elements.remove(&note) {
            el.remove();
        }
    }
}
