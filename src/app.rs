#![cfg(target_arch = "wasm32")]
use crate::constants::{CANVAS_ID, NOTES_LAYER_ID};
use crate::context::SimulationContext;
use crate::core::{FieldParams, ParticleField};
use crate::dom::{self, CanvasSurface, DomNoteLayer};
use crate::events;
use crate::timers::{Scheduler, TimerId, TimerTask};
use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type Sim = SimulationContext<BrowserScheduler, DomNoteLayer>;

pub struct App {
    pub sim: Sim,
    pub canvas: CanvasSurface,
}

pub type AppRef = Rc<RefCell<App>>;

impl App {
    pub fn resize_to_window(&mut self) {
        let Some(window) = web::window() else {
            return;
        };
        let (w, h, dpr) = dom::window_metrics(&window);
        self.canvas.resize_backing(w, h, dpr);
        self.sim.resize(w, h, &mut self.canvas);
    }
}

/// Routes timer and note-element callbacks back into the shared app.
///
/// Holds a weak reference so the scheduler and note layer, which live inside
/// the app, do not keep it alive.
#[derive(Default)]
pub struct Bridge {
    app: RefCell<Weak<RefCell<App>>>,
}

impl Bridge {
    pub fn attach(&self, app: &AppRef) {
        *self.app.borrow_mut() = Rc::downgrade(app);
    }

    pub fn with_app(&self, f: impl FnOnce(&mut App)) {
        let Some(app) = self.app.borrow().upgrade() else {
            return;
        };
        let Ok(mut app) = app.try_borrow_mut() else {
            log::warn!("[bridge] app busy, dropping callback");
            return;
        };
        f(&mut app);
    }
}

/// `setTimeout`-backed scheduler. Browser handles double as [`TimerId`]s.
///
/// The scheduler owns every timeout closure. Cancelled ones are dropped in
/// [`cancel`](Scheduler::cancel); fired ones report their handle and are
/// dropped on the next schedule or cancel, never while still running.
pub struct BrowserScheduler {
    bridge: Rc<Bridge>,
    callbacks: FnvHashMap<i32, Closure<dyn FnMut()>>,
    fired: Rc<RefCell<Vec<i32>>>,
}

impl BrowserScheduler {
    pub fn new(bridge: Rc<Bridge>) -> Self {
        Self {
            bridge,
            callbacks: FnvHashMap::default(),
            fired: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn reap_fired(&mut self) {
        let Ok(mut fired) = self.fired.try_borrow_mut() else {
            return;
        };
        for raw in fired.drain(..) {
            self.callbacks.remove(&raw);
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, delay_ms: u32, task: TimerTask) -> TimerId {
        self.reap_fired();
        let Some(window) = web::window() else {
            return TimerId(0);
        };
        // the handle is only known after setTimeout returns
        let handle = Rc::new(Cell::new(0));
        let own = handle.clone();
        let bridge = self.bridge.clone();
        let fired = self.fired.clone();
        let cb = Closure::wrap(Box::new(move || {
            let id = TimerId(own.get());
            bridge.with_app(|app| app.sim.on_timer(id, task));
            fired.borrow_mut().push(id.0);
        }) as Box<dyn FnMut()>);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            delay_ms as i32,
        ) {
            Ok(raw) => {
                handle.set(raw);
                self.callbacks.insert(raw, cb);
                TimerId(raw)
            }
            Err(e) => {
                log::warn!("[timers] setTimeout failed for {:?}: {:?}", task, e);
                TimerId(0)
            }
        }
    }

    fn cancel(&mut self, id: TimerId) {
        self.reap_fired();
        if let Some(window) = web::window() {
            window.clear_timeout_with_handle(id.0);
        }
        self.callbacks.remove(&id.0);
    }
}

pub async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let Some(canvas_el) = document.get_element_by_id(CANVAS_ID) else {
        log::info!("[init] no #{} element, nothing to drive", CANVAS_ID);
        return Ok(());
    };
    let Some(notes_layer) = document.get_element_by_id(NOTES_LAYER_ID) else {
        log::info!("[init] no #{} element, nothing to drive", NOTES_LAYER_ID);
        return Ok(());
    };
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let phrases = dom::phrases_from(&canvas);
    let field = ParticleField::new(FieldParams::default(), phrases, rand::random())?;
    let surface = CanvasSurface::new(canvas.clone(), &dom::sprite_url_from(&canvas))?;

    let bridge = Rc::new(Bridge::default());
    let notes = DomNoteLayer::new(document, notes_layer, bridge.clone());
    let sim = SimulationContext::new(field, BrowserScheduler::new(bridge.clone()), Some(notes));
    let app: AppRef = Rc::new(RefCell::new(App {
        sim,
        canvas: surface,
    }));
    bridge.attach(&app);

    app.borrow_mut().resize_to_window();
    events::wire_input_handlers(&window, &canvas, &app);
    log::info!(
        "[init] {} particles, pointer events: {}",
        app.borrow().sim.field().len(),
        dom::supports_pointer_events(&window)
    );
    Ok(())
}
