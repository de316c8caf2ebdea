//! Browser shell: canvas, animation-frame loop, timers and listeners.
//!
//! All mutable state lives in one thread-local `Runtime`. Event handlers only
//! touch the session through it; after every handler `reconcile` brings the
//! frame loop and the two timers in line with `Session::timer_plan`, so no frame,
//! score tick or menu return can fire after the phase that owned it has ended.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, window};

use crate::config::GameConfig;
use crate::engine::render;
use crate::error::GameError;
use crate::input::{Action, InputState, action_for_key};
use crate::puzzle::{CandidateId, SlotId};
use crate::session::{Phase, Session};

mod audio;
mod storage;
mod toast;
mod view;

pub use audio::{Tone, WebAudio};
pub use storage::{LocalStore, parse_score};
pub use view::{abilities_label, puzzle_markup};

const CANVAS_ID: &str = "gj-canvas";

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = RefCell::new(None);
}

fn with_runtime<T>(f: impl FnOnce(&mut Runtime) -> T) -> Option<T> {
    RUNTIME.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// --- Frame loop --------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// requestAnimationFrame loop with a tracked pending handle so it can be cancelled.
struct FrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

fn request_frame(callback: &FrameCallback) -> Option<i32> {
    let w = window()?;
    let borrowed = callback.borrow();
    let closure = borrowed.as_ref()?;
    w.request_animation_frame(closure.as_ref().unchecked_ref()).ok()
}

impl FrameLoop {
    fn new() -> Self {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let f = callback.clone();
        let p = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            p.set(None);
            let keep_going = with_runtime(|rt| rt.on_frame(ts)).unwrap_or(false);
            if keep_going && p.get().is_none() {
                p.set(request_frame(&f));
            }
        }) as Box<dyn FnMut(f64)>));
        Self { callback, pending }
    }

    fn start(&self) {
        if self.pending.get().is_none() {
            self.pending.set(request_frame(&self.callback));
        }
    }

    fn stop(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(w) = window() {
                w.cancel_animation_frame(id).ok();
            }
        }
    }
}

// --- Timers ------------------------------------------------------------------

/// Owned timer handle (dropping a gloo timer cancels it). A handle whose own callback
/// is running must not be dropped there, so it is `retire`d and released by the next
/// `collect` from outside that callback.
struct TimerSlot<T> {
    live: Option<T>,
    spent: Option<T>,
}

impl<T> TimerSlot<T> {
    fn new() -> Self {
        Self { live: None, spent: None }
    }

    fn arm(&mut self, make: impl FnOnce() -> T) {
        if self.live.is_none() {
            self.live = Some(make());
        }
    }

    fn disarm(&mut self) {
        self.live = None;
    }

    fn retire(&mut self) {
        if let Some(t) = self.live.take() {
            self.spent = Some(t);
        }
    }

    fn collect(&mut self) {
        self.spent = None;
    }
}

// --- Runtime -----------------------------------------------------------------

struct Runtime {
    session: Session,
    input: InputState,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    view: view::View,
    frames: FrameLoop,
    score_timer: Option<Interval>,
    menu_timer: TimerSlot<Timeout>,
    tick_ms: u32,
    game_over_delay_ms: u32,
}

impl Runtime {
    fn on_frame(&mut self, now: f64) -> bool {
        self.menu_timer.collect();
        self.session.frame(&mut self.input);
        self.draw(now);
        self.view.sync(&self.session);
        self.reconcile();
        self.session.timer_plan().frame_loop
    }

    fn draw(&self, now: f64) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        render::render(self.session.world(), &self.ctx, w, h, now);
    }

    /// Start / cancel the loop and timers so they match the session phase.
    fn reconcile(&mut self) {
        let plan = self.session.timer_plan();
        if plan.frame_loop {
            self.frames.start();
        } else {
            self.frames.stop();
        }

        if !plan.score_tick {
            self.score_timer = None; // dropping clears the interval
        } else if self.score_timer.is_none() {
            self.score_timer = Some(Interval::new(self.tick_ms, || {
                with_runtime(|rt| {
                    rt.session.tick_score();
                    rt.view.sync(&rt.session);
                });
            }));
        }

        if !plan.menu_return {
            self.menu_timer.disarm();
        } else {
            let delay = self.game_over_delay_ms;
            self.menu_timer.arm(|| {
                Timeout::new(delay, || {
                    with_runtime(Runtime::on_menu_return);
                })
            });
        }
    }

    fn on_menu_return(&mut self) {
        self.menu_timer.retire();
        self.session.return_to_menu();
        self.refresh();
    }

    /// Post-handler bookkeeping: timers, overlays, and a still frame when the loop is idle.
    fn refresh(&mut self) {
        self.reconcile();
        self.view.sync(&self.session);
        if !self.session.timer_plan().frame_loop {
            self.draw(now_ms());
        }
    }

    fn toggle_pause(&mut self) {
        self.session.toggle_pause();
        self.input.clear();
    }

    fn on_key_down(&mut self, evt: &KeyboardEvent) {
        self.menu_timer.collect();
        let key = evt.key();
        if self.session.puzzle_open() {
            if key == "Escape" {
                self.session.close_puzzle();
            }
            self.refresh();
            return;
        }
        match self.session.phase() {
            Phase::Playing => match self.input.key_down(&key) {
                Some(Action::Jump) => evt.prevent_default(),
                Some(Action::Pause) => self.toggle_pause(),
                _ => {}
            },
            Phase::Paused => {
                if action_for_key(&key) == Some(Action::Pause) {
                    self.toggle_pause();
                }
            }
            Phase::Menu => {
                if key == "Enter" {
                    self.start();
                }
            }
            Phase::GameOver => {}
        }
        self.refresh();
    }

    fn start(&mut self) {
        if self.session.start() {
            self.input.clear();
        }
    }

    fn on_click(&mut self, target: &Element) {
        self.menu_timer.collect();
        let Ok(Some(el)) = target.closest("[data-action]") else {
            return;
        };
        let action = el.get_attribute("data-action").unwrap_or_default();
        let id = el
            .get_attribute("data-id")
            .and_then(|raw| raw.parse::<usize>().ok());
        let in_play = self.session.phase() == Phase::Playing && !self.session.puzzle_open();
        match (action.as_str(), id) {
            ("start", _) => self.start(),
            ("pause", _) => self.toggle_pause(),
            ("jump", _) if in_play => self.input.press_jump(),
            ("interact", _) if in_play => self.input.press_interact(),
            ("select", Some(id)) => {
                self.session.select_candidate(CandidateId(id));
            }
            ("pair", Some(id)) => {
                self.session.attempt_pair(SlotId(id));
            }
            ("reset-puzzle", _) => self.session.reset_puzzle(),
            ("apply-puzzle", _) => {
                self.session.complete_puzzle();
            }
            ("close-puzzle", _) => self.session.close_puzzle(),
            _ => {}
        }
        self.refresh();
    }
}

// --- Entry -------------------------------------------------------------------

fn mount_canvas(doc: &Document, config: &GameConfig) -> Result<HtmlCanvasElement, GameError> {
    let canvas: HtmlCanvasElement = match doc.get_element_by_id(CANVAS_ID) {
        Some(el) => el.dyn_into().map_err(|_| GameError::MissingElement(CANVAS_ID.to_string()))?,
        None => {
            let c: HtmlCanvasElement = doc
                .create_element("canvas")?
                .dyn_into()
                .map_err(|_| GameError::Canvas2dUnavailable)?;
            c.set_id(CANVAS_ID);
            c
        }
    };
    canvas.set_width(config.canvas_width);
    canvas.set_height(config.canvas_height);
    canvas
        .set_attribute("style", "display:block; border:1px solid rgba(0,255,255,0.3); border-radius:8px; background:#0a0a2e;")
        .ok();
    Ok(canvas)
}

fn install_listeners(doc: &Document) -> Result<(), GameError> {
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            with_runtime(|rt| rt.on_key_down(&evt));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        // Key-ups always reach the input state so no direction stays stuck.
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            with_runtime(|rt| rt.input.key_up(&evt.key()));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        // One delegated listener for every overlay button and touch control.
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let Some(target) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            with_runtime(|rt| rt.on_click(&target));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Mount the game into the page and show the menu. Calling it again is a no-op.
pub fn launch(config: GameConfig) -> Result<(), GameError> {
    if RUNTIME.with(|cell| cell.borrow().is_some()) {
        log::warn!("gene jumper already running");
        return Ok(());
    }
    config.validate()?;
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;

    let canvas = mount_canvas(&doc, &config)?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(GameError::Canvas2dUnavailable)?
        .dyn_into()
        .map_err(|_| GameError::Canvas2dUnavailable)?;
    let view = view::View::mount(&doc, &canvas)?;

    let session = Session::new(
        config.clone(),
        Box::new(WebAudio::default()),
        Box::new(toast::Toasts::new(doc.clone(), view.toasts.clone())),
        Box::new(LocalStore::new(config.storage_key.clone())),
        SmallRng::from_entropy(),
    );
    log::info!("gene jumper mounted, high score {}", session.high_score());

    let runtime = Runtime {
        session,
        input: InputState::default(),
        canvas,
        ctx,
        view,
        frames: FrameLoop::new(),
        score_timer: None,
        menu_timer: TimerSlot::new(),
        tick_ms: config.score_tick_ms,
        game_over_delay_ms: config.game_over_delay_ms,
    };
    RUNTIME.with(|cell| cell.replace(Some(runtime)));

    install_listeners(&doc)?;
    with_runtime(Runtime::refresh);
    Ok(())
}
