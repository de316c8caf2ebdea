//! DOM overlays around the canvas: HUD, touch buttons, menu, pause screen and the
//! gene editor. Clickable elements carry `data-action` (and `data-id`) attributes
//! picked up by one delegated listener.

use std::fmt::Write;

use web_sys::{Document, Element, HtmlCanvasElement};

use crate::engine::{Abilities, MAX_HEALTH};
use crate::error::GameError;
use crate::puzzle::{Base, GenePuzzle};
use crate::session::{Phase, Session};

const ROOT_ID: &str = "gene-jumper";
const TOUCH_ONLY_CLASS: &str = "gj-touch-only";
// Touch controls are for small viewports only. `!important` beats the inline
// display the wrapper gets from `sync`.
const TOUCH_ONLY_RULE: &str = "@media (min-width: 768px) { .gj-touch-only { display: none !important; } }";

const OVERLAY_STYLE: &str = "position:absolute; inset:0; display:none; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:30; font-family:'Fira Code', monospace; color:#e0ffff;";
const PANEL_STYLE: &str = "background:rgba(10,14,30,0.92); border:1px solid rgba(0,255,255,0.3); border-radius:16px; padding:24px 32px; text-align:center; max-width:640px;";
const BUTTON_STYLE: &str = "margin:6px; padding:8px 18px; border-radius:10px; border:1px solid #0ff; background:#123; color:#e0ffff; cursor:pointer; font-family:inherit;";

pub struct View {
    hud: Element,
    score: Element,
    best: Element,
    health: Element,
    abilities: Element,
    touch: Element,
    menu: Element,
    menu_best: Element,
    game_over: Element,
    pause: Element,
    puzzle: Element,
    pub toasts: Element,
    // Last markup pushed to the editor; rebuilt only on change so clicks survive.
    puzzle_markup: String,
}

fn styled(doc: &Document, tag: &str, id: &str, style: &str) -> Result<Element, GameError> {
    let el = doc.create_element(tag)?;
    el.set_id(id);
    el.set_attribute("style", style)?;
    Ok(el)
}

fn by_id(doc: &Document, id: &str) -> Result<Element, GameError> {
    doc.get_element_by_id(id).ok_or_else(|| GameError::MissingElement(id.to_string()))
}

impl View {
    /// Build (or reuse) the container, attach the canvas and every overlay.
    pub fn mount(doc: &Document, canvas: &HtmlCanvasElement) -> Result<Self, GameError> {
        let root = match doc.get_element_by_id(ROOT_ID) {
            Some(el) => el,
            None => {
                let el = styled(doc, "div", ROOT_ID, "")?;
                doc.body().ok_or(GameError::NoDocument)?.append_child(&el)?;
                el
            }
        };
        root.set_attribute(
            "style",
            "position:relative; display:inline-block; margin:24px auto; user-select:none;",
        )?;
        root.append_child(canvas)?;

        let hud = styled(doc, "div", "gj-hud", "position:absolute; top:8px; left:8px; right:8px; display:none; justify-content:space-between; font-family:'Fira Code', monospace; font-size:14px; color:#ffd166; z-index:20; pointer-events:none;")?;
        hud.set_inner_html(&format!(
            "<div style='background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; padding:4px 8px;'>\
               Score: <span id='gj-score'>0</span> &nbsp; Best: <span id='gj-best'>0</span>\
               <div style='margin-top:4px; width:120px; height:8px; background:#333; border-radius:4px;'>\
                 <div id='gj-health' style='height:8px; width:100%; background:#ff4d4d; border-radius:4px;'></div>\
               </div>\
               <div id='gj-abilities' style='margin-top:4px; color:#7fffd4;'></div>\
             </div>\
             <button data-action='pause' style='{BUTTON_STYLE} pointer-events:auto;'>❚❚</button>"
        ));
        root.append_child(&hud)?;

        let rules = doc.create_element("style")?;
        rules.set_text_content(Some(TOUCH_ONLY_RULE));
        root.append_child(&rules)?;

        let touch = styled(doc, "div", "gj-touch", "position:absolute; bottom:8px; left:8px; right:8px; display:none; z-index:20;")?;
        touch.set_inner_html(&touch_markup());
        root.append_child(&touch)?;

        let menu = styled(doc, "div", "gj-menu", OVERLAY_STYLE)?;
        menu.set_inner_html(&format!(
            "<div style='{PANEL_STYLE}'>\
               <h1 style='margin:0 0 8px; color:#7fffd4;'>Gene Jumper</h1>\
               <p>Explore the Microscopic Universe</p>\
               <p>High Score: <span id='gj-menu-best'>0</span></p>\
               <p style='font-size:12px; opacity:0.8;'>← → / A D move · Space / ↑ jump · E / Enter edit genes · Esc / P pause</p>\
               <button data-action='start' style='{BUTTON_STYLE}'>Start Game</button>\
             </div>"
        ));
        root.append_child(&menu)?;

        let game_over = styled(doc, "div", "gj-game-over", OVERLAY_STYLE)?;
        root.append_child(&game_over)?;

        let pause = styled(doc, "div", "gj-pause", OVERLAY_STYLE)?;
        pause.set_inner_html(&format!(
            "<div style='{PANEL_STYLE}'>\
               <h2 style='margin:0 0 8px;'>Game Paused</h2>\
               <p>Your DNA research is on hold</p>\
               <button data-action='pause' style='{BUTTON_STYLE}'>Resume Game</button>\
             </div>"
        ));
        root.append_child(&pause)?;

        let puzzle = styled(doc, "div", "gj-puzzle", OVERLAY_STYLE)?;
        root.append_child(&puzzle)?;

        let toasts = styled(doc, "div", "gj-toasts", "position:fixed; top:12px; right:12px; display:flex; flex-direction:column; gap:8px; z-index:60; font-family:'Fira Code', monospace;")?;
        doc.body().ok_or(GameError::NoDocument)?.append_child(&toasts)?;

        Ok(Self {
            score: by_id(doc, "gj-score")?,
            best: by_id(doc, "gj-best")?,
            health: by_id(doc, "gj-health")?,
            abilities: by_id(doc, "gj-abilities")?,
            menu_best: by_id(doc, "gj-menu-best")?,
            hud,
            touch,
            menu,
            game_over,
            pause,
            puzzle,
            toasts,
            puzzle_markup: String::new(),
        })
    }

    /// Bring every overlay in line with the session.
    pub fn sync(&mut self, session: &Session) {
        let phase = session.phase();
        let in_game = matches!(phase, Phase::Playing | Phase::Paused);
        show(&self.hud, in_game, "flex");
        show(&self.touch, in_game, "block");
        show(&self.menu, phase == Phase::Menu, "flex");
        show(&self.game_over, phase == Phase::GameOver, "flex");
        show(&self.pause, phase == Phase::Paused, "flex");

        set_text(&self.score, &session.score().to_string());
        set_text(&self.best, &session.high_score().to_string());
        set_text(&self.menu_best, &session.high_score().to_string());
        let player = &session.world().player;
        let pct = player.health as f64 * 100.0 / MAX_HEALTH as f64;
        self.health.set_attribute("style", &format!(
            "height:8px; width:{pct:.0}%; background:#ff4d4d; border-radius:4px;"
        )).ok();
        set_text(&self.abilities, &abilities_label(&player.abilities));

        if phase == Phase::GameOver {
            set_html(&self.game_over, &game_over_markup(session.score()));
        }

        let markup = session.puzzle().map(puzzle_markup).unwrap_or_default();
        if markup != self.puzzle_markup {
            self.puzzle.set_inner_html(&markup);
            self.puzzle_markup = markup;
        }
        show(&self.puzzle, session.puzzle_open(), "flex");
    }
}

fn show(el: &Element, visible: bool, display: &str) {
    let style = el.get_attribute("style").unwrap_or_default();
    let base: String = style
        .split(';')
        .filter(|decl| !decl.trim_start().starts_with("display:") && !decl.trim().is_empty())
        .map(|decl| format!("{};", decl.trim()))
        .collect();
    let wanted = format!("{base} display:{};", if visible { display } else { "none" });
    if wanted != style {
        el.set_attribute("style", &wanted).ok();
    }
}

fn set_text(el: &Element, text: &str) {
    if el.text_content().as_deref() != Some(text) {
        el.set_text_content(Some(text));
    }
}

fn set_html(el: &Element, html: &str) {
    if el.inner_html() != html {
        el.set_inner_html(html);
    }
}

pub fn abilities_label(a: &Abilities) -> String {
    let mut parts = Vec::new();
    if a.jump_multiplier > 1.0 {
        parts.push(format!("Jump ×{:.1}", a.jump_multiplier));
    }
    if a.speed_multiplier > 1.0 {
        parts.push(format!("Speed ×{:.1}", a.speed_multiplier));
    }
    if a.shield {
        parts.push("Shield".to_string());
    }
    parts.join(" · ")
}

fn touch_markup() -> String {
    format!(
        "<div class='{TOUCH_ONLY_CLASS}' style='display:flex; justify-content:space-between;'>\
           <button data-action='jump' style='{BUTTON_STYLE}'>Jump</button>\
           <button data-action='interact' style='{BUTTON_STYLE}'>Edit Gene</button>\
         </div>"
    )
}

fn game_over_markup(score: u32) -> String {
    format!(
        "<div style='{PANEL_STYLE}'><h2 style='margin:0 0 8px; color:#ff6b6b;'>Game Over</h2>\
         <p>Final Score: {score}</p><p style='opacity:0.7;'>Returning to menu…</p></div>"
    )
}

fn base_color(base: Base) -> &'static str {
    match base {
        Base::A => "#e74c3c",
        Base::T => "#3498db",
        Base::G => "#2ecc71",
        Base::C => "#f1c40f",
    }
}

/// Gene editor panel for the current puzzle state.
pub fn puzzle_markup(puzzle: &GenePuzzle) -> String {
    let tile = "display:inline-flex; width:48px; height:48px; margin:4px; align-items:center; justify-content:center; border-radius:8px; font-weight:bold; font-size:20px; cursor:pointer; color:#fff;";
    let mut html = String::new();
    let _ = write!(
        html,
        "<div style='{PANEL_STYLE}'><h2 style='margin:0 0 4px;'>Gene Editor</h2>\
         <p style='font-size:12px;'>Select a base below, then click its pair in the sequence</p>\
         <h3>DNA Sequence</h3><div>"
    );
    for slot in puzzle.slots() {
        let (bg, border) = if slot.paired {
            (base_color(slot.base), "#7CFC00")
        } else {
            ("#444", "#888")
        };
        let _ = write!(
            html,
            "<span data-action='pair' data-id='{}' style='{tile} background:{bg}; border:2px solid {border};'>{}</span>",
            slot.id.0,
            slot.base.letter()
        );
    }
    html.push_str("</div><h3>Available Bases</h3><div>");
    let armed = puzzle.armed().map(|c| c.id);
    for cand in puzzle.pool() {
        let border = if armed == Some(cand.id) { "#ffd166" } else { "rgba(255,255,255,0.3)" };
        let _ = write!(
            html,
            "<span data-action='select' data-id='{}' style='{tile} background:{}; border:2px solid {border};'>{}</span>",
            cand.id.0,
            base_color(cand.base),
            cand.base.letter()
        );
    }
    let (done, total) = puzzle.progress();
    let _ = write!(
        html,
        "</div><p>Progress {done}/{total}</p>\
         <p style='font-size:12px; opacity:0.8;'>A pairs with T · G pairs with C</p>\
         <button data-action='reset-puzzle' style='{BUTTON_STYLE}'>Reset</button>"
    );
    if puzzle.is_complete() {
        let _ = write!(
            html,
            "<button data-action='apply-puzzle' style='{BUTTON_STYLE}'>Apply Genetic Enhancement</button>"
        );
    }
    let _ = write!(
        html,
        "<button data-action='close-puzzle' style='{BUTTON_STYLE}'>Close</button></div>"
    );
    html
}
