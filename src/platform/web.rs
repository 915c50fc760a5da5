//! Browser host
//!
//! `requestAnimationFrame` drives the [`GameLoop`]. Every request carries the
//! token it was issued with, so a frame queued before a loop swap or a tab
//! hide falls through harmlessly.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlInputElement, HtmlTextAreaElement, KeyboardEvent, PointerEvent};

use super::{FrameResult, GameLoop};
use crate::audio::WebAudio;
use crate::config::SimConfig;
use crate::input::{InputEvent, Key};
use crate::leaderboard::LocalLeaderboard;
use crate::scheduler::FrameToken;
use crate::session::{Collaborators, Session};
use crate::sim::{GameEvent, GamePhase, PcgRandom};
use crate::stats::LocalStorageStatsStore;

type SharedGame = Rc<RefCell<GameLoop>>;

/// LocalStorage key holding the leaderboard name
const PLAYER_NAME_KEY: &str = "sky_hopper_player";

pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Sky Hopper starting...");

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    // Hide loading indicator
    if let Some(loading) = document.get_element_by_id("loading") {
        let _ = loading.class_list().add_1("hidden");
    }

    let collaborators = Collaborators {
        stats: Box::new(LocalStorageStatsStore),
        leaderboard: Box::new(LocalLeaderboard::new()),
        audio: Box::new(WebAudio::new()),
    };
    let mut session = Session::new(
        SimConfig::default(),
        collaborators,
        Box::new(PcgRandom::from_entropy()),
    );
    session.set_player_name(stored_player_name());

    let game = Rc::new(RefCell::new(GameLoop::new(session)));

    setup_input_handlers(&document, game.clone())?;
    setup_visibility_handler(&document, game.clone())?;

    update_hud(&game.borrow(), &[]);
    let token = game.borrow_mut().sync(js_sys::Date::now());
    if let Some(token) = token {
        request_animation_frame(game, token);
    }

    log::info!("Sky Hopper running!");
    Ok(())
}

fn stored_player_name() -> Option<String> {
    web_sys::window()?
        .local_storage()
        .ok()??
        .get_item(PLAYER_NAME_KEY)
        .ok()?
        .filter(|name| !name.trim().is_empty())
}

/// Any visible dialog, matched by class or ARIA role
const OPEN_MODAL_SELECTOR: &str = ".modal:not(.hidden), [aria-modal=\"true\"]:not(.hidden)";

/// Text entry has focus or a dialog is open; gameplay input must not fire
fn overlay_focused(document: &Document) -> bool {
    let typing = document.active_element().is_some_and(|el| {
        el.dyn_ref::<HtmlInputElement>().is_some() || el.dyn_ref::<HtmlTextAreaElement>().is_some()
    });
    typing
        || document
            .query_selector(OPEN_MODAL_SELECTOR)
            .ok()
            .flatten()
            .is_some()
}

fn setup_input_handlers(document: &Document, game: SharedGame) -> Result<(), JsValue> {
    // Keyboard
    {
        let game = game.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let code = event.code();
            if code == "KeyM" {
                if !overlay_focused(&doc) {
                    let muted = game.borrow_mut().session_mut().toggle_muted();
                    log::info!("Sound {}", if muted { "off" } else { "on" });
                }
                return;
            }
            let key = Key::from_code(&code);
            if key == Key::Other {
                return;
            }
            let focused = overlay_focused(&doc);
            if !focused && matches!(key, Key::Space | Key::ArrowUp) {
                // Keep the page from scrolling
                event.prevent_default();
            }
            dispatch_input(&game, InputEvent::KeyDown(key), focused);
        });
        document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Volume slider, 0 - 100
    if let Some(slider) = document
        .get_element_by_id("volume")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        let game = game.clone();
        let input = slider.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let volume = (input.value_as_number() / 100.0) as f32;
            game.borrow_mut().session_mut().set_volume(volume);
        });
        slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Mouse, pen and touch
    {
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
            let focused = overlay_focused(&doc);
            dispatch_input(&game, InputEvent::PointerDown, focused);
        });
        document.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn dispatch_input(game: &SharedGame, event: InputEvent, focused: bool) {
    let result = {
        let mut g = game.borrow_mut();
        g.session_mut().set_overlay_focused(focused);
        g.handle_input(event, js_sys::Date::now())
    };
    after_frame(game, result);
}

fn setup_visibility_handler(document: &Document, game: SharedGame) -> Result<(), JsValue> {
    let doc = document.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        if doc.visibility_state() == web_sys::VisibilityState::Hidden {
            game.borrow_mut().suspend();
            log::info!("Frame loop suspended (tab hidden)");
        } else {
            let token = game.borrow_mut().resume(js_sys::Date::now());
            if let Some(token) = token {
                request_animation_frame(game.clone(), token);
            }
        }
    });
    document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn request_animation_frame(game: SharedGame, token: FrameToken) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |_time: f64| {
        // Date::now shares a clock with the input handlers
        let result = game.borrow_mut().frame(token, js_sys::Date::now());
        after_frame(&game, result);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn after_frame(game: &SharedGame, result: FrameResult) {
    update_hud(&game.borrow(), &result.events);
    if let Some(next) = result.next {
        request_animation_frame(game.clone(), next);
    }
}

/// Reflect scores and phase into the page
fn update_hud(game: &GameLoop, events: &[GameEvent]) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let session = game.session();
    let score = session.score();

    let set_text = |id: &str, text: String| {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(&text));
        }
    };
    set_text("score", score.pipe_score.to_string());
    set_text("coins", score.coin_score.to_string());
    set_text("high-score", session.high_score().to_string());
    let multiplier = session.config().multiplier_for(score.combo);
    set_text(
        "combo",
        if multiplier > 1 {
            format!("x{}", multiplier)
        } else {
            String::new()
        },
    );

    let toggle = |id: &str, visible: bool| {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    };
    toggle("start-screen", session.phase() == GamePhase::Start);
    toggle("game-over", session.phase() == GamePhase::GameOver);

    for event in events {
        match event {
            GameEvent::GameOver(summary) => {
                set_text("final-score", summary.total().to_string());
                set_text("final-diamonds", summary.diamonds.to_string());
                set_text("final-combo", summary.max_combo.to_string());
            }
            GameEvent::HighScore { .. } => toggle("new-best", true),
            GameEvent::Started => toggle("new-best", false),
            GameEvent::AchievementUnlocked { threshold } => {
                log::info!("Achievement unlocked: {} points", threshold);
                toggle("achievement", true);
            }
            _ => {}
        }
    }
}
