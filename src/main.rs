//! Skyraid entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use skyraid::consts::*;
    use skyraid::highscores::format_time;
    use skyraid::render::CanvasRenderer;
    use skyraid::sim::{GameState, StepInput, step};
    use skyraid::{Difficulty, HighScores, Settings};

    /// Space reserved for the touch controls to the right of the canvas
    const SIDE_MARGIN: f32 = 115.0;
    /// Space reserved below the canvas
    const BOTTOM_MARGIN: f32 = 120.0;
    /// Touch steering keeps the ship this far above the finger
    const TOUCH_OFFSET_Y: f32 = 80.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        input: StepInput,
        paused: bool,
        last_time: f64,
        settings: Settings,
        records: HighScores,
        /// Set once the finished run has been folded into the records
        run_recorded: bool,
        /// Whether the finished run beat a record (for the overlay)
        new_record: bool,
    }

    impl Game {
        fn new(width: f32, height: f32, settings: Settings, records: HighScores) -> Self {
            let seed = js_sys::Date::now() as u64;
            Self {
                state: GameState::new(width, height, settings.difficulty, seed),
                renderer: None,
                input: StepInput::default(),
                paused: false,
                last_time: 0.0,
                settings,
                records,
                run_recorded: false,
                new_record: false,
            }
        }

        /// Run one simulation step and clear one-shot inputs
        fn update(&mut self, dt: f32) {
            step(&mut self.state, &self.input, dt);
            self.input.reload = false;
            self.input.switch_ammo = false;

            if self.state.game_over && !self.run_recorded {
                self.new_record = self
                    .records
                    .record_run(self.state.score, self.state.play_time);
                if self.new_record {
                    self.records.save();
                }
                self.run_recorded = true;
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(ref renderer) = self.renderer {
                renderer.render(&self.state);
            }
        }

        /// Replace the whole run state; nothing survives but the records
        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.state = GameState::new(
                self.state.bounds.x,
                self.state.bounds.y,
                self.settings.difficulty,
                seed,
            );
            self.input = StepInput::default();
            self.run_recorded = false;
            self.new_record = false;
            self.paused = false;
            log::info!("Game restarted with seed: {}", seed);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                el.set_text_content(Some(&format_time(self.state.play_time)));
            }

            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!(
                    "{} / {}",
                    self.records.best_score,
                    format_time(self.records.best_time_secs)
                )));
            }

            if let Some(el) = document
                .query_selector("#hud-difficulty .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(self.settings.difficulty.as_str()));
            }

            // Show/hide pause menu
            if let Some(el) = document.get_element_by_id("pause-menu") {
                let _ = el.set_attribute("class", if self.paused { "" } else { "hidden" });
            }

            // Show/hide game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.game_over {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                    if let Some(time_el) = document.get_element_by_id("final-time") {
                        time_el.set_text_content(Some(&format_time(self.state.play_time)));
                    }
                    if let Some(record_el) = document.get_element_by_id("record-message") {
                        let _ = record_el.set_attribute(
                            "class",
                            if self.new_record { "" } else { "hidden" },
                        );
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    /// Canvas size derived from the window, leaving room for the controls
    fn canvas_size(window: &web_sys::Window) -> (f32, f32) {
        let inner_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as f32;
        let inner_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0) as f32;
        (
            (inner_w - SIDE_MARGIN).max(200.0).floor(),
            (inner_h - BOTTOM_MARGIN).max(200.0).floor(),
        )
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skyraid starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = canvas_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let settings = Settings::load();
        let records = HighScores::load();

        let game = Rc::new(RefCell::new(Game::new(width, height, settings, records)));
        log::info!(
            "Game initialized with seed: {}",
            game.borrow().state.seed
        );

        match CanvasRenderer::new(&canvas) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Canvas 2D unavailable: {:?}", e),
        }

        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Skyraid running!");
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            if g.paused {
                // Keep re-stamping so unpausing applies no elapsed-time spike
                g.last_time = time;
                g.update_hud();
            } else if g.last_time == 0.0 {
                g.last_time = time;
            } else {
                let raw_dt = ((time - g.last_time) / 1000.0) as f32;
                g.last_time = time;

                // Stalled frames (tab suspension) are discarded outright;
                // slow ones are clamped
                if raw_dt <= STALL_FRAME_DT {
                    let dt = raw_dt.min(MAX_FRAME_DT);
                    g.update(dt);
                    g.render();
                    g.update_hud();
                }
            }
        }

        request_animation_frame(game);
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "ArrowUp" => g.input.up = true,
                    "ArrowDown" => g.input.down = true,
                    " " | "Spacebar" => {
                        event.prevent_default();
                        if g.state.game_over {
                            g.restart();
                        } else {
                            g.input.fire = true;
                        }
                    }
                    "r" | "R" => g.input.reload = true,
                    "t" | "T" => g.input.switch_ammo = true,
                    "Escape" | "p" | "P" => {
                        if !g.state.game_over {
                            g.paused = !g.paused;
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    "ArrowUp" => g.input.up = false,
                    "ArrowDown" => g.input.down = false,
                    " " | "Spacebar" => g.input.fire = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Dragging on the canvas steers the ship directly (kept above the
    /// finger so it stays visible)
    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let steer = |g: &mut Game, canvas: &HtmlCanvasElement, touch: web_sys::Touch| {
            let rect = canvas.get_bounding_client_rect();
            let scale_x = g.state.bounds.x / rect.width() as f32;
            let scale_y = g.state.bounds.y / rect.height() as f32;
            let x = (touch.client_x() as f32 - rect.left() as f32) * scale_x;
            let y = (touch.client_y() as f32 - rect.top() as f32) * scale_y;

            let half = g.state.player.aabb.size * 0.5;
            g.state.player.aabb.pos.x = x - half.x;
            g.state.player.aabb.pos.y = y - half.y - TOUCH_OFFSET_Y;
            let bounds = g.state.bounds;
            g.state.player.aabb.clamp_inside(bounds);
        };

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.state.game_over {
                    g.restart();
                    return;
                }
                if g.paused {
                    return;
                }
                if let Some(touch) = event.touches().get(0) {
                    steer(&mut g, &canvas_clone, touch);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.state.game_over || g.paused {
                    return;
                }
                if let Some(touch) = event.touches().get(0) {
                    steer(&mut g, &canvas_clone, touch);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Fire button: held
        if let Some(btn) = document.get_element_by_id("shoot-btn") {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                g.borrow_mut().input.fire = true;
            });
            let _ =
                btn.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();

            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                g.borrow_mut().input.fire = false;
            });
            let _ =
                btn.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reload button: edge
        if let Some(btn) = document.get_element_by_id("reload-btn") {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                g.borrow_mut().input.reload = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Ammo type button: edge
        if let Some(btn) = document.get_element_by_id("ammo-btn") {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = g.borrow_mut();
                if !g.state.game_over {
                    g.input.switch_ammo = true;
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Difficulty button: cycles the tier for the NEXT run
        if let Some(btn) = document.get_element_by_id("difficulty-btn") {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = g.borrow_mut();
                g.settings.difficulty = match g.settings.difficulty {
                    Difficulty::Easy => Difficulty::Normal,
                    Difficulty::Normal => Difficulty::Hard,
                    Difficulty::Hard => Difficulty::Easy,
                };
                g.settings.save();
                log::info!("Difficulty set to {}", g.settings.difficulty.as_str());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart button on the game-over overlay
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                g.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pause/resume buttons
        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = g.borrow_mut();
                if !g.state.game_over {
                    g.paused = true;
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().paused = false;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Window resizes re-derive the playfield; the sim rescales the player
    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let (width, height) = canvas_size(&window);
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
            game.borrow_mut().state.resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if !g.state.game_over {
                        g.paused = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if !g.state.game_over {
                    g.paused = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skyraid (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a seeded run without a display: hold fire, sweep the ship back and
/// forth, and report how it went.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use skyraid::Difficulty;
    use skyraid::highscores::format_time;
    use skyraid::sim::{GameState, StepInput, step};

    let mut state = GameState::new(800.0, 600.0, Difficulty::Normal, 0xC0FFEE);
    let dt = 1.0 / 60.0;

    for frame in 0u32.. {
        if state.game_over {
            break;
        }
        // Sweep left for a second, then right, firing all the while and
        // asking for a reload every few seconds
        let going_left = (frame / 60) % 2 == 0;
        let input = StepInput {
            left: going_left,
            right: !going_left,
            fire: true,
            reload: frame % 300 == 0,
            ..Default::default()
        };
        step(&mut state, &input, dt);
    }

    println!(
        "Demo run over: score {}, survived {}",
        state.score,
        format_time(state.play_time)
    );
}
