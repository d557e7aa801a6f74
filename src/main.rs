//! Skyline Runner entry point
//!
//! In the browser this wires the canvas, input, HUD, and tunable sliders to a
//! `GameEngine` and pumps it from requestAnimationFrame. Natively it runs a
//! headless autopilot session on the software rasterizer.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, HtmlInputElement,
        KeyboardEvent, PointerEvent, TouchEvent,
    };

    use skyline_runner::audio::MusicScheduler;
    use skyline_runner::highscores::LocalStorageStore;
    use skyline_runner::renderer::canvas::CanvasSurface;
    use skyline_runner::sim::GamePhase;
    use skyline_runner::{GameEngine, PhysicsConfig, SharedConfig, Tunable};

    /// Sprite sheet served next to the page
    const SPRITE_URL: &str = "assets/runner.png";

    /// Browser session: engine plus the DOM objects it draws into
    struct Game {
        engine: GameEngine<LocalStorageStore>,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        sprite: HtmlImageElement,
        music: MusicScheduler,
        config: SharedConfig,
    }

    impl Game {
        /// Match the backing store to the CSS size and device pixel ratio
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let (w, h) = css_size(&self.canvas);
            self.canvas.set_width((w as f64 * dpr) as u32);
            self.canvas.set_height((h as f64 * dpr) as u32);
            // Simulation works in CSS pixels
            if let Err(e) = self.surface.context().set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
                log::warn!("set_transform failed: {:?}", e);
            }
            self.engine.on_resize(w, h);
        }

        fn action(&mut self) {
            self.music.resume();
            self.engine.on_action_pressed();
        }

        fn frame(&mut self, time: f64) {
            let Game {
                engine,
                surface,
                sprite,
                music,
                ..
            } = self;
            engine.frame(time, surface, Some(&*sprite));
            music.update(engine.music_signal());
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let hud = self.engine.snapshot();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-hi .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.hi_score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-speed .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.1}", hud.speed)));
            }

            set_hidden(document, "intro", hud.phase != GamePhase::Intro);
            set_hidden(document, "game-over", hud.phase != GamePhase::GameOver);
            if hud.phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&hud.score.to_string()));
                }
            }
            if let Some(el) = document.get_element_by_id("music-toggle") {
                let label = if self.engine.music_enabled() {
                    "♪ on"
                } else {
                    "♪ off"
                };
                el.set_text_content(Some(label));
            }
        }
    }

    fn css_size(canvas: &HtmlCanvasElement) -> (f32, f32) {
        (canvas.client_width() as f32, canvas.client_height() as f32)
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Skyline Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let sprite = HtmlImageElement::new()?;
        sprite.set_src(SPRITE_URL);
        watch_sprite(sprite.clone());

        let config = PhysicsConfig::load().shared();
        let seed = js_sys::Date::now() as u64;
        let (w, h) = css_size(&canvas);
        let engine = GameEngine::new(w, h, config.clone(), LocalStorageStore, seed);

        let game = Rc::new(RefCell::new(Game {
            engine,
            surface: CanvasSurface::new(ctx),
            canvas: canvas.clone(),
            sprite,
            music: MusicScheduler::new(),
            config,
        }));
        game.borrow_mut().fit_canvas();

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_tunable_sliders(&document, game.clone());
        setup_lifecycle(game.clone());

        request_animation_frame(game);

        log::info!("Skyline Runner running!");
        Ok(())
    }

    /// Log when the sprite sheet is ready; frames before that skip the runner
    fn watch_sprite(sprite: HtmlImageElement) {
        wasm_bindgen_futures::spawn_local(async move {
            match wasm_bindgen_futures::JsFuture::from(sprite.decode()).await {
                Ok(_) => log::info!(
                    "Sprite sheet ready ({}x{})",
                    sprite.natural_width(),
                    sprite.natural_height()
                ),
                Err(e) => log::warn!("Sprite sheet failed to load: {:?}", e),
            }
        });
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Pointer covers mouse, pen, and touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.is_primary() {
                    game.borrow_mut().action();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keep touches from scrolling or emulating mouse clicks
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" | "Enter" | "w" | "W" => {
                        event.prevent_default();
                        g.action();
                    }
                    "m" | "M" => {
                        let enabled = !g.engine.music_enabled();
                        g.engine.set_music_enabled(enabled);
                        g.music.resume();
                        log::info!("Music: {}", enabled);
                    }
                    "a" | "A" => {
                        let enabled = !g.engine.autopilot();
                        g.engine.set_autopilot(enabled);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_canvas();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Bind every `<input data-tunable="name">` to the shared physics config
    fn setup_tunable_sliders(document: &Document, game: Rc<RefCell<Game>>) {
        let Ok(inputs) = document.query_selector_all("[data-tunable]") else {
            return;
        };

        for i in 0..inputs.length() {
            let Some(input) = inputs
                .get(i)
                .and_then(|node| node.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            let name = input.get_attribute("data-tunable").unwrap_or_default();
            let Some(tunable) = Tunable::parse_name(&name) else {
                log::warn!("Unknown tunable slider: {}", name);
                continue;
            };

            let (lo, hi) = tunable.range();
            input.set_min(&lo.to_string());
            input.set_max(&hi.to_string());
            input.set_value(&game.borrow().config.get().get(tunable).to_string());

            let game = game.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let value = input_clone.value_as_number() as f32;
                let mut g = game.borrow_mut();
                g.engine.set_tunable(tunable, value);
                g.config.get().save();
            });
            let _ =
                input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Hidden tabs get no frames; restart the clock on return
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().engine.suspend_clock();
                    log::info!("Tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Page going away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.engine.teardown();
                g.music.update(false);
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.engine.is_torn_down() {
                log::info!("Frame loop stopped");
                return;
            }
            g.frame(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless attract-mode run: `skyline-runner [SECONDS] [OUT.ppm]`
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use skyline_runner::consts::*;
    use skyline_runner::highscores::FileStore;
    use skyline_runner::renderer::PixelBuffer;
    use skyline_runner::{GameEngine, PhysicsConfig};

    env_logger::init();
    log::info!("Skyline Runner (native) starting...");

    let mut args = std::env::args().skip(1);
    let seconds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60);
    let out = args.next();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let store = FileStore::new("skyline_runner_hi.json");
    let mut engine = GameEngine::new(800.0, 450.0, PhysicsConfig::load().shared(), store, seed);
    engine.set_autopilot(true);
    engine.on_action_pressed();

    let mut runs = 1;
    for _ in 0..seconds * 60 {
        let events = engine.step(FRAME_MS);
        if events.game_over {
            log::info!("Run {} over at {}", runs, engine.snapshot().score);
            engine.on_action_pressed();
            runs += 1;
        }
    }

    let hud = engine.snapshot();
    println!(
        "{}",
        serde_json::to_string(&hud).unwrap_or_else(|_| format!("{:?}", hud))
    );

    if let Some(path) = out {
        let view = engine.state().viewport;
        let mut frame = PixelBuffer::new(view.width as usize, view.height as usize);
        engine.render(&mut frame, Some(&placeholder_sheet()));
        std::fs::write(&path, frame.to_ppm())?;
        log::info!("Wrote {}", path);
    }

    engine.teardown();
    Ok(())
}

/// Flat-colored stand-in sheet with the standard frame grid
#[cfg(not(target_arch = "wasm32"))]
fn placeholder_sheet() -> skyline_runner::renderer::PixelBuffer {
    use skyline_runner::Rect;
    use skyline_runner::consts::*;
    use skyline_runner::renderer::{Color, PixelBuffer, Surface};

    let frame = CHAR_SIZE as usize;
    let mut sheet = PixelBuffer::new(frame * SPRITE_COLUMNS, frame * SPRITE_ROWS);
    for index in 0..SPRITE_COLUMNS * SPRITE_ROWS {
        let x = (index % SPRITE_COLUMNS * frame) as f32;
        let y = (index / SPRITE_COLUMNS * frame) as f32;
        let color = match index {
            DEATH_FRAME => Color::rgb(230, 60, 80),
            JUMP_FRAME => Color::rgb(120, 230, 255),
            _ => Color::rgb(80, 200, 255),
        };
        // Body inside the hit-box insets, legs alternate with the run cycle
        let body = Rect::new(
            x + CHAR_INSET_LEFT,
            y + CHAR_INSET_TOP,
            CHAR_SIZE - CHAR_INSET_LEFT - CHAR_INSET_RIGHT,
            CHAR_SIZE * 0.6,
        );
        sheet.fill_rect(body, color);
        let stride = if index % 2 == 0 { 0.0 } else { 6.0 };
        let legs_top = body.bottom();
        let legs_h = y + CHAR_SIZE - CHAR_INSET_BOTTOM - legs_top;
        sheet.fill_rect(Rect::new(body.left() + stride, legs_top, 6.0, legs_h), color);
        sheet.fill_rect(Rect::new(body.right() - 6.0 - stride, legs_top, 6.0, legs_h), color);
    }
    sheet
}
