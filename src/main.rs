//! Snowball Run entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use snowball_run::highscores::LocalStorageStore;
    use snowball_run::renderer::{Scene, SdfRenderState, Snowfall};
    use snowball_run::ui::DomPresenter;
    use snowball_run::{FrameOutcome, Session, Settings, Tuning};

    /// Optional JSON override for gameplay tuning
    const TUNING_KEY: &str = "snowballTuning";

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorageStore, DomPresenter>,
        render_state: Option<SdfRenderState>,
        snowfall: Snowfall,
        settings: Settings,
        /// A requestAnimationFrame callback is pending
        loop_active: bool,
    }

    impl Game {
        fn new(tuning: Tuning, settings: Settings, document: web_sys::Document) -> Self {
            let snowfall = Snowfall::new(settings.max_snowflakes(), &tuning, js_sys::Date::now() as u64);
            Self {
                session: Session::new(tuning, LocalStorageStore, DomPresenter::new(document)),
                render_state: None,
                snowfall,
                settings,
                loop_active: false,
            }
        }

        /// Flip the snowfall preference, persist it and redraw
        fn toggle_snowfall(&mut self) {
            let on = self.settings.toggle_particles();
            self.settings.save();
            self.snowfall = Snowfall::new(
                self.settings.max_snowflakes(),
                self.session.tuning(),
                js_sys::Date::now() as u64,
            );
            log::info!("Snowfall {}", if on { "on" } else { "off" });
            if !self.loop_active {
                self.render(js_sys::Date::now());
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let speed = self
                .session
                .state()
                .filter(|_| self.session.is_running())
                .map(|s| s.speed)
                .unwrap_or(0.0);
            self.snowfall.update(self.session.frame_dt(), speed);

            if let Some(ref mut render_state) = self.render_state {
                let scene = Scene::build(self.session.state(), self.session.tuning(), &self.snowfall);
                match render_state.render(&scene, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn load_tuning() -> Tuning {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(TUNING_KEY).ok().flatten())
            .and_then(|json| Tuning::from_json(&json))
            .unwrap_or_default()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Snowball Run starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let tuning = load_tuning();
        let settings = Settings::load();

        // Backing store follows the playfield and device pixel ratio
        let dpr = window.device_pixel_ratio();
        let width = (tuning.width() as f64 * dpr) as u32;
        let height = (tuning.floor() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new(tuning, settings, document.clone())));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match SdfRenderState::new(surface, &adapter, width, height).await {
                            Ok(mut render_state) => {
                                render_state.set_start_time(js_sys::Date::now());
                                game.borrow_mut().render_state = Some(render_state);
                            }
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("No suitable adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        // Draw the empty playfield behind the start screen
        game.borrow_mut().render(js_sys::Date::now());

        log::info!("Snowball Run ready");
    }

    fn start_run(game: &Rc<RefCell<Game>>) {
        let seed = js_sys::Date::now() as u64;
        let schedule = {
            let mut g = game.borrow_mut();
            let started = g.session.start(seed);
            let schedule = started && !g.loop_active;
            if schedule {
                g.loop_active = true;
            }
            schedule
        };
        if schedule {
            request_animation_frame(game.clone());
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Space down/up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    game.borrow_mut().session.press_jump();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    game.borrow_mut().session.release_jump();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down/up on the canvas (mouse and touch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().session.press_jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().session.release_jump();
            });
            // Released anywhere, not just over the canvas
            let _ = window
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["startButton", "restartButton"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    start_run(&game);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("snowButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().toggle_snowfall();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("leaderboardButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.toggle_leaderboard();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
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
        let outcome = {
            let mut g = game.borrow_mut();
            let outcome = g.session.frame(time);
            g.render(time);
            if outcome == FrameOutcome::Stop {
                g.loop_active = false;
            }
            outcome
        };

        if outcome == FrameOutcome::Continue {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use snowball_run::driver::{FixedRate, drive};
    use snowball_run::sim::JumpState;
    use snowball_run::ui::LogPresenter;
    use snowball_run::{MemoryStore, Session, Tuning};

    env_logger::init();
    log::info!("Snowball Run (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let mut session = Session::new(Tuning::default(), MemoryStore::new(), LogPresenter::default());

    // Three runs, jumping whenever an obstacle gets close
    for seed in 1..=3u64 {
        if !session.start(seed) {
            log::info!("Previous run is still going, stopping");
            break;
        }
        let mut source = FixedRate::new(60.0).limited(60 * 120);
        let frames = drive(&mut session, &mut source, |session| {
            let Some(state) = session.state() else {
                return;
            };
            let ball_x = state.ball.pos.x;
            let threat = state
                .obstacles
                .iter()
                .any(|o| o.left() > ball_x && o.left() - ball_x < state.speed * 14.0);
            let jump_state = state.ball.jump_state();
            let charge_ms = state.ball.charge_ms;
            match jump_state {
                JumpState::Grounded if threat => session.press_jump(),
                JumpState::Charging if charge_ms >= 200.0 => session.release_jump(),
                _ => {}
            }
        });
        match session.last_result() {
            Some(result) => log::info!("Run {} ended after {} frames: {:?}", seed, frames, result),
            None => log::info!("Run {} survived {} frames", seed, frames),
        }
    }

    for (i, score) in session.leaderboard().scores().iter().enumerate() {
        println!("{:>2}. {}", i + 1, score);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
