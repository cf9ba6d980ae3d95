//! Lane Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use lane_racer::Autopilot;
    use lane_racer::Tuning;
    use lane_racer::input::{ControlQueue, KeyState, command_for_key};
    use lane_racer::renderer::RenderState;
    use lane_racer::sim::{Command, CrashNotice, Phase, SimulationState, Stepper, tick};

    /// Game instance holding all state
    struct Game {
        state: SimulationState,
        render_state: Option<RenderState>,
        stepper: Stepper,
        keys: KeyState,
        /// Commands queued by DOM handlers, applied at the start of the next frame
        controls: ControlQueue,
        /// Demo mode - the autopilot drives
        autopilot: Option<Autopilot>,
        last_phase: Phase,
    }

    impl Game {
        fn new(tuning: Tuning) -> Self {
            let stepper = Stepper::new(tuning.max_frame_dt);
            Self {
                state: SimulationState::new(tuning),
                render_state: None,
                stepper,
                keys: KeyState::new(),
                controls: ControlQueue::new(),
                autopilot: None,
                last_phase: Phase::Idle,
            }
        }

        fn queue(&mut self, command: Command) {
            self.controls.push(command);
        }

        /// Apply queued commands, then run one tick
        fn update(&mut self, time: f64) {
            self.controls.apply(&mut self.state);

            // Whatever time passed while not running must not count
            if self.state.phase != self.last_phase {
                self.stepper.reset();
                if let Some(pilot) = self.autopilot.as_mut() {
                    pilot.reset();
                }
                self.last_phase = self.state.phase;
            }

            let dt = self.stepper.step(time);
            let intents = match self.autopilot.as_mut() {
                Some(pilot) => pilot.drive(&self.state.snapshot()),
                None => self.keys.intents(),
            };
            tick(&mut self.state, &intents, dt);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state.snapshot()) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.state.hud.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-speed") {
                el.set_text_content(Some(&self.state.hud.speed.to_string()));
            }

            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            show("start-prompt", self.state.phase == Phase::Idle);
            show("pause-menu", self.state.phase == Phase::Paused);
            show("game-over", self.state.phase == Phase::Crashed);
        }

        /// Deliver the crash notice (called on the frame after the crash was drawn)
        fn deliver_notice(&mut self) {
            let Some(CrashNotice { final_score }) = self.state.take_notice() else {
                return;
            };
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(el) = window
                .document()
                .and_then(|d| d.get_element_by_id("final-score"))
            {
                el.set_text_content(Some(&final_score.to_string()));
            }
            // Demo mode just goes again
            if self.autopilot.is_some() {
                self.queue(Command::Restart);
                return;
            }
            // Already restarting, the alert would only hold it up
            if self.controls.restart_pending() {
                return;
            }
            let _ = window.alert_with_message(&format!("Crashed! Final score: {}", final_score));
            // The alert blocked; don't bill that time to the next frame
            self.stepper.reset();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Lane Racer starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No #canvas element");
                return;
            }
        };

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let mut tuning = Tuning::load();
        if tuning.seed == 0 {
            tuning.seed = js_sys::Date::now() as u64;
        }
        log::info!("Game initialized with seed: {}", tuning.seed);
        let track_size = (tuning.track_width, tuning.track_height);
        let game = Rc::new(RefCell::new(Game::new(tuning)));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                match instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await
                {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height, track_size).await
                        {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Lane Racer running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: held intents plus one-shot commands
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.keys.key_down(&key) {
                    event.prevent_default();
                }
                if event.repeat() {
                    return;
                }
                if let Some(command) = command_for_key(&key) {
                    g.queue(command);
                } else if key == "i" || key == "I" {
                    g.autopilot = match g.autopilot {
                        Some(_) => None,
                        None => Some(Autopilot::new()),
                    };
                    log::info!("Demo mode: {}", g.autopilot.is_some());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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
            g.deliver_notice();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for (id, command) in [
            ("start-btn", Command::Start),
            ("pause-btn", Command::TogglePause),
            ("resume-btn", Command::TogglePause),
            ("restart-btn", Command::Restart),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().queue(command);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.keys.release_all();
                    if g.state.running() {
                        g.controls.request_pause();
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
                g.keys.release_all();
                if g.state.running() {
                    g.controls.request_pause();
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
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Frames simulated by the headless demo when none are given
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_DEMO_FRAMES: u64 = 3600;

/// Native build: headless demo run with the autopilot driving
///
/// Usage: `lane-racer [tuning.json] [frames]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_racer::sim::{Command, SimulationState, Stepper, TickOutcome, apply_command, tick};
    use lane_racer::{Autopilot, Tuning};

    env_logger::init();
    log::info!("Lane Racer (native) starting...");

    let mut args = std::env::args().skip(1);
    let mut tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("{}: {}, using defaults", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path, e);
                Tuning::default()
            }
        },
        None => Tuning::load(),
    };
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::warn!("Bad frame count ({}), using {}", e, DEFAULT_DEMO_FRAMES);
            DEFAULT_DEMO_FRAMES
        }
        None => DEFAULT_DEMO_FRAMES,
    };
    if tuning.seed == 0 {
        tuning.seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(1);
    }
    log::info!("Seed {}, {} frames", tuning.seed, frames);

    let mut stepper = Stepper::new(tuning.max_frame_dt);
    let mut state = SimulationState::new(tuning);
    let mut pilot = Autopilot::new();
    apply_command(&mut state, Command::Start);

    // Simulated 60 Hz display
    let frame_ms = 1000.0 / 60.0;
    let mut runs = Vec::new();
    for frame in 0..frames {
        let dt = stepper.step(frame as f64 * frame_ms);
        let intents = pilot.drive(&state.snapshot());
        if tick(&mut state, &intents, dt) == TickOutcome::Crashed {
            if let Some(notice) = state.take_notice() {
                log::info!("Run {} over at frame {}: {}", runs.len() + 1, frame, notice.final_score);
                runs.push(notice.final_score);
            }
            apply_command(&mut state, Command::Restart);
            pilot.reset();
        }
    }

    let best = runs.iter().copied().max().unwrap_or(state.hud.score);
    println!(
        "Finished {} frames: {} crash(es), best score {}, current score {}",
        frames,
        runs.len(),
        best,
        state.hud.score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
