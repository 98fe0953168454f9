//! Space Game entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, PointerEvent};

    use space_game::audio::{AudioManager, SoundEffect};
    use space_game::consts::*;
    use space_game::leaderboard::Leaderboard;
    use space_game::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use space_game::platform::{self, InputState, input::pointer_direction};
    use space_game::renderer::{RenderState, SceneOptions, build_scene, scene};
    use space_game::settings::{ControlMode, Dimension, MovementStyle, Settings};
    use space_game::sim::{FrameClock, GameEvent, GamePhase, GameState, GameStats, session, tick};
    use space_game::tuning::Difficulty;
    use space_game::ui::{self, HudText, ids, radios};

    /// Container padding and panel gap (CSS pixels)
    const PAGE_PADDING: f32 = 32.0;
    const PANEL_GAP: f32 = 16.0;
    /// Haptic pulse on hit (ms)
    const HIT_VIBRATION_MS: u32 = 120;

    /// Game instance holding all state
    struct Game {
        document: Document,
        state: GameState,
        settings: Settings,
        leaderboard: Leaderboard,
        store: Box<dyn KeyValueStore>,
        render_state: Option<RenderState>,
        audio: AudioManager,
        input: InputState,
        clock: FrameClock,
        last_time: f64,
        start_time: f64,
        /// Overlay currently on screen
        shown_overlay: Option<Option<&'static str>>,
    }

    impl Game {
        fn new(document: Document, seed: u64) -> Self {
            let store: Box<dyn KeyValueStore> = match LocalStore::open() {
                Ok(store) => Box::new(store),
                Err(e) => {
                    log::warn!("{} - scores will not persist", e);
                    Box::new(MemoryStore::new())
                }
            };
            let settings = Settings::load(store.as_ref());
            let leaderboard = Leaderboard::load(store.as_ref());
            let audio = AudioManager::new(&settings);
            let input = InputState::new(settings.mode);

            Self {
                document,
                state: GameState::new(seed),
                settings,
                leaderboard,
                store,
                render_state: None,
                audio,
                input,
                clock: FrameClock::default(),
                last_time: 0.0,
                start_time: 0.0,
                shown_overlay: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            for _ in 0..self.clock.advance(dt) {
                let input = self.input.snapshot();
                tick(&mut self.state, &input, SIM_DT);

                // Clear one-shot inputs after processing
                self.input.clear_one_shots();
            }

            for event in self.state.drain_events() {
                self.handle_event(&event);
            }
        }

        /// Sound, announcer, haptics and panels for one sim event
        fn handle_event(&mut self, event: &GameEvent) {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            if let Some(text) = ui::announcement(event) {
                self.set_text(ids::ANNOUNCER, &text);
            }

            match event {
                GameEvent::CountdownTick(n) => self.set_text(ids::COUNTDOWN, &ui::countdown_label(*n)),
                GameEvent::Launch => self.set_text(ids::COUNTDOWN, &ui::countdown_label(0)),
                GameEvent::PlayerHit { .. } if self.settings.vibration => {
                    if let Some(window) = web_sys::window() {
                        window.navigator().vibrate_with_duration(HIT_VIBRATION_MS);
                    }
                }
                GameEvent::GameOver => {
                    let stats = GameStats::from_state(&self.state);
                    for (id, text) in ui::stats_fields(&stats) {
                        self.set_text(id, &text);
                    }
                    self.set_text(ids::RANK_HINT, ui::rank_hint(&self.leaderboard, stats.score));
                    self.render_leaderboard();
                }
                _ => {}
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let options = SceneOptions {
                time: ((time - self.start_time) / 1000.0) as f32,
                reduced_motion: self.settings.reduced_motion,
            };
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state, options);
                match render_state.render(&vertices) {
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
        fn update_hud(&mut self) {
            let hud = HudText::from_state(&self.state);
            for (id, text) in hud.fields() {
                self.set_text(id, text);
            }
            self.set_text(ids::PAUSE_BTN, ui::pause_button_label(self.state.phase));

            let overlay = ui::overlay_for(self.state.phase);
            if self.shown_overlay != Some(overlay) {
                for id in ids::OVERLAYS {
                    if let Some(el) = self.document.get_element_by_id(id) {
                        set_hidden(&el, Some(id) != overlay);
                    }
                }
                self.shown_overlay = Some(overlay);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                if el.text_content().as_deref() != Some(text) {
                    el.set_text_content(Some(text));
                }
            }
        }

        /// Rebuild the Hall of Fame list from text nodes only
        fn render_leaderboard(&self) {
            let Some(div) = self.document.get_element_by_id(ids::LEADERBOARD) else {
                return;
            };
            div.set_text_content(None);

            if let Ok(title) = self.document.create_element("h4") {
                title.set_text_content(Some(ui::LEADERBOARD_TITLE));
                let _ = div.append_child(&title);
            }
            for (label, score) in ui::leaderboard_rows(&self.leaderboard) {
                let Ok(row) = self.document.create_element("div") else {
                    continue;
                };
                let _ = row.set_attribute("class", "score-row");
                for text in [label, score] {
                    if let Ok(span) = self.document.create_element("span") {
                        span.set_text_content(Some(&text));
                        let _ = row.append_child(&span);
                    }
                }
                let _ = div.append_child(&row);
            }
        }

        /// Start button: read the menu, persist it, show instructions
        fn start_from_menu(&mut self) {
            self.settings.difficulty = read_radio(&self.document, radios::DIFFICULTY)
                .and_then(|v| Difficulty::parse(&v))
                .unwrap_or(self.settings.difficulty);
            self.settings.mode = read_radio(&self.document, radios::MODE)
                .and_then(|v| ControlMode::parse(&v))
                .unwrap_or(self.settings.mode);
            self.settings.movement = read_radio(&self.document, radios::MOVEMENT)
                .and_then(|v| MovementStyle::parse(&v))
                .unwrap_or(self.settings.movement);
            self.settings.dimension = read_radio(&self.document, radios::DIMENSION)
                .and_then(|v| Dimension::parse(&v))
                .unwrap_or(self.settings.dimension);
            for (id, flag) in ui::option_flags(&mut self.settings) {
                if let Some(input) = input_by_id(&self.document, id) {
                    *flag = input.checked();
                }
            }
            for (id, volume) in ui::option_volumes(&mut self.settings) {
                if let Some(v) = input_by_id(&self.document, id).and_then(|i| ui::parse_volume(&i.value())) {
                    *volume = v;
                }
            }

            if let Err(e) = self.settings.save(self.store.as_mut()) {
                log::warn!("Could not save settings: {}", e);
            }

            if !session::start(&mut self.state, &self.settings) {
                return;
            }
            self.clock.reset();
            self.input.set_mode(self.settings.mode);
            self.audio.apply_settings(&self.settings);
            self.audio.resume();
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.set_dimension(self.settings.dimension);
            }
            self.set_text(ids::INSTRUCTIONS_TEXT, ui::instructions_text(self.settings.mode));
        }

        fn save_score(&mut self) {
            let name = self
                .document
                .get_element_by_id(ids::PLAYER_NAME)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
            let typed = name.as_ref().map(|input| input.value()).unwrap_or_default();

            match session::submit_score(&mut self.state, &mut self.leaderboard, &typed) {
                Some(rank) => log::info!("Score ranked #{}", rank),
                None if self.state.phase == GamePhase::Menu => log::info!("Score did not place"),
                None => return,
            }
            if let Err(e) = self.leaderboard.save(self.store.as_mut()) {
                log::warn!("Could not save leaderboard: {}", e);
            }
            if let Some(input) = name {
                input.set_value("");
            }
            self.render_leaderboard();
        }

        fn on_key_down(&mut self, event: &KeyboardEvent) {
            match self.state.phase {
                GamePhase::Instructions => {
                    session::proceed(&mut self.state);
                }
                GamePhase::Countdown { .. } | GamePhase::Running | GamePhase::Paused => {
                    if self.input.key_down(&event.key(), event.repeat()) {
                        event.prevent_default();
                    }
                }
                GamePhase::Menu | GamePhase::GameOver => {}
            }
        }

        /// Freeze when the page loses the player's attention
        fn auto_pause(&mut self, reason: &str) {
            self.input.release_all();
            if session::pause(&mut self.state) {
                log::info!("Auto-paused ({})", reason);
            }
        }

        /// Fit the canvas to the window, keeping whole-pixel cells
        fn layout(&mut self, canvas: &HtmlCanvasElement) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let inner = Vec2::new(
                window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
                window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
            );
            let panel = self
                .document
                .get_element_by_id(ids::PANEL)
                .map(|el| {
                    let rect = el.get_bounding_client_rect();
                    Vec2::new(rect.width() as f32, rect.height() as f32)
                })
                .unwrap_or(Vec2::ZERO);

            let area = scene::available_area(inner, Vec2::splat(PAGE_PADDING), panel, PANEL_GAP);
            let cell = scene::fit_cell(area.x, area.y);
            let (css_w, css_h) = scene::canvas_size(cell);
            let _ = canvas.set_attribute("style", &format!("width:{}px;height:{}px", css_w, css_h));

            let dpr = window.device_pixel_ratio();
            let width = (css_w as f64 * dpr) as u32;
            let height = (css_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }
    }

    fn set_hidden(el: &Element, hidden: bool) {
        let _ = el.class_list().toggle_with_force(ui::HIDDEN_CLASS, hidden);
    }

    fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    /// Value of the checked radio in a group
    fn read_radio(document: &Document, group: &str) -> Option<String> {
        let selector = format!("input[name=\"{}\"]:checked", group);
        document
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    /// Pre-select the radios that match saved settings
    fn check_radio(document: &Document, group: &str, value: &str) {
        let selector = format!("input[name=\"{}\"][value=\"{}\"]", group, value);
        if let Some(input) = document
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_checked(true);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Space Game starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(ids::CANVAS)
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(document.clone(), seed)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut g = game.borrow_mut();
            for (id, flag) in ui::option_flags(&mut g.settings) {
                if let Some(input) = input_by_id(&document, id) {
                    input.set_checked(*flag);
                }
            }
            for (id, volume) in ui::option_volumes(&mut g.settings) {
                if let Some(input) = input_by_id(&document, id) {
                    input.set_value(&ui::volume_value(*volume));
                }
            }
            check_radio(&document, radios::DIFFICULTY, g.settings.difficulty.as_str());
            check_radio(&document, radios::MODE, g.settings.mode.as_str());
            check_radio(&document, radios::MOVEMENT, g.settings.movement.as_str());
            check_radio(&document, radios::DIMENSION, g.settings.dimension.as_str());
            g.render_leaderboard();
        }
        game.borrow_mut().layout(&canvas);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        let dimension = game.borrow().settings.dimension;
        let render_state = RenderState::new(surface, &adapter, width, height, dimension).await;
        {
            let mut g = game.borrow_mut();
            g.render_state = Some(render_state);
            g.start_time = js_sys::Date::now();
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(&canvas, game.clone());
        platform::register_service_worker();

        request_animation_frame(game);

        log::info!("Space Game running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().on_key_down(&event);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Any tap leaves the instructions
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Instructions {
                    session::proceed(&mut g.state);
                }
            });
            let _ = window
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Canvas steering (mobile mode)
        for (name, is_down) in [("pointerdown", true), ("pointermove", false)] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let direction = pointer_direction(
                    Vec2::new(event.client_x() as f32, event.client_y() as f32),
                    Vec2::new(rect.left() as f32, rect.top() as f32),
                    Vec2::new(rect.width() as f32, rect.height() as f32),
                );
                let mut g = game.borrow_mut();
                if is_down {
                    if g.settings.mode == ControlMode::Mobile {
                        event.prevent_default();
                    }
                    g.input.pointer_down(direction);
                } else {
                    g.input.pointer_move(direction);
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().input.pointer_up();
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Attach a click handler to an element id
    fn on_click(document: &Document, id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = game.borrow().document.clone();

        {
            let game = game.clone();
            on_click(&document, ids::START_GAME, move |_| {
                game.borrow_mut().start_from_menu();
            });
        }
        {
            let game = game.clone();
            on_click(&document, ids::RESUME_BTN, move |_| {
                session::resume(&mut game.borrow_mut().state);
            });
        }
        {
            let game = game.clone();
            on_click(&document, ids::PAUSE_BTN, move |_| {
                game.borrow_mut().input.request_pause();
            });
        }
        on_click(&document, ids::SAVE_SCORE, move |_| {
            game.borrow_mut().save_score();
        });
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = game.borrow().document.clone();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
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
                game.borrow_mut().auto_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().layout(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Seconds of simulated play in the headless run
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_SECS: f32 = 90.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use space_game::consts::SIM_DT;
    use space_game::persistence::MemoryStore;
    use space_game::sim::{GameEvent, GamePhase, GameState, GameStats, TickInput, session, tick};
    use space_game::{Leaderboard, Settings};

    env_logger::init();
    log::info!("Space Game (native) starting...");
    log::info!("Running a scripted headless session - use `trunk serve` for the web version");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let settings = Settings::default();
    let mut state = GameState::new(seed);
    session::start(&mut state, &settings);
    session::proceed(&mut state);

    let mut pickups = 0;
    let mut hits = 0;
    let steps = (HEADLESS_SECS / SIM_DT) as u32;
    for step in 0..steps {
        // Sweep the lower lanes while holding fire
        let sweep = if (step / 240) % 2 == 0 { -1.0 } else { 1.0 };
        let input = TickInput {
            direction: Vec2::new(sweep, 0.0),
            firing: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::PickupCollected(kind) => {
                    pickups += 1;
                    log::debug!("Collected {}", kind.as_str());
                }
                GameEvent::PlayerHit { lives_left } => {
                    hits += 1;
                    log::debug!("Hit, {} lives left", lives_left);
                }
                _ => {}
            }
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let stats = GameStats::from_state(&state);
    println!(
        "score {} | kills {} | wave {} | time {:.1}s | shots {} | hits {} | pickups {}",
        stats.score, stats.kills, stats.wave, stats.elapsed, stats.shots_fired, hits, pickups
    );

    if state.phase != GamePhase::GameOver {
        return;
    }
    let mut store = MemoryStore::new();
    let mut board = Leaderboard::load(&store);
    if let Some(rank) = session::submit_score(&mut state, &mut board, "Headless") {
        log::info!("Leaderboard rank #{}", rank);
    }
    if let Err(e) = board.save(&mut store) {
        log::warn!("Could not save leaderboard: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
