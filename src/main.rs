//! Sacred Tap entry point
//!
//! On wasm32 this wires the canvas, DOM overlay and input into the
//! simulation. Natively it plays a scripted headless run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use sacred_tap::audio::{AudioOutput, CuePlayer, WebAudioOutput, all_clips};
    use sacred_tap::hud;
    use sacred_tap::palette::{body_color, colors, glow_color};
    use sacred_tap::sim::{
        CueSink, Disc, GameEvent, GamePhase, GameState, LifeLossReason, Snapshot, advance,
        resize, resolve_tap, start,
    };
    use sacred_tap::GameConfig;

    /// Longest frame the simulation is allowed to see (seconds)
    const MAX_FRAME_DELTA: f64 = 0.25;

    /// Forwards cues to the player and remembers how the run ended
    struct FrameCues<'a, O: AudioOutput> {
        player: &'a mut CuePlayer<O>,
        game_over: Option<(u64, LifeLossReason)>,
    }

    impl<O: AudioOutput> CueSink for FrameCues<'_, O> {
        fn cue(&mut self, event: GameEvent) {
            if let GameEvent::GameOver { score, reason } = event {
                self.game_over = Some((score, reason));
            }
            self.player.play(event);
        }
    }

    struct Game {
        state: GameState,
        /// Config for the next run, kept at the fitted field size
        config: GameConfig,
        /// Field size the page asked for; the canvas never grows past it
        base_field: Vec2,
        audio: CuePlayer<WebAudioOutput>,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        last_time: f64,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d, config: GameConfig) -> Self {
            let seed = js_sys::Date::now() as u64;
            log::info!("Game initialized with seed: {}", seed);
            Self {
                state: GameState::new(seed),
                base_field: Vec2::new(config.field_width, config.field_height),
                config,
                audio: CuePlayer::silent(),
                canvas,
                ctx,
                last_time: 0.0,
            }
        }

        /// Begin a run; audio is created on the first user gesture
        fn start_run(&mut self) {
            if !self.audio.is_available() {
                let settings = self.audio.settings().clone();
                let output = WebAudioOutput::new(settings.master_volume, all_clips());
                self.audio = CuePlayer::new(Some(output), settings, js_sys::Date::now() as u64);
            }
            self.audio.resume();
            start(&mut self.state, self.config.clone());
            self.last_time = 0.0;
            set_overlay_hidden(true);
        }

        fn update(&mut self, dt: f32) {
            let mut cues = FrameCues {
                player: &mut self.audio,
                game_over: None,
            };
            advance(&mut self.state, dt, &mut cues);
            if let Some((score, reason)) = cues.game_over {
                self.show_game_over(score, reason);
            }
        }

        fn tap(&mut self, point: Vec2) {
            let mut cues = FrameCues {
                player: &mut self.audio,
                game_over: None,
            };
            resolve_tap(&mut self.state, point, &mut cues);
            if let Some((score, reason)) = cues.game_over {
                self.show_game_over(score, reason);
            }
        }

        fn show_game_over(&self, score: u64, reason: LifeLossReason) {
            let message = hud::game_over_message(&reason.message(self.config.sacred_value), score);
            set_text("overlay-title", hud::GAME_OVER_TITLE);
            set_text("overlay-message", &message);
            set_text("start-btn", hud::RETRY_LABEL);
            set_overlay_hidden(false);
        }

        /// Convert a client-space pointer position into field coordinates
        fn translate_pointer(&self, event: &PointerEvent) -> Vec2 {
            let bounds = self.canvas.get_bounding_client_rect();
            let field = Vec2::new(self.config.field_width, self.config.field_height);
            let x = (event.client_x() as f64 - bounds.left()) / bounds.width().max(1.0);
            let y = (event.client_y() as f64 - bounds.top()) / bounds.height().max(1.0);
            Vec2::new(x as f32, y as f32) * field
        }

        /// Fit the canvas to the viewport keeping the base aspect ratio
        fn resize_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let viewport_w = (inner(window.inner_width()) - 24.0).max(320.0);
            let viewport_h = (inner(window.inner_height()) - 180.0).max(320.0);

            let aspect = (self.base_field.x / self.base_field.y) as f64;
            let mut width = (self.base_field.x as f64).min(viewport_w);
            let mut height = width / aspect;
            if height > viewport_h {
                height = viewport_h;
                width = height * aspect;
            }
            let (width, height) = (width.round(), height.round());

            let style = self.canvas.style();
            let _ = style.set_property("width", &format!("{width}px"));
            let _ = style.set_property("height", &format!("{height}px"));
            self.canvas.set_width((width * dpr).round() as u32);
            self.canvas.set_height((height * dpr).round() as u32);
            let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);

            self.config.field_width = width as f32;
            self.config.field_height = height as f32;
            resize(&mut self.state, width as f32, height as f32);
            log::debug!("Field resized to {width}x{height} (dpr {dpr})");
        }

        fn render(&self) {
            let result = match self.state.phase {
                GamePhase::Idle => self.draw_splash(),
                GamePhase::Running | GamePhase::Ended => self.draw(&self.state.snapshot()),
            };
            if let Err(e) = result {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn draw_splash(&self) -> Result<(), JsValue> {
            let (w, h) = (self.config.field_width as f64, self.config.field_height as f64);
            let ctx = &self.ctx;
            ctx.clear_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str(colors::SPLASH_SHADE);
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str(colors::HUD_TEXT);
            ctx.set_font("48px \"Segoe UI\", sans-serif");
            ctx.set_text_align("center");
            ctx.fill_text(hud::SPLASH_TEXT, w / 2.0, h / 2.0)
        }

        fn draw(&self, snap: &Snapshot<'_>) -> Result<(), JsValue> {
            let (w, h) = (snap.field.x as f64, snap.field.y as f64);
            let ctx = &self.ctx;
            ctx.clear_rect(0.0, 0.0, w, h);

            if snap.flash_active() {
                ctx.set_fill_style_str(colors::FLASH);
                ctx.fill_rect(0.0, 0.0, w, h);
            }

            for disc in snap.discs {
                self.draw_disc(disc, snap.fade_progress)?;
            }
            self.draw_hud(snap)?;

            if let Some(text) = snap.status {
                ctx.set_fill_style_str(colors::STATUS_BAR);
                ctx.fill_rect(0.0, h / 2.0 - 60.0, w, 120.0);
                ctx.set_fill_style_str(colors::STATUS_TEXT);
                ctx.set_font("bold 54px \"Segoe UI\", sans-serif");
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                ctx.fill_text(text, w / 2.0, h / 2.0)?;
            }
            Ok(())
        }

        fn draw_disc(&self, disc: &Disc, fade_progress: f32) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let radius = disc.radius as f64;
            ctx.save();
            ctx.translate(disc.pos.x as f64, disc.pos.y as f64)?;

            ctx.set_fill_style_str(&glow_color(disc, fade_progress).to_css());
            ctx.begin_path();
            ctx.arc(0.0, 0.0, radius + 8.0, 0.0, TAU)?;
            ctx.fill();

            ctx.set_fill_style_str(&body_color(disc, fade_progress).to_css());
            ctx.begin_path();
            ctx.arc(0.0, 0.0, radius, 0.0, TAU)?;
            ctx.fill();

            ctx.set_fill_style_str(colors::LABEL);
            ctx.set_font(&format!(
                "bold {}px \"Montserrat\", \"Segoe UI\", sans-serif",
                (radius * 1.3).round()
            ));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.fill_text(&disc.label(), 0.0, disc.label_offset() as f64)?;
            ctx.restore();
            Ok(())
        }

        fn draw_hud(&self, snap: &Snapshot<'_>) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let w = snap.field.x as f64;
            let (bar_height, font_size) = hud::hud_metrics(snap.field.x, snap.field.y);
            let bar_height = bar_height as f64;
            ctx.set_fill_style_str(colors::HUD_BAR);
            ctx.fill_rect(0.0, 0.0, w, bar_height);

            ctx.set_fill_style_str(colors::HUD_TEXT);
            ctx.set_font(&format!("{font_size}px \"Segoe UI\", sans-serif"));
            ctx.set_text_baseline("middle");

            let center_y = bar_height / 2.0;
            let [score, level, lives] = hud::hud_line(snap);
            ctx.set_text_align("left");
            ctx.fill_text(&score, 20.0, center_y)?;
            ctx.set_text_align("center");
            ctx.fill_text(&level, w / 2.0, center_y)?;
            ctx.set_text_align("right");
            ctx.fill_text(&lives, w - 20.0, center_y)
        }
    }

    fn set_text(id: &str, text: &str) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(el) = document.and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_overlay_hidden(hidden: bool) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(el) = document.and_then(|d| d.get_element_by_id("overlay")) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Host-supplied config from the canvas `data-config` attribute
    fn read_config(canvas: &HtmlCanvasElement) -> GameConfig {
        let Some(json) = canvas.get_attribute("data-config") else {
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring data-config: {e}");
                GameConfig::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sacred Tap starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context lookup failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let config = read_config(&canvas);
        let game = Rc::new(RefCell::new(Game::new(canvas.clone(), ctx, config)));
        {
            let mut g = game.borrow_mut();
            g.resize_canvas();
            g.render();
        }

        setup_input_handlers(&canvas, game.clone());
        setup_start_button(game.clone());

        request_animation_frame(game);

        log::info!("Sacred Tap running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Taps
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                if !g.state.is_running() {
                    return;
                }
                let point = g.translate_pointer(&event);
                g.tap(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space starts a run
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if event.code() == "Space" && !g.state.is_running() {
                    g.start_run();
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize and rotation
        for name in ["resize", "orientationchange"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.resize_canvas();
                g.render();
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().start_run();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            if g.state.is_running() {
                // First frame of a run has no delta
                let dt = if g.last_time > 0.0 {
                    ((time - g.last_time) / 1000.0).min(MAX_FRAME_DELTA)
                } else {
                    0.0
                };
                g.last_time = time;
                g.update(dt as f32);
                g.render();
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use sacred_tap::audio::{AudioOutput, CuePlayer, OfflineOutput};
    use sacred_tap::sim::{CueSink, GameEvent, GameState, advance, resolve_tap, start};
    use sacred_tap::{AudioSettings, GameConfig};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_SECONDS: f32 = 180.0;
    const SAMPLE_RATE: u32 = 22_050;
    /// Frames between bot taps
    const TAP_EVERY: u32 = 9;

    /// Plays cues and keeps a log of them
    struct Recorder<'a, O: AudioOutput> {
        player: &'a mut CuePlayer<O>,
        events: &'a mut Vec<GameEvent>,
    }

    impl<O: AudioOutput> CueSink for Recorder<'_, O> {
        fn cue(&mut self, event: GameEvent) {
            self.player.play(event);
            self.events.push(event);
        }
    }

    /// The sacred disc closest to the bottom edge
    fn bot_target(state: &GameState) -> Option<Vec2> {
        state
            .discs
            .iter()
            .filter(|d| d.sacred)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|d| d.pos)
    }

    pub fn run(seed: u64) {
        let mut state = GameState::new(seed);
        let mut player = CuePlayer::new(
            Some(OfflineOutput::new(SAMPLE_RATE)),
            AudioSettings::default(),
            seed,
        );
        let mut events = Vec::new();

        start(&mut state, GameConfig::default());
        player.resume();

        let mut frame = 0u32;
        while state.is_running() && frame as f32 * FRAME_DT < MAX_SECONDS {
            frame += 1;
            if let Some(out) = player.output_mut() {
                out.advance_clock(FRAME_DT as f64);
            }
            let mut cues = Recorder {
                player: &mut player,
                events: &mut events,
            };
            advance(&mut state, FRAME_DT, &mut cues);
            if frame % TAP_EVERY == 0 {
                if let Some(target) = bot_target(&state) {
                    resolve_tap(&mut state, target, &mut cues);
                }
            }
        }

        let count = |f: fn(&GameEvent) -> bool| events.iter().filter(|e| f(e)).count();
        let hits = count(|e| matches!(e, GameEvent::SacredHit { .. }));
        let misses = count(|e| matches!(e, GameEvent::Miss { .. }));
        log::info!(
            "Run finished after {:.1}s: score {} level {} lives {} ({} hits, {} misses)",
            state.elapsed,
            state.score,
            state.level,
            state.lives,
            hits,
            misses
        );

        if let Some(out) = player.output() {
            let mix = out.mix();
            log::info!(
                "Rendered {:.1}s of cue audio (peak {:.3}), {} clips",
                mix.duration(),
                mix.peak(),
                out.clips_played().len()
            );
        }

        println!(
            "seed {seed}: score {} at level {} in {:.1}s",
            state.score, state.level, state.elapsed
        );
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
    log::info!("Sacred Tap (native) starting...");
    log::info!("Headless run - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(67);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
