//! Banana-Rama entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use banana_rama::highscores::{CourseBest, Leaderboard, today};
    use banana_rama::persistence::{LocalStorage, MemoryStorage, Progress, Storage};
    use banana_rama::platform::InputState;
    use banana_rama::settings::Settings;
    use banana_rama::sim::{
        CollectibleKind, Course, CourseEvent, GameEvent, GamePhase, GeometryKind, LevelSet,
        Session, tick,
    };
    use banana_rama::view::{CourseView, FpsCounter, FrameView};
    use banana_rama::{PhysicsTuning, consts};

    /// Platformer campaign plus what it persists
    struct Campaign {
        session: Session,
        progress: Progress,
        leaderboard: Leaderboard,
    }

    struct Runner {
        course: Course,
        best: CourseBest,
    }

    enum Mode {
        Campaign(Box<Campaign>),
        Course(Box<Runner>),
    }

    /// Game instance holding all state
    struct Game {
        mode: Mode,
        input: InputState,
        storage: Box<dyn Storage>,
        settings: Settings,
        fps: FpsCounter,
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    impl Game {
        fn frame(&mut self, now_ms: f64) {
            let input = self.input.take(now_ms);
            match &mut self.mode {
                Mode::Campaign(c) => {
                    tick(&mut c.session, &input);
                    for event in c.session.drain_events() {
                        c.progress.observe(&mut *self.storage, &event);
                        if let GameEvent::Victory {
                            time_secs, coins, ..
                        } = event
                        {
                            record_run(c, &mut *self.storage, time_secs, coins);
                        }
                    }
                }
                Mode::Course(r) => {
                    if input.jump_pressed {
                        r.course.flap();
                    }
                    r.course.step();
                    for event in r.course.drain_events() {
                        if let CourseEvent::NewBest { best } = event {
                            r.best.record(&mut *self.storage, best);
                        }
                    }
                }
            }
            self.fps.record(now_ms);
            self.render(now_ms);
        }

        /// Enter/Return: the primary button of whatever screen is up
        fn confirm(&mut self, now_ms: f64) {
            let Mode::Campaign(c) = &mut self.mode else {
                return;
            };
            let session = &mut c.session;
            match session.phase {
                GamePhase::Menu => session.start_game(now_ms),
                GamePhase::GameOver => session.restart_campaign(now_ms),
                GamePhase::Win => session.next_level(now_ms),
                GamePhase::Victory => session.return_to_menu(),
                GamePhase::LevelSelect => {
                    let level = session.max_level_reached;
                    session.select_level(level, now_ms);
                }
                GamePhase::Playing | GamePhase::Paused => {}
            }
        }

        fn with_session(&mut self, f: impl FnOnce(&mut Session)) {
            if let Mode::Campaign(c) = &mut self.mode {
                f(&mut c.session);
            }
        }

        fn reset_progress(&mut self) {
            if let Mode::Campaign(c) = &mut self.mode {
                c.session.reset_progress();
                c.session.drain_events();
                c.progress.reset(&mut *self.storage);
                c.leaderboard.reset(&mut *self.storage);
            }
        }

        fn render(&self, now_ms: f64) {
            self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
            match &self.mode {
                Mode::Campaign(c) => self.draw_campaign(c, now_ms),
                Mode::Course(r) => self.draw_course(&CourseView::of(&r.course)),
            }
        }

        fn draw_campaign(&self, c: &Campaign, now_ms: f64) {
            let ctx = &self.ctx;
            let view = FrameView::of(&c.session, now_ms);

            for g in view.geometry {
                let color = match g.kind {
                    GeometryKind::Solid => "#7a5230",
                    GeometryKind::Bounce => "#3fbf5f",
                    GeometryKind::Hazard => "#d03030",
                    GeometryKind::Goal => "#ffd700",
                };
                ctx.set_fill_style_str(color);
                let r = g.rect;
                ctx.fill_rect(r.pos.x as f64, r.pos.y as f64, r.size.x as f64, r.size.y as f64);
            }

            for item in &view.collectibles {
                ctx.set_fill_style_str(match item.kind {
                    CollectibleKind::Coin => "#ffe135",
                    CollectibleKind::LifeToken => "#ff69b4",
                });
                let center = item.rect.pos + item.rect.size / 2.0;
                ctx.begin_path();
                let _ = ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    (item.rect.size.x / 2.0) as f64,
                    0.0,
                    TAU,
                );
                ctx.fill();
            }

            let a = view.actor;
            ctx.set_fill_style_str(if view.airborne { "#f4d03f" } else { "#f1c40f" });
            ctx.fill_rect(a.pos.x as f64, a.pos.y as f64, a.size.x as f64, a.size.y as f64);

            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("18px sans-serif");
            let _ = ctx.fill_text(&view.hud(self.settings.show_timer), 12.0, 24.0);
            if let Some(name) = &c.progress.player_name {
                let _ = ctx.fill_text(name.as_str(), 12.0, 48.0);
            }
            if self.settings.show_fps {
                let _ = ctx.fill_text(&format!("{} FPS", self.fps.fps()), self.width - 90.0, 24.0);
            }

            let overlay = match view.phase {
                GamePhase::Menu if c.progress.ultimate_unlocked => {
                    Some("Banana-Rama! ULTIMATE ninja, press Enter to start".to_string())
                }
                GamePhase::Menu => Some("Banana-Rama! Press Enter to start".to_string()),
                GamePhase::LevelSelect => Some(format!(
                    "Levels 1-{} unlocked. Enter plays level {}",
                    c.session.max_level_reached, c.session.max_level_reached
                )),
                GamePhase::Paused => Some("Paused (P to resume)".to_string()),
                GamePhase::GameOver => Some("Game over! Enter restarts from level 1".to_string()),
                GamePhase::Win => Some(format!("Level {} complete!", view.level)),
                GamePhase::Victory => {
                    let title = if view.ultimate_run {
                        "ULTIMATE banana-rama ninja!"
                    } else {
                        "Campaign complete!"
                    };
                    Some(format!("{} {} with {} coins", title, view.time, view.score))
                }
                GamePhase::Playing => None,
            };
            if let Some(text) = overlay {
                ctx.set_font("28px sans-serif");
                let _ = ctx.fill_text(&text, 60.0, self.height / 2.0);
            }
        }

        fn draw_course(&self, view: &CourseView) {
            let ctx = &self.ctx;
            ctx.set_fill_style_str("#5d3a1a");
            for (upper, lower) in &view.pipes {
                for r in [upper, lower] {
                    ctx.fill_rect(r.pos.x as f64, r.pos.y as f64, r.size.x as f64, r.size.y as f64);
                }
            }
            let g = view.ground;
            ctx.set_fill_style_str("#4caf50");
            ctx.fill_rect(g.pos.x as f64, g.pos.y as f64, g.size.x as f64, g.size.y as f64);

            let r = view.runner;
            let center = r.pos + r.size / 2.0;
            ctx.save();
            let _ = ctx.translate(center.x as f64, center.y as f64);
            let _ = ctx.rotate(view.tilt as f64);
            ctx.set_fill_style_str("#f1c40f");
            ctx.fill_rect(
                -(r.size.x as f64) / 2.0,
                -(r.size.y as f64) / 2.0,
                r.size.x as f64,
                r.size.y as f64,
            );
            ctx.restore();

            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("20px sans-serif");
            let _ = ctx.fill_text(&format!("Score: {}  Best: {}", view.score, view.best), 12.0, 28.0);
        }
    }

    /// Add a finished run to both boards if the player has a name
    fn record_run(c: &mut Campaign, storage: &mut dyn Storage, time_secs: f64, coins: u32) {
        let Some(name) = &c.progress.player_name else {
            log::info!("No player name set, run not recorded");
            return;
        };
        let placed = c.leaderboard.add_entry(name.as_str(), time_secs, coins, today());
        log::info!(
            "Run recorded: time rank {:?}, coins rank {:?}",
            placed.time_rank,
            placed.coins_rank
        );
        c.leaderboard.save(storage);
    }

    fn ask_player_name(progress: &mut Progress, storage: &mut dyn Storage) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let answer = window
            .prompt_with_message("Enter your ninja name (1-20 characters):")
            .ok()
            .flatten();
        let accepted = answer.is_some_and(|raw| progress.set_player_name(storage, &raw));
        if !accepted {
            progress.set_player_name(storage, "Anonymous Ninja");
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Banana-Rama starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let mut storage: Box<dyn Storage> = match LocalStorage::open() {
            Some(s) => Box::new(s),
            None => Box::new(MemoryStorage::new()),
        };
        let settings = Settings::load(&*storage);

        // The page decides the mode by which canvas it carries
        let (canvas_id, mode) = if document.get_element_by_id("flappyCanvas").is_some() {
            let best = CourseBest::load(&*storage);
            let seed = js_sys::Date::now() as u64;
            log::info!("Course seed: {}", seed);
            let course = Course::new(settings.course.clone(), seed, best.best);
            ("flappyCanvas", Mode::Course(Box::new(Runner { course, best })))
        } else {
            let mut progress = Progress::load(&*storage);
            if progress.player_name.is_none() {
                ask_player_name(&mut progress, &mut *storage);
            }
            let mut tuning = PhysicsTuning::default();
            tuning.level_advance_delay_ticks =
                settings.level_advance_delay(consts::LEVEL_ADVANCE_DELAY_TICKS);
            let session = Session::new(LevelSet::campaign(), tuning, progress.max_level_reached);
            let leaderboard = Leaderboard::load(&*storage);
            (
                "gameCanvas",
                Mode::Campaign(Box::new(Campaign {
                    session,
                    progress,
                    leaderboard,
                })),
            )
        };

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let game = Rc::new(RefCell::new(Game {
            mode,
            input: InputState::new(),
            storage,
            settings,
            fps: FpsCounter::new(),
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        }));

        setup_input_handlers(&window, game.clone());
        setup_buttons(game.clone());
        request_animation_frame(game);

        log::info!("Banana-Rama running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.input.key_down(&key) {
                    event.prevent_default();
                }
                if key == "Enter" {
                    g.confirm(now_ms());
                }
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

        // Window blur: key-ups will never arrive, and play should stop
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut guard = game.borrow_mut();
                let g = &mut *guard;
                g.input.release_all();
                if let Mode::Campaign(c) = &g.mode {
                    if c.session.phase == GamePhase::Playing {
                        g.input.request_pause();
                        log::info!("Auto-paused (window blur)");
                    }
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(game: &Rc<RefCell<Game>>, id: &str, action: impl Fn(&mut Game, f64) + 'static) {
        let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        else {
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&mut game.borrow_mut(), now_ms());
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        on_click(&game, "startButton", |g, now| g.with_session(|s| s.start_game(now)));
        on_click(&game, "levelSelectButton", |g, now| {
            g.with_session(|s| {
                if !s.open_level_select(now) {
                    log::debug!("Level select unavailable in {:?}", s.phase);
                }
            })
        });
        on_click(&game, "resumeButton", |g, now| g.with_session(|s| s.resume(now)));
        on_click(&game, "retryButton", |g, now| g.with_session(|s| s.retry_level(now)));
        on_click(&game, "restartButton", |g, now| {
            g.with_session(|s| s.restart_campaign(now))
        });
        on_click(&game, "nextLevelButton", |g, now| g.with_session(|s| s.next_level(now)));
        on_click(&game, "menuButton", |g, _| g.with_session(|s| s.return_to_menu()));
        on_click(&game, "resetProgress", |g, _| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Reset ALL progress?").ok())
                .unwrap_or(false);
            if confirmed {
                g.reset_progress();
            }
        });
        on_click(&game, "changeName", |g, _| {
            let Game { mode, storage, .. } = g;
            if let Mode::Campaign(c) = mode {
                ask_player_name(&mut c.progress, &mut **storage);
            }
        });
        for level in 1..=LevelSet::campaign().len() as u32 {
            on_click(&game, &format!("level{}", level), move |g, now| {
                g.with_session(|s| {
                    s.select_level(level, now);
                })
            });
        }
        // Course: clicking the canvas flaps, like Space
        on_click(&game, "flappyCanvas", |g, _| {
            if let Mode::Course(r) = &mut g.mode {
                r.course.flap();
            }
        });
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(err) = web_game::run() {
        log::error!("Failed to start: {:?}", err);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Banana-Rama (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the playable game");

    headless::run_campaign_demo();
    headless::run_course_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted runs that exercise the simulation without a window
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use banana_rama::consts::TICKS_PER_SECOND;
    use banana_rama::highscores::{CourseBest, Leaderboard, today};
    use banana_rama::persistence::{MemoryStorage, Progress};
    use banana_rama::sim::{
        Course, CourseEvent, CoursePhase, GameEvent, GamePhase, Session, TickInput, tick,
    };
    use banana_rama::timer::format_time;
    use banana_rama::tuning::CourseTuning;
    use banana_rama::view::FrameView;

    const FRAME_MS: f64 = 1000.0 / TICKS_PER_SECOND as f64;

    /// Run right and hop every half second through the campaign
    pub fn run_campaign_demo() {
        let mut storage = MemoryStorage::new();
        let mut progress = Progress::load(&storage);
        progress.set_player_name(&mut storage, "Headless Ninja");
        let mut leaderboard = Leaderboard::load(&storage);

        let mut session = Session::campaign();
        session.start_game(0.0);

        let max_ticks = 60 * TICKS_PER_SECOND as u64;
        for frame in 0..max_ticks {
            let now_ms = frame as f64 * FRAME_MS;
            let hop = frame % 30 == 0;
            let input = TickInput {
                right: true,
                jump_pressed: hop,
                jump_released: frame % 30 == 20,
                now_ms,
                ..Default::default()
            };
            tick(&mut session, &input);

            for event in session.drain_events() {
                progress.observe(&mut storage, &event);
                match event {
                    GameEvent::LevelComplete { level } => log::info!("Cleared level {}", level),
                    GameEvent::Victory { time_secs, coins, .. } => {
                        let name = progress
                            .player_name
                            .as_ref()
                            .map(|n| n.as_str().to_string())
                            .unwrap_or_default();
                        leaderboard.add_entry(&name, time_secs, coins, today());
                        leaderboard.save(&mut storage);
                    }
                    _ => {}
                }
            }

            if matches!(session.phase, GamePhase::GameOver | GamePhase::Victory) {
                break;
            }
        }

        let view = FrameView::of(&session, session.time_ticks as f64 * FRAME_MS);
        println!("Campaign: {:?} after {} ticks", session.phase, session.time_ticks);
        println!("  {}", view.hud(true));
        println!("  unlocked up to level {}", progress.max_level_reached);
        if let Some(best) = leaderboard.fastest() {
            println!("  fastest run {} by {}", format_time(best.time), best.name);
        }
    }

    /// Flap whenever the runner sinks below the next gap's centre
    pub fn run_course_demo() {
        let mut storage = MemoryStorage::new();
        let mut best = CourseBest::load(&storage);
        let mut course = Course::new(CourseTuning::default(), 2024, best.best);
        course.flap();

        let max_ticks = 120 * TICKS_PER_SECOND as u64;
        for _ in 0..max_ticks {
            let runner = course.runner.rect();
            let target = course
                .pipes
                .iter()
                .find(|p| p.right() >= runner.left())
                .map(|p| p.top + course.tuning.pipe_gap / 2.0)
                .unwrap_or(Course::ground_y() / 2.0);
            if runner.bottom() > target + runner.size.y / 2.0 && course.runner.vel.y >= 0.0 {
                course.flap();
            }
            course.step();

            for event in course.drain_events() {
                if let CourseEvent::NewBest { best: score } = event {
                    best.record(&mut storage, score);
                }
            }
            if course.phase == CoursePhase::Over {
                break;
            }
        }

        println!(
            "Course: {:?} with score {} (best {}) after {} ticks",
            course.phase, course.score, best.best, course.frames
        );
    }
}
