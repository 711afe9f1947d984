//! Drift City entry point
//!
//! Wires the session to the browser (DOM, timers, input, audio) on wasm32.
//! The native build runs a short scripted drive and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_host {
    use std::cell::RefCell;
    use std::fmt::Write as _;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent};

    use drift_city::EconomyError;
    use drift_city::audio::{AudioManager, SoundEffect};
    use drift_city::consts::{MIRROR_POLL_MS, TICK_MS};
    use drift_city::garage::StatKind;
    use drift_city::input::{InputState, TouchButton};
    use drift_city::mirror::{self, PeerSnapshot, PeerTracker};
    use drift_city::persistence::LocalStorage;
    use drift_city::platform;
    use drift_city::session::{GameEvent, Session};
    use drift_city::ui::Screen;

    const DEFAULT_ROOM: &str = "NEON";

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_html(doc: &Document, id: &str, html: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_inner_html(html);
        }
    }

    fn set_hidden(el: &Element, hidden: bool) {
        let _ = el.class_list().toggle_with_force("hidden", hidden);
    }

    fn input_value(id: &str) -> String {
        document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    /// Interval handles for the drive and mirror loops
    #[derive(Default)]
    struct Timers {
        drive_fn: Option<js_sys::Function>,
        poll_fn: Option<js_sys::Function>,
        drive_id: Option<i32>,
        poll_id: Option<i32>,
    }

    impl Timers {
        fn start(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            if self.drive_id.is_none()
                && let Some(f) = &self.drive_fn
            {
                self.drive_id = window
                    .set_interval_with_callback_and_timeout_and_arguments_0(f, TICK_MS as i32)
                    .ok();
            }
            if self.poll_id.is_none()
                && let Some(f) = &self.poll_fn
            {
                let ms = MIRROR_POLL_MS as i32;
                self.poll_id = window
                    .set_interval_with_callback_and_timeout_and_arguments_0(f, ms)
                    .ok();
            }
        }

        fn stop(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(id) = self.drive_id.take() {
                window.clear_interval_with_handle(id);
            }
            if let Some(id) = self.poll_id.take() {
                window.clear_interval_with_handle(id);
            }
        }
    }

    /// Everything the browser callbacks share
    struct Game {
        session: Session<LocalStorage>,
        input: InputState,
        screen: Screen,
        audio: AudioManager,
        timers: Timers,
        peer_id: String,
        room: String,
        seq: u64,
        tracker: PeerTracker,
        peers: Vec<PeerSnapshot>,
    }

    impl Game {
        fn new() -> Self {
            let mut session = Session::new(LocalStorage::open());
            let now = platform::now_ms();
            session.start_day(platform::day_index(now));
            let audio = AudioManager::new(session.profile().settings.sfx_volume());
            let peer_id = mirror::generate_peer_id(now as u64);
            log::info!("Peer id {peer_id}, room {DEFAULT_ROOM}");
            Self {
                session,
                input: InputState::new(),
                screen: Screen::Home,
                audio,
                timers: Timers::default(),
                peer_id,
                room: DEFAULT_ROOM.to_string(),
                seq: 0,
                tracker: PeerTracker::new(),
                peers: Vec::new(),
            }
        }

        fn toast(&self, message: &str) {
            let Some(doc) = document() else { return };
            if let Some(el) = doc.get_element_by_id("toast") {
                el.set_text_content(Some(message));
                set_hidden(&el, false);
            }
        }

        fn handle_events(&self, events: &[GameEvent]) {
            for event in events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
                match event {
                    GameEvent::DriftSettled { score, reward } if *reward > 0 => {
                        self.toast(&format!("Drift! {score} pts, +{reward} credits"));
                    }
                    GameEvent::AchievementUnlocked(id) => {
                        let title = self
                            .session
                            .profile()
                            .achievements
                            .iter()
                            .find(|a| a.id == *id)
                            .map(|a| a.title.as_str())
                            .unwrap_or_default();
                        self.toast(&format!("Achievement unlocked: {title}"));
                    }
                    GameEvent::TaskCompleted { id, reward } => {
                        log::info!("Task {id} completed");
                        self.toast(&format!("Daily task complete! +{reward} credits"));
                    }
                    _ => {}
                }
            }
        }

        // === Screens ===

        fn show_screen(&mut self, screen: Screen) {
            let screen = if screen == Screen::Admin && !self.session.profile().admin_mode {
                Screen::Home
            } else {
                screen
            };
            if self.screen.is_driving() && !screen.is_driving() {
                self.leave_city();
            }
            self.input.clear();
            self.screen = screen;
            if screen == Screen::Tasks {
                self.session.start_day(platform::day_index(platform::now_ms()));
            }
            if screen.is_driving() {
                self.timers.start();
            }
            self.render();
        }

        fn leave_city(&mut self) {
            self.timers.stop();
            let events = self.session.leave_track();
            self.handle_events(&events);
            if let Err(e) = mirror::leave(self.session.store_mut(), &self.room, &self.peer_id) {
                log::warn!("Failed to leave room: {e}");
            }
            self.tracker = PeerTracker::new();
            self.peers.clear();
        }

        // === Loops ===

        fn drive_tick(&mut self) {
            if self.input.take_escape() {
                self.show_screen(Screen::Home);
                return;
            }
            let input = self.input.to_tick_input();
            let events = self.session.tick(&input, TICK_MS);
            self.handle_events(&events);
            self.publish();
            self.update_hud();
        }

        fn publish(&mut self) {
            self.seq += 1;
            let profile = self.session.profile();
            let (vehicle_id, skin_id) = profile
                .selected()
                .map(|v| (v.id.clone(), v.selected_skin.clone()))
                .unwrap_or_default();
            let snapshot = PeerSnapshot::from_drive(
                &self.peer_id,
                &profile.player_name,
                &vehicle_id,
                &skin_id,
                self.session.drive(),
                self.seq,
            );
            if let Err(e) = mirror::publish(self.session.store_mut(), &self.room, &snapshot) {
                log::warn!("Failed to publish to room: {e}");
            }
        }

        fn poll_peers(&mut self) {
            let peers = mirror::peers(self.session.store(), &self.room, &self.peer_id);
            self.peers = self.tracker.observe(peers, platform::now_ms());
            let Some(doc) = document() else { return };
            let mut html = String::new();
            for peer in &self.peers {
                let _ = write!(
                    html,
                    "<li>{} <span class=\"peer-score\">{}</span></li>",
                    escape_html(&peer.name),
                    peer.score
                );
            }
            set_html(&doc, "city-peers", &html);
            set_text(&doc, "hud-peers", &self.peers.len().to_string());
        }

        // === Actions ===

        fn dispatch(&mut self, action: &str, el: &Element) {
            if let Err(e) = self.apply_action(action, el) {
                self.audio.play(SoundEffect::Denied);
                self.toast(&e.to_string());
            }
            let events = self.session.drain_events();
            self.handle_events(&events);
            self.render();
        }

        fn apply_action(&mut self, action: &str, el: &Element) -> Result<(), EconomyError> {
            let attr = |name: &str| el.get_attribute(name).unwrap_or_default();
            let vehicle = attr("data-vehicle");
            match action {
                "nav" => {
                    if let Some(screen) = Screen::from_element_id(&attr("data-screen")) {
                        self.show_screen(screen);
                    }
                }
                "upgrade" => {
                    let stat = attr("data-stat")
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| StatKind::ALL.get(i).copied());
                    if let Some(stat) = stat {
                        self.session.upgrade_stat(&vehicle, stat)?;
                    }
                }
                "buy-vehicle" => self.session.unlock_vehicle(&vehicle)?,
                "select-vehicle" => self.session.select_vehicle(&vehicle)?,
                "buy-skin" => self.session.unlock_skin(&vehicle, &attr("data-skin"))?,
                "select-skin" => self.session.select_skin(&vehicle, &attr("data-skin"))?,
                "promo" => {
                    let reward = self.session.activate_promo_code(&input_value("promo-input"))?;
                    self.toast(&format!("Promo code accepted! +{reward} credits"));
                }
                "admin-login" => {
                    self.session.enable_admin(&input_value("admin-input"))?;
                    self.toast("Admin mode enabled");
                }
                "admin-logout" => {
                    self.session.disable_admin();
                    self.show_screen(Screen::Home);
                }
                "admin-grant" => {
                    self.session.grant_admin_money(platform::now_ms())?;
                }
                "admin-vehicle" => self.session.grant_admin_vehicle(&vehicle)?,
                "admin-unlock-all" => self.session.unlock_everything()?,
                "reset" => {
                    self.session.reset_progress();
                    self.session.start_day(platform::day_index(platform::now_ms()));
                    self.toast("Progress reset");
                }
                other => log::debug!("Unhandled action {other}"),
            }
            Ok(())
        }

        fn apply_setting(&mut self, id: &str, value: &str) {
            let Ok(value) = value.parse::<u8>() else {
                return;
            };
            let mut settings = self.session.profile().settings;
            match id {
                "settings-music" => settings.set_music(value),
                "settings-sfx" => settings.set_sfx(value),
                "settings-sensitivity" => settings.set_sensitivity(value),
                _ => return,
            }
            self.session.update_settings(settings);
            self.audio.set_sfx_volume(settings.sfx_volume());
        }

        // === Rendering ===

        fn render(&self) {
            let Some(doc) = document() else { return };
            for screen in Screen::ALL {
                if let Some(el) = doc.get_element_by_id(screen.element_id()) {
                    set_hidden(&el, screen != self.screen);
                }
            }
            let profile = self.session.profile();
            set_text(&doc, "credits", &profile.credits.to_string());
            set_text(&doc, "player-name", &profile.player_name);

            match self.screen {
                Screen::Home => self.render_home(&doc),
                Screen::Garage => self.render_garage(&doc),
                Screen::City => self.update_hud(),
                Screen::Leaderboard => self.render_leaderboard(&doc),
                Screen::Achievements => self.render_achievements(&doc),
                Screen::Tasks => self.render_tasks(&doc),
                Screen::Settings => self.render_settings(&doc),
                Screen::Admin => self.render_admin(&doc),
            }
        }

        fn render_home(&self, doc: &Document) {
            let profile = self.session.profile();
            let mut html = String::new();
            for screen in Screen::menu(profile.admin_mode) {
                let _ = write!(
                    html,
                    "<button data-action=\"nav\" data-screen=\"{}\" data-icon=\"{}\">{}</button>",
                    screen.element_id(),
                    screen.icon().name(),
                    screen.label()
                );
            }
            set_html(doc, "home-menu", &html);
            set_text(
                doc,
                "home-progress",
                &format!(
                    "{}/{} cars, {}/{} achievements",
                    profile.unlocked_count(),
                    profile.vehicles.len(),
                    profile.completed_achievements(),
                    profile.achievements.len()
                ),
            );
        }

        fn render_garage(&self, doc: &Document) {
            let profile = self.session.profile();
            let mut html = String::new();
            for v in &profile.vehicles {
                let id = escape_html(&v.id);
                let selected = v.id == profile.selected_vehicle;
                let _ = write!(
                    html,
                    "<div class=\"car-card{}\"><h3>{}</h3>",
                    if selected { " selected" } else { "" },
                    escape_html(&v.name)
                );
                for (i, stat) in StatKind::ALL.iter().enumerate() {
                    let _ = write!(
                        html,
                        "<div class=\"stat\">{} {}/{}",
                        stat.label(),
                        v.stat(*stat),
                        v.max_stat(*stat)
                    );
                    if v.unlocked && v.can_upgrade(*stat) {
                        let _ = write!(
                            html,
                            concat!(
                                " <button data-action=\"upgrade\" data-vehicle=\"{id}\"",
                                " data-stat=\"{i}\">+ ({})</button>"
                            ),
                            v.upgrade_cost(),
                            id = id,
                            i = i,
                        );
                    }
                    html.push_str("</div>");
                }
                if !v.unlocked {
                    let _ = write!(
                        html,
                        "<button data-action=\"buy-vehicle\" data-vehicle=\"{id}\">Buy {}</button>",
                        v.price
                    );
                } else if !selected {
                    let _ = write!(
                        html,
                        "<button data-action=\"select-vehicle\" data-vehicle=\"{id}\">"
                    );
                    html.push_str("Select</button>");
                }
                if v.unlocked {
                    html.push_str("<div class=\"skins\">");
                    for skin in &v.skins {
                        let (action, label) = if !skin.unlocked {
                            ("buy-skin", format!("{} ({})", skin.name, skin.price))
                        } else if skin.id == v.selected_skin {
                            ("", format!("{} *", skin.name))
                        } else {
                            ("select-skin", skin.name.clone())
                        };
                        let _ = write!(
                            html,
                            concat!(
                                "<button data-action=\"{action}\" data-vehicle=\"{id}\"",
                                " data-skin=\"{}\" style=\"background: {}\">{}</button>"
                            ),
                            escape_html(&skin.id),
                            skin.paint.css(),
                            escape_html(&label),
                            action = action,
                            id = id,
                        );
                    }
                    html.push_str("</div>");
                }
                html.push_str("</div>");
            }
            set_html(doc, "garage-list", &html);
        }

        fn render_leaderboard(&self, doc: &Document) {
            let mut html = String::new();
            for (i, entry) in self.session.leaderboard().entries.iter().enumerate() {
                let _ = write!(
                    html,
                    "<li class=\"{}\">#{} {} <span>{}</span> <em>{}</em></li>",
                    if entry.is_player { "player" } else { "" },
                    i + 1,
                    escape_html(&entry.name),
                    entry.score,
                    escape_html(&entry.vehicle)
                );
            }
            set_html(doc, "leaderboard-list", &html);
        }

        fn render_achievements(&self, doc: &Document) {
            let mut html = String::new();
            for a in &self.session.profile().achievements {
                let _ = write!(
                    html,
                    "<li class=\"{}\" data-icon=\"{}\"><b>{}</b> {}</li>",
                    if a.completed { "done" } else { "" },
                    a.icon.name(),
                    escape_html(&a.title),
                    escape_html(&a.description)
                );
            }
            set_html(doc, "achievement-list", &html);
        }

        fn render_tasks(&self, doc: &Document) {
            let mut html = String::new();
            for task in &self.session.profile().daily_tasks {
                let _ = write!(
                    html,
                    concat!(
                        "<li class=\"{}\"><b>{}</b> {} ",
                        "<progress value=\"{:.2}\"></progress> {}/{} (+{})</li>"
                    ),
                    if task.completed { "done" } else { "" },
                    escape_html(&task.title),
                    escape_html(&task.description),
                    task.fraction(),
                    task.progress,
                    task.target,
                    task.reward
                );
            }
            set_html(doc, "task-list", &html);
        }

        fn render_settings(&self, doc: &Document) {
            let settings = self.session.profile().settings;
            for (id, value) in [
                ("settings-music", settings.music),
                ("settings-sfx", settings.sfx),
                ("settings-sensitivity", settings.sensitivity),
            ] {
                if let Some(input) = doc
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                {
                    input.set_value(&value.to_string());
                }
            }
        }

        fn render_admin(&self, doc: &Document) {
            let remaining = self
                .session
                .profile()
                .admin_cooldown_remaining(platform::now_ms());
            let status = if remaining == 0 {
                "Grant ready".to_string()
            } else {
                format!("Next grant in {}s", remaining.div_ceil(1000))
            };
            set_text(doc, "admin-cooldown", &status);

            let mut html = String::new();
            for v in self.session.profile().vehicles.iter().filter(|v| !v.unlocked) {
                let _ = write!(
                    html,
                    "<button data-action=\"admin-vehicle\" data-vehicle=\"{}\">{}</button>",
                    escape_html(&v.id),
                    escape_html(&v.name)
                );
            }
            set_html(doc, "admin-vehicles", &html);
        }

        fn update_hud(&self) {
            let Some(doc) = document() else { return };
            let drive = self.session.drive();
            set_text(&doc, "hud-speed", &format!("{:.0}", drive.speed.abs()));
            set_text(&doc, "hud-score", &drive.drift_score.to_string());
            set_text(&doc, "hud-credits", &self.session.profile().credits.to_string());

            if let Some(el) = doc.get_element_by_id("hud-combo") {
                set_hidden(&el, !drive.is_drifting());
                el.set_text_content(Some(&format!("x{}", drive.combo)));
            }

            if let Some(car) = doc.get_element_by_id("player-car") {
                let paint = self
                    .session
                    .profile()
                    .selected()
                    .and_then(|v| v.current_skin())
                    .map(|s| s.paint.css())
                    .unwrap_or_default();
                let _ = car.set_attribute(
                    "style",
                    &format!("transform: rotate({:.1}deg); background: {paint}", drive.rotation),
                );
                let _ = car.class_list().toggle_with_force("drifting", drive.is_drifting());
            }
            if let Some(road) = doc.get_element_by_id("road") {
                let _ = road.set_attribute(
                    "style",
                    &format!("background-position-y: {:.0}px", drive.road_offset),
                );
            }
        }
    }

    fn setup_loops(game: &Rc<RefCell<Game>>) {
        let drive = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || game.borrow_mut().drive_tick())
        };
        let poll = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || game.borrow_mut().poll_peers())
        };
        {
            let mut g = game.borrow_mut();
            g.timers.drive_fn = Some(drive.as_ref().unchecked_ref::<js_sys::Function>().clone());
            g.timers.poll_fn = Some(poll.as_ref().unchecked_ref::<js_sys::Function>().clone());
        }
        drive.forget();
        poll.forget();
    }

    fn setup_input_handlers(game: &Rc<RefCell<Game>>, window: &web_sys::Window, doc: &Document) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.screen.is_driving() && g.input.key_down(&event.key()) {
                    event.prevent_default();
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

        // Release held controls when focus is lost
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.clear();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch buttons
        for button in TouchButton::ALL {
            let Some(el) = doc.get_element_by_id(button.element_id()) else {
                continue;
            };
            let phases = [("touchstart", true), ("touchend", false), ("touchcancel", false)];
            for (event_name, pressed) in phases {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().input.set_touch(button, pressed);
                });
                let _ = el
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_ui_handlers(game: &Rc<RefCell<Game>>, doc: &Document) {
        // Every button carries a data-action; one delegated listener handles them all
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                let Ok(Some(el)) = target.closest("[data-action]") else {
                    return;
                };
                let action = el.get_attribute("data-action").unwrap_or_default();
                if !action.is_empty() {
                    game.borrow_mut().dispatch(&action, &el);
                }
            });
            let _ = doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Settings sliders
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                game.borrow_mut().apply_setting(&input.id(), &input.value());
            });
            let _ = doc.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Player name
        if let Some(el) = doc.get_element_by_id("name-input") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                if let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                {
                    let mut g = game.borrow_mut();
                    g.session.set_player_name(&input.value());
                    g.render();
                }
            });
            let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Drift City starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(doc) = window.document() else {
            return;
        };

        if let Some(loading) = doc.get_element_by_id("loading") {
            set_hidden(&loading, true);
        }

        let game = Rc::new(RefCell::new(Game::new()));
        setup_loops(&game);
        setup_input_handlers(&game, &window, &doc);
        setup_ui_handlers(&game, &doc);
        game.borrow().render();

        log::info!("Drift City running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_host::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Drift City (native) starting...");
    log::info!("The game runs in the browser - this build drives a scripted lap headless");
    headless_drive();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

/// Accelerate, hold a long right-hand drift, then coast until it settles
#[cfg(not(target_arch = "wasm32"))]
fn headless_drive() {
    use drift_city::Session;
    use drift_city::consts::TICK_MS;
    use drift_city::mirror::{self, PeerSnapshot};
    use drift_city::persistence::MemoryStore;
    use drift_city::platform;
    use drift_city::session::GameEvent;
    use drift_city::sim::TickInput;

    let mut session = Session::new(MemoryStore::new());
    session.start_day(platform::day_index(platform::now_ms()));

    let gas = TickInput {
        accelerate: true,
        ..Default::default()
    };
    let drift = TickInput {
        right: true,
        ..gas
    };
    let script = [(gas, 20), (drift, 120), (TickInput::default(), 40)];

    let peer_id = mirror::generate_peer_id(1);
    let mut seq = 0;
    for (input, ticks) in script {
        for _ in 0..ticks {
            for event in session.tick(&input, TICK_MS) {
                match event {
                    GameEvent::DriftSettled { score, reward } => {
                        log::info!("Settled drift: {score} pts -> {reward} credits")
                    }
                    other => log::info!("{other:?}"),
                }
            }
            seq += 1;
            let snapshot = PeerSnapshot::from_drive(
                &peer_id,
                &session.profile().player_name,
                &session.profile().selected_vehicle,
                drift_city::garage::DEFAULT_SKIN,
                session.drive(),
                seq,
            );
            if let Err(e) = mirror::publish(session.store_mut(), "DEMO", &snapshot) {
                log::warn!("Publish failed: {e}");
            }
        }
    }

    let profile = session.profile();
    log::info!(
        "Balance: {} credits, best drift {}, distance {:.0}, room entries {}",
        profile.credits,
        profile.stats.best_drift_score,
        profile.stats.total_distance,
        mirror::read_room(session.store(), "DEMO").len()
    );
    if let Some(rank) = session.leaderboard().player_rank() {
        log::info!("Leaderboard rank: #{rank}");
    }
}
