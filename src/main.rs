//! Unhinged Widgets entry point
//!
//! On the web this mounts the cursor chase into `#arena` and drives it from
//! `requestAnimationFrame`. Natively it runs a headless bot through every
//! widget and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_page {
    use std::cell::RefCell;
    use std::fmt::Write as _;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, MouseEvent};

    use unhinged_widgets::Settings;
    use unhinged_widgets::chase::{ChaseArena, ChaseEvent};
    use unhinged_widgets::platform::web::BrowserTheme;

    /// Longest frame fed to the widgets (ms)
    const MAX_FRAME_MS: f64 = 250.0;

    struct Page {
        arena: ChaseArena,
        settings: Settings,
        theme: BrowserTheme,
        root: Element,
        last_time: f64,
    }

    impl Page {
        fn measure(&mut self) {
            let w = self.root.client_width() as f32;
            let h = self.root.client_height() as f32;
            if w > 0.0 && h > 0.0 {
                self.arena.set_container(Vec2::new(w, h));
            }
        }

        fn handle(&self, events: &[ChaseEvent]) {
            for event in events {
                match event {
                    ChaseEvent::Split { id, children, .. } => {
                        log::info!("Target {} split into {:?}", id, children)
                    }
                    ChaseEvent::Caught { id } => log::info!("Caught target {}!", id),
                    _ => {}
                }
            }
        }

        /// Rebuild the arena markup from the current targets
        fn render(&self) {
            let mut html = String::new();
            for t in self.arena.targets() {
                let size = t.footprint();
                let _ = write!(
                    html,
                    r#"<button class="target {size}{shake}" style="left:{x}px;top:{y}px;width:{w}px;height:{h}px">{taunt}</button>"#,
                    size = t.size.as_str(),
                    shake = if t.is_shaking() { " shaking" } else { "" },
                    x = t.pos.x,
                    y = t.pos.y,
                    w = size.x,
                    h = size.y,
                    taunt = t.taunt,
                );
            }
            if self.arena.is_celebrating() {
                html.push_str(r#"<div class="celebration">GOTCHA!</div>"#);
            }
            self.root.set_inner_html(&html);

            let stats = self.arena.stats();
            if let Some(el) = document().and_then(|d| d.get_element_by_id("chase-stats")) {
                el.set_text_content(Some(&format!(
                    "Caught: {}  Escapes: {}  Splits: {}  Time: {}s",
                    stats.catches, stats.escapes, stats.splits, stats.elapsed_secs
                )));
            }
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window().and_then(|w| w.document())
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Unhinged Widgets starting...");

        let Some(root) = document().and_then(|d| d.get_element_by_id("arena")) else {
            log::error!("No #arena element; nothing to mount");
            return;
        };

        let settings = Settings::load();
        let mut theme = BrowserTheme;
        settings.apply_theme(&mut theme);

        let seed = js_sys::Date::now() as u64;
        let mut arena = ChaseArena::new(seed, settings.chase_difficulty);
        arena.start();
        log::info!(
            "Chase started on {} with seed {}",
            settings.chase_difficulty.label(),
            seed
        );

        let page = Rc::new(RefCell::new(Page {
            arena,
            settings,
            theme,
            root: root.clone(),
            last_time: 0.0,
        }));
        page.borrow_mut().measure();

        setup_input_handlers(&root, page.clone());
        setup_theme_toggle(page.clone());
        request_animation_frame(page);
    }

    fn setup_input_handlers(root: &Element, page: Rc<RefCell<Page>>) {
        // Pointer move - container-relative coordinates
        {
            let page = page.clone();
            let root_clone = root.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = root_clone.get_bounding_client_rect();
                let pointer = Vec2::new(
                    event.client_x() as f32 - rect.left() as f32,
                    event.client_y() as f32 - rect.top() as f32,
                );
                let mut p = page.borrow_mut();
                let events = p.arena.pointer_moved(pointer);
                p.handle(&events);
            });
            let _ = root.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - catch whatever is under the pointer
        {
            let root_clone = root.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = root_clone.get_bounding_client_rect();
                let point = Vec2::new(
                    event.client_x() as f32 - rect.left() as f32,
                    event.client_y() as f32 - rect.top() as f32,
                );
                let mut p = page.borrow_mut();
                if let Some(event) = p.arena.click(point) {
                    p.handle(&[event]);
                }
            });
            let _ = root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_theme_toggle(page: Rc<RefCell<Page>>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id("theme-toggle")) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut p = page.borrow_mut();
            let Page { settings, theme, .. } = &mut *p;
            settings.toggle_theme(theme);
            settings.save();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(page: Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(page, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(page: Rc<RefCell<Page>>, time: f64) {
        {
            let mut p = page.borrow_mut();
            let dt = if p.last_time > 0.0 {
                (time - p.last_time).min(MAX_FRAME_MS)
            } else {
                0.0
            };
            p.last_time = time;

            // Containers resize with the window
            p.measure();
            let events = p.arena.tick(dt);
            p.handle(&events);
            p.render();
        }

        request_animation_frame(page);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_page::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Unhinged Widgets (native) starting...");
    log::info!("The browser build mounts the widgets - run with `trunk serve` for the web version");

    let settings = unhinged_widgets::Settings::load();
    demo::chase(settings.chase_difficulty);
    demo::loading();
    demo::captcha(settings.captcha_difficulty);
    demo::drain(&settings);
    demo::worst_ux();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless bots that play each widget for a while
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use unhinged_widgets::{ChaseDifficulty, Settings};
    use unhinged_widgets::captcha::{Answer, CaptchaGate, GateEvent};
    use unhinged_widgets::chase::{ChaseArena, ChaseEvent};
    use unhinged_widgets::drain::{BatteryDrainer, format_count};
    use unhinged_widgets::loading::{LoadingSimulator, LoadingTask, SimulatorEvent};
    use unhinged_widgets::platform::{BatteryReading, Headless};
    use unhinged_widgets::random::seeded;
    use unhinged_widgets::worst_ux::{ModalEvent, ModalHydra, ScrollEvent, ScrollHijacker};

    /// Frame length the bots step with (ms)
    const FRAME_MS: f64 = 16.0;

    /// Chase the first target with the pointer and click every frame
    pub fn chase(difficulty: ChaseDifficulty) {
        let mut arena = ChaseArena::new(7, difficulty);
        arena.set_container(Vec2::new(800.0, 600.0));
        arena.start();

        for _ in 0..3_000 {
            let Some(target) = arena.targets().first() else {
                arena.tick(FRAME_MS);
                continue;
            };
            let aim = target.center();
            let mut events = arena.pointer_moved(aim);
            events.extend(arena.click(aim));
            events.extend(arena.tick(FRAME_MS));
            for event in events {
                if let ChaseEvent::Split { id, children, .. } = event {
                    log::info!("Chase: target {} split into {:?}", id, children);
                }
            }
        }

        let stats = arena.stats();
        println!(
            "Chase ({}): {} caught, {} escapes, {} splits in {}s",
            difficulty.label(),
            stats.catches,
            stats.escapes,
            stats.splits,
            stats.elapsed_secs
        );
    }

    /// Play the first three levels, clicking stalled tasks
    pub fn loading() {
        let mut sim = LoadingSimulator::new(42);
        sim.start_level(1);

        let mut frames = 0;
        while sim.level() <= 3 && frames < 200_000 {
            frames += 1;
            let mut events = sim.tick(FRAME_MS);
            let stuck: Vec<_> = sim
                .tasks()
                .iter()
                .filter(|t| match t {
                    LoadingTask::Bar(bar) => bar.stalled,
                    LoadingTask::Spinner(spinner) => spinner.stuck,
                })
                .map(|t| t.id())
                .collect();
            for id in stuck {
                events.extend(sim.click(Some(id)));
            }

            for event in events {
                if let SimulatorEvent::LevelComplete(level) = event {
                    println!(
                        "Loading: level {} ({}) done at {}s, frustration {:.0}",
                        level,
                        sim.config().name,
                        sim.elapsed_secs(),
                        sim.frustration()
                    );
                    sim.next_level();
                }
            }
        }
        println!("Loading: {} clicks, {} tasks finished", sim.total_clicks(), sim.bars_completed());
    }

    /// Solve every paragraph, fumbling the first attempt once
    pub fn captcha(difficulty: f32) {
        let mut gate = CaptchaGate::new(99);
        gate.set_difficulty(difficulty);
        gate.start();
        let mut idx = 0;
        while !gate.is_fully_unlocked() && idx < gate.paragraphs() {
            gate.request_unlock(idx);
            if idx == 0 {
                // Wrong answers swap in a fresh challenge
                let _ = gate.submit(&Answer::text("a hot dog"));
            }
            let Some((_, session)) = gate.active() else {
                break;
            };
            let answer = session.challenge.solution();
            match gate.submit(&answer) {
                Some(GateEvent::Unlocked(i)) => log::info!("Captcha: paragraph {} unlocked", i),
                other => log::info!("Captcha: {:?}", other),
            }
            gate.tick(FRAME_MS);
            idx += 1;
        }
        gate.stop();
        let stats = gate.stats();
        println!(
            "Captcha: {}/{} unlocked, {} solved, {} failed, difficulty {:.1}",
            gate.unlocked_count(),
            gate.paragraphs(),
            stats.solved,
            stats.failed,
            gate.difficulty()
        );
    }

    /// Crank the controls and feed fake miner reports
    pub fn drain(settings: &Settings) {
        let mut host = Headless {
            can_vibrate: true,
            battery: Some(BatteryReading::from_raw(0.73, false, 7200.0)),
            ..Headless::default()
        };
        let mut drainer = BatteryDrainer::from_settings(settings);
        drainer.controls.gpu = true;
        drainer.controls.set_gpu_intensity(100);
        drainer.controls.cpu = true;
        drainer.controls.max_brightness = true;
        drainer.apply(&mut host);
        drainer.refresh_battery(&host);

        for second in 0..5u64 {
            for worker in 0..drainer.miner.threads() {
                drainer.miner.report(worker, 9_000 + second * 250 + worker as u64 * 100);
            }
            drainer.tick(1000.0, &mut host);
        }

        println!(
            "Drain: ~{:.1}%/min, {}/s combined, {} hashes, {} vibration pulses, battery {:?}",
            drainer.controls.estimated_drain(),
            format_count(drainer.miner.combined_rate()),
            format_count(drainer.miner.total_hashes()),
            drainer.vibration.pulses(),
            drainer.battery().map(|b| b.level_percent)
        );
        drainer.stop_all();
    }

    /// Scroll a hijacked page and try to close a modal hydra
    pub fn worst_ux() {
        let mut rng = seeded(13);

        let mut scroll = ScrollHijacker::new(0.0);
        scroll.set_extent(5_000.0, 600.0);
        let mut jumps = 0;
        for _ in 0..200 {
            for event in scroll.wheel(100.0, &mut rng) {
                if event == ScrollEvent::JumpedToTop {
                    jumps += 1;
                }
            }
            scroll.tick(FRAME_MS);
        }

        let mut hydra = ModalHydra::new();
        hydra.open();
        for _ in 0..5 {
            hydra.hover_close(&mut rng);
            let Some(&first) = hydra.modals().first() else {
                break;
            };
            if let Some(ModalEvent::Spawned(heads)) = hydra.close(first) {
                log::info!("Worst UX: closing modal {} spawned {:?}", first, heads);
            }
        }

        println!(
            "Worst UX: scrolled to {:.0}/{:.0}px, {} reversals, {} jumps to top; {} modals spawned, {} still open",
            scroll.offset(),
            scroll.max_offset(),
            scroll.reversals,
            jumps,
            hydra.spawned,
            hydra.modals().len()
        );
    }
}
