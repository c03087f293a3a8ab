//! Spin Wheel entry point
//!
//! Wasm builds wire the page: the segment editor, the wheel canvas, the CSS
//! rotation transition, the animation-frame tick loop, and the countdown
//! interval. Native builds are headless and run a seeded demo spin.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement,
        HtmlInputElement, HtmlTextAreaElement,
    };

    use spin_wheel::audio::{AudioManager, SoundEffect};
    use spin_wheel::renderer::{self, text::TextMeasure};
    use spin_wheel::wheel::session::{Session, SessionState};
    use spin_wheel::wheel::spin::{TickTracker, UniformSpin};
    use spin_wheel::wheel::timer::{TimerTick, format_clock};
    use spin_wheel::{share, storage};

    /// App instance: the session core plus the live platform handles
    struct App {
        session: Session,
        rng: UniformSpin<Pcg32>,
        audio: AudioManager,
        /// Tick detection for the spin in flight
        ticker: Option<TickTracker>,
        /// First animation-frame timestamp of the current spin
        spin_started_at: Option<f64>,
        /// Live 1 Hz countdown interval, if any
        interval_id: Option<i32>,
    }

    fn window() -> web_sys::Window {
        web_sys::window().expect("no window")
    }

    fn document() -> Document {
        window().document().expect("no document")
    }

    fn element(id: &str) -> Element {
        document()
            .get_element_by_id(id)
            .unwrap_or_else(|| panic!("missing #{id}"))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Spin Wheel starting...");

        let stored = storage::load();
        let session = Session::new(stored.segments, stored.rotation);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            session,
            rng: UniformSpin(Pcg32::seed_from_u64(seed)),
            audio: AudioManager::new(),
            ticker: None,
            spin_started_at: None,
            interval_id: None,
        }));

        // A shared config may ride in on the query string
        startup_import(&app);

        // Restore the persisted rotation without a phantom spin
        apply_rotation(app.borrow().session.engine.rotation(), false);

        if let Ok(input) = element("countInput").dyn_into::<HtmlInputElement>() {
            input.set_value(&app.borrow().session.segments.len().to_string());
        }
        rebuild_rows(&app);
        redraw(&app.borrow());

        wire_count_input(&app);
        wire_buttons(&app);
        wire_transition_end(&app);

        update_view(&app.borrow());

        log::info!("Spin Wheel running (seed {seed})");
    }

    // === Canvas ===

    /// measure_text-backed label measurement
    struct CanvasMeasure<'a> {
        ctx: &'a CanvasRenderingContext2d,
    }

    impl TextMeasure for CanvasMeasure<'_> {
        fn width(&self, text: &str, font_px: f32) -> f32 {
            self.ctx.set_font(&label_font(font_px));
            self.ctx
                .measure_text(text)
                .map(|m| m.width() as f32)
                .unwrap_or_default()
        }
    }

    fn label_font(font_px: f32) -> String {
        format!("900 {font_px}px Cairo, Arial, sans-serif")
    }

    fn redraw(app: &App) {
        let canvas: HtmlCanvasElement = element("wheelCanvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        let measure = CanvasMeasure { ctx: &ctx };
        let drawing = renderer::render((w, h), &app.session.segments, &measure);
        paint(&ctx, &drawing, w, h);
    }

    /// Replay the display list onto the 2d context. Rotation is not applied
    /// here; the CSS transition spins the shell element around this canvas.
    fn paint(ctx: &CanvasRenderingContext2d, drawing: &renderer::WheelDrawing, w: f32, h: f32) {
        use std::f64::consts::TAU;

        ctx.clear_rect(0.0, 0.0, w as f64, h as f64);

        let cx = drawing.center.x as f64;
        let cy = drawing.center.y as f64;

        ctx.begin_path();
        ctx.arc(cx, cy, drawing.backdrop.radius as f64, 0.0, TAU).ok();
        ctx.set_fill_style_str(drawing.backdrop.color);
        ctx.fill();

        for wedge in &drawing.wedges {
            ctx.begin_path();
            ctx.move_to(cx, cy);
            ctx.arc(
                cx,
                cy,
                drawing.radius as f64,
                wedge.start_angle as f64,
                wedge.end_angle as f64,
            )
            .ok();
            ctx.close_path();
            ctx.set_fill_style_str(wedge.color);
            ctx.fill();

            ctx.set_stroke_style_str(renderer::SEPARATOR_COLOR);
            ctx.set_line_width(renderer::SEPARATOR_WIDTH as f64);
            ctx.stroke();

            if wedge.label.text.is_empty() {
                continue;
            }
            ctx.save();
            let _ = ctx.translate(cx, cy);
            let _ = ctx.rotate(wedge.label.angle as f64);
            ctx.set_font(&label_font(wedge.label.font_px));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_fill_style_str(renderer::LABEL_COLOR);
            ctx.set_shadow_color(renderer::LABEL_SHADOW_COLOR);
            ctx.set_shadow_blur(renderer::LABEL_SHADOW_BLUR as f64);
            let _ = ctx.fill_text(&wedge.label.text, wedge.label.offset as f64, 0.0);
            ctx.restore();
        }

        ctx.begin_path();
        ctx.arc(cx, cy, drawing.hub.radius as f64, 0.0, TAU).ok();
        ctx.set_fill_style_str(drawing.hub.color);
        ctx.fill();
    }

    // === View sync ===

    fn set_hidden(id: &str, hidden: bool) {
        let list = element(id).class_list();
        let _ = if hidden {
            list.add_1("hidden")
        } else {
            list.remove_1("hidden")
        };
    }

    fn set_disabled(id: &str, disabled: bool) {
        if let Ok(btn) = element(id).dyn_into::<web_sys::HtmlButtonElement>() {
            btn.set_disabled(disabled);
        }
    }

    fn set_text_content(id: &str, text: &str) {
        element(id).set_text_content(Some(text));
    }

    fn update_view(app: &App) {
        let in_setup = matches!(app.session.state(), SessionState::Setup);
        set_hidden("setupView", !in_setup);
        set_hidden("wheelView", in_setup);
        set_disabled("backBtn", in_setup || app.session.is_spinning());
        set_disabled("startBtn", !app.session.segments.validate());
        set_disabled("spinBtn", app.session.is_spinning());

        match app.session.winner() {
            Some(winner) => {
                set_text_content("winnerText", &winner.text);
                set_hidden("winnerWrap", false);
            }
            None => set_hidden("winnerWrap", true),
        }
        render_timer_text(app);

        set_text_content("countBadge", &format!("{} slots", app.session.segments.len()));
        set_text_content("soundIcon", if app.audio.is_enabled() { "🔊" } else { "🔇" });
    }

    fn render_timer_text(app: &App) {
        if let Some(timer) = app.session.timer() {
            set_text_content("timerText", &format_clock(timer.remaining()));
            set_text_content("timerToggleBtn", if timer.is_running() { "⏸" } else { "▶" });
        }
    }

    /// Point the shell at a cumulative rotation. Non-animated jumps (startup
    /// restore) suppress the transition and force a reflow so it cannot fire.
    fn apply_rotation(rotation: f64, animate: bool) {
        let shell: HtmlElement = element("wheelShell").dyn_into().expect("not an element");
        let style = shell.style();
        if !animate {
            let _ = style.set_property("transition", "none");
        }
        let _ = style.set_property("transform", &format!("rotate({rotation}deg)"));
        if !animate {
            let _ = shell.offset_height();
            let _ = style.remove_property("transition");
        }
    }

    // === Segment editor ===

    fn rebuild_rows(app: &Rc<RefCell<App>>) {
        let list = element("segmentsList");
        list.set_inner_html("");

        let doc = document();
        let count = app.borrow().session.segments.len();

        for idx in 0..count {
            let (text_value, seconds_value) = {
                let a = app.borrow();
                let seg = a.session.segments.get(idx).expect("segment row");
                (seg.text.clone(), seg.seconds)
            };

            let row = doc.create_element("div").expect("create row");
            row.set_class_name("segRow");

            let index = doc.create_element("div").expect("create index");
            index.set_class_name("index");
            index.set_text_content(Some(&(idx + 1).to_string()));

            let text: HtmlTextAreaElement = doc
                .create_element("textarea")
                .expect("create textarea")
                .dyn_into()
                .expect("textarea");
            text.set_class_name("segText");
            let _ = text.set_attribute("maxlength", "100");
            text.set_value(&text_value);
            text.set_placeholder(&format!("Challenge {}", idx + 1));
            {
                let app = app.clone();
                let field = text.clone();
                let closure = Closure::<dyn FnMut()>::new(move || {
                    app.borrow_mut().session.segments.set_text(idx, &field.value());
                    on_segments_edited(&app);
                });
                text.set_oninput(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }

            let time: HtmlInputElement = doc
                .create_element("input")
                .expect("create input")
                .dyn_into()
                .expect("input");
            time.set_type("number");
            time.set_class_name("segTime");
            time.set_min("5");
            time.set_max("600");
            time.set_value(&seconds_value.to_string());
            {
                let app = app.clone();
                let field = time.clone();
                let closure = Closure::<dyn FnMut()>::new(move || {
                    let parsed = field.value().trim().parse::<u32>().ok();
                    app.borrow_mut().session.segments.set_seconds(idx, parsed);
                    on_segments_edited(&app);
                });
                time.set_oninput(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }

            let del: web_sys::HtmlButtonElement = doc
                .create_element("button")
                .expect("create button")
                .dyn_into()
                .expect("button");
            del.set_class_name("delBtn");
            del.set_text_content(Some("🗑️"));
            del.set_disabled(count <= spin_wheel::consts::MIN_SEGMENTS);
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut()>::new(move || {
                    if app.borrow_mut().session.segments.delete(idx) {
                        after_structural_change(&app);
                    }
                });
                del.set_onclick(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }

            row.append_child(&index).ok();
            row.append_child(&text).ok();
            row.append_child(&time).ok();
            row.append_child(&del).ok();
            list.append_child(&row).ok();
        }
    }

    /// Field-level edit: persist, regate the start button, repaint
    fn on_segments_edited(app: &Rc<RefCell<App>>) {
        let a = app.borrow();
        storage::save(&a.session.segments, a.session.engine.rotation());
        set_disabled("startBtn", !a.session.segments.validate());
        redraw(&a);
    }

    /// Row-count change (resize, delete, import): rebuild everything
    fn after_structural_change(app: &Rc<RefCell<App>>) {
        let count = app.borrow().session.segments.len();
        if let Ok(input) = element("countInput").dyn_into::<HtmlInputElement>() {
            input.set_value(&count.to_string());
        }
        rebuild_rows(app);

        let a = app.borrow();
        storage::save(&a.session.segments, a.session.engine.rotation());
        redraw(&a);
        update_view(&a);
    }

    fn wire_count_input(app: &Rc<RefCell<App>>) {
        let input: HtmlInputElement = element("countInput").dyn_into().expect("count input");
        let app = app.clone();
        let field = input.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let requested = field
                .value()
                .trim()
                .parse::<usize>()
                .unwrap_or(spin_wheel::consts::MIN_SEGMENTS);
            {
                let mut a = app.borrow_mut();
                let resized = a.session.segments.resize(requested);
                a.session.replace_segments(resized);
            }
            after_structural_change(&app);
        });
        input.set_oninput(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    // === Spin flow ===

    fn wire_buttons(app: &Rc<RefCell<App>>) {
        {
            let app = app.clone();
            on_click("startBtn", move || {
                let entered = {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.session.enter_wheel()
                };
                if entered {
                    redraw(&app.borrow());
                    update_view(&app.borrow());
                }
            });
        }

        {
            let app = app.clone();
            on_click("backBtn", move || {
                if app.borrow_mut().session.back() {
                    // A shown winner's timer dies with the view
                    sync_interval(&app);
                    update_view(&app.borrow());
                }
            });
        }

        {
            let app = app.clone();
            on_click("spinBtn", move || start_spin(&app));
        }

        {
            let app = app.clone();
            on_click("doneBtn", move || {
                if app.borrow_mut().session.dismiss() {
                    sync_interval(&app);
                    update_view(&app.borrow());
                }
            });
        }

        {
            let app = app.clone();
            on_click("timerToggleBtn", move || {
                {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    if let Some(timer) = a.session.timer_mut() {
                        timer.toggle();
                    }
                }
                sync_interval(&app);
                render_timer_text(&app.borrow());
            });
        }

        {
            let app = app.clone();
            on_click("timerResetBtn", move || {
                if let Some(timer) = app.borrow_mut().session.timer_mut() {
                    timer.reset();
                }
                sync_interval(&app);
                render_timer_text(&app.borrow());
            });
        }

        {
            let app = app.clone();
            on_click("soundBtn", move || {
                {
                    let mut a = app.borrow_mut();
                    let enabled = !a.audio.is_enabled();
                    a.audio.set_enabled(enabled);
                }
                update_view(&app.borrow());
            });
        }

        {
            let app = app.clone();
            on_click("exportLinkBtn", move || export_link(&app));
        }

        on_click("copyLinkBtn", move || {
            if let Ok(input) = element("shareInput").dyn_into::<HtmlInputElement>() {
                let _ = window().navigator().clipboard().write_text(&input.value());
            }
        });

        {
            let app = app.clone();
            on_click("importLinkBtn", move || import_link(&app));
        }
    }

    fn on_click(id: &str, handler: impl FnMut() + 'static) {
        let closure = Closure::<dyn FnMut()>::new(handler);
        element(id)
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .expect("attach click");
        closure.forget();
    }

    fn start_spin(app: &Rc<RefCell<App>>) {
        let plan = {
            let mut a = app.borrow_mut();
            a.audio.resume();
            let App { session, rng, .. } = &mut *a;
            let plan = session.spin(rng);
            if let Some(plan) = &plan {
                a.ticker = Some(TickTracker::new(plan, a.session.segments.len()));
                a.spin_started_at = None;
                // The target is committed the moment the spin starts
                storage::save_rotation(plan.target_rotation);
            }
            plan
        };

        if let Some(plan) = plan {
            // A respin from the winner banner discards its timer
            sync_interval(app);
            apply_rotation(plan.target_rotation, true);
            update_view(&app.borrow());
            schedule_frame(app.clone());
        }
    }

    fn wire_transition_end(app: &Rc<RefCell<App>>) {
        let shell = element("wheelShell");
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let winner = app.borrow_mut().session.transition_complete();
            if let Some(winner) = winner {
                let a = app.borrow();
                a.audio.play(SoundEffect::Win);
                storage::save(&a.session.segments, a.session.engine.rotation());
                update_view(&a);
                log::info!("Winner: {}", winner.text);
            }
        });
        shell
            .add_event_listener_with_callback("transitionend", closure.as_ref().unchecked_ref())
            .expect("attach transitionend");
        closure.forget();
    }

    // === Animation-frame source (spin ticks) ===

    fn schedule_frame(app: Rc<RefCell<App>>) {
        let closure = Closure::once(move |time: f64| frame(app, time));
        window()
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .expect("request animation frame");
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();
            if !a.session.is_spinning() {
                a.ticker = None;
                false
            } else {
                let start = *a.spin_started_at.get_or_insert(time);
                let elapsed = time - start;
                let App { ticker, audio, .. } = &mut *a;
                match ticker.as_mut() {
                    Some(tracker) => {
                        if tracker.advance(elapsed) {
                            audio.play(SoundEffect::SpinTick);
                        }
                        if tracker.is_done() {
                            *ticker = None;
                            false
                        } else {
                            true
                        }
                    }
                    None => false,
                }
            }
        };
        if keep_going {
            schedule_frame(app);
        }
    }

    // === Interval source (countdown) ===

    /// Reconcile the 1 Hz interval with the timer state. At most one live
    /// interval exists; arming while armed and clearing while clear are
    /// no-ops.
    fn sync_interval(app: &Rc<RefCell<App>>) {
        let should_run = app
            .borrow()
            .session
            .timer()
            .is_some_and(|t| t.is_running());
        let live = app.borrow().interval_id.is_some();

        if should_run && !live {
            let callback = Closure::<dyn FnMut()>::new({
                let app = app.clone();
                move || on_timer_tick(&app)
            });
            match window().set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                1000,
            ) {
                Ok(id) => app.borrow_mut().interval_id = Some(id),
                Err(_) => log::warn!("Failed to arm the countdown interval"),
            }
            callback.forget();
        } else if !should_run && live {
            if let Some(id) = app.borrow_mut().interval_id.take() {
                window().clear_interval_with_handle(id);
            }
        }
    }

    fn on_timer_tick(app: &Rc<RefCell<App>>) {
        let tick = {
            let mut a = app.borrow_mut();
            a.session.timer_mut().map(|t| t.tick())
        };
        match tick {
            Some(TimerTick::Finished) => {
                app.borrow().audio.play(SoundEffect::Win);
                sync_interval(app);
            }
            Some(_) => {}
            // Stale interval after a dismissal; drop it
            None => sync_interval(app),
        }
        render_timer_text(&app.borrow());
    }

    // === Share links ===

    fn export_link(app: &Rc<RefCell<App>>) {
        let token = share::encode(&app.borrow().session.segments);
        match token {
            Some(token) => {
                let href = window().location().href().unwrap_or_default();
                let Ok(url) = web_sys::Url::new(&href) else {
                    return;
                };
                url.search_params().set("d", &token);
                if let Ok(input) = element("shareInput").dyn_into::<HtmlInputElement>() {
                    input.set_value(&url.href());
                }
                set_hidden("shareBox", false);
            }
            None => {
                let _ = window().alert_with_message("Fill in every option before sharing");
            }
        }
    }

    fn import_link(app: &Rc<RefCell<App>>) {
        let entered = window()
            .prompt_with_message("Paste the link or the part after d=")
            .ok()
            .flatten();
        let Some(entered) = entered else { return };
        let entered = entered.trim();
        if entered.is_empty() {
            return;
        }

        let token = if entered.contains("d=") {
            web_sys::Url::new(entered)
                .ok()
                .and_then(|url| url.search_params().get("d"))
        } else {
            Some(entered.to_string())
        };

        match token {
            Some(token) => apply_import(app, &token),
            None => {
                let _ = window().alert_with_message("Invalid share link");
            }
        }
    }

    fn apply_import(app: &Rc<RefCell<App>>, token: &str) {
        match share::decode(token) {
            Ok(set) => {
                if app.borrow_mut().session.replace_segments(set) {
                    after_structural_change(app);
                }
            }
            Err(err) => {
                log::warn!("Share import failed: {err}");
                let _ = window().alert_with_message("Invalid share link");
            }
        }
    }

    fn startup_import(app: &Rc<RefCell<App>>) {
        let search = window().location().search().unwrap_or_default();
        if search.is_empty() {
            return;
        }
        let token = web_sys::UrlSearchParams::new_with_str(&search)
            .ok()
            .and_then(|params| params.get("d"));
        if let Some(token) = token {
            apply_import(app, &token);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use spin_wheel::wheel::segments::{RawSegment, SegmentSet};
    use spin_wheel::wheel::session::Session;
    use spin_wheel::wheel::spin::UniformSpin;
    use spin_wheel::wheel::timer::format_clock;

    env_logger::init();
    log::info!("Spin Wheel (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web app");

    // Seeded demo spin exercising the full core
    let segments = SegmentSet::normalize(
        (1u32..=8)
            .map(|i| RawSegment::timed(format!("Challenge {i}"), 30 * i))
            .collect(),
    );
    let mut session = Session::new(segments, 0.0);
    assert!(session.enter_wheel());

    let mut rng = UniformSpin(Pcg32::seed_from_u64(0xF00D));
    let plan = session.spin(&mut rng).expect("spin plan");
    println!(
        "Spinning {:.1} degrees over {:.0} ms...",
        plan.magnitude, plan.duration_ms
    );

    let winner = session.transition_complete().expect("winner");
    println!(
        "Winner: {} ({} on the clock)",
        winner.text,
        format_clock(winner.seconds)
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
