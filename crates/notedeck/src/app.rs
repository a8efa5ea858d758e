use eframe::egui;
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use std::time::{Duration, Instant};

use crate::animation::{Choreography, Motion};
use crate::cli::PresentArgs;
use crate::config::Config;
use crate::note::{self, NoteInput};
use crate::parser::Deck;
use crate::playback::{self, Command, Effect, PlaybackController};
use crate::render::{self, RenderMode, canvas, image_cache::ImageCache};
use crate::theme::{self, PresentationTheme};

const PROGRESS_HEIGHT: f32 = 4.0;
const PROGRESS_ANIMATION: f32 = 0.3;
const WATCH_DEBOUNCE: Duration = Duration::from_millis(250);
const OVERVIEW_GAP: f32 = 24.0;

/// Presentation settings after CLI flags and config are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentOptions {
    pub theme: String,
    pub windowed: bool,
    pub start_slide: usize,
    pub background: Option<String>,
    pub show_progress_bar: bool,
    pub show_slide_numbers: bool,
    pub motion: Motion,
    pub watch: bool,
}

impl PresentOptions {
    /// CLI flags override config, config overrides built-in defaults.
    pub fn resolve(args: &PresentArgs, config: &Config) -> Self {
        let theme = args
            .theme
            .as_deref()
            .or(config.theme())
            .unwrap_or(theme::DEFAULT_THEME);
        Self {
            theme: theme::get_theme(Some(theme)).id.to_string(),
            windowed: args.windowed,
            start_slide: args
                .slide
                .map(|s| s.saturating_sub(1))
                .unwrap_or_else(|| config.start_slide()),
            background: args.background.clone(),
            show_progress_bar: !args.no_progress && config.show_progress_bar(),
            show_slide_numbers: !args.no_slide_numbers && config.show_slide_numbers(),
            motion: Motion::from_reduced(args.reduced_motion || config.reduced_motion()),
            watch: !args.no_watch,
        }
    }
}

/// Keyboard shortcut for a key press, if it has one.
pub fn command_for_key(key: egui::Key) -> Option<Command> {
    use egui::Key;
    let command = match key {
        Key::ArrowRight | Key::Space | Key::Enter | Key::PageDown => Command::Next,
        Key::ArrowLeft | Key::PageUp => Command::Previous,
        Key::Home => Command::First,
        Key::End => Command::Last,
        Key::Escape => Command::Escape,
        Key::F => Command::ToggleFullscreen,
        Key::Num1 => Command::Digit(1),
        Key::Num2 => Command::Digit(2),
        Key::Num3 => Command::Digit(3),
        Key::Num4 => Command::Digit(4),
        Key::Num5 => Command::Digit(5),
        Key::Num6 => Command::Digit(6),
        Key::Num7 => Command::Digit(7),
        Key::Num8 => Command::Digit(8),
        Key::Num9 => Command::Digit(9),
        _ => return None,
    };
    Some(command)
}

/// Input gathered from one frame, applied after the input lock is released.
#[derive(Default)]
struct FrameInput {
    commands: Vec<Command>,
    activity: bool,
    toggle_overview: bool,
}

struct PresentationApp {
    note_path: PathBuf,
    base_url: Option<String>,
    deck: Deck,
    controller: PlaybackController,
    /// Entrance of the current slide, rebuilt when the index changes.
    choreography: Choreography,
    choreography_slide: usize,
    theme: PresentationTheme,
    image_cache: ImageCache,
    options: PresentOptions,
    overview: bool,
    /// Set on the first watch attempt, successful or not.
    watch_started: bool,
    reload_rx: Option<Receiver<()>>,
    _watcher: Option<Debouncer<RecommendedWatcher>>,
}

impl PresentationApp {
    fn new(
        note_path: PathBuf,
        note: &NoteInput,
        base_url: Option<String>,
        options: PresentOptions,
    ) -> Self {
        let now = Instant::now();
        let deck = Deck::new(note);
        let controller =
            PlaybackController::new(deck.len(), now).starting_at(options.start_slide);
        let base_path = note_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        let image_cache = ImageCache::new(base_path);
        let theme = theme::get_theme(Some(&options.theme));
        let choreography_slide = controller.current_slide();
        let choreography = deck
            .get(choreography_slide)
            .map(|s| Choreography::for_slide(s, options.motion))
            .unwrap_or_default();

        let app = Self {
            note_path,
            base_url,
            deck,
            controller,
            choreography,
            choreography_slide,
            theme,
            image_cache,
            options,
            overview: false,
            watch_started: false,
            reload_rx: None,
            _watcher: None,
        };
        app.preload_images();
        app
    }

    fn preload_images(&self) {
        let slide_images = self
            .deck
            .slides()
            .iter()
            .filter_map(|s| s.content.image.as_deref());
        self.image_cache
            .preload(slide_images.chain(self.options.background.as_deref()));
    }

    fn should_watch(&self) -> bool {
        self.options.watch && !self.watch_started
    }

    fn watch(&mut self, ctx: &egui::Context) {
        self.watch_started = true;
        match start_watcher(&self.note_path, ctx.clone()) {
            Ok((watcher, rx)) => {
                log::info!("watching {} for changes", self.note_path.display());
                self._watcher = Some(watcher);
                self.reload_rx = Some(rx);
            }
            Err(e) => log::warn!("not watching {}: {e:#}", self.note_path.display()),
        }
    }

    fn reload(&mut self, now: Instant) {
        let note = match note::load(&self.note_path) {
            Ok(note) => note.with_profile_base(self.base_url.as_deref()),
            Err(e) => {
                log::warn!("reload failed, keeping current slides: {e:#}");
                return;
            }
        };
        if !self.deck.refresh(&note) {
            return;
        }
        // New note identity: start over as if freshly opened.
        self.controller.teardown();
        let fullscreen = self.controller.is_fullscreen();
        self.controller = PlaybackController::new(self.deck.len(), now);
        self.controller.on_fullscreen_changed(fullscreen);
        self.overview = false;
        self.image_cache.clear();
        self.preload_images();
        self.sync_choreography(true);
    }

    fn sync_choreography(&mut self, force: bool) {
        let index = self.controller.current_slide();
        if force || index != self.choreography_slide {
            self.choreography_slide = index;
            self.choreography = self
                .deck
                .get(index)
                .map(|s| Choreography::for_slide(s, self.options.motion))
                .unwrap_or_default();
            log::trace!(
                "slide {}: {} tweens over {} ms",
                index + 1,
                self.choreography.tweens().len(),
                self.choreography.duration_ms()
            );
        }
    }

    fn gather_input(&self, ctx: &egui::Context) -> FrameInput {
        let mut input = FrameInput::default();
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    repeat,
                    ..
                } = event
                {
                    input.activity = true;
                    if *key == egui::Key::G && !repeat {
                        input.toggle_overview = true;
                        continue;
                    }
                    if self.overview && *key == egui::Key::Escape {
                        input.toggle_overview = true;
                        continue;
                    }
                    if let Some(command) = command_for_key(*key) {
                        // Held arrows keep stepping, held F must not flicker.
                        if !repeat || matches!(command, Command::Next | Command::Previous) {
                            input.commands.push(command);
                        }
                    }
                }
            }
            if i.pointer.delta() != egui::Vec2::ZERO {
                input.activity = true;
            }
        });
        input
    }

    /// Run commands through the controller and turn its effects into
    /// viewport commands.
    fn apply(&mut self, commands: Vec<Command>, now: Instant) -> Vec<egui::ViewportCommand> {
        let mut viewport_cmds = Vec::new();
        for command in commands {
            match self.controller.handle(command, now) {
                Some(Effect::RequestFullscreen(on)) => {
                    viewport_cmds.push(egui::ViewportCommand::Fullscreen(on));
                }
                Some(Effect::Close) => {
                    self.controller.teardown();
                    viewport_cmds.push(egui::ViewportCommand::Close);
                }
                None => {}
            }
        }
        viewport_cmds
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        if self.should_watch() {
            self.watch(ctx);
        }
        let changed = self
            .reload_rx
            .as_ref()
            .is_some_and(|rx| rx.try_iter().count() > 0);
        if changed {
            self.reload(now);
        }

        // The platform owns the fullscreen flag; mirror it before handling input.
        let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
        self.controller.on_fullscreen_changed(fullscreen);

        let input = self.gather_input(ctx);
        if input.activity {
            self.controller.note_activity(now);
        }
        if input.toggle_overview {
            self.overview = !self.overview;
        }
        let mut commands = input.commands;

        let bg = self.theme.colors.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);

                if self.overview {
                    if let Some(index) = self.draw_overview(ui, rect) {
                        commands.push(Command::GoTo(index));
                        self.overview = false;
                    }
                    return;
                }

                if let Some(src) = self.options.background.as_deref() {
                    render::draw_background(ui, &self.theme, &self.image_cache, src, rect);
                }

                let stage = ui.interact(rect, egui::Id::new("stage"), egui::Sense::click());
                if stage.clicked() {
                    if let Some(pos) = stage.interact_pointer_pos() {
                        commands.push(playback::zone_for(pos.x - rect.left(), rect.width()));
                    }
                }

                self.sync_choreography(false);
                if let Some(slide) = self.deck.get(self.controller.current_slide()) {
                    render::render_slide(
                        ui,
                        slide,
                        &self.theme,
                        &self.image_cache,
                        rect,
                        RenderMode::Full {
                            choreography: &self.choreography,
                            elapsed_ms: self.controller.elapsed_ms(now),
                            motion: self.options.motion,
                        },
                    );
                }

                self.draw_chrome(ui, ctx, rect);
            });

        if self.controller.show_controls() && !self.overview {
            commands.extend(self.draw_controls(ctx));
        }

        // Send collected viewport commands outside the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        for cmd in self.apply(commands, now) {
            ctx.send_viewport_cmd(cmd);
        }

        self.controller.tick(now);
        self.sync_choreography(false);

        if !self.choreography.is_settled(self.controller.elapsed_ms(Instant::now())) {
            ctx.request_repaint();
        } else if let Some(deadline) = self.controller.next_wakeup() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}

impl PresentationApp {
    fn draw_chrome(&self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect) {
        let colors = &self.theme.colors;

        if self.options.show_progress_bar {
            let progress = ctx.animate_value_with_time(
                egui::Id::new("progress"),
                self.controller.progress(),
                PROGRESS_ANIMATION,
            );
            let track = egui::Rect::from_min_max(
                egui::pos2(rect.left(), rect.bottom() - PROGRESS_HEIGHT),
                rect.right_bottom(),
            );
            ui.painter().rect_filled(
                track,
                0.0,
                PresentationTheme::with_opacity(colors.accent_muted, 0.6),
            );
            let mut bar = track;
            bar.set_width(track.width() * progress.clamp(0.0, 1.0));
            ui.painter().rect_filled(bar, 0.0, colors.accent);
        }

        if self.options.show_slide_numbers {
            let counter_text = format!(
                "{} / {}",
                self.controller.current_slide() + 1,
                self.controller.slide_count()
            );
            let counter_color = PresentationTheme::with_opacity(colors.text, 0.4);
            let counter_galley = ui.painter().layout_no_wrap(
                counter_text,
                egui::FontId::monospace(14.0),
                counter_color,
            );
            let counter_pos = egui::pos2(
                rect.right() - counter_galley.rect.width() - 16.0,
                rect.bottom() - 30.0,
            );
            ui.painter()
                .galley(counter_pos, counter_galley, counter_color);
        }
    }

    /// Floating control bar. Returns the commands its buttons produced.
    fn draw_controls(&self, ctx: &egui::Context) -> Vec<Command> {
        let colors = &self.theme.colors;
        let mut commands = Vec::new();
        egui::Area::new(egui::Id::new("controls"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(PresentationTheme::with_opacity(colors.surface, 0.9))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(12, 6))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let at_start = self.controller.current_slide() == 0;
                            let at_end = self.controller.current_slide() + 1
                                >= self.controller.slide_count();
                            let text = |s: &str| egui::RichText::new(s).color(colors.text);

                            let prev = egui::Button::new(text("\u{23F4}"));
                            if ui.add_enabled(!at_start, prev).clicked() {
                                commands.push(Command::Previous);
                            }
                            ui.label(
                                egui::RichText::new(format!(
                                    "{} / {}",
                                    self.controller.current_slide() + 1,
                                    self.controller.slide_count()
                                ))
                                .monospace()
                                .color(colors.text_muted),
                            );
                            let next = egui::Button::new(text("\u{23F5}"));
                            if ui.add_enabled(!at_end, next).clicked() {
                                commands.push(Command::Next);
                            }
                            ui.separator();
                            let fullscreen_label = if self.controller.is_fullscreen() {
                                "Exit fullscreen"
                            } else {
                                "Fullscreen"
                            };
                            if ui.button(text(fullscreen_label)).clicked() {
                                commands.push(Command::ToggleFullscreen);
                            }
                            if ui.button(text("Close")).clicked() {
                                // Leave fullscreen first, same as Escape.
                                commands.push(Command::Escape);
                            }
                        });
                    });
            });
        commands
    }

    fn overview_columns(&self, width: f32) -> usize {
        let cell = canvas::canvas_size(canvas::THUMBNAIL_SCALE).x + OVERVIEW_GAP;
        ((width - OVERVIEW_GAP) / cell).floor().max(1.0) as usize
    }

    /// Thumbnail grid. Returns the slide that was clicked, if any.
    fn draw_overview(&self, ui: &mut egui::Ui, rect: egui::Rect) -> Option<usize> {
        let colors = &self.theme.colors;
        let thumb = canvas::canvas_size(canvas::THUMBNAIL_SCALE);
        let cols = self.overview_columns(rect.width());
        let grid_width = cols as f32 * thumb.x + (cols as f32 - 1.0) * OVERVIEW_GAP;
        let left = rect.left() + (rect.width() - grid_width) / 2.0;
        let mut clicked = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            let rows = self.deck.len().div_ceil(cols);
            let height = OVERVIEW_GAP + rows as f32 * (thumb.y + OVERVIEW_GAP);
            ui.set_min_size(egui::vec2(rect.width(), height));
            let top = ui.min_rect().top() + OVERVIEW_GAP;

            for (i, slide) in self.deck.slides().iter().enumerate() {
                let col = i % cols;
                let row = i / cols;
                let cell = egui::Rect::from_min_size(
                    egui::pos2(
                        left + col as f32 * (thumb.x + OVERVIEW_GAP),
                        top + row as f32 * (thumb.y + OVERVIEW_GAP),
                    ),
                    thumb,
                );
                if !ui.is_rect_visible(cell) {
                    continue;
                }
                ui.painter().rect_filled(cell, 4.0, colors.surface);
                render::render_slide(
                    ui,
                    slide,
                    &self.theme,
                    &self.image_cache,
                    cell,
                    RenderMode::Thumbnail,
                );

                let response = ui.interact(cell, egui::Id::new(("thumb", i)), egui::Sense::click());
                let current = i == self.controller.current_slide();
                if current || response.hovered() {
                    let stroke_color = if current {
                        colors.accent
                    } else {
                        PresentationTheme::with_opacity(colors.accent, 0.5)
                    };
                    ui.painter().rect_stroke(
                        cell,
                        4.0,
                        egui::Stroke::new(3.0, stroke_color),
                        egui::StrokeKind::Outside,
                    );
                }
                if response.clicked() {
                    clicked = Some(i);
                }
            }
        });
        clicked
    }
}

fn start_watcher(
    path: &Path,
    ctx: egui::Context,
) -> anyhow::Result<(Debouncer<RecommendedWatcher>, Receiver<()>)> {
    let (tx, rx) = channel();
    let file_name = path.file_name().map(|n| n.to_os_string());
    // Editors often replace the file, so watch the directory and filter.
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut debouncer = new_debouncer(WATCH_DEBOUNCE, move |res: DebounceEventResult| {
        match res {
            Ok(events) => {
                let ours = events
                    .iter()
                    .any(|e| e.path.file_name().map(|n| n.to_os_string()) == file_name);
                if ours && tx.send(()).is_ok() {
                    ctx.request_repaint();
                }
            }
            Err(e) => log::warn!("file watch error: {e:?}"),
        }
    })?;
    debouncer
        .watcher()
        .watch(&dir, RecursiveMode::NonRecursive)?;
    Ok((debouncer, rx))
}

pub fn run(file: PathBuf, args: PresentArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let base_url = config.base_url().map(str::to_string);
    let note = note::load(&file)?.with_profile_base(base_url.as_deref());

    let mut options = PresentOptions::resolve(&args, &config);
    // A background given on the command line is relative to where we run.
    options.background = options.background.map(|b| {
        let path = Path::new(&b);
        if path.exists() {
            std::path::absolute(path)
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or(b)
        } else {
            b
        }
    });
    log::debug!("presenting {} with {:?}", file.display(), options);

    let title = if note.title.trim().is_empty() {
        format!(
            "notedeck \u{2014} {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        )
    } else {
        note.title.clone()
    };

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(PresentationApp::new(file, &note, base_url, options)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
