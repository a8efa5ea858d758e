use std::path::{Path, PathBuf};

use anyhow::Context;
use eframe::egui;

use crate::animation::{Choreography, Motion};
use crate::config::Config;
use crate::note;
use crate::parser::{self, Slide};
use crate::render::{self, RenderMode, image_cache::ImageCache};
use crate::theme::{self, PresentationTheme};

struct ExportApp {
    slides: Vec<Slide>,
    theme: PresentationTheme,
    image_cache: ImageCache,
    output_dir: PathBuf,
    current_slide: usize,
    screenshot_requested: bool,
    saved: usize,
    done: bool,
}

impl ExportApp {
    fn new(
        slides: Vec<Slide>,
        theme: PresentationTheme,
        base_path: &Path,
        output_dir: PathBuf,
    ) -> Self {
        let image_cache = ImageCache::new(base_path.to_path_buf());
        image_cache.preload(slides.iter().filter_map(|s| s.content.image.as_deref()));
        Self {
            slides,
            theme,
            image_cache,
            output_dir,
            current_slide: 0,
            screenshot_requested: false,
            saved: 0,
            done: false,
        }
    }
}

impl eframe::App for ExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.done {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Check for screenshot result from previous frame
        let mut screenshot = None;
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    screenshot = Some(image.clone());
                }
            }
        });

        if let Some(image) = screenshot {
            let filename = format!("slide-{:02}.png", self.current_slide + 1);
            let path = self.output_dir.join(&filename);
            match save_color_image(&image, &path) {
                Ok(()) => {
                    self.saved += 1;
                    log::info!("saved {filename}");
                }
                Err(e) => log::error!("{e:#}"),
            }
            self.screenshot_requested = false;
            self.current_slide += 1;
            if self.current_slide >= self.slides.len() {
                log::debug!("exported {} of {} slides", self.saved, self.slides.len());
                self.done = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }

        let bg = self.theme.colors.background;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);

                if let Some(slide) = self.slides.get(self.current_slide) {
                    // Exported slides show their settled state.
                    let choreography = Choreography::for_slide(slide, Motion::Reduced);
                    render::render_slide(
                        ui,
                        slide,
                        &self.theme,
                        &self.image_cache,
                        rect,
                        RenderMode::Full {
                            choreography: &choreography,
                            elapsed_ms: 0.0,
                            motion: Motion::Reduced,
                        },
                    );
                }
            });

        // Request screenshot after rendering (will arrive next frame)
        if !self.screenshot_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.screenshot_requested = true;
        }

        ctx.request_repaint();
    }
}

fn save_color_image(image: &egui::ColorImage, path: &Path) -> anyhow::Result<()> {
    let width = image.width() as u32;
    let height = image.height() as u32;
    let pixels: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
        .collect();

    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)
        .with_context(|| format!("Failed to save {}", path.display()))
}

pub fn run(
    file: PathBuf,
    output_dir: PathBuf,
    width: u32,
    height: u32,
    theme_id: Option<String>,
) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let note = note::load(&file)?.with_profile_base(config.base_url());
    let slides = parser::parse_note_to_slides(&note);
    let theme = theme::get_theme(theme_id.as_deref().or(config.theme()));
    let base_path = file
        .parent()
        .unwrap_or(std::path::Path::new("."))
        .to_path_buf();

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    eprintln!(
        "Exporting {} slides to {} ({}x{}, theme {})",
        slides.len(),
        output_dir.display(),
        width,
        height,
        theme.id,
    );

    let title = format!("notedeck export \u{00B7} {}", note.title);

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([width as f32, height as f32])
        .with_title(&title)
        .with_decorations(false);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let output_dir_clone = output_dir.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ExportApp::new(
                slides,
                theme,
                &base_path,
                output_dir_clone,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    eprintln!("Export complete.");
    Ok(())
}
