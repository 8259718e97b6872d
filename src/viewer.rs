use std::collections::HashMap;

use anyhow::Result;
use rand::Rng;
use raylib::prelude::*;

use crate::constants::*;
use crate::controls::TriggerAction;
use crate::dom::Page;
use crate::host::SlideshowHost;
use crate::surface::{ElementId, Surface};

const WINDOW_WIDTH: i32 = 1280;
const WINDOW_HEIGHT: i32 = 720;
const FPS: u32 = 60;
const MARGIN: i32 = 20;
const BUTTON_HEIGHT: i32 = 32;
const FONT_SIZE: i32 = 20;

struct Button {
    element: ElementId,
    bounds: Rectangle,
    label: String,
}

/// Runs until the window closes. `ids` are the slideshows to display, top to bottom.
pub fn run(mut host: SlideshowHost<Page>, ids: Vec<String>) -> Result<()> {
    anyhow::ensure!(!ids.is_empty(), "no slideshows to display");

    let (mut rl, thread) = raylib::init()
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .title("Slideshow Viewer")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let mut palette: HashMap<ElementId, Color> = HashMap::new();
    let mut rng = rand::rng();
    let mut focused = 0;
    let mut pending_ms = 0.0_f32;

    while !rl.window_should_close() {
        // --- Autoplay ---
        pending_ms += rl.get_frame_time() * 1000.0;
        let whole_ms = pending_ms.floor();
        if whole_ms >= 1.0 {
            host.tick(whole_ms as u64);
            pending_ms -= whole_ms;
        }

        // --- Keyboard drives the focused slideshow ---
        if rl.is_key_pressed(KeyboardKey::KEY_TAB) {
            focused = (focused + 1) % ids.len();
        }
        if let Some(mut api) = host.get(ids[focused].as_str()) {
            if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
                api.next();
            }
            if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
                api.prev();
            }
            if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
                if api.is_playing() { api.pause() } else { api.play() }
            }
        }

        // --- Layout ---
        let screen_width = rl.get_screen_width();
        let band_height = (rl.get_screen_height() - MARGIN) / ids.len() as i32;
        let buttons = layout_buttons(&host, &ids, screen_width, band_height);

        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            let mouse = rl.get_mouse_position();
            if let Some(button) = buttons.iter().find(|b| b.bounds.check_collision_point_rec(mouse)) {
                host.click(button.element);
            }
        }

        // --- Draw ---
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);

        for (band, id) in ids.iter().enumerate() {
            let top = MARGIN + band as i32 * band_height;
            let Some(show) = host.slideshow(id.as_str()) else {
                d.draw_text(&format!("{id}: destroyed"), MARGIN, top, FONT_SIZE, Color::GRAY);
                continue;
            };
            let page = host.surface();
            let panel_height = band_height - BUTTON_HEIGHT - MARGIN * 3;

            let header_color = if band == focused { Color::GOLD } else { Color::RAYWHITE };
            let header = format!(
                "{id}  [{}/{}]  fx: {}  {}",
                show.current_slide() + 1,
                show.slide_count(),
                show.config().fx,
                if show.is_playing() { "playing" } else { "paused" },
            );
            d.draw_text(&header, MARGIN, top, FONT_SIZE, header_color);

            let Some(slide) = show.slides().iter().find(|s| page.is_visible(s.element)) else {
                continue;
            };
            let color = *palette.entry(slide.element).or_insert_with(|| {
                Color::new(rng.random_range(60..200), rng.random_range(60..200), rng.random_range(60..200), 255)
            });

            // Auto-height containers size the panel from the recorded container height.
            let height = match page.style_height(show.container()) {
                Some(px) if show.config().autoheight => (px as i32).clamp(BUTTON_HEIGHT, panel_height),
                _ => panel_height,
            };
            let panel_top = top + FONT_SIZE + MARGIN / 2;
            d.draw_rectangle(MARGIN, panel_top, screen_width - MARGIN * 2, height, color);

            let label = page
                .attribute(slide.element, ATTR_CAPTION)
                .or_else(|| page.text(slide.element).map(str::to_string))
                .unwrap_or_else(|| page.tag_name(slide.element));
            d.draw_text(&label, MARGIN * 2, panel_top + MARGIN, FONT_SIZE * 2, Color::WHITE);

            let markers: Vec<&str> = [CLASS_FX_FADE, CLASS_FX_SLIDE]
                .into_iter()
                .filter(|class| page.has_class(slide.element, class))
                .collect();
            if !markers.is_empty() {
                d.draw_text(&markers.join(" "), MARGIN * 2, panel_top + height - MARGIN * 2, FONT_SIZE, Color::WHITE);
            }
        }

        for button in &buttons {
            d.draw_rectangle_rec(button.bounds, Color::DARKGRAY);
            d.draw_text(
                &button.label,
                button.bounds.x as i32 + 8,
                button.bounds.y as i32 + 6,
                FONT_SIZE,
                Color::RAYWHITE,
            );
        }
    }

    Ok(())
}

/// One button per bound trigger, placed along the bottom of its slideshow's band.
fn layout_buttons(host: &SlideshowHost<Page>, ids: &[String], screen_width: i32, band_height: i32) -> Vec<Button> {
    let page = host.surface();
    let mut cursors = vec![MARGIN; ids.len()];
    let mut buttons = Vec::new();

    for (element, binding) in host.controls().iter() {
        let Some(band) = ids.iter().position(|id| *id == binding.target) else {
            continue;
        };
        let label = page.text(element).map(str::to_string).unwrap_or_else(|| match binding.action {
            TriggerAction::Prev => "<".to_string(),
            TriggerAction::Next => ">".to_string(),
            TriggerAction::Go(i) => i.to_string(),
        });
        let width = (label.len() as i32 * FONT_SIZE / 2 + 16).max(BUTTON_HEIGHT);
        let x = cursors[band];
        if x + width > screen_width - MARGIN {
            continue;
        }
        cursors[band] += width + MARGIN / 2;

        let y = MARGIN + (band as i32 + 1) * band_height - BUTTON_HEIGHT - MARGIN;
        buttons.push(Button {
            element,
            bounds: Rectangle::new(x as f32, y as f32, width as f32, BUTTON_HEIGHT as f32),
            label,
        });
    }
    buttons
}
