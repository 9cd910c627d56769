//! Chat log and message composer.

use egui::RichText;
use shared::types::{AttachmentRef, Direction};

use crate::types::AppState;

const MAX_PREVIEW_HEIGHT: f32 = 220.0;

/// The scrollable chat log, stuck to the bottom so new entries stay
/// in view.
pub fn show_log(s: &mut AppState, ctx: &egui::Context) {
    ensure_entry_textures(s, ctx);

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (idx, entry) in s.chat_entries.iter().enumerate() {
                    let glyph = match entry.direction {
                        Direction::Incoming => "🤖",
                        Direction::Outgoing => "🧑",
                    };
                    ui.horizontal_top(|ui| {
                        ui.label(RichText::new(glyph).size(18.0));
                        ui.vertical(|ui| {
                            if !entry.content.is_empty() {
                                ui.label(&entry.content);
                            }
                            match &entry.attachment {
                                Some(AttachmentRef::Image { .. }) => {
                                    if let Some(texture) = s.chat_textures.get(&idx) {
                                        show_scaled_image(ui, texture);
                                    }
                                }
                                Some(AttachmentRef::File { file_name }) => {
                                    ui.label(
                                        RichText::new(format!("File attached: {}", file_name))
                                            .monospace(),
                                    );
                                }
                                None => {}
                            }
                            ui.label(RichText::new(&entry.timestamp).weak().small());
                        });
                    });
                    ui.add_space(8.0);
                }

                if s.send_in_flight {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Waiting for reply…").weak());
                    });
                }
            });
    });
}

/// The message composer: attach, type, send. Enter sends,
/// Shift+Enter inserts a newline.
pub fn show_composer(s: &mut AppState, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
        ui.add_space(6.0);
        show_attachment_preview(s, ui, ctx);

        // Single line keeps the pill shape; wrapped content switches
        // to the flatter card shape.
        let rounding = if s.composer_rows > 1 { 15.0 } else { 32.0 };
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(egui::Rounding::same(rounding))
            .inner_margin(egui::Margin::symmetric(12.0, 6.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .button("📎")
                        .on_hover_text("Attach a file")
                        .clicked()
                    {
                        if let Some(path) = rfd::FileDialog::new().pick_file() {
                            s.attach_file(&path);
                        }
                    }

                    let enter_pressed =
                        ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift);

                    let output = egui::TextEdit::multiline(&mut s.pending.text)
                        .desired_rows(1)
                        .desired_width(ui.available_width() - 60.0)
                        .frame(false)
                        .hint_text("Type a message…")
                        .show(ui);
                    s.composer_rows = output.galley.rows.len().max(1);

                    if output.response.has_focus() && enter_pressed {
                        // The edit already inserted the newline for
                        // this Enter; drop it before sending.
                        if let Some(stripped) = s.pending.text.strip_suffix('\n') {
                            s.pending.text = stripped.to_string();
                        }
                        s.send_message();
                        output.response.request_focus();
                    }

                    if ui.button("Send").clicked() {
                        s.send_message();
                    }
                });
            });
        ui.add_space(6.0);
    });
}

/// Preview of the attached file above the input: inline image for
/// images, file name for anything else.
fn show_attachment_preview(s: &mut AppState, ui: &mut egui::Ui, ctx: &egui::Context) {
    if s.composer_preview.is_none() {
        return;
    }
    if let Some(AttachmentRef::Image {
        rgba,
        width,
        height,
        ..
    }) = &s.composer_preview
    {
        if s.composer_texture.is_none() {
            s.composer_texture = Some(load_texture(ctx, "composer-preview", rgba, *width, *height));
        }
    }

    let mut remove = false;
    ui.horizontal(|ui| {
        match &s.composer_preview {
            Some(AttachmentRef::Image { file_name, .. }) => {
                if let Some(texture) = &s.composer_texture {
                    let size = texture.size_vec2();
                    let scale = (64.0 / size.y).min(1.0);
                    ui.image((texture.id(), size * scale));
                }
                ui.label(file_name);
            }
            Some(AttachmentRef::File { file_name }) => {
                ui.label(RichText::new(format!("File attached: {}", file_name)).monospace());
            }
            None => {}
        }
        if ui.button("✖").on_hover_text("Remove attachment").clicked() {
            remove = true;
        }
    });
    if remove {
        s.reset_attachment();
    }
}

/// Upload textures for any image entries that do not have one yet.
fn ensure_entry_textures(s: &mut AppState, ctx: &egui::Context) {
    for (idx, entry) in s.chat_entries.iter().enumerate() {
        if let Some(AttachmentRef::Image {
            rgba,
            width,
            height,
            ..
        }) = &entry.attachment
        {
            if !s.chat_textures.contains_key(&idx) {
                let texture = load_texture(ctx, &format!("chat-attachment-{}", idx), rgba, *width, *height);
                s.chat_textures.insert(idx, texture);
            }
        }
    }
}

fn load_texture(
    ctx: &egui::Context,
    name: &str,
    rgba: &[u8],
    width: usize,
    height: usize,
) -> egui::TextureHandle {
    let color_image = egui::ColorImage::from_rgba_unmultiplied([width, height], rgba);
    ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
}

fn show_scaled_image(ui: &mut egui::Ui, texture: &egui::TextureHandle) {
    let size = texture.size_vec2();
    let scale = (MAX_PREVIEW_HEIGHT / size.y).min(1.0);
    ui.image((texture.id(), size * scale));
}
