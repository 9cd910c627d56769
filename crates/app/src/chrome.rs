//! Top bar, user dropdown, and modal overlays.

use std::time::Instant;

use egui::RichText;

use crate::types::AppState;

pub fn top_bar(s: &mut AppState, ctx: &egui::Context, now: Instant) {
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading("Chat Desk");
            ui.separator();
            if ui.button("🕘 History").clicked() {
                s.request_history_toggle(now);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if s.session.is_logged_in {
                    let icon = ui.button(format!("👤 {}", s.session.username));
                    s.dropdown.set_icon_hovered(icon.hovered(), now);
                    if s.dropdown.is_visible() {
                        show_user_dropdown(s, ctx, icon.rect, now);
                    }
                } else if s.login_checked {
                    if ui.button("Register").clicked() {
                        open_backend_page(s, "/register");
                    }
                    if ui.button("Login").clicked() {
                        open_backend_page(s, "/login");
                    }
                } else {
                    ui.spinner();
                }
            });
        });
        ui.add_space(4.0);
    });
}

/// Account dropdown below the user icon. Visibility is owned by the
/// hover-grace state machine; this only reports the hover flags.
fn show_user_dropdown(s: &mut AppState, ctx: &egui::Context, anchor: egui::Rect, now: Instant) {
    let area = egui::Area::new(egui::Id::new("user_dropdown"))
        .fixed_pos(egui::pos2(anchor.left() - 40.0, anchor.bottom() + 4.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(RichText::new(&s.session.username).strong());
                ui.label(RichText::new(s.session.session_label()).weak());
                ui.separator();
                if ui.button("Logout").clicked() {
                    s.dropdown.dismiss();
                    s.logout();
                }
                if ui.button("Delete account").clicked() {
                    s.dropdown.dismiss();
                    s.request_delete_account();
                }
            });
        });

    let hovered = ctx
        .input(|i| i.pointer.hover_pos())
        .map(|pos| area.response.rect.contains(pos))
        .unwrap_or(false);
    s.dropdown.set_menu_hovered(hovered, now);
}

/// Modal layers: notices, confirmations, and the login prompt.
pub fn overlays(s: &mut AppState, ctx: &egui::Context) {
    if let Some(message) = s.notice.clone() {
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    s.notice = None;
                }
            });
        return;
    }

    if let Some(confirm) = s.confirm.clone() {
        egui::Window::new("Please confirm")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(confirm.prompt());
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        s.confirm_rejected();
                    }
                    if ui.button("Yes, delete").clicked() {
                        s.confirm_accepted();
                    }
                });
            });
        return;
    }

    if s.show_login_overlay {
        egui::Window::new("Log in required")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Please log in to use chat, reports, and history.");
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("Open login page").clicked() {
                        open_backend_page(s, "/login");
                    }
                    if ui.button("Open register page").clicked() {
                        open_backend_page(s, "/register");
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("I have logged in").clicked() {
                        s.dismiss_login_overlay();
                        s.request_login_check();
                    }
                    if ui.button("Dismiss").clicked() {
                        s.dismiss_login_overlay();
                    }
                });
            });
    }
}

/// Login and registration stay server-rendered pages; hand them to
/// the system browser.
fn open_backend_page(s: &AppState, path: &str) {
    let url = format!("{}{}", s.client.base_url(), path);
    if let Err(e) = open::that(&url) {
        tracing::error!("failed to open {}: {}", url, e);
    }
}
