//! Chat Desk — desktop client for the chat/report backend.
//!
//! The UI thread owns all state behind a mutex; every network call
//! runs on a background thread and reports back over a channel
//! polled at the top of each frame. Concurrent actions are not
//! serialized: the last response to arrive wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use parking_lot::Mutex;

mod chat_panel;
mod chrome;
mod history_panel;
mod report_panel;
mod state;
mod types;

pub use types::*;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 600.0]),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "Chat Desk",
        options,
        Box::new(|_cc| {
            let mut state = AppState::default();
            // The one call allowed while logged out.
            state.request_login_check();
            Box::new(ChatDeskApp {
                state: Arc::new(Mutex::new(state)),
            })
        }),
    )
}

struct ChatDeskApp {
    state: Arc<Mutex<AppState>>,
}

impl eframe::App for ChatDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut s = self.state.lock();
        let now = Instant::now();

        // Drain background results (non-blocking).
        s.poll_login_status(now);
        s.poll_logout();
        s.poll_delete_account();
        s.poll_send_result();
        s.poll_history();
        s.poll_clear_history();
        s.poll_export();
        s.poll_report(now);

        // Advance debounce, progress, and overlay timers.
        s.tick(now);

        chrome::top_bar(&mut s, ctx, now);
        history_panel::show(&mut s, ctx);
        report_panel::show(&mut s, ctx, now);
        chat_panel::show_composer(&mut s, ctx);
        chat_panel::show_log(&mut s, ctx);
        chrome::overlays(&mut s, ctx);

        // Keep polling while anything is outstanding.
        if s.has_pending_work() || s.send_in_flight {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
