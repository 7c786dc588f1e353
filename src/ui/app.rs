//! Main application struct and eframe integration.

use crate::transport::{Transport, TransportState};
use crate::ui::components::{ClipList, TransportBar};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, TopBottomPanel};
use std::time::Duration;

/// Main Loopdeck application
pub struct LoopdeckApp {
    transport: Transport,
    theme: Theme,
    bpm: u32,
}

impl LoopdeckApp {
    pub fn new(cc: &eframe::CreationContext<'_>, transport: Transport, bpm: u32) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            transport,
            theme,
            bpm,
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("transport")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                TransportBar::new(&mut self.transport, &self.theme, self.bpm).show(ui);
            });
    }

    fn show_clips(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                ClipList::new(self.transport.clips(), &self.theme).show(ui);
            });
    }
}

impl eframe::App for LoopdeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Complete any in-flight transport operations
        self.transport.poll();

        self.show_header(ctx);
        self.show_clips(ctx);

        // Keep polling while an operation is outstanding; idle frames only
        // need an occasional wake-up to drain stray engine events.
        if self.transport.state() != TransportState::Idle {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
