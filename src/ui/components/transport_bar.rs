//! Transport controls: record, play, metronome toggle, BPM readout.

use crate::transport::{Transport, TransportState};
use crate::ui::theme::Theme;
use egui::{self, Pos2, RichText, Sense, Shape, Stroke, Vec2};
use tracing::warn;

/// Header bar with the transport controls
pub struct TransportBar<'a> {
    transport: &'a mut Transport,
    theme: &'a Theme,
    bpm: u32,
}

impl<'a> TransportBar<'a> {
    pub fn new(transport: &'a mut Transport, theme: &'a Theme, bpm: u32) -> Self {
        Self {
            transport,
            theme,
            bpm,
        }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            self.show_play_button(ui);
            self.show_record_button(ui);
            self.show_status(ui);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{}", self.bpm))
                        .family(egui::FontFamily::Monospace)
                        .color(self.theme.text_muted),
                );
                self.show_metronome_toggle(ui);
                self.show_error(ui);
            });
        });
    }

    /// Painted record dot: outlined ring when idle, filled and pulsing while
    /// a take is being captured.
    fn show_record_button(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(28.0), Sense::click());
        let painter = ui.painter();
        let center = rect.center();

        if self.transport.state() == TransportState::Recording {
            painter.circle_filled(center, 9.0, self.theme.recording);

            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 2.0).sin() * 0.5 + 0.5) as f32;
            painter.circle_stroke(
                center,
                11.0 + pulse * 2.0,
                Stroke::new(1.5, self.theme.recording.gamma_multiply(0.6)),
            );
            ui.ctx().request_repaint();
        } else {
            let color = if response.hovered() {
                self.theme.primary
            } else {
                self.theme.primary.gamma_multiply(0.8)
            };
            painter.circle_stroke(center, 9.0, Stroke::new(2.0, color));
        }

        if response.clicked() {
            if let Err(e) = self.transport.start_recording() {
                warn!("Record request failed: {}", e);
            }
        }

        response.on_hover_text("Record a new clip");
    }

    /// Painted play triangle, dimmed while the transport is busy.
    fn show_play_button(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(28.0), Sense::click());
        let painter = ui.painter();
        let center = rect.center();

        let color = if self.transport.state() != TransportState::Idle {
            self.theme.text_muted
        } else if response.hovered() {
            self.theme.primary
        } else {
            self.theme.primary.gamma_multiply(0.8)
        };

        let half = 8.0;
        painter.add(Shape::convex_polygon(
            vec![
                Pos2::new(center.x - half * 0.6, center.y - half),
                Pos2::new(center.x - half * 0.6, center.y + half),
                Pos2::new(center.x + half, center.y),
            ],
            color,
            Stroke::NONE,
        ));

        if response.clicked() {
            if let Err(e) = self.transport.start_playback() {
                warn!("Play request failed: {}", e);
            }
        }

        response.on_hover_text("Play all clips");
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        match self.transport.state() {
            TransportState::Recording => {
                ui.label(RichText::new("Recording").color(self.theme.recording));
            }
            TransportState::Playing => {
                ui.label(RichText::new("Playing").color(self.theme.primary));
            }
            TransportState::Idle => {}
        }
    }

    fn show_metronome_toggle(&mut self, ui: &mut egui::Ui) {
        let on = self.transport.metronome_on();

        let (fill, text_color) = if on {
            (self.theme.primary, self.theme.bg_primary)
        } else {
            (self.theme.bg_tertiary, self.theme.text_muted)
        };

        let button = egui::Button::new(
            RichText::new("METRO")
                .size(12.0)
                .family(egui::FontFamily::Monospace)
                .color(text_color),
        )
        .fill(fill)
        .rounding(self.theme.card_rounding);

        if ui.add(button).on_hover_text("Toggle metronome").clicked() {
            if let Err(e) = self.transport.toggle_metronome() {
                warn!("Metronome request failed: {}", e);
            }
        }
    }

    fn show_error(&mut self, ui: &mut egui::Ui) {
        if let Some(error) = self.transport.last_error().map(str::to_owned) {
            let label = egui::Label::new(
                RichText::new(error).size(11.0).color(self.theme.error),
            )
            .sense(Sense::click());

            if ui.add(label).on_hover_text("Click to dismiss").clicked() {
                self.transport.clear_error();
            }
        }
    }
}
