//! Ordered list of recorded clips with their waveforms.

use crate::clips::{clip_label, AudioClip, ClipStore};
use crate::ui::components::ClipBars;
use crate::ui::theme::Theme;
use egui::{self, RichText};

/// Clip list component
pub struct ClipList<'a> {
    clips: &'a ClipStore,
    theme: &'a Theme,
}

impl<'a> ClipList<'a> {
    pub fn new(clips: &'a ClipStore, theme: &'a Theme) -> Self {
        Self { clips, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let clips = self.clips.snapshot();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if clips.is_empty() {
                        self.show_empty_state(ui);
                    } else {
                        for (index, clip) in clips.iter().enumerate() {
                            self.show_clip_row(ui, index, clip);
                            ui.add_space(self.theme.spacing_sm);
                        }
                    }

                    ui.add_space(self.theme.spacing);
                });
            });
    }

    fn show_clip_row(&self, ui: &mut egui::Ui, index: usize, clip: &AudioClip) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.set_width(56.0);
                ui.label(
                    RichText::new(clip_label(index))
                        .size(18.0)
                        .family(egui::FontFamily::Monospace)
                        .color(self.theme.primary),
                );
                ui.label(
                    RichText::new(clip.recorded_at.format("%H:%M:%S").to_string())
                        .size(10.0)
                        .color(self.theme.text_muted),
                );
            });

            ClipBars::new(clip, self.theme).show(ui);
        });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.label(
                RichText::new("No clips yet")
                    .size(20.0)
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing_sm);

            ui.label(
                RichText::new("Hit record to capture your first loop.")
                    .size(13.0)
                    .color(self.theme.text_muted),
            );
        });
    }
}
