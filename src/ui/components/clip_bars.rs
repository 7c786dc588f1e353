//! Bar-chart visualization of a single clip.
//!
//! Purely derived from the clip's samples: one bar per amplitude point,
//! height proportional to the normalized value, first-to-last left to right.

use crate::clips::AudioClip;
use crate::ui::theme::Theme;
use crate::viz::normalize;
use egui::{self, Pos2, Rect, Sense, Stroke, Vec2};

/// Waveform bars for one recorded clip
pub struct ClipBars<'a> {
    clip: &'a AudioClip,
    theme: &'a Theme,
    /// Height of the bar area
    height: f32,
}

impl<'a> ClipBars<'a> {
    pub fn new(clip: &'a AudioClip, theme: &'a Theme) -> Self {
        Self {
            clip,
            theme,
            height: 96.0,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let desired_size = Vec2::new(ui.available_width(), self.height);
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::hover());

        let painter = ui.painter();
        painter.rect_filled(rect, self.theme.card_rounding, self.theme.bg_secondary);

        let heights = normalize(&self.clip.samples);

        let padding = 8.0;
        let draw_rect = rect.shrink(padding);
        let center_y = draw_rect.center().y;

        if heights.is_empty() {
            painter.line_segment(
                [
                    Pos2::new(draw_rect.left(), center_y),
                    Pos2::new(draw_rect.right(), center_y),
                ],
                Stroke::new(1.0, self.theme.waveform_inactive),
            );
            return response;
        }

        let slot_width = draw_rect.width() / heights.len() as f32;
        let bar_width = (slot_width - 1.0).clamp(1.0, 3.0);

        for (i, &height_pct) in heights.iter().enumerate() {
            let x = draw_rect.left() + (i as f32 + 0.5) * slot_width;
            if x > draw_rect.right() {
                break;
            }

            // A silent point still gets a hairline so the clip reads as present
            let bar_height = (height_pct / 100.0 * draw_rect.height()).max(1.0);

            let bar_rect = Rect::from_center_size(
                Pos2::new(x, center_y),
                Vec2::new(bar_width, bar_height),
            );

            painter.rect_filled(bar_rect, 0.5, self.theme.primary);
        }

        response
    }
}
