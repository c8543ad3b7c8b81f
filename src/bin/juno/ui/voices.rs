//! One row per sounding voice

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use juno_synth::{dsp::envelope::EnvelopeStage, io::converter::note_name, synth::VoiceInfo};

const BAR_WIDTH: usize = 24;

fn stage_color(stage: EnvelopeStage) -> Color {
    match stage {
        EnvelopeStage::Attack => Color::Green,
        EnvelopeStage::Decay => Color::Cyan,
        EnvelopeStage::Sustain => Color::Blue,
        EnvelopeStage::Release => Color::Yellow,
        EnvelopeStage::Done => Color::DarkGray,
    }
}

fn progress_bar(playhead: usize, len: usize) -> String {
    let filled = if len == 0 {
        BAR_WIDTH
    } else {
        (playhead.min(len) * BAR_WIDTH) / len
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn render_voices(frame: &mut Frame, area: Rect, voices: &[VoiceInfo]) {
    let block = Block::default().title(" Voices ").borders(Borders::ALL);

    let lines: Vec<Line> = voices
        .iter()
        .map(|v| {
            Line::from(vec![
                Span::styled(format!(" {:>5} ", v.id.to_string()), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<4}", note_name(v.note)), Style::default().fg(Color::White)),
                Span::raw(format!("{:>8.2} Hz  ", v.frequency)),
                Span::styled(
                    format!("{:<8}", format!("{:?}", v.stage)),
                    Style::default().fg(stage_color(v.stage)),
                ),
                Span::styled(progress_bar(v.playhead, v.len), Style::default().fg(stage_color(v.stage))),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_with_progress() {
        assert_eq!(progress_bar(0, 100).chars().filter(|&c| c == '█').count(), 0);
        assert_eq!(progress_bar(50, 100).chars().filter(|&c| c == '█').count(), 12);
        assert_eq!(progress_bar(500, 100).chars().filter(|&c| c == '█').count(), BAR_WIDTH);
    }
}
