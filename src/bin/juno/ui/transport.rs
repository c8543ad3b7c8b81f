//! Status bar: device, voices in use, dropped notes and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = juno_synth::dsp::amplify::peak(buffer);
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub struct Status {
    pub sample_rate: u32,
    pub voices: usize,
    pub capacity: usize,
    pub dropped: u64,
    /// Rendered voices the audio thread had no room for.
    pub lost: u64,
    pub base_note: String,
    pub cutoff_hz: f32,
}

pub fn render_transport(frame: &mut Frame, area: Rect, status: &Status, stats: &AudioStats) {
    let block = Block::default().title(" juno ").borders(Borders::ALL);

    let full = status.voices >= status.capacity;
    let line = Line::from(vec![
        Span::styled(
            format!(" Voices {}/{}  ", status.voices, status.capacity),
            Style::default().fg(if full { Color::Yellow } else { Color::Green }),
        ),
        Span::styled(
            format!("Dropped {}  ", status.dropped),
            Style::default().fg(if status.dropped > 0 {
                Color::Red
            } else {
                Color::DarkGray
            }),
        ),
        Span::styled(
            format!("Lost {}  ", status.lost),
            Style::default().fg(if status.lost > 0 {
                Color::Red
            } else {
                Color::DarkGray
            }),
        ),
        Span::styled(
            format!("Octave {}  ", status.base_note),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Cutoff {:.0} Hz  ", status.cutoff_hz),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", status.sample_rate as f32 / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
