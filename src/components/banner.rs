use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::text::Line;
use tui::widgets::{Paragraph, Widget};

pub const BANNER_HEIGHT: u16 = 6;

const BANNER: [&str; 5] = [
    r"  ___  ___  _   _ ___ _____ ___ ___ ___  ___ ",
    r" / __|/ _ \| | | | _ \_   _/ __|_ _|   \| __|",
    r"| (__| (_) | |_| |   / | | \__ \| || |) | _| ",
    r" \___|\___/ \___/|_|_\ |_| |___/___|___/|___|",
    r"        NBA starting lineups, live           ",
];

/// Intro banner. Flashes red while a lineup-change alert is active.
pub struct Banner {
    pub flash: bool,
}

impl Widget for Banner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = if self.flash { Color::Red } else { Color::Yellow };
        let lines: Vec<Line> = BANNER.iter().map(|l| Line::from(*l)).collect();
        Paragraph::new(lines)
            .style(Style::default().fg(color))
            .alignment(tui::layout::Alignment::Center)
            .render(area, buf);
    }
}
