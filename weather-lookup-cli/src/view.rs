use std::io::{self, Write};

use crossterm::style::{Color, StyledContent, Stylize};
use unicode_width::UnicodeWidthStr;
use weather_lookup_core::{LookupError, Presentation, Rgb, WeatherIcon};

const PANEL_WIDTH: usize = 44;
const ICON_COLUMNS: u32 = 20;
const TEXT_COLOR: Rgb = Rgb(0x33, 0x33, 0x33);
const TITLE_COLOR: Rgb = Rgb(0x2c, 0x3e, 0x50);

fn color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb.0, g: rgb.1, b: rgb.2 }
}

/// Composite an RGBA pixel over an opaque background.
fn blend(pixel: [u8; 4], background: Rgb) -> Rgb {
    let [r, g, b, a] = pixel.map(u16::from);
    let mix = |fg: u16, bg: u8| ((fg * a + u16::from(bg) * (255 - a)) / 255) as u8;
    Rgb(mix(r, background.0), mix(g, background.1), mix(b, background.2))
}

/// Leading space plus `content`, padded to the panel's column count.
/// Emoji take two columns, so this goes by display width.
fn pad_to_panel(content: &str) -> String {
    let width = content.width();
    format!(" {content}{}", " ".repeat(PANEL_WIDTH.saturating_sub(width + 1)))
}

/// The terminal stand-in for the app window: holds what is currently on
/// screen and redraws it as one framed panel.
///
/// Errors are held until [`TerminalView::write_error`] so they never land on
/// a line a spinner is still drawing.
#[derive(Debug)]
pub struct TerminalView {
    background: Rgb,
    icon: Option<WeatherIcon>,
    text: String,
    show_icon: bool,
    pending_error: Option<LookupError>,
    changed: bool,
}

impl TerminalView {
    pub fn new(show_icon: bool) -> Self {
        Self {
            background: Rgb::NEUTRAL,
            icon: None,
            text: String::new(),
            show_icon,
            pending_error: None,
            changed: false,
        }
    }

    fn styled(&self, content: &str, fg: Rgb) -> StyledContent<String> {
        pad_to_panel(content).with(color(fg)).on(color(self.background))
    }

    fn line(&self, content: &str, fg: Rgb) -> String {
        self.styled(content, fg).to_string()
    }

    /// Upper-half blocks: foreground is the top pixel, background the one below.
    fn icon_lines(&self, icon: &WeatherIcon) -> Vec<String> {
        let icon = icon.scaled_to_width(ICON_COLUMNS);
        let margin = (PANEL_WIDTH - ICON_COLUMNS as usize) / 2;
        let pad = " ".repeat(margin).on(color(self.background)).to_string();
        let tail = " "
            .repeat(PANEL_WIDTH - margin - ICON_COLUMNS as usize)
            .on(color(self.background))
            .to_string();

        (0..icon.height)
            .step_by(2)
            .map(|y| {
                let mut row = pad.clone();
                for x in 0..icon.width {
                    let top = icon.pixel(x, y).unwrap_or([0, 0, 0, 0]);
                    let bottom = icon.pixel(x, y + 1).unwrap_or([0, 0, 0, 0]);
                    let cell = "▀"
                        .with(color(blend(top, self.background)))
                        .on(color(blend(bottom, self.background)));
                    row.push_str(&cell.to_string());
                }
                row.push_str(&tail);
                row
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            self.line("", TEXT_COLOR),
            self.styled("🌤 Weather App", TITLE_COLOR).bold().to_string(),
            self.line("", TEXT_COLOR),
        ];

        if let Some(icon) = self.icon.as_ref().filter(|_| self.show_icon) {
            lines.extend(self.icon_lines(icon));
            lines.push(self.line("", TEXT_COLOR));
        }

        for text_line in self.text.lines() {
            lines.push(self.line(text_line, TEXT_COLOR));
        }
        lines.push(self.line("", TEXT_COLOR));

        lines.join("\n")
    }

    pub fn print(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", self.render())?;
        out.flush()
    }

    /// True if anything on the panel changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Write the held error as an `Error` block. Returns whether there was one.
    pub fn write_error<W: Write>(&mut self, out: &mut W) -> io::Result<bool> {
        let Some(error) = self.pending_error.take() else {
            return Ok(false);
        };

        writeln!(out, "{}", "Error".red().bold())?;
        writeln!(out, "{}", error.dialog_message())?;
        out.flush()?;
        Ok(true)
    }
}

impl Presentation for TerminalView {
    fn set_background(&mut self, color: Rgb) {
        self.background = color;
        self.changed = true;
    }

    fn set_icon(&mut self, icon: WeatherIcon) {
        self.icon = Some(icon);
        self.changed = true;
    }

    fn set_result_text(&mut self, text: String) {
        self.text = text;
        self.changed = true;
    }

    fn show_error(&mut self, error: &LookupError) {
        self.pending_error = Some(error.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(width: u32, height: u32, pixel: [u8; 4]) -> WeatherIcon {
        WeatherIcon { width, height, pixels: vec![pixel; (width * height) as usize] }
    }

    #[test]
    fn blend_respects_alpha() {
        let bg = Rgb(100, 100, 100);
        assert_eq!(blend([200, 0, 50, 255], bg), Rgb(200, 0, 50));
        assert_eq!(blend([200, 0, 50, 0], bg), bg);
    }

    #[test]
    fn render_shows_text_lines() {
        let mut view = TerminalView::new(true);
        view.set_result_text("📍 Paris, FR\n💧 Humidity: 55%".into());

        let out = view.render();
        assert!(out.contains("📍 Paris, FR"));
        assert!(out.contains("💧 Humidity: 55%"));
        assert!(out.contains("Weather App"));
    }

    #[test]
    fn icon_uses_one_row_per_two_pixels() {
        let mut view = TerminalView::new(true);
        view.set_icon(icon(100, 100, [255, 0, 0, 255]));

        let out = view.render();
        assert_eq!(out.matches('▀').count(), 20 * 10);
    }

    #[test]
    fn icon_hidden_when_disabled() {
        let mut view = TerminalView::new(false);
        view.set_icon(icon(10, 10, [255, 0, 0, 255]));

        assert!(!view.render().contains('▀'));
    }

    #[test]
    fn background_change_is_kept() {
        let mut view = TerminalView::new(true);
        assert_eq!(view.background, Rgb::NEUTRAL);

        view.set_background(Rgb(0xa2, 0xd2, 0xff));
        view.show_error(&LookupError::unexpected("boom"));
        assert_eq!(view.background, Rgb(0xa2, 0xd2, 0xff));
    }

    #[test]
    fn error_block_is_held_until_written() {
        let mut view = TerminalView::new(true);
        view.show_error(&LookupError::unexpected("connection reset"));

        let mut out = Vec::new();
        assert!(view.write_error(&mut out).unwrap());

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Error"));
        assert!(!lines[0].contains('\r'));
        assert_eq!(&lines[1..], ["Something went wrong:", "connection reset"]);

        let mut again = Vec::new();
        assert!(!view.write_error(&mut again).unwrap());
        assert!(again.is_empty());
    }

    #[test]
    fn provider_error_block_shows_message_only() {
        let mut view = TerminalView::new(true);
        view.show_error(&LookupError::Provider("city not found".into()));

        let mut out = Vec::new();
        view.write_error(&mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().ends_with("\ncity not found\n"));
    }

    #[test]
    fn emoji_lines_fill_the_panel() {
        for content in ["📍 Paris, FR", "💧 Humidity: 55%", "🌤 Weather App", "plain"] {
            assert_eq!(pad_to_panel(content).width(), PANEL_WIDTH, "{content}");
        }
        assert_eq!(pad_to_panel("📍 ab").chars().filter(|c| *c == ' ').count(), PANEL_WIDTH - 4);
    }

    #[test]
    fn setters_mark_the_panel_changed() {
        let mut view = TerminalView::new(true);
        assert!(!view.take_changed());

        view.show_error(&LookupError::Validation("Please enter a city name.".into()));
        assert!(!view.take_changed());

        view.set_background(Rgb(0xff, 0xad, 0xad));
        assert!(view.take_changed());
        assert!(!view.take_changed());
    }
}
