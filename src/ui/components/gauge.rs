use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Block, Widget},
};

/// Playback timeline: a played portion with sub-cell precision and a centred
/// elapsed/total label.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TimelineGauge<'a> {
    block: Option<Block<'a>>,
    ratio: f64,
    label: Option<Span<'a>>,
    played_style: Style,
    remaining_style: Style,
}

impl<'a> TimelineGauge<'a> {
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Out-of-range ratios are clamped rather than rejected; the clip length
    /// can be unknown for a moment while a new track loads.
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn label<T>(mut self, label: T) -> Self
    where
        T: Into<Span<'a>>,
    {
        self.label = Some(label.into());
        self
    }

    pub fn played_style<S: Into<Style>>(mut self, style: S) -> Self {
        self.played_style = style.into();
        self
    }

    pub fn remaining_style<S: Into<Style>>(mut self, style: S) -> Self {
        self.remaining_style = style.into();
        self
    }

    /// Area the bar itself occupies inside `area`, i.e. the click target.
    pub fn bar_area(&self, area: Rect) -> Rect {
        self.block.as_ref().map_or(area, |b| b.inner(area))
    }
}

fn partial_block(frac: f64) -> &'static str {
    match (frac * 8.0).round() as u16 {
        0 => " ",
        1 => symbols::block::ONE_EIGHTH,
        2 => symbols::block::ONE_QUARTER,
        3 => symbols::block::THREE_EIGHTHS,
        4 => symbols::block::HALF,
        5 => symbols::block::FIVE_EIGHTHS,
        6 => symbols::block::THREE_QUARTERS,
        7 => symbols::block::SEVEN_EIGHTHS,
        _ => symbols::block::FULL,
    }
}

impl Widget for TimelineGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(ref block) = self.block {
            block.render(area, buf);
        }

        let bar = self.bar_area(area);
        if bar.is_empty() {
            return;
        }

        let played_pos = f64::from(bar.width) * self.ratio;
        let label = self.label.unwrap_or_default();
        let label_width = (label.width() as u16).min(bar.width);
        let label_col = bar.left() + (bar.width - label_width) / 2;
        let label_row = bar.top() + bar.height / 2;

        for y in bar.top()..bar.bottom() {
            for x in bar.left()..bar.right() {
                let pos = f64::from(x - bar.left());
                let (symbol, style) = if pos + 1.0 <= played_pos {
                    (symbols::block::FULL, self.played_style)
                } else if pos < played_pos {
                    (partial_block(played_pos - pos), self.played_style)
                } else {
                    (" ", self.remaining_style)
                };

                let (symbol, style) =
                    if y == label_row && x >= label_col && x < label_col + label_width {
                        (" ", style.bg(style.fg.unwrap_or_default()))
                    } else {
                        (symbol, style)
                    };

                buf[(x, y)]
                    .set_symbol(symbol)
                    .set_fg(style.fg.unwrap_or_default())
                    .set_bg(style.bg.unwrap_or_default());
            }
        }

        buf.set_span(label_col, label_row, &label, label_width);
    }
}
