use crate::ui::span::Span;
use unicode_width::UnicodeWidthChar;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        let mut line = Self::new();
        for span in spans {
            line.push(span);
        }
        line
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn push(&mut self, span: Span) {
        if !span.text.is_empty() {
            self.spans.push(span);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Cuts the line down to `width` display columns.
    pub fn clipped(&self, width: usize) -> Line {
        let mut line = Line::new();
        let mut used = 0;
        for span in &self.spans {
            if used >= width {
                break;
            }
            let span_width = span.width();
            if used + span_width <= width {
                line.push(span.clone());
                used += span_width;
                continue;
            }
            let mut text = String::new();
            for ch in span.text.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used + ch_width > width {
                    break;
                }
                used += ch_width;
                text.push(ch);
            }
            line.push(Span::styled(text, span.style));
            break;
        }
        line
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Frame {
    lines: Vec<Line>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::new());
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::style::Style;

    #[test]
    fn clipping_cuts_inside_a_span_and_keeps_style() {
        let bold = Style::new().bold();
        let line = Line::from_spans([Span::new("ab"), Span::styled("cdef", bold), Span::new("g")]);
        let clipped = line.clipped(4);
        assert_eq!(clipped.plain_text(), "abcd");
        assert_eq!(clipped.spans()[1].style, bold);
        assert_eq!(line.clipped(10), line);
    }

    #[test]
    fn clipping_respects_wide_chars() {
        let line = Line::from_spans([Span::new("日本語")]);
        assert_eq!(line.clipped(5).plain_text(), "日本");
        assert_eq!(line.clipped(5).width(), 4);
    }
}
