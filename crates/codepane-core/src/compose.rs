//! Render composition: highlighter styling first, decoration layers on top.
//!
//! Composition splits the text at every span and decoration boundary and layers attributes in a
//! fixed order (base styling, then lint underlines, then the jump flash). Overlays only *add*
//! attributes: an underline sets `underline`/`underline_color`, a flash sets `background`;
//! foreground, weight and slant chosen by the highlighter always survive.

use crate::decorations::{Decoration, DecorationKind, DecorationLayers};
use crate::lint::LintSeverity;
use crate::style::{StyleAttributes, StyledSpan, StyledText, Theme, UnderlineStyle};

/// Compose `styled` with every layer in `layers`.
pub fn compose(styled: &StyledText, layers: &DecorationLayers, theme: &Theme) -> Vec<StyledSpan> {
    let decorations: Vec<&Decoration> = layers
        .iter()
        .flat_map(|(_, decorations)| decorations.iter())
        .filter(|d| d.range.start < d.range.end)
        .collect();

    if decorations.is_empty() {
        return styled.spans().to_vec();
    }

    let mut boundaries: Vec<usize> = styled
        .spans()
        .iter()
        .flat_map(|span| [span.range.start, span.range.end])
        .chain(
            decorations
                .iter()
                .flat_map(|d| [d.range.start, d.range.end])
                .filter(|&offset| offset <= styled.len()),
        )
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut out: Vec<StyledSpan> = Vec::with_capacity(boundaries.len());
    for window in boundaries.windows(2) {
        let (start, end) = (window[0], window[1]);
        let Some(mut style) = styled.style_at(start) else {
            continue;
        };
        // `decorations` is already in layer order, so later layers paint over earlier ones.
        for decoration in &decorations {
            if decoration.range.start <= start && end <= decoration.range.end {
                overlay(&mut style, decoration.kind, theme);
            }
        }
        match out.last_mut() {
            Some(last) if last.range.end == start && last.style == style => last.range.end = end,
            _ => out.push(StyledSpan::new(start..end, style)),
        }
    }
    out
}

fn overlay(style: &mut StyleAttributes, kind: DecorationKind, theme: &Theme) {
    match kind {
        DecorationKind::Underline(severity) => {
            style.underline = Some(UnderlineStyle::Squiggle);
            style.underline_color = Some(match severity {
                LintSeverity::Error => theme.lint_error,
                LintSeverity::Warning => theme.lint_warning,
            });
        }
        DecorationKind::Flash => {
            style.background = Some(theme.flash_background);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorations::DecorationLayerId;
    use crate::style::{Color, TokenKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_decorations_returns_base() {
        let theme = Theme::light();
        let styled = StyledText::from_tokens(4, [(0..2, TokenKind::Keyword)], &theme);
        assert_eq!(compose(&styled, &DecorationLayers::new(), &theme), styled.spans());
    }

    #[test]
    fn test_underline_keeps_highlight_attributes() {
        let theme = Theme::light();
        let keyword = theme.style_for(TokenKind::Keyword);
        let styled = StyledText::from_tokens(6, [(0..3, TokenKind::Keyword)], &theme);

        let mut layers = DecorationLayers::new();
        layers.replace(
            DecorationLayerId::LINT,
            vec![Decoration::underline(2..5, LintSeverity::Error, None)],
        );
        let spans = compose(&styled, &layers, &theme);

        let underlined_keyword = StyleAttributes {
            underline: Some(UnderlineStyle::Squiggle),
            underline_color: Some(theme.lint_error),
            ..keyword
        };
        let underlined_plain = StyleAttributes {
            underline: Some(UnderlineStyle::Squiggle),
            underline_color: Some(theme.lint_error),
            ..theme.plain
        };
        assert_eq!(
            spans,
            vec![
                StyledSpan::new(0..2, keyword),
                StyledSpan::new(2..3, underlined_keyword),
                StyledSpan::new(3..5, underlined_plain),
                StyledSpan::new(5..6, theme.plain),
            ]
        );
        assert_eq!(spans[1].style.foreground, keyword.foreground);
        assert!(spans[1].style.bold);
    }

    #[test]
    fn test_flash_layers_over_lint() {
        let theme = Theme::dark();
        let styled = StyledText::uniform(3, theme.plain);
        let mut layers = DecorationLayers::new();
        layers.replace(DecorationLayerId::FLASH, vec![Decoration::flash(0..3)]);
        layers.replace(
            DecorationLayerId::LINT,
            vec![Decoration::underline(1..2, LintSeverity::Warning, None)],
        );

        let spans = compose(&styled, &layers, &theme);
        assert_eq!(spans.len(), 3);
        assert!(spans.iter().all(|s| s.style.background == Some(theme.flash_background)));
        assert_eq!(spans[1].style.underline_color, Some(theme.lint_warning));
        assert_eq!(spans[0].style.underline, None);
    }

    #[test]
    fn test_decorations_past_end_are_ignored() {
        let theme = Theme::light();
        let styled = StyledText::uniform(2, StyleAttributes::fg(Color::rgb(1, 2, 3)));
        let mut layers = DecorationLayers::new();
        layers.replace(DecorationLayerId::FLASH, vec![Decoration::flash(1..10)]);
        let spans = compose(&styled, &layers, &theme);
        assert_eq!(spans.last().unwrap().range.end, 2);
    }
}
