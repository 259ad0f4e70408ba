//! Strategy list widget.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::format::{format_number_en, print_float};
use crate::state::Store;
use crate::strategy::{Strategy, StrategyKind};
use crate::ui::Theme;

/// Strategies grouped by type.
pub struct StrategyList;

impl StrategyList {
    /// Render the strategy list.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
        let state = &store.strategies;
        let block = Block::default()
            .title(format!(" Strategies ({}) ", state.strategies.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border));

        if state.strategies.is_empty() {
            let message = if state.loading {
                "Loading strategies..."
            } else {
                "No strategies yet. Press a to add one."
            };
            let empty = Paragraph::new(Span::styled(message, Style::default().fg(theme.muted)))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header_cells = ["Symbol", "Period", "Conditions"].iter().map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::BOLD),
            )
        });
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        // Group headings take rows too, so track where the selection lands
        let mut rows = Vec::new();
        let mut selected_row = None;
        let mut position = 0;
        for (strategy_type, items) in state.grouped() {
            rows.push(
                Row::new(vec![Cell::from(Span::styled(
                    strategy_type.label(),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))])
                .height(1),
            );
            for strategy in items {
                if state.selected_index == Some(position) {
                    selected_row = Some(rows.len());
                }
                rows.push(strategy_row(strategy, theme));
                position += 1;
            }
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(8),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut table_state = TableState::default();
        table_state.select(selected_row);

        frame.render_stateful_widget(table, area, &mut table_state);

        if state.loading {
            render_loading(frame, area, theme);
        }
    }
}

fn strategy_row<'a>(strategy: &'a Strategy, theme: &Theme) -> Row<'a> {
    let symbol_style = if strategy.is_wildcard() {
        Style::default().fg(theme.warning)
    } else {
        Style::default()
    };
    let period = strategy
        .kind
        .period()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        Cell::from(format!("  {}", strategy.display_symbol())).style(symbol_style),
        Cell::from(period),
        Cell::from(conditions(&strategy.kind)),
    ])
    .height(1)
}

/// One-line summary of a strategy's trigger conditions.
pub fn conditions(kind: &StrategyKind) -> String {
    match kind {
        StrategyKind::VolatilitySpike { params, .. } => format!(
            "Vol ≥ {}  Turnover ≥ {}  Amplitude ≥ {}x",
            format_number_en(params.volume),
            format_number_en(params.turnover),
            params.amplitude_multiple
        ),
        StrategyKind::ConsecutiveMove { params, .. } => format!(
            "{} candles in a row  Turnover ≥ {}",
            params.count,
            format_number_en(params.turnover)
        ),
        StrategyKind::FundingRate { params } => {
            format!("Funding ≥ {}%", print_float(params.funding_rate * 100.0, 4))
        }
    }
}

fn render_loading(frame: &mut Frame, area: Rect, theme: &Theme) {
    let loading = Line::from(vec![Span::styled(
        "Loading...",
        Style::default()
            .fg(theme.warning)
            .add_modifier(Modifier::ITALIC),
    )]);

    if area.width < 17 || area.height < 3 {
        return;
    }
    let loading_area = Rect {
        x: area.x + area.width - 16,
        y: area.y + area.height - 2,
        width: 15,
        height: 1,
    };

    frame.render_widget(Paragraph::new(loading), loading_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{
        ConsecutiveMoveParams, FundingRateParams, Period, VolatilitySpikeParams,
    };

    #[test]
    fn test_conditions_text() {
        let spike = StrategyKind::VolatilitySpike {
            period: Period::FiveMinutes,
            params: VolatilitySpikeParams {
                volume: 1_000_000.0,
                turnover: 50_000_000.0,
                amplitude_multiple: 2.5,
            },
        };
        assert_eq!(
            conditions(&spike),
            "Vol ≥ 1M  Turnover ≥ 50M  Amplitude ≥ 2.5x"
        );

        let moves = StrategyKind::ConsecutiveMove {
            period: Period::OneHour,
            params: ConsecutiveMoveParams {
                count: 4,
                turnover: 1_500.0,
            },
        };
        assert_eq!(conditions(&moves), "4 candles in a row  Turnover ≥ 1.50K");

        let funding = StrategyKind::FundingRate {
            params: FundingRateParams {
                funding_rate: 0.0125,
            },
        };
        assert_eq!(conditions(&funding), "Funding ≥ 1.25%");
    }
}
