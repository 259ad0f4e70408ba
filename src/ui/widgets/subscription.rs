//! Subscription page widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::state::{Store, SubscriptionFocus, Wallet};
use crate::ui::Theme;

/// Plan picker, wallet picker and pay button.
pub struct SubscriptionPage;

impl SubscriptionPage {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
        let state = &store.subscription;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(state.plans.len() as u16 * 2 + 2),
                Constraint::Length(Wallet::ALL.len() as u16 + 2),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let focus_border = |focus: SubscriptionFocus| {
            if state.focus == focus {
                Style::default().fg(theme.primary)
            } else {
                Style::default().fg(theme.border)
            }
        };

        // Plans
        let plan_items: Vec<ListItem> = state
            .plans
            .iter()
            .map(|plan| {
                let mut title = vec![
                    Span::styled(plan.name, Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!("  {} USDT", plan.price)),
                ];
                if let Some(badge) = plan.badge {
                    title.push(Span::styled(
                        format!("  {badge}"),
                        Style::default().fg(theme.success),
                    ));
                }
                if plan.popular {
                    title.push(Span::styled(
                        "  ★ Popular",
                        Style::default().fg(theme.warning),
                    ));
                }
                ListItem::new(vec![
                    Line::from(title),
                    Line::from(Span::styled(
                        format!("  {} days of alerts", plan.duration_days),
                        Style::default().fg(theme.muted),
                    )),
                ])
            })
            .collect();

        let plans = List::new(plan_items)
            .block(
                Block::default()
                    .title(" Choose a plan ")
                    .borders(Borders::ALL)
                    .border_style(focus_border(SubscriptionFocus::Plans)),
            )
            .highlight_style(Style::default().fg(theme.primary))
            .highlight_symbol("● ");
        let mut plan_state = ListState::default();
        plan_state.select(Some(state.selected_plan));
        frame.render_stateful_widget(plans, chunks[0], &mut plan_state);

        // Wallets
        let wallet_items: Vec<ListItem> = Wallet::ALL
            .iter()
            .enumerate()
            .map(|(i, wallet)| {
                let chosen = state.selected_wallet == Some(*wallet);
                let marker = if chosen { "◉" } else { "○" };
                let cursor = state.focus == SubscriptionFocus::Wallets && state.wallet_cursor == i;
                let style = if cursor {
                    Style::default()
                        .fg(theme.primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(
                    format!(" {marker} {}", wallet.name()),
                    style,
                )))
            })
            .collect();

        let wallets = List::new(wallet_items).block(
            Block::default()
                .title(" Pay with ")
                .borders(Borders::ALL)
                .border_style(focus_border(SubscriptionFocus::Wallets)),
        );
        frame.render_widget(wallets, chunks[1]);

        // Pay button
        let label = match (state.paying, state.plan()) {
            (true, _) => "Processing...".to_string(),
            (false, Some(plan)) => format!("Pay {} USDT  (p)", plan.price),
            (false, None) => "Pay".to_string(),
        };
        let button_style = if state.can_pay() {
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        let button = Paragraph::new(Line::from(Span::styled(label, button_style)))
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(button_style),
            );
        frame.render_widget(button, chunks[2]);

        if state.selected_wallet.is_none() && !state.paying {
            let hint = Paragraph::new(Span::styled(
                " Select a wallet to continue",
                Style::default().fg(theme.muted),
            ));
            frame.render_widget(hint, chunks[3]);
        }
    }
}
