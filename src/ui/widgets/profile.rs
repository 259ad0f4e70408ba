//! Profile page widget.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

use crate::config::TelegramConfig;
use crate::format::{capitalize_first_letter, cut_tx_id};
use crate::state::{Invoice, Store, UserProfile};
use crate::ui::Theme;

/// Account details, alert binding and invoice history.
pub struct ProfilePage;

impl ProfilePage {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        store: &Store,
        telegram: &TelegramConfig,
        theme: &Theme,
    ) {
        let Some(user) = store.user() else {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Not signed in",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Open PerpX from Telegram to sign in",
                    Style::default().fg(theme.muted),
                )),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border)),
            );
            frame.render_widget(message, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(4)])
            .split(area);

        render_account(frame, chunks[0], store, user, telegram, theme);
        render_invoices(frame, chunks[1], store, theme);
    }
}

fn render_account(
    frame: &mut Frame,
    area: Rect,
    store: &Store,
    user: &UserProfile,
    telegram: &TelegramConfig,
    theme: &Theme,
) {
    let label = |text: &'static str| Span::styled(format!("{text:<14}"), Style::default().fg(theme.muted));

    let email = match &store.profile.email_draft {
        Some(draft) => Span::styled(
            format!("{draft}█"),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::UNDERLINED),
        ),
        None if user.email.is_empty() => {
            Span::styled("Not set (e to edit)", Style::default().fg(theme.muted))
        }
        None => Span::raw(user.email.clone()),
    };

    let subscription = match user.days_remaining(Utc::now()) {
        Some(days) if user.is_subscribed() && days > 0 => Span::styled(
            format!("{days} days remaining  ({} strategies)", user.max_strategies),
            Style::default().fg(theme.success),
        ),
        Some(_) if user.is_subscribed() => {
            Span::styled("Expired", Style::default().fg(theme.error))
        }
        _ => Span::styled("No subscription", Style::default().fg(theme.warning)),
    };

    let bind = match user.bind_info() {
        Some(info) => Span::raw(info),
        None => Span::styled("Not bound", Style::default().fg(theme.muted)),
    };

    let lines = vec![
        Line::from(vec![
            label("Name"),
            Span::styled(
                user.display_name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  #{}", user.telegram_id),
                Style::default().fg(theme.muted),
            ),
        ]),
        Line::from(vec![label("Email"), email]),
        Line::from(vec![label("Subscription"), subscription]),
        Line::from(vec![label("Alerts to"), bind]),
        Line::from(vec![
            label("Bind chat"),
            Span::styled(
                telegram.bot_link("bind_user"),
                Style::default().fg(theme.accent),
            ),
        ]),
        Line::from(vec![
            label("Bind group"),
            Span::styled(
                telegram.bot_link("bind_group"),
                Style::default().fg(theme.accent),
            ),
        ]),
    ];

    let account = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Account ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(account, area);
}

fn render_invoices(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
    let profile = &store.profile;

    let header_cells = ["Paid at", "Amount", "Status", "Transaction"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = profile
        .invoices
        .iter()
        .map(|invoice| invoice_row(invoice, theme));

    let title = format!(
        " Payment history (page {}{}) ",
        profile.page,
        if profile.loading { ", loading" } else { "" }
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Min(19),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(profile.selected_invoice);
    frame.render_stateful_widget(table, area, &mut state);

    if profile.invoices.is_empty() && !profile.loading && area.height > 4 {
        let empty_area = Rect {
            x: area.x + 1,
            y: area.y + 3,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        let empty = Paragraph::new(Span::styled(
            "No payments yet",
            Style::default().fg(theme.muted),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(empty, empty_area);
    }

    // Explorer link of the selected invoice under the table
    let selected = profile
        .selected_invoice
        .and_then(|i| profile.invoices.get(i))
        .and_then(Invoice::explorer_url);
    if let Some(url) = selected
        && area.height > 2
    {
        let link_area = Rect {
            x: area.x + 2,
            y: area.y + area.height - 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(url, Style::default().fg(theme.accent))),
            link_area,
        );
    }
}

fn invoice_row(invoice: &Invoice, theme: &Theme) -> Row<'static> {
    let status_style = match invoice.status.to_ascii_lowercase().as_str() {
        "paid" | "completed" => Style::default().fg(theme.success),
        "pending" => Style::default().fg(theme.warning),
        _ => Style::default().fg(theme.error),
    };
    let paid_at = invoice
        .paid_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        Cell::from(paid_at),
        Cell::from(format!(
            "{:.2} {}",
            invoice.amount.round_dp(2),
            invoice.currency
        )),
        Cell::from(capitalize_first_letter(&invoice.status)).style(status_style),
        Cell::from(cut_tx_id(&invoice.tx_hash)),
    ])
    .height(1)
}
