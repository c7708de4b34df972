//! Rendering for all application modes.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::error::Field;
use crate::tui::app::{App, AppMode};
use crate::wizard::edit::EditWalletForm;
use crate::wizard::{WalletWizard, WizardStep};

const ACCENT: Color = Color::Cyan;
const ERROR: Color = Color::Red;
const DIM: Color = Color::DarkGray;

pub fn draw(frame: &mut Frame, app: &App) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    draw_header(frame, app, header);
    match app.mode {
        AppMode::Wallets => draw_wallets(frame, app, body),
        AppMode::Onboarding => {
            if let Some(wizard) = &app.wizard {
                draw_wizard(frame, app, wizard, body);
            }
        }
        AppMode::Edit => {
            if let Some(form) = &app.edit {
                draw_edit(frame, app, form, body);
            }
        }
    }
    draw_footer(frame, app, footer);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let network = app.networks.get_current();
    let title = Line::from(vec![
        Span::styled(
            " vaultry ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "· {} wallet(s) · network: {} (chain {})",
            app.wallets.len(),
            network.name,
            network.chain_id
        )),
    ]);
    let block = Block::default().borders(Borders::BOTTOM);
    frame.render_widget(Paragraph::new(title).block(block), area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(status) = &app.status {
        Line::from(Span::styled(status.clone(), Style::default().fg(ACCENT)))
    } else {
        let hints = match app.mode {
            AppMode::Wallets => {
                "n: new wallet · e: edit · d: delete · Enter: set current · Tab: network · q: quit"
            }
            AppMode::Onboarding => "Tab: next field · Enter: confirm · Esc: cancel",
            AppMode::Edit => "Tab: next field · Enter: save · Esc: cancel",
        };
        Line::from(Span::styled(hints, Style::default().fg(DIM)))
    };
    frame.render_widget(Paragraph::new(text), area);
}

fn draw_wallets(frame: &mut Frame, app: &App, area: Rect) {
    if app.wallets.is_empty() {
        let empty = Paragraph::new("No wallets yet. Press 'n' to add an HD wallet.")
            .style(Style::default().fg(DIM))
            .block(Block::default().borders(Borders::ALL).title(" Wallets "));
        frame.render_widget(empty, area);
        return;
    }

    let current_name = app.wallets.current().map(|w| w.name.clone());
    let rows: Vec<Row> = app
        .wallets
        .all()
        .iter()
        .enumerate()
        .map(|(i, wallet)| {
            let marker = if Some(&wallet.name) == current_name.as_ref() {
                "●"
            } else {
                " "
            };
            let style = if i == app.selected_row {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(wallet.name.clone()),
                Cell::from(wallet.derivation_path.clone()),
                Cell::from(wallet.count.to_string()),
                Cell::from(wallet.address.truncated()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(12),
            Constraint::Min(16),
            Constraint::Length(6),
            Constraint::Min(14),
        ],
    )
    .header(
        Row::new(vec!["", "Name", "Derivation Path", "Count", "Address"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Wallets "));

    frame.render_widget(table, area);
}

fn draw_wizard(frame: &mut Frame, app: &App, wizard: &WalletWizard, area: Rect) {
    let step = wizard.step();
    let block = Block::default().borders(Borders::ALL).title(format!(
        " Add HD Wallet — Step {}/{}: {} ",
        step.number(),
        WizardStep::total(),
        step.title()
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [subtitle_area, form_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(4)]).areas(inner);
    frame.render_widget(
        Paragraph::new(step.subtitle()).style(Style::default().fg(DIM)),
        subtitle_area,
    );

    let mut lines: Vec<Line> = Vec::new();
    match step {
        WizardStep::Mnemonic => {
            push_field(
                &mut lines,
                "Name",
                wizard.name(),
                app.focus == 0,
                false,
                form_area.width,
            );
            push_error(&mut lines, wizard.error(Field::Name));
            push_field(
                &mut lines,
                "Mnemonic",
                wizard.mnemonic(),
                app.focus == 1,
                false,
                form_area.width,
            );
            push_error(&mut lines, wizard.error(Field::Mnemonic));
        }
        WizardStep::Password => {
            push_field(
                &mut lines,
                "Password",
                wizard.password(),
                app.focus == 0,
                true,
                form_area.width,
            );
            push_error(&mut lines, wizard.error(Field::Password));
            push_field(
                &mut lines,
                "Confirmation",
                wizard.confirmation(),
                app.focus == 1,
                true,
                form_area.width,
            );
            push_error(&mut lines, wizard.error(Field::Confirmation));
        }
        WizardStep::Review => {
            push_field(
                &mut lines,
                "Derivation Path",
                wizard.derivation_path(),
                app.focus == 0,
                false,
                form_area.width,
            );
            push_error(&mut lines, wizard.error(Field::DerivationPath));
            push_error(&mut lines, wizard.error(Field::Selection));
            lines.push(Line::default());

            if wizard.addresses().is_empty() {
                lines.push(Line::from(Span::styled(
                    "Deriving addresses…",
                    Style::default().fg(DIM),
                )));
            }
            for (i, entry) in wizard.addresses().iter().enumerate() {
                let picked = wizard.selected() == Some(entry.index.as_str());
                let cursor = app.focus == 1 && i == app.review_cursor;
                let mut style = Style::default();
                if cursor {
                    style = style.fg(ACCENT).add_modifier(Modifier::BOLD);
                }
                let marker = if picked { "●" } else { " " };
                lines.push(Line::from(Span::styled(
                    format!(" {marker} #{:<3} {}", entry.index, entry.address),
                    style,
                )));
            }
            if wizard.submitted() {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "Creating wallet…",
                    Style::default().fg(ACCENT),
                )));
            }
        }
    }

    if let Some(status) = wizard.status() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(ERROR),
        )));
    }

    frame.render_widget(Paragraph::new(lines), form_area);
}

fn draw_edit(frame: &mut Frame, app: &App, form: &EditWalletForm, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Edit Wallet — {} ", form.original_name()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    push_field(
        &mut lines,
        "Name",
        form.name(),
        app.focus == 0,
        false,
        inner.width,
    );
    push_error(&mut lines, form.error(Field::Name));
    push_field(
        &mut lines,
        "Derivation Path",
        form.derivation_path(),
        app.focus == 1,
        false,
        inner.width,
    );
    push_error(&mut lines, form.error(Field::DerivationPath));
    push_field(
        &mut lines,
        "Address Count",
        form.count_input(),
        app.focus == 2,
        false,
        inner.width,
    );
    push_error(&mut lines, form.error(Field::Count));

    if form.pending() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Saving…",
            Style::default().fg(ACCENT),
        )));
    }
    if let Some(status) = form.status() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(ERROR),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn push_field(
    lines: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    focused: bool,
    masked: bool,
    width: u16,
) {
    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    // Leave room for the label, separator, and cursor.
    let budget = (width as usize).saturating_sub(label.len() + 6).max(8);
    let mut shown = fit_tail(&shown, budget);
    if focused {
        shown.push('█');
    }

    let label_style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{label}: "), label_style),
        Span::raw(shown),
    ]));
}

fn push_error(lines: &mut Vec<Line<'static>>, error: Option<&str>) {
    if let Some(message) = error {
        lines.push(Line::from(Span::styled(
            format!("  ✗ {message}"),
            Style::default().fg(ERROR),
        )));
    }
}

/// Keep the tail of `value` within `max` display columns so the cursor end
/// of a long input stays visible while typing.
fn fit_tail(value: &str, max: usize) -> String {
    if value.width() <= max {
        return value.to_string();
    }
    let mut tail = String::new();
    for c in value.chars().rev() {
        let candidate: String = format!("{c}{tail}");
        if candidate.width() > max.saturating_sub(1) {
            break;
        }
        tail = candidate;
    }
    format!("…{tail}")
}
