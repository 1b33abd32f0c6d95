use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use getufit_core::{FitnessPlan, Sender};

use crate::app::{App, ChatView, Toast, ToastKind, View};
use crate::form::Field;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Active view
            Constraint::Length(3), // Navigation bar
            Constraint::Length(1), // Status / toast line
        ])
        .split(f.size());

    draw_header(f, app, chunks[0]);
    match app.view {
        View::Onboarding => draw_onboarding(f, app, chunks[1]),
        View::Plan => draw_plan(f, app, chunks[1]),
        View::Chat => draw_chat(f, &app.chat, "Chat with Your Fitness Bot", chunks[1]),
        View::OwnBot => draw_chat(f, &app.own_bot, "Personal Chatbot", chunks[1]),
        View::Files => draw_files(f, app, chunks[1]),
    }
    draw_nav_bar(f, app, chunks[2]);
    draw_status_line(f, app, chunks[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let user = app
        .session
        .as_ref()
        .map(|s| format!("user: {}", s.user_id()))
        .unwrap_or_else(|| "not onboarded".to_string());

    let busy = match app.view {
        View::Plan if app.plan.loading => "  ◐ Loading...",
        View::Files if app.files.loading => "  ◐ Loading...",
        View::Chat if app.chat.flow.is_awaiting() => "  ◐ Typing...",
        View::OwnBot if app.own_bot.flow.is_awaiting() => "  ◐ Typing...",
        View::Onboarding if app.onboarding.submitting => "  ◐ Submitting...",
        _ => "",
    };

    let header_text = Line::from(vec![
        Span::styled(" 💪 ", Style::default()),
        Span::styled(
            "GetUFit",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        ),
        Span::styled("  |  ", Style::default().fg(Color::Gray)),
        Span::styled(user, Style::default().fg(Color::Green)),
        Span::styled(busy, Style::default().fg(Color::Yellow)),
    ]);

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Left);

    f.render_widget(header, area);
}

fn draw_onboarding(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.onboarding.form;
    let mut lines = vec![Line::from("")];

    for field in Field::ALL {
        let focused = form.focused() == field;
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let value = form.value(field);
        let value_span = if value.is_empty() {
            Span::styled(
                field.placeholder().to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::styled(value, Style::default().fg(Color::White))
        };

        let mut spans = vec![
            Span::raw("  "),
            Span::styled(format!("{:<20}", field.label()), label_style),
        ];
        if field.is_select() {
            spans.push(Span::styled("< ", Style::default().fg(Color::DarkGray)));
            spans.push(value_span);
            spans.push(Span::styled(" >", Style::default().fg(Color::DarkGray)));
        } else {
            spans.push(value_span);
            if focused && !app.onboarding.submitting {
                spans.push(Span::styled("▌", Style::default().fg(Color::Green)));
            }
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let submit = if app.onboarding.submitting {
        Span::styled(
            "  Submitting...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            "  [Enter] Submit",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    };
    lines.push(Line::from(submit));

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Fitness Onboarding")
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(paragraph, area);
}

fn draw_plan(f: &mut Frame, app: &App, area: Rect) {
    let lines = if app.plan.loading {
        vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        ))]
    } else {
        match &app.plan.plan {
            Some(plan) if !plan.activities.is_empty() => plan_lines(plan),
            _ => vec![Line::from(Span::styled(
                "No activities available. Please try again later.",
                Style::default().fg(Color::Gray),
            ))],
        }
    };

    let total = lines.len() as u16;
    let visible = area.height.saturating_sub(2);
    let scroll = app.plan.scroll.min(total.saturating_sub(visible));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Your Weekly Fitness Plan")
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

fn plan_lines(plan: &FitnessPlan) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for activity in &plan.activities {
        lines.push(Line::from(Span::styled(
            activity.day.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled("Focus: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(activity.focus.clone()),
        ]));

        if activity.exercises.is_empty() {
            lines.push(Line::from(Span::styled(
                "No exercises for this day.",
                Style::default().fg(Color::Gray),
            )));
        } else {
            for exercise in &activity.exercises {
                lines.push(Line::from(vec![
                    Span::raw("  • "),
                    Span::raw(exercise.summary()),
                ]));
                if let Some(ref notes) = exercise.notes {
                    lines.push(Line::from(Span::styled(
                        format!("    Notes: {}", notes),
                        Style::default().fg(Color::Gray),
                    )));
                }
            }
        }
        lines.push(Line::from(""));
    }

    if plan.has_recommendations() {
        lines.push(Line::from(Span::styled(
            "Additional Recommendations",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        if let Some(ref goal) = plan.fitness_goal {
            lines.push(Line::from(vec![
                Span::styled("Fitness Goal: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(goal.clone()),
            ]));
        }
        if let Some(ref nutrition) = plan.nutrition {
            lines.push(Line::from(vec![
                Span::styled("Nutrition: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(nutrition.clone()),
            ]));
        }
    }

    lines
}

fn draw_chat(f: &mut Frame, view: &ChatView, title: &str, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    if view.flow.messages().is_empty() {
        lines.push(Line::from(Span::styled(
            "Start the conversation by typing your query below.",
            Style::default().fg(Color::Gray),
        )));
    } else {
        for message in view.flow.messages() {
            let (prefix, style) = match message.sender {
                Sender::User => ("👤 ", Style::default().fg(Color::Cyan)),
                Sender::Bot => ("🤖 ", Style::default().fg(Color::Green)),
            };
            for (i, part) in message.text.split('\n').enumerate() {
                if i == 0 {
                    lines.push(Line::from(vec![
                        Span::styled(prefix, style),
                        Span::styled(part.to_string(), style),
                    ]));
                } else {
                    lines.push(Line::from(Span::styled(
                        format!("   {}", part),
                        style,
                    )));
                }
            }
            let timestamp = message
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S");
            lines.push(Line::from(Span::styled(
                format!("   └─ {} ", timestamp),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    }
    if view.flow.is_awaiting() {
        lines.push(Line::from(Span::styled(
            "Typing...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    // Stick to the bottom, then apply the user's backwards scroll.
    let total = lines.len() as u16;
    let visible = chunks[0].height.saturating_sub(2);
    let bottom = total.saturating_sub(visible);
    let scroll = bottom.saturating_sub(view.scroll);

    let messages = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(messages, chunks[0]);

    let input_text = if view.input.is_empty() && !view.flow.is_awaiting() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Green)),
            Span::styled(
                "Type your message...",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ])
    } else if view.flow.is_awaiting() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::styled(
                "Sending...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Green)),
            Span::styled(view.input.clone(), Style::default().fg(Color::White)),
            Span::styled("▌", Style::default().fg(Color::Green)),
        ])
    };

    let input = Paragraph::new(input_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Input")
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(input, chunks[1]);
}

fn draw_files(f: &mut Frame, app: &App, area: Rect) {
    let lines = if app.files.loading {
        vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        ))]
    } else if let Some(ref url) = app.files.file_url {
        vec![
            Line::from(Span::styled(
                "Your chat history is ready:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                url.clone(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            )),
        ]
    } else {
        vec![Line::from(Span::styled(
            "No file available. Please try again later.",
            Style::default().fg(Color::Gray),
        ))]
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Files")
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn draw_nav_bar(f: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        (View::Chat, "Chat", "^T"),
        (View::Plan, "Activities", "^P"),
        (View::Files, "Files", "^F"),
        (View::OwnBot, "own Bot", "^B"),
        (View::Onboarding, "Onboarding", "^O"),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (view, label, key) in tabs {
        let style = if app.view == view {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("{} {}", key, label), style));
        spans.push(Span::raw("   "));
    }

    let nav = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Center);
    f.render_widget(nav, area);
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let paragraph = match app.toasts.back() {
        Some(toast) => toast_line(toast),
        None => {
            let help = match app.view {
                View::Onboarding => "[Tab/↓] Next field  [↑] Previous  [←/→] Cycle option  [Enter] Submit  [Ctrl+C] Quit",
                View::Chat | View::OwnBot => "[Enter] Send  [↑/↓] Scroll  [Ctrl+L] Clear  [Ctrl+C] Quit",
                _ => "[↑/↓] Scroll  [Ctrl+C] Quit",
            };
            Paragraph::new(format!(" {}", help))
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::REVERSED))
        }
    };
    f.render_widget(paragraph.alignment(Alignment::Center), area);
}

fn toast_line(toast: &Toast) -> Paragraph<'static> {
    let (symbol, color) = match toast.kind {
        ToastKind::Success => ("✅", Color::Green),
        ToastKind::Error => ("❌", Color::Red),
        ToastKind::Warning => ("⚠️", Color::Yellow),
    };
    Paragraph::new(format!(" {} {}", symbol, toast.text))
        .style(Style::default().fg(color).add_modifier(Modifier::REVERSED))
}
