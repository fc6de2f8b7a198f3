//! Result presenter.
//!
//! Pure rendering of the latest prediction: risk treatment, percentage,
//! message and the static advice list for the category.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{PredictionResult, RiskCategory};
use crate::tui::styles::MedicalTheme;

/// Render the result panel, or the idle placeholder when there is none.
pub fn render_result(
    f: &mut Frame,
    area: Rect,
    result: Option<&PredictionResult>,
    auto_update: bool,
) {
    match result {
        Some(result) => render_prediction(f, area, result, auto_update),
        None => render_idle(f, area),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No assessment yet",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the form and press Enter",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Risk Assessment ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_prediction(f: &mut Frame, area: Rect, result: &PredictionResult, auto_update: bool) {
    let risk_style = MedicalTheme::risk(result.risk);

    let mut block = Block::default()
        .title(Span::styled(" Risk Assessment ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(risk_style);
    if auto_update {
        block = block.title(
            Line::from(Span::styled(" ⟳ auto-updating ", MedicalTheme::text_muted()))
                .alignment(Alignment::Right),
        );
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Category
            Constraint::Length(3), // Percentage
            Constraint::Length(4), // Headline + message
            Constraint::Min(0),    // Advice
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(inner);

    let icon = match result.risk {
        RiskCategory::Low => "●",
        RiskCategory::High => "▲",
    };
    let category = Paragraph::new(Line::from(Span::styled(
        format!("{icon} {}", result.risk),
        risk_style.add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(category, chunks[0]);

    let percentage = result.percentage();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Risk Level ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(risk_style)
        .percent(u16::from(percentage))
        .label(format!("{percentage}%"));
    f.render_widget(gauge, chunks[1]);

    let message = Paragraph::new(vec![
        Line::from(Span::styled(
            result.risk.headline(),
            risk_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(result.message.as_str(), MedicalTheme::text())),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[2]);

    let mut advice = vec![Line::from(Span::styled(
        result.risk.advice_title(),
        MedicalTheme::title(),
    ))];
    advice.extend(result.risk.advice().iter().map(|item| {
        Line::from(vec![
            Span::styled(" • ", MedicalTheme::info()),
            Span::styled(*item, MedicalTheme::text_secondary()),
        ])
    }));
    f.render_widget(Paragraph::new(advice).wrap(Wrap { trim: false }), chunks[3]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[N] ", MedicalTheme::key_hint()),
        Span::styled("Start new assessment", MedicalTheme::key_desc()),
        Span::styled(
            format!("   updated {}", result.received_at.format("%H:%M:%S UTC")),
            MedicalTheme::text_muted(),
        ),
    ]));
    f.render_widget(footer, chunks[4]);
}
