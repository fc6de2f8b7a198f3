//! Health form input widgets.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{validate, Choice, FormField, HealthFormData, ValidationErrors};
use crate::tui::styles::MedicalTheme;

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Whole number typed as digits
    Integer,
    /// Digits with at most one `.`
    Decimal,
    /// Yes/no
    Toggle,
    /// Cycles through a fixed list, including "not selected"
    Select,
}

impl InputKind {
    #[must_use]
    pub fn of(field: FormField) -> Self {
        match field {
            FormField::Age
            | FormField::RestingBp
            | FormField::Cholesterol
            | FormField::MaxHeartRate => Self::Integer,
            FormField::StDepression => Self::Decimal,
            FormField::FastingBs | FormField::ExerciseAngina => Self::Toggle,
            FormField::Sex
            | FormField::ChestPainType
            | FormField::RestingEcg
            | FormField::Slope
            | FormField::MajorVessels
            | FormField::Thalassemia => Self::Select,
        }
    }

    fn max_len(self) -> usize {
        match self {
            Self::Integer => 3,
            Self::Decimal => 4,
            Self::Toggle | Self::Select => 0,
        }
    }
}

/// Health form state: text buffers, selections and inline errors.
pub struct HealthFormState {
    /// Selections and toggles; numeric fields are read from `buffers`.
    data: HealthFormData,
    /// Raw text for numeric fields, indexed by position in `FormField::ALL`
    buffers: [String; 13],
    pub selected_field: usize,
    pub invalid: ValidationErrors,
}

impl Default for HealthFormState {
    fn default() -> Self {
        Self {
            data: HealthFormData::default(),
            buffers: Default::default(),
            selected_field: 0,
            invalid: ValidationErrors::default(),
        }
    }
}

impl HealthFormState {
    #[must_use]
    pub fn selected(&self) -> FormField {
        FormField::ALL[self.selected_field]
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % FormField::ALL.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = FormField::ALL.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Type a character into the current field.
    ///
    /// Space toggles or cycles non-text fields. Returns `true` if the value
    /// changed.
    pub fn input_char(&mut self, c: char) -> bool {
        let field = self.selected();
        let kind = InputKind::of(field);

        let changed = match kind {
            InputKind::Integer | InputKind::Decimal => {
                let buffer = &mut self.buffers[self.selected_field];
                let accepted = c.is_ascii_digit()
                    || (kind == InputKind::Decimal && c == '.' && !buffer.contains('.'));
                if accepted && buffer.len() < kind.max_len() {
                    buffer.push(c);
                    true
                } else {
                    false
                }
            }
            InputKind::Toggle | InputKind::Select if c == ' ' => return self.cycle(true),
            InputKind::Toggle | InputKind::Select => false,
        };

        if changed {
            self.invalid.clear_field(field);
        }
        changed
    }

    /// Delete the last character
    pub fn delete_char(&mut self) -> bool {
        let field = self.selected();
        let changed = self.buffers[self.selected_field].pop().is_some();
        if changed {
            self.invalid.clear_field(field);
        }
        changed
    }

    /// Clear the current field back to its unset value
    pub fn clear_field(&mut self) -> bool {
        let field = self.selected();
        let before = self.to_form_data();

        self.buffers[self.selected_field].zeroize();
        match field {
            FormField::Sex => self.data.sex = None,
            FormField::ChestPainType => self.data.chest_pain_type = None,
            FormField::FastingBs => self.data.fasting_bs = false,
            FormField::RestingEcg => self.data.resting_ecg = None,
            FormField::ExerciseAngina => self.data.exercise_angina = false,
            FormField::Slope => self.data.slope = None,
            FormField::MajorVessels => self.data.major_vessels = None,
            FormField::Thalassemia => self.data.thalassemia = None,
            _ => {}
        }

        let changed = before != self.to_form_data();
        if changed {
            self.invalid.clear_field(field);
        }
        changed
    }

    /// Step a toggle or selection forwards or backwards.
    pub fn cycle(&mut self, forward: bool) -> bool {
        let field = self.selected();
        let data = &mut self.data;

        match field {
            FormField::Sex => data.sex = cycle_choice(data.sex, forward),
            FormField::ChestPainType => {
                data.chest_pain_type = cycle_choice(data.chest_pain_type, forward);
            }
            FormField::RestingEcg => data.resting_ecg = cycle_choice(data.resting_ecg, forward),
            FormField::Slope => data.slope = cycle_choice(data.slope, forward),
            FormField::Thalassemia => data.thalassemia = cycle_choice(data.thalassemia, forward),
            FormField::MajorVessels => {
                data.major_vessels = cycle_vessels(data.major_vessels, forward);
            }
            FormField::FastingBs => data.fasting_bs = !data.fasting_bs,
            FormField::ExerciseAngina => data.exercise_angina = !data.exercise_angina,
            _ => return false,
        }

        self.invalid.clear_field(field);
        true
    }

    /// Current values as form data.
    ///
    /// Text that does not parse counts as not entered.
    #[must_use]
    pub fn to_form_data(&self) -> HealthFormData {
        HealthFormData {
            age: self.integer(FormField::Age),
            resting_bp: self.integer(FormField::RestingBp),
            cholesterol: self.integer(FormField::Cholesterol),
            max_heart_rate: self.integer(FormField::MaxHeartRate),
            st_depression: self
                .buffer(FormField::StDepression)
                .parse()
                .unwrap_or(0.0),
            ..self.data.clone()
        }
    }

    /// Run the validator and record invalid fields.
    ///
    /// Returns `true` if the form may be submitted.
    pub fn submit(&mut self) -> bool {
        self.invalid = validate(&self.to_form_data());
        if !self.invalid.is_empty() {
            tracing::debug!("Form has {} invalid field(s)", self.invalid.len());
        }
        self.invalid.is_empty()
    }

    /// Load the sample patient
    pub fn load_sample_data(&mut self) {
        self.set_data(&HealthFormData::sample());
    }

    /// Replace every widget value from `data`.
    pub fn set_data(&mut self, data: &HealthFormData) {
        self.clear_buffers();
        self.data = data.clone();
        self.invalid = ValidationErrors::default();

        for (i, field) in FormField::ALL.iter().enumerate() {
            let text = match field {
                FormField::Age => number_text(data.age),
                FormField::RestingBp => number_text(data.resting_bp),
                FormField::Cholesterol => number_text(data.cholesterol),
                FormField::MaxHeartRate => number_text(data.max_heart_rate),
                FormField::StDepression => format!("{}", data.st_depression),
                _ => continue,
            };
            self.buffers[i] = text;
        }
    }

    /// Wipe all buffers and selections.
    pub fn clear(&mut self) {
        self.clear_buffers();
        self.data = HealthFormData::default();
        self.invalid = ValidationErrors::default();
        self.selected_field = 0;
    }

    fn clear_buffers(&mut self) {
        for buffer in self.buffers.iter_mut() {
            buffer.zeroize();
        }
    }

    fn buffer(&self, field: FormField) -> &str {
        FormField::ALL
            .iter()
            .position(|f| *f == field)
            .map_or("", |i| self.buffers[i].as_str())
    }

    fn integer(&self, field: FormField) -> u32 {
        self.buffer(field).parse().unwrap_or(0)
    }

    /// Text shown for a field, or `None` when nothing is entered.
    #[must_use]
    pub fn display_value(&self, field: FormField) -> Option<String> {
        let data = &self.data;
        match field {
            FormField::Age
            | FormField::RestingBp
            | FormField::Cholesterol
            | FormField::MaxHeartRate
            | FormField::StDepression => {
                let text = self.buffer(field);
                (!text.is_empty()).then(|| text.to_string())
            }
            FormField::Sex => data.sex.map(|c| c.label().to_string()),
            FormField::ChestPainType => data.chest_pain_type.map(|c| c.label().to_string()),
            FormField::RestingEcg => data.resting_ecg.map(|c| c.label().to_string()),
            FormField::Slope => data.slope.map(|c| c.label().to_string()),
            FormField::Thalassemia => data.thalassemia.map(|c| c.label().to_string()),
            FormField::MajorVessels => data.major_vessels.map(|n| n.to_string()),
            FormField::FastingBs => Some(yes_no(data.fasting_bs).to_string()),
            FormField::ExerciseAngina => Some(yes_no(data.exercise_angina).to_string()),
        }
    }
}

fn cycle_choice<C: Choice>(current: Option<C>, forward: bool) -> Option<C> {
    // Slot 0 is "not selected".
    let slots = C::ALL.len() + 1;
    let index = current
        .and_then(|c| C::ALL.iter().position(|x| *x == c))
        .map_or(0, |i| i + 1);
    let next = if forward {
        (index + 1) % slots
    } else {
        (index + slots - 1) % slots
    };
    next.checked_sub(1).map(|i| C::ALL[i])
}

fn cycle_vessels(current: Option<u8>, forward: bool) -> Option<u8> {
    match (current, forward) {
        (None, true) => Some(0),
        (Some(n), true) if n < 3 => Some(n + 1),
        (Some(_), true) => None,
        (None, false) => Some(3),
        (Some(0), false) => None,
        (Some(n), false) => Some(n.min(3) - 1),
    }
}

fn number_text(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Render the health form with its status line
pub fn render_health_form(
    f: &mut Frame,
    area: Rect,
    state: &HealthFormState,
    loading: bool,
    error: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Status
            Constraint::Length(2), // Keys
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_status(f, chunks[2], state, loading, error);
    render_form_footer(f, chunks[3]);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Health Assessment", MedicalTheme::title()),
        Span::styled(
            " │ UCI Heart Disease Features",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &HealthFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = FormField::ALL.len().div_ceil(2);

    render_field_column(f, columns[0], state, 0..mid);
    render_field_column(f, columns[1], state, mid..FormField::ALL.len());
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    state: &HealthFormState,
    range: std::ops::Range<usize>,
) {
    let constraints: Vec<Constraint> = range
        .clone()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (slot, index) in range.enumerate() {
        let field = FormField::ALL[index];
        let is_selected = index == state.selected_field;
        let is_invalid = state.invalid.contains(field);

        let border_style = if is_invalid {
            MedicalTheme::danger()
        } else if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let mut block = Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);
        if is_invalid {
            block = block.title_bottom(Span::styled(
                format!(" {} ", field.error_text()),
                MedicalTheme::danger(),
            ));
        }

        let value = match state.display_value(field) {
            Some(text) => Span::styled(text, MedicalTheme::text()),
            None => Span::styled(field.hint(), MedicalTheme::text_muted()),
        };

        let marker = match (is_selected, InputKind::of(field)) {
            (false, _) => Span::raw(""),
            (true, InputKind::Integer | InputKind::Decimal) => {
                Span::styled("▌", MedicalTheme::focused())
            }
            (true, InputKind::Toggle | InputKind::Select) => {
                Span::styled("  ◂ ▸", MedicalTheme::key_hint())
            }
        };

        let content = Paragraph::new(Line::from(vec![Span::raw(" "), value, marker])).block(block);
        f.render_widget(content, chunks[slot]);
    }
}

fn render_status(
    f: &mut Frame,
    area: Rect,
    state: &HealthFormState,
    loading: bool,
    error: Option<&str>,
) {
    let content = if let Some(message) = error {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(message.to_string(), MedicalTheme::danger()),
        ])
    } else if loading {
        Line::from(Span::styled("Analyzing...", MedicalTheme::info()))
    } else if !state.invalid.is_empty() {
        Line::from(Span::styled(
            format!("{} field(s) need attention", state.invalid.len()),
            MedicalTheme::danger(),
        ))
    } else {
        Line::from(Span::styled(
            "Fill in every field, then press Enter",
            MedicalTheme::text_muted(),
        ))
    };

    let status = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(status, area);
}

fn render_form_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[↑↓] ", MedicalTheme::key_hint()),
        Span::styled("Navigate ", MedicalTheme::key_desc()),
        Span::styled("[←→] ", MedicalTheme::key_hint()),
        Span::styled("Change ", MedicalTheme::key_desc()),
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled("Analyze ", MedicalTheme::key_desc()),
        Span::styled("[S] ", MedicalTheme::key_hint()),
        Span::styled("Sample ", MedicalTheme::key_desc()),
        Span::styled("[N] ", MedicalTheme::key_hint()),
        Span::styled("New ", MedicalTheme::key_desc()),
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);

    f.render_widget(Paragraph::new(content), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;

    fn select(state: &mut HealthFormState, field: FormField) {
        state.selected_field = FormField::ALL
            .iter()
            .position(|f| *f == field)
            .expect("Known field");
    }

    fn type_text(state: &mut HealthFormState, field: FormField, text: &str) {
        select(state, field);
        for c in text.chars() {
            state.input_char(c);
        }
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = HealthFormState::default();
        state.prev_field();
        assert_eq!(state.selected(), FormField::Thalassemia);
        state.next_field();
        assert_eq!(state.selected(), FormField::Age);
    }

    #[test]
    fn test_integer_input_filters() {
        let mut state = HealthFormState::default();
        type_text(&mut state, FormField::Age, "4a5.-");
        assert_eq!(state.to_form_data().age, 45);

        // Length cap
        type_text(&mut state, FormField::Cholesterol, "12345");
        assert_eq!(state.to_form_data().cholesterol, 123);
    }

    #[test]
    fn test_decimal_input_single_point() {
        let mut state = HealthFormState::default();
        type_text(&mut state, FormField::StDepression, "2.5.");
        assert!((state.to_form_data().st_depression - 2.5).abs() < f64::EPSILON);

        state.delete_char();
        state.delete_char();
        state.delete_char();
        state.input_char('.');
        assert_eq!(state.display_value(FormField::StDepression).as_deref(), Some("."));
        // Unparsable text counts as not entered
        assert_eq!(state.to_form_data().st_depression, 0.0);
    }

    #[test]
    fn test_text_ignored_on_select_fields() {
        let mut state = HealthFormState::default();
        select(&mut state, FormField::Sex);
        assert!(!state.input_char('1'));
        assert!(state.to_form_data().sex.is_none());
    }

    #[test]
    fn test_cycle_includes_unset() {
        let mut state = HealthFormState::default();
        select(&mut state, FormField::Sex);

        assert!(state.cycle(true));
        assert_eq!(state.to_form_data().sex, Some(Sex::Male));
        state.cycle(true);
        assert_eq!(state.to_form_data().sex, Some(Sex::Female));
        state.cycle(true);
        assert_eq!(state.to_form_data().sex, None);
        state.cycle(false);
        assert_eq!(state.to_form_data().sex, Some(Sex::Female));
    }

    #[test]
    fn test_cycle_vessels() {
        let mut state = HealthFormState::default();
        select(&mut state, FormField::MajorVessels);

        let seen: Vec<Option<u8>> = (0..5)
            .map(|_| {
                state.cycle(true);
                state.to_form_data().major_vessels
            })
            .collect();
        assert_eq!(seen, vec![Some(0), Some(1), Some(2), Some(3), None]);

        state.cycle(false);
        assert_eq!(state.to_form_data().major_vessels, Some(3));
    }

    #[test]
    fn test_space_toggles_boolean() {
        let mut state = HealthFormState::default();
        select(&mut state, FormField::ExerciseAngina);
        assert!(state.input_char(' '));
        assert!(state.to_form_data().exercise_angina);
        assert_eq!(
            state.display_value(FormField::ExerciseAngina).as_deref(),
            Some("Yes")
        );
    }

    #[test]
    fn test_sample_data_matches_domain_sample() {
        let mut state = HealthFormState::default();
        state.load_sample_data();
        assert_eq!(state.to_form_data(), HealthFormData::sample());
        assert!(state.submit());
        assert!(state.invalid.is_empty());
    }

    #[test]
    fn test_submit_marks_invalid_fields() {
        let mut state = HealthFormState::default();
        assert!(!state.submit());
        // Booleans always hold a value; ST depression 0 is in range.
        assert_eq!(state.invalid.len(), 10);
        assert!(state.invalid.contains(FormField::Age));
        assert!(!state.invalid.contains(FormField::StDepression));
    }

    #[test]
    fn test_edit_clears_inline_error() {
        let mut state = HealthFormState::default();
        state.submit();
        assert!(state.invalid.contains(FormField::Age));

        type_text(&mut state, FormField::Age, "5");
        assert!(!state.invalid.contains(FormField::Age));
        assert!(state.invalid.contains(FormField::Sex));
    }

    #[test]
    fn test_clear_field_resets_selection() {
        let mut state = HealthFormState::default();
        state.load_sample_data();
        select(&mut state, FormField::Thalassemia);
        assert!(state.clear_field());
        assert!(state.to_form_data().thalassemia.is_none());
        assert!(!state.clear_field(), "already unset");
    }

    #[test]
    fn test_clear_wipes_everything() {
        let mut state = HealthFormState::default();
        state.load_sample_data();
        state.selected_field = 4;
        state.submit();

        state.clear();

        assert_eq!(state.to_form_data(), HealthFormData::default());
        assert_eq!(state.selected_field, 0);
        assert!(state.invalid.is_empty());
        assert!(state.display_value(FormField::Age).is_none());
    }

    #[test]
    fn test_render_shows_inline_errors() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut state = HealthFormState::default();
        state.submit();

        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).expect("Terminal");
        terminal
            .draw(|f| render_health_form(f, f.area(), &state, false, Some("Server down")))
            .expect("Draw");

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Enter an age between 1 and 120"));
        assert!(text.contains("Server down"));
    }
}
