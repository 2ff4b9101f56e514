use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::StudentRepository;
use crate::models::{ScoreAverages, Student};

use super::forms::{IdForm, StudentField, StudentForm};
use super::helpers::{centered_rect, format_timestamp, surface_error};
use super::screens::StudentListScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Entries of the main menu, in display order. The digit selects the entry
/// directly from the menu screen.
const MENU_ITEMS: [(char, MenuAction, &str); 5] = [
    ('1', MenuAction::AddStudent, "Add student"),
    ('2', MenuAction::FindStudent, "Find student by ID"),
    ('3', MenuAction::ListStudents, "List all students"),
    ('4', MenuAction::ShowAverages, "Show average scores"),
    ('5', MenuAction::Exit, "Exit"),
];

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum MenuAction {
    AddStudent,
    FindStudent,
    ListStudents,
    ShowAverages,
    Exit,
}

/// What occupies the main content area.
enum Screen {
    Menu,
    List(StudentListScreen),
    Detail(Box<Student>),
    Averages(ScoreAverages),
}

/// Modal overlays drawn on top of the current screen.
enum Mode {
    Normal,
    AddingStudent(StudentForm),
    LookingUp(IdForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Owns the one SQLite connection for the session
/// and lends it to a `StudentRepository` for each operation.
pub struct App {
    conn: Connection,
    menu_selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            menu_selected: 0,
            screen: Screen::Menu,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Route a key press to the active mode. Returns `true` once the user has
    /// chosen to exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingStudent(form) => self.handle_add_student(code, form),
            Mode::LookingUp(form) => self.handle_lookup(code, form),
        };

        exit
    }

    fn repository(&self) -> StudentRepository<'_> {
        StudentRepository::new(&self.conn)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.screen {
            Screen::Menu => match code {
                KeyCode::Char('q') | KeyCode::Esc => *exit = true,
                KeyCode::Up => {
                    self.menu_selected = self.menu_selected.saturating_sub(1);
                }
                KeyCode::Down => {
                    self.menu_selected = (self.menu_selected + 1).min(MENU_ITEMS.len() - 1);
                }
                KeyCode::Enter => {
                    let (_, action, _) = MENU_ITEMS[self.menu_selected];
                    return self.run_menu_action(action, exit);
                }
                KeyCode::Char(ch) => {
                    if let Some(idx) = MENU_ITEMS.iter().position(|(key, _, _)| *key == ch) {
                        self.menu_selected = idx;
                        return self.run_menu_action(MENU_ITEMS[idx].1, exit);
                    }
                }
                _ => {}
            },
            Screen::List(ref mut list) => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Char('m') => self.back_to_menu(),
                KeyCode::Up => list.move_selection(-1),
                KeyCode::Down => list.move_selection(1),
                KeyCode::PageUp => list.move_selection(-10),
                KeyCode::PageDown => list.move_selection(10),
                KeyCode::Home => list.select_first(),
                KeyCode::End => list.select_last(),
                KeyCode::Enter => {
                    if let Some(student) = list.current_student().cloned() {
                        self.screen = Screen::Detail(Box::new(student));
                    }
                }
                _ => {}
            },
            Screen::Detail(_) | Screen::Averages(_) => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Char('m') | KeyCode::Enter => self.back_to_menu(),
                _ => {}
            },
        }
        Mode::Normal
    }

    fn run_menu_action(&mut self, action: MenuAction, exit: &mut bool) -> Mode {
        self.clear_status();
        match action {
            MenuAction::AddStudent => return Mode::AddingStudent(StudentForm::default()),
            MenuAction::FindStudent => return Mode::LookingUp(IdForm::default()),
            MenuAction::ListStudents => self.open_list(),
            MenuAction::ShowAverages => self.open_averages(),
            MenuAction::Exit => *exit = true,
        }
        Mode::Normal
    }

    fn handle_add_student(&mut self, code: KeyCode, mut form: StudentForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add student cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.cycle_field(1),
            KeyCode::BackTab | KeyCode::Up => form.cycle_field(-1),
            KeyCode::Left => {
                form.cycle_gender(-1);
            }
            KeyCode::Right => {
                form.cycle_gender(1);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_student(&form) {
                Ok(()) => keep_open = false,
                Err(message) => {
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::AddingStudent(form)
        } else {
            Mode::Normal
        }
    }

    fn handle_lookup(&mut self, code: KeyCode, mut form: IdForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Lookup cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let id = match form.parse_id() {
                    Ok(id) => id,
                    Err(err) => {
                        form.error = Some(surface_error(&err));
                        return Mode::LookingUp(form);
                    }
                };
                let found = self.repository().lookup(id);
                let message = match found {
                    Ok(Some(student)) => {
                        self.clear_status();
                        self.screen = Screen::Detail(Box::new(student));
                        return Mode::Normal;
                    }
                    Ok(None) => format!("No student found with ID {id}."),
                    Err(_) => "Lookup failed. See the log for details.".to_string(),
                };
                form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::LookingUp(form)
    }

    /// Validate the form and insert the student. The error side carries the
    /// message to show in the form.
    fn save_new_student(&mut self, form: &StudentForm) -> Result<(), String> {
        let student = form.parse_inputs().map_err(|err| surface_error(&err))?;
        let id = self
            .repository()
            .create(&student)
            .ok_or_else(|| "Failed to save student. See the log for details.".to_string())?;
        self.set_status(
            format!("Added student #{id} ({}).", student.name()),
            StatusKind::Info,
        );
        Ok(())
    }

    fn open_list(&mut self) {
        let students = self.repository().get_all();
        self.screen = Screen::List(StudentListScreen::new(students));
    }

    fn open_averages(&mut self) {
        let averages = self.repository().average_scores();
        match averages {
            Some(averages) => self.screen = Screen::Averages(averages),
            None => self.set_status(
                "Could not compute averages. See the log for details.",
                StatusKind::Error,
            ),
        }
    }

    fn back_to_menu(&mut self) {
        self.clear_status();
        self.screen = Screen::Menu;
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Menu => self.draw_menu(frame, content_area),
            Screen::List(list) => self.draw_list(frame, content_area, list),
            Screen::Detail(student) => self.draw_detail(frame, content_area, student),
            Screen::Averages(averages) => self.draw_averages(frame, content_area, averages),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingStudent(form) => self.draw_student_form(frame, area, form),
            Mode::LookingUp(form) => self.draw_lookup_form(frame, area, form),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let menu_area = centered_rect(50, 60, area);
        let items: Vec<ListItem> = MENU_ITEMS
            .iter()
            .map(|(key, _, label)| ListItem::new(format!("{key}. {label}")))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Student Records"),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(Some(self.menu_selected));
        frame.render_stateful_widget(list, menu_area, &mut state);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect, list: &StudentListScreen) {
        if list.students.is_empty() {
            let message = Paragraph::new("No students yet. Choose 'Add student' from the menu.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("All Students"));
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = list
            .students
            .iter()
            .map(|student| ListItem::new(student.to_string()))
            .collect();
        let title = format!("All Students ({})", list.students.len());
        let widget = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(Some(list.selected));
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, student: &Student) {
        let label_style = Style::default().add_modifier(Modifier::BOLD);
        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<12}"), label_style),
                Span::raw(value),
            ])
        };

        let lines = vec![
            row("ID", student.id().to_string()),
            row("Name", student.name().to_string()),
            row("Gender", student.gender().to_string()),
            row("Class", student.class_name().to_string()),
            row("Math", format!("{:.2}", student.math_score())),
            row("Java", format!("{:.2}", student.java_score())),
            row("Total", format!("{:.2}", student.total())),
            row("Average", format!("{:.2}", student.average())),
            row("Created", format_timestamp(student.created_at())),
            row("Updated", format_timestamp(student.updated_at())),
        ];

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Student"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_averages(&self, frame: &mut Frame, area: Rect, averages: &ScoreAverages) {
        let lines = vec![
            Line::from(format!("Math average:    {:.2}", averages.math)),
            Line::from(format!("Java average:    {:.2}", averages.java)),
            Line::from(Span::styled(
                format!("Overall average: {:.2}", averages.overall()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Average Scores"),
            )
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::AddingStudent(_)) => &[
                ("[Tab/↑↓]", " Field   "),
                ("[←→]", " Gender   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            (_, Mode::LookingUp(_)) => &[("[Enter]", " Find   "), ("[Esc]", " Cancel")],
            (Screen::Menu, _) => &[
                ("[1-5]", " Choose   "),
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Select   "),
                ("[q]", " Quit"),
            ],
            (Screen::List(_), _) => &[
                ("[↑↓/PgUp/PgDn]", " Scroll   "),
                ("[Enter]", " Details   "),
                ("[Esc]", " Menu   "),
                ("[q]", " Quit"),
            ],
            (Screen::Detail(_) | Screen::Averages(_), _) => {
                &[("[Esc/Enter]", " Menu   "), ("[q]", " Quit")]
            }
        };

        Line::from(
            hints
                .iter()
                .flat_map(|(key, text)| [Span::styled(*key, key_style), Span::raw(*text)])
                .collect::<Vec<_>>(),
        )
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, form: &StudentForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Student").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = StudentField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch field • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let row = StudentField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let prefix = form.active.label().len() as u16 + 2;
        let value_len = form.value(form.active).chars().count() as u16;
        frame.set_cursor_position((inner.x + prefix + value_len, inner.y + row));
    }

    fn draw_lookup_form(&self, frame: &mut Frame, area: Rect, form: &IdForm) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Find Student")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(vec![
                Span::raw("Student ID: "),
                Span::styled(form.id.clone(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(""),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "Student ID: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.id.chars().count() as u16, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use crate::db::open_in_memory;

    use super::*;

    fn app() -> App {
        App::new(open_in_memory().unwrap())
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn add_student(app: &mut App, name: &str, math: &str, java: &str) {
        app.handle_key(KeyCode::Char('1'));
        type_text(app, name);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Tab);
        type_text(app, "Class A");
        app.handle_key(KeyCode::Tab);
        type_text(app, math);
        app.handle_key(KeyCode::Tab);
        type_text(app, java);
        app.handle_key(KeyCode::Enter);
    }

    #[test]
    fn add_flow_persists_student() {
        let mut app = app();
        add_student(&mut app, "Ada", "80", "90");

        assert!(matches!(app.mode, Mode::Normal));
        let stored = app.repository().get_all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name(), "Ada");
        assert_eq!(stored[0].class_name(), "Class A");
        assert_eq!(stored[0].math_score(), 80.0);
        assert_eq!(stored[0].java_score(), 90.0);
    }

    #[test]
    fn invalid_score_keeps_form_open() {
        let mut app = app();
        add_student(&mut app, "Bob", "150", "90");

        match &app.mode {
            Mode::AddingStudent(form) => {
                let error = form.error.as_deref().unwrap();
                assert!(error.contains("between 0 and 100"));
            }
            _ => panic!("form should stay open"),
        }
        assert!(app.repository().get_all().is_empty());
    }

    #[test]
    fn lookup_opens_detail_or_reports_missing() {
        let mut app = app();
        add_student(&mut app, "Ada", "80", "90");

        app.handle_key(KeyCode::Char('2'));
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Enter);
        match &app.screen {
            Screen::Detail(student) => assert_eq!(student.name(), "Ada"),
            _ => panic!("expected detail screen"),
        }

        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('2'));
        type_text(&mut app, "99");
        app.handle_key(KeyCode::Enter);
        match &app.mode {
            Mode::LookingUp(form) => {
                assert_eq!(form.error.as_deref(), Some("No student found with ID 99."))
            }
            _ => panic!("lookup should stay open"),
        }
    }

    #[test]
    fn lookup_failure_is_not_reported_as_missing() {
        // No schema, so the lookup statement fails.
        let mut app = App::new(Connection::open_in_memory().unwrap());
        app.handle_key(KeyCode::Char('2'));
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Enter);

        match &app.mode {
            Mode::LookingUp(form) => assert_eq!(
                form.error.as_deref(),
                Some("Lookup failed. See the log for details.")
            ),
            _ => panic!("lookup should stay open"),
        }
        assert!(app.repository().lookup(1).is_err());
        assert!(app.repository().get_by_id(1).is_none());
    }

    #[test]
    fn list_and_averages_screens_reflect_store() {
        let mut app = app();
        add_student(&mut app, "A", "80", "90");
        add_student(&mut app, "B", "60", "70");

        app.handle_key(KeyCode::Char('3'));
        match &app.screen {
            Screen::List(list) => assert_eq!(list.students.len(), 2),
            _ => panic!("expected list screen"),
        }

        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('4'));
        match &app.screen {
            Screen::Averages(averages) => {
                assert_eq!(averages.as_array(), [70.0, 80.0]);
            }
            _ => panic!("expected averages screen"),
        }
    }

    #[test]
    fn menu_navigation_and_exit() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Down));
        assert!(!app.handle_key(KeyCode::Down));
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(matches!(app.screen, Screen::List(_)));

        app.handle_key(KeyCode::Esc);
        assert!(app.handle_key(KeyCode::Char('5')));
    }
}
