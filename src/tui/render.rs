//! Drawing for every screen of the terminal user interface.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::calendar;
use crate::date_key::DateKey;
use crate::fields::{format_plan, format_sound, format_view, CalendarView, Plan};
use crate::tui::app::{App, DayEditor, HOME_ITEMS};
use crate::tui::colors::{BRAND_BLUE, DONE_GREEN, ERROR_RED, MUTED_GREY, PROGRESS_BLUE};
use crate::tui::enums::{EditorMode, LoginField, RegisterField, Screen, Section, SoundRow};
use crate::tui::input::InputField;
use crate::tui::utils::centered_rect;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn progress_gauge<'a>(title: &'a str, done: usize, total: usize) -> Gauge<'a> {
    let percent = if total == 0 { 0 } else { (done * 100 / total) as u16 };
    let color = if total > 0 && done == total { DONE_GREEN } else { PROGRESS_BLUE };
    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(color))
        .percent(percent)
        .label(format!("{done}/{total} ({percent}%)"))
}

/// Render a bordered single-line input and place the terminal cursor in it.
fn render_input(f: &mut Frame, area: Rect, title: &str, field: &InputField, masked: bool, focused: bool) {
    let text = if masked { field.masked() } else { field.value.clone() };
    let input = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(focus_style(focused)),
    );
    f.render_widget(input, area);
    if focused {
        f.set_cursor_position((area.x + field.cursor as u16 + 1, area.y + 1));
    }
}

impl App {
    /// Main render function that dispatches to the active screen.
    pub(super) fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.screen {
            Screen::Home => self.render_home(f, chunks[0]),
            Screen::Login => self.render_login(f, chunks[0]),
            Screen::Register => self.render_register(f, chunks[0]),
            Screen::Main(section) => self.render_main(f, chunks[0], section),
        }

        self.render_status_bar(f, chunks[1]);
    }

    fn render_home(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(50, 60, area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        let header_text = vec![
            Line::from(Span::styled(
                "VESTIGIUM",
                Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "One day at a time.",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            )),
        ];
        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = HOME_ITEMS.iter().map(|i| ListItem::new(*i)).collect();
        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Welcome"))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("> ");
        f.render_stateful_widget(menu, chunks[1], &mut self.home_state);
    }

    fn render_login(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let title = Paragraph::new("Sign in")
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(BRAND_BLUE)))
            .alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        let pending = self.login_pending();
        render_input(
            f,
            chunks[1],
            "Email",
            &self.login_email,
            false,
            !pending && self.login_field == LoginField::Email,
        );
        render_input(
            f,
            chunks[2],
            "Password",
            &self.login_password,
            true,
            !pending && self.login_field == LoginField::Password,
        );

        let hint = if pending {
            Line::from(Span::styled("Signing in...", Style::default().fg(Color::Cyan)))
        } else {
            Line::from("Enter: sign in | Tab: next field | Esc: back")
        };
        f.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[3]);
    }

    fn render_register(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let title = Paragraph::new("Create account")
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(BRAND_BLUE)))
            .alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        let field = self.register_field;
        render_input(f, chunks[1], "Name", &self.register_name, false, field == RegisterField::Name);
        render_input(f, chunks[2], "Email", &self.register_email, false, field == RegisterField::Email);
        render_input(
            f,
            chunks[3],
            "Password",
            &self.register_password,
            true,
            field == RegisterField::Password,
        );
        f.render_widget(
            Paragraph::new("Enter: create | Tab: next field | Esc: sign in instead")
                .alignment(Alignment::Center),
            chunks[4],
        );
    }

    fn render_main(&mut self, f: &mut Frame, area: Rect, section: Section) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let titles: Vec<Line> = Section::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
            .collect();
        let user = self.user.clone().unwrap_or_default();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(format!("Vestigium - {user}")))
            .select(section.index())
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(Color::Yellow).bg(BRAND_BLUE).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, chunks[0]);

        match section {
            Section::Calendar => self.render_calendar_section(f, chunks[1]),
            Section::Notes => self.render_notes(f, chunks[1]),
            Section::Rewards => self.render_rewards(f, chunks[1]),
            Section::Friends => self.render_friends(f, chunks[1]),
            Section::Plans => self.render_plans(f, chunks[1]),
            Section::Sounds => self.render_sounds(f, chunks[1]),
        }
    }

    // ----- calendar -----

    fn render_calendar_section(&mut self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(columns[0]);

        self.render_streak_card(f, left[0]);
        match self.view {
            CalendarView::Month => self.render_month(f, left[1]),
            CalendarView::Week | CalendarView::Day => self.render_agenda(f, left[1]),
        }

        match self.day_editor.take() {
            Some(mut editor) => {
                self.render_day_editor(f, columns[1], &mut editor);
                self.day_editor = Some(editor);
            }
            None => self.render_day_summary(f, columns[1]),
        }
    }

    fn render_streak_card(&self, f: &mut Frame, area: Rect) {
        let streak = self.current_streak();
        let best = crate::streak::longest_streak(self.store.days());
        let text = vec![
            Line::from(vec![
                Span::styled(
                    format!("{streak} day streak"),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("   best: {best}")),
            ]),
            Line::from(Span::styled(
                self.reward_tree().message(),
                Style::default().fg(Color::Cyan),
            )),
        ];
        let card = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Streak"))
            .wrap(Wrap { trim: true });
        f.render_widget(card, area);
    }

    fn render_month(&self, f: &mut Frame, area: Rect) {
        let month = self.cursor.first_of_month();
        let weeks = calendar::month_grid(month.year(), month.month());

        let header = Row::new(WEEKDAYS.iter().map(|d| Cell::from(*d)))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = weeks
            .iter()
            .map(|week| Row::new(week.iter().map(|cell| self.month_cell(*cell))).height(2))
            .collect();
        let widths = [Constraint::Ratio(1, 7); 7];
        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} - month", month.date().format("%B %Y"))),
        );
        f.render_widget(table, area);
    }

    fn month_cell(&self, cell: Option<DateKey>) -> Cell<'static> {
        let Some(date) = cell else {
            return Cell::from("");
        };
        let (done, total) = self.store.progress(date);
        let mut lines = vec![Line::from(format!("{:>2}", date.day()))];
        if total > 0 {
            lines.push(Line::from(format!("{done}/{total}")));
        }

        let mut style = Style::default();
        if self.store.is_completed(date) {
            style = style.bg(DONE_GREEN).fg(Color::Black);
        } else if date < self.today {
            style = style.fg(MUTED_GREY);
        }
        if date == self.today {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        if date == self.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Cell::from(lines).style(style)
    }

    /// Week and day layouts list the task markers in range.
    fn render_agenda(&mut self, f: &mut Frame, area: Rect) {
        let title = match self.view {
            CalendarView::Day => {
                let day = self.focus.unwrap_or(self.cursor);
                format!("{} - {}", day.date().format("%A %Y-%m-%d"), format_view(self.view))
            }
            CalendarView::Week | CalendarView::Month => {
                let week = calendar::week_of(self.cursor);
                format!("{} to {} - {}", week[0], week[6], format_view(self.view))
            }
        };

        let events = self.visible_events();
        let items: Vec<ListItem> = if events.is_empty() {
            vec![ListItem::new(Span::styled("No tasks", Style::default().fg(MUTED_GREY)))]
        } else {
            events
                .iter()
                .map(|e| {
                    let mark = if e.completed { "[x]" } else { "[ ]" };
                    let mut style = Style::default();
                    if self.store.is_completed(e.start) {
                        style = style.fg(DONE_GREEN);
                    } else if e.start < self.today {
                        style = style.fg(MUTED_GREY);
                    }
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("{} {} ", &WEEKDAYS[e.start.weekday().num_days_from_monday() as usize], e.start)),
                        Span::styled(format!("{mark} {}", e.title), style),
                    ]))
                })
                .collect()
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black));
        f.render_stateful_widget(list, area, &mut self.event_state);
    }

    fn render_day_summary(&self, f: &mut Frame, area: Rect) {
        let date = self.cursor;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let (done, total) = self.store.progress(date);
        f.render_widget(progress_gauge("Progress", done, total), chunks[0]);

        let mut lines: Vec<Line> = self
            .store
            .tasks(date)
            .iter()
            .map(|t| Line::from(format!("{} {}", if t.completed { "[x]" } else { "[ ]" }, t.text)))
            .collect();
        if lines.is_empty() {
            lines.push(Line::from(Span::styled("No tasks", Style::default().fg(MUTED_GREY))));
        }
        let hint = if date < self.today { "read-only" } else { "Enter to edit" };
        let summary = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(format!("{date} ({hint})")))
            .wrap(Wrap { trim: false });
        f.render_widget(summary, chunks[1]);
    }

    fn render_day_editor(&self, f: &mut Frame, area: Rect, editor: &mut DayEditor) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let (done, total) = self.store.progress(editor.date);
        f.render_widget(progress_gauge("Progress", done, total), chunks[0]);

        let items: Vec<ListItem> = self
            .store
            .tasks(editor.date)
            .iter()
            .map(|t| {
                let style = if t.completed {
                    Style::default().fg(DONE_GREEN).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::raw(if t.completed { "[x] " } else { "[ ] " }),
                    Span::styled(t.text.clone(), style),
                ]))
            })
            .collect();
        let title = if self.store.is_completed(editor.date) {
            format!("{} - completed", editor.date)
        } else {
            editor.date.to_string()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(focus_style(editor.mode == EditorMode::Browse)),
            )
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black));
        f.render_stateful_widget(list, chunks[1], &mut editor.list_state);

        match editor.mode {
            EditorMode::Browse => {
                let hint = Paragraph::new("a add | e edit | d delete | Space toggle | Esc close")
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(hint, chunks[2]);
            }
            EditorMode::Adding => render_input(f, chunks[2], "New task", &editor.input, false, true),
            EditorMode::Editing(_) => render_input(f, chunks[2], "Edit task", &editor.input, false, true),
        }
    }

    // ----- other sections -----

    fn render_notes(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self.notes.lines().iter().map(|l| Line::from(l.as_str())).collect();
        let (row, col) = self.notes.cursor();
        let inner_height = area.height.saturating_sub(2) as usize;
        let scroll = row.saturating_sub(inner_height.saturating_sub(1));
        let title = if self.notes_dirty { "Notes *" } else { "Notes" };
        let notes = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title).border_style(focus_style(true)))
            .scroll((scroll as u16, 0));
        f.render_widget(notes, area);
        f.set_cursor_position((area.x + col as u16 + 1, area.y + (row - scroll) as u16 + 1));
    }

    fn render_rewards(&self, f: &mut Frame, area: Rect) {
        let tree = self.reward_tree();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let header = Paragraph::new(tree.message())
            .block(Block::default().borders(Borders::ALL).title(format!("{} day streak", tree.streak)))
            .wrap(Wrap { trim: true });
        f.render_widget(header, chunks[0]);

        let next = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Next gift"))
            .gauge_style(Style::default().fg(PROGRESS_BLUE))
            .percent(tree.progress_percent() as u16)
            .label(format!("{} days to go", tree.days_to_next()));
        f.render_widget(next, chunks[1]);

        // Highest tier on top, like a tree.
        let items: Vec<ListItem> = tree
            .tiers
            .iter()
            .rev()
            .map(|tier| {
                let (mark, style) = if tier.unlocked {
                    ("*", Style::default().fg(DONE_GREEN).add_modifier(Modifier::BOLD))
                } else {
                    ("o", Style::default().fg(MUTED_GREY))
                };
                ListItem::new(Span::styled(
                    format!("{mark} Gift {:>2}  ({} days)", tier.level, tier.streak_required),
                    style,
                ))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Reward tree ({} unlocked)", tree.unlocked)),
        );
        f.render_widget(list, chunks[2]);
    }

    fn render_friends(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let items: Vec<ListItem> = self
            .friends
            .iter()
            .map(|fr| ListItem::new(format!("{}  (since {})", fr.name, fr.since)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!("Friends ({})", self.friends.len())))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black));
        f.render_stateful_widget(list, chunks[0], &mut self.friends_state);

        match &self.friend_input {
            Some(input) => render_input(f, chunks[1], "Friend name", input, false, true),
            None => f.render_widget(
                Paragraph::new("a add | d remove").block(Block::default().borders(Borders::ALL)),
                chunks[1],
            ),
        }
    }

    fn render_plans(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = Plan::ALL
            .iter()
            .map(|p| {
                let current = if *p == self.plan { "  (current)" } else { "" };
                ListItem::new(format!("{}{current}", format_plan(*p)))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Plans"))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.plan_state);
    }

    fn render_sounds(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        let s = self.settings;

        let sound = Paragraph::new(format!("< {} >", format_sound(s.sound))).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Sound")
                .border_style(focus_style(self.sound_row == SoundRow::Sound)),
        );
        f.render_widget(sound, chunks[0]);

        let volume = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Volume")
                    .border_style(focus_style(self.sound_row == SoundRow::Volume)),
            )
            .gauge_style(Style::default().fg(if s.muted { MUTED_GREY } else { PROGRESS_BLUE }))
            .percent(s.volume as u16)
            .label(format!("{}%", s.volume));
        f.render_widget(volume, chunks[1]);

        let mute = Paragraph::new(if s.muted { "[x] Muted" } else { "[ ] Muted" }).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Mute")
                .border_style(focus_style(self.sound_row == SoundRow::Mute)),
        );
        f.render_widget(mute, chunks[2]);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.screen {
                Screen::Home => "l: log in | r: register | q: quit".to_string(),
                Screen::Login | Screen::Register => "Ctrl+C: quit".to_string(),
                Screen::Main(Section::Calendar) => format!(
                    "Arrows: move | [ ]: month | t: today | v: view ({}) | Enter: open | Ctrl+L: log out",
                    format_view(self.view)
                ),
                Screen::Main(Section::Notes) => "Ctrl+S: save | Tab: next section".to_string(),
                Screen::Main(_) => "Tab / 1-6: sections | q: quit | Ctrl+L: log out".to_string(),
            }
        };

        let bg = if self.status_is_error { ERROR_RED } else { BRAND_BLUE };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(bg).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }
}
