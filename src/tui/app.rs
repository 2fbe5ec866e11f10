//! Main application state for the terminal user interface.
//!
//! This module contains the `App` struct which owns the loaded data, tracks which
//! [`Screen`] is showing, and turns key presses into store and settings updates.
//! Drawing lives in `render.rs`.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, widgets::ListState, Terminal};
use tracing::{debug, info};

use crate::auth::{LoginFlow, LoginOutcome, Registration};
use crate::calendar::{self, CalendarEvent, Selection};
use crate::config::Config;
use crate::date_key::DateKey;
use crate::fields::{format_plan, format_view, CalendarView, Plan, Sound};
use crate::rewards::RewardTree;
use crate::settings::{Friends, Settings};
use crate::store::DailyTaskStore;
use crate::streak;
use crate::tui::enums::{EditorMode, LoginField, RegisterField, Screen, Section, SoundRow};
use crate::tui::input::{InputField, TextArea};
use crate::vault::Vault;

pub(super) const HOME_ITEMS: [&str; 3] = ["Log in", "Create account", "Quit"];

/// The task list for one open day.
pub(super) struct DayEditor {
    pub date: DateKey,
    pub list_state: ListState,
    pub mode: EditorMode,
    pub input: InputField,
}

impl DayEditor {
    fn open(date: DateKey, store: &DailyTaskStore, task_id: Option<u64>) -> Self {
        let tasks = store.tasks(date);
        let selected = task_id
            .and_then(|id| tasks.iter().position(|t| t.id == id))
            .or(if tasks.is_empty() { None } else { Some(0) });
        let mut list_state = ListState::default();
        list_state.select(selected);
        let mut editor = DayEditor {
            date,
            list_state,
            mode: EditorMode::Browse,
            input: InputField::new(),
        };
        // A clicked task marker opens straight into editing that task.
        if let Some(task) = task_id.and_then(|id| tasks.iter().find(|t| t.id == id)) {
            editor.mode = EditorMode::Editing(task.id);
            editor.input = InputField::with_value(&task.text);
        }
        editor
    }

    fn selected_id(&self, store: &DailyTaskStore) -> Option<u64> {
        self.list_state
            .selected()
            .and_then(|i| store.tasks(self.date).get(i))
            .map(|t| t.id)
    }
}

/// Main application state for the terminal user interface.
pub struct App {
    pub(super) config: Config,
    pub(super) vault: Vault,
    pub(super) store: DailyTaskStore,
    pub(super) settings: Settings,
    pub(super) friends: Friends,
    pub(super) plan: Plan,
    pub(super) notes: TextArea,
    pub(super) notes_dirty: bool,
    pub(super) screen: Screen,
    pub(super) today: DateKey,
    pub(super) cursor: DateKey,
    pub(super) view: CalendarView,
    pub(super) focus: Option<DateKey>,
    pub(super) event_state: ListState,
    pub(super) day_editor: Option<DayEditor>,
    pub(super) home_state: ListState,
    pub(super) login_flow: LoginFlow,
    pub(super) login_email: InputField,
    pub(super) login_password: InputField,
    pub(super) login_field: LoginField,
    pub(super) register_name: InputField,
    pub(super) register_email: InputField,
    pub(super) register_password: InputField,
    pub(super) register_field: RegisterField,
    pub(super) user: Option<String>,
    pub(super) friends_state: ListState,
    pub(super) friend_input: Option<InputField>,
    pub(super) plan_state: ListState,
    pub(super) sound_row: SoundRow,
    pub(super) status_message: String,
    pub(super) status_is_error: bool,
    should_quit: bool,
}

impl App {
    /// Load every persisted entity through the vault.
    pub fn new(config: Config, vault: Vault) -> Self {
        let store = DailyTaskStore::load(vault.clone());
        let settings = vault.load_settings();
        let friends = vault.load_friends();
        let plan = vault.load_plan();
        let notes = TextArea::from_text(&vault.load_notes());
        let today = DateKey::today();

        let mut home_state = ListState::default();
        home_state.select(Some(0));
        let mut plan_state = ListState::default();
        plan_state.select(Plan::ALL.iter().position(|p| *p == plan));
        let mut friends_state = ListState::default();
        friends_state.select(if friends.is_empty() { None } else { Some(0) });

        App {
            login_flow: LoginFlow::new(config.login_delay),
            view: config.default_view,
            config,
            vault,
            store,
            settings,
            friends,
            plan,
            notes,
            notes_dirty: false,
            screen: Screen::Home,
            today,
            cursor: today,
            focus: None,
            event_state: ListState::default(),
            day_editor: None,
            home_state,
            login_email: InputField::new(),
            login_password: InputField::new(),
            login_field: LoginField::Email,
            register_name: InputField::new(),
            register_email: InputField::new(),
            register_password: InputField::new(),
            register_field: RegisterField::Name,
            user: None,
            friends_state,
            friend_input: None,
            plan_state,
            sound_row: SoundRow::Sound,
            status_message: String::new(),
            status_is_error: false,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(super) fn current_streak(&self) -> u32 {
        streak::current_streak(self.store.days(), self.today)
    }

    pub(super) fn reward_tree(&self) -> RewardTree {
        RewardTree::from_streak(self.current_streak(), self.config.reward_interval)
    }

    pub(super) fn login_pending(&self) -> bool {
        self.login_flow.is_pending()
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, msg: impl ToString) {
        self.status_message = msg.to_string();
        self.status_is_error = true;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
        self.status_is_error = false;
    }

    /// Move to another screen, running the leave hooks of the current one.
    pub(super) fn switch_screen(&mut self, next: Screen) {
        if self.screen == next {
            return;
        }
        match self.screen {
            Screen::Login => {
                self.login_flow.cancel();
            }
            Screen::Main(Section::Notes) => self.save_notes(),
            Screen::Main(Section::Calendar) => self.day_editor = None,
            Screen::Main(Section::Friends) => self.friend_input = None,
            Screen::Home
            | Screen::Register
            | Screen::Main(Section::Rewards)
            | Screen::Main(Section::Plans)
            | Screen::Main(Section::Sounds) => {}
        }
        debug!(from = ?self.screen, to = ?next, "screen change");
        self.screen = next;
        self.clear_status_message();
    }

    fn save_notes(&mut self) {
        if self.notes_dirty {
            self.vault.save_notes(&self.notes.text());
            self.notes_dirty = false;
        }
    }

    /// Advance timers. Called on every loop iteration.
    pub fn tick(&mut self, now: Instant) {
        let today = DateKey::today();
        if today != self.today {
            info!(%today, "day rolled over");
            self.today = today;
        }
        if let LoginOutcome::Succeeded { email } = self.login_flow.poll(now) {
            // The flow is cancelled whenever the login screen is left, so a success
            // can only arrive while it is still showing.
            self.login_password.clear();
            self.user = Some(email.clone());
            self.switch_screen(Screen::Main(Section::Calendar));
            self.set_status_message(format!("Welcome back, {email}"));
        }
    }

    /// Dispatch a key press to the active screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }
        match self.screen {
            Screen::Home => self.handle_home_input(key.code),
            Screen::Login => self.handle_login_input(key.code),
            Screen::Register => self.handle_register_input(key.code),
            Screen::Main(section) => self.handle_main_input(section, key),
        }
    }

    fn quit(&mut self) {
        self.login_flow.cancel();
        self.save_notes();
        self.should_quit = true;
    }

    fn handle_home_input(&mut self, key: KeyCode) {
        let selected = self.home_state.selected().unwrap_or(0);
        match key {
            KeyCode::Up => self.home_state.select(Some(selected.saturating_sub(1))),
            KeyCode::Down => self.home_state.select(Some((selected + 1).min(HOME_ITEMS.len() - 1))),
            KeyCode::Char('l') => self.switch_screen(Screen::Login),
            KeyCode::Char('r') => self.switch_screen(Screen::Register),
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Enter => match selected {
                0 => self.switch_screen(Screen::Login),
                1 => self.switch_screen(Screen::Register),
                _ => self.quit(),
            },
            _ => {}
        }
    }

    fn handle_login_input(&mut self, key: KeyCode) {
        let field = match self.login_field {
            LoginField::Email => &mut self.login_email,
            LoginField::Password => &mut self.login_password,
        };
        match key {
            KeyCode::Esc => self.switch_screen(Screen::Home),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login_field = match self.login_field {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::Enter => {
                let result = self.login_flow.submit(
                    &self.login_email.value,
                    &self.login_password.value,
                    Instant::now(),
                );
                match result {
                    Ok(_) => self.set_status_message("Signing in..."),
                    Err(e) => self.set_error(e),
                }
            }
            KeyCode::Char(c) => field.handle_char(c),
            KeyCode::Backspace => field.handle_backspace(),
            KeyCode::Delete => field.handle_delete(),
            KeyCode::Left => field.move_cursor_left(),
            KeyCode::Right => field.move_cursor_right(),
            _ => {}
        }
    }

    fn handle_register_input(&mut self, key: KeyCode) {
        let field = match self.register_field {
            RegisterField::Name => &mut self.register_name,
            RegisterField::Email => &mut self.register_email,
            RegisterField::Password => &mut self.register_password,
        };
        match key {
            KeyCode::Esc => self.switch_screen(Screen::Login),
            KeyCode::Tab | KeyCode::Down => self.register_field = self.register_field.next(),
            KeyCode::BackTab | KeyCode::Up => {
                self.register_field = self.register_field.next().next();
            }
            KeyCode::Enter => {
                match Registration::validate(
                    &self.register_name.value,
                    &self.register_email.value,
                    &self.register_password.value,
                ) {
                    Ok(registration) => {
                        self.login_email = InputField::with_value(&registration.email);
                        self.login_password.clear();
                        self.login_field = LoginField::Password;
                        self.register_name.clear();
                        self.register_email.clear();
                        self.register_password.clear();
                        self.switch_screen(Screen::Login);
                        self.set_status_message(format!(
                            "Account created for {}. You can sign in now.",
                            registration.name
                        ));
                    }
                    Err(e) => self.set_error(e),
                }
            }
            KeyCode::Char(c) => field.handle_char(c),
            KeyCode::Backspace => field.handle_backspace(),
            KeyCode::Delete => field.handle_delete(),
            KeyCode::Left => field.move_cursor_left(),
            KeyCode::Right => field.move_cursor_right(),
            _ => {}
        }
    }

    /// True while a text input on the current section is capturing keys.
    fn capturing_text(&self, section: Section) -> bool {
        match section {
            Section::Calendar => self
                .day_editor
                .as_ref()
                .is_some_and(|e| e.mode != EditorMode::Browse),
            Section::Notes => true,
            Section::Friends => self.friend_input.is_some(),
            Section::Rewards | Section::Plans | Section::Sounds => false,
        }
    }

    fn handle_main_input(&mut self, section: Section, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('l') if ctrl => {
                info!("logged out");
                self.user = None;
                self.switch_screen(Screen::Home);
                return;
            }
            KeyCode::Char('s') if ctrl && section == Section::Notes => {
                self.notes_dirty = true;
                self.save_notes();
                self.set_status_message("Notes saved");
                return;
            }
            KeyCode::Tab => {
                self.switch_screen(Screen::Main(section.next()));
                return;
            }
            KeyCode::BackTab => {
                self.switch_screen(Screen::Main(section.prev()));
                return;
            }
            _ => {}
        }

        if !self.capturing_text(section) {
            match key.code {
                KeyCode::Char('q') => {
                    self.quit();
                    return;
                }
                KeyCode::Char(c @ '1'..='6') => {
                    let idx = c as usize - '1' as usize;
                    self.switch_screen(Screen::Main(Section::ALL[idx]));
                    return;
                }
                _ => {}
            }
        }

        match section {
            Section::Calendar => self.handle_calendar_input(key.code),
            Section::Notes => self.handle_notes_input(key.code),
            Section::Rewards => {}
            Section::Friends => self.handle_friends_input(key.code),
            Section::Plans => self.handle_plans_input(key.code),
            Section::Sounds => self.handle_sounds_input(key.code),
        }
    }

    // ----- calendar -----

    /// Task markers visible in the week or day layout.
    pub(super) fn visible_events(&self) -> Vec<CalendarEvent> {
        let range: Vec<DateKey> = match self.view {
            CalendarView::Month => return Vec::new(),
            CalendarView::Week => calendar::week_of(self.cursor).to_vec(),
            CalendarView::Day => vec![self.focus.unwrap_or(self.cursor)],
        };
        calendar::project(self.store.days())
            .into_iter()
            .filter(|e| !e.is_background() && range.contains(&e.start))
            .collect()
    }

    fn move_cursor(&mut self, days: i64) {
        if let Some(next) = self.cursor.add_days(days) {
            self.cursor = next;
            self.refresh_visible_range();
        }
    }

    fn refresh_visible_range(&mut self) {
        let start = match self.view {
            CalendarView::Month => self.cursor.first_of_month(),
            CalendarView::Week => calendar::week_of(self.cursor)[0],
            CalendarView::Day => self.cursor,
        };
        let range = calendar::on_visible_range_change(self.view, start);
        self.focus = range.focus;
        let events = self.visible_events().len();
        self.event_state.select(if events == 0 { None } else { Some(0) });
    }

    fn open_day(&mut self, selection: Selection) {
        self.day_editor = Some(DayEditor::open(selection.date, &self.store, selection.task_id));
        self.clear_status_message();
    }

    fn handle_calendar_input(&mut self, key: KeyCode) {
        if self.day_editor.is_some() {
            self.handle_day_editor_input(key);
            return;
        }
        let step = match self.view {
            CalendarView::Month | CalendarView::Day => 1,
            CalendarView::Week => 7,
        };
        match key {
            KeyCode::Left => self.move_cursor(-step),
            KeyCode::Right => self.move_cursor(step),
            KeyCode::Up if self.view == CalendarView::Month => self.move_cursor(-7),
            KeyCode::Down if self.view == CalendarView::Month => self.move_cursor(7),
            KeyCode::Up => {
                let i = self.event_state.selected().unwrap_or(0);
                self.event_state.select(Some(i.saturating_sub(1)));
            }
            KeyCode::Down => {
                let count = self.visible_events().len();
                if count > 0 {
                    let i = self.event_state.selected().map_or(0, |i| (i + 1).min(count - 1));
                    self.event_state.select(Some(i));
                }
            }
            KeyCode::Char('[') => {
                if let Some(d) = self.cursor.first_of_month().pred() {
                    self.cursor = d.first_of_month();
                    self.refresh_visible_range();
                }
            }
            KeyCode::Char(']') => {
                if let Some(d) = self.cursor.first_of_month().add_days(31) {
                    self.cursor = d.first_of_month();
                    self.refresh_visible_range();
                }
            }
            KeyCode::Char('t') => {
                self.cursor = self.today;
                self.refresh_visible_range();
            }
            KeyCode::Char('v') => {
                self.view = self.view.next();
                self.refresh_visible_range();
                self.set_status_message(format!("{} view", format_view(self.view)));
            }
            KeyCode::Enter => {
                let events = self.visible_events();
                let clicked = self.event_state.selected().and_then(|i| events.get(i));
                if let Some(event) = clicked {
                    let selection = calendar::on_event_click(event);
                    self.open_day(selection);
                } else {
                    match calendar::on_date_click(self.cursor, self.today) {
                        Some(date) => self.open_day(Selection { date, task_id: None }),
                        None => self.set_error("Past days are read-only"),
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_day_editor_input(&mut self, key: KeyCode) {
        let Some(mut editor) = self.day_editor.take() else {
            return;
        };
        let keep_open = match editor.mode.clone() {
            EditorMode::Browse => self.handle_editor_browse(&mut editor, key),
            EditorMode::Adding | EditorMode::Editing(_) => {
                self.handle_editor_text(&mut editor, key);
                true
            }
        };
        if keep_open {
            self.day_editor = Some(editor);
        }
    }

    /// Returns false when the editor should close.
    fn handle_editor_browse(&mut self, editor: &mut DayEditor, key: KeyCode) -> bool {
        let count = self.store.tasks(editor.date).len();
        match key {
            KeyCode::Esc => return false,
            KeyCode::Up => {
                if let Some(i) = editor.list_state.selected() {
                    editor.list_state.select(Some(i.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if count > 0 {
                    let i = editor.list_state.selected().map_or(0, |i| (i + 1).min(count - 1));
                    editor.list_state.select(Some(i));
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = editor.selected_id(&self.store) {
                    match self.store.toggle_task(editor.date, id) {
                        Ok(_) if self.store.is_completed(editor.date) => {
                            self.set_status_message("Day completed! Streak saved.")
                        }
                        Ok(_) => self.clear_status_message(),
                        Err(e) => self.set_error(e),
                    }
                }
            }
            KeyCode::Char('a') => {
                if editor.date < self.today {
                    self.set_error("Tasks cannot be added to past days");
                } else {
                    editor.mode = EditorMode::Adding;
                    editor.input = InputField::new();
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = editor.selected_id(&self.store) {
                    let text = self
                        .store
                        .tasks(editor.date)
                        .iter()
                        .find(|t| t.id == id)
                        .map(|t| t.text.clone())
                        .unwrap_or_default();
                    editor.mode = EditorMode::Editing(id);
                    editor.input = InputField::with_value(&text);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = editor.selected_id(&self.store) {
                    match self.store.delete_task(editor.date, id) {
                        Ok(task) => {
                            let remaining = self.store.tasks(editor.date).len();
                            editor.list_state.select(match editor.list_state.selected() {
                                _ if remaining == 0 => None,
                                Some(i) => Some(i.min(remaining - 1)),
                                None => Some(0),
                            });
                            self.set_status_message(format!("Deleted '{}'", task.text));
                        }
                        Err(e) => self.set_error(e),
                    }
                }
            }
            _ => {}
        }
        true
    }

    fn handle_editor_text(&mut self, editor: &mut DayEditor, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                editor.mode = EditorMode::Browse;
                editor.input.clear();
            }
            KeyCode::Enter => {
                let result = match editor.mode {
                    EditorMode::Adding => self
                        .store
                        .add_task(editor.date, &editor.input.value, self.today)
                        .map(|_| ()),
                    EditorMode::Editing(id) => {
                        self.store.edit_task(editor.date, id, &editor.input.value)
                    }
                    EditorMode::Browse => Ok(()),
                };
                match result {
                    Ok(()) => {
                        if editor.mode == EditorMode::Adding {
                            let count = self.store.tasks(editor.date).len();
                            editor.list_state.select(Some(count.saturating_sub(1)));
                        }
                        editor.mode = EditorMode::Browse;
                        editor.input.clear();
                        self.clear_status_message();
                    }
                    Err(e) => self.set_error(e),
                }
            }
            KeyCode::Char(c) => editor.input.handle_char(c),
            KeyCode::Backspace => editor.input.handle_backspace(),
            KeyCode::Delete => editor.input.handle_delete(),
            KeyCode::Left => editor.input.move_cursor_left(),
            KeyCode::Right => editor.input.move_cursor_right(),
            _ => {}
        }
    }

    // ----- other sections -----

    fn handle_notes_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.notes.insert_char(c),
            KeyCode::Enter => self.notes.newline(),
            KeyCode::Backspace => self.notes.backspace(),
            KeyCode::Left => self.notes.move_left(),
            KeyCode::Right => self.notes.move_right(),
            KeyCode::Up => self.notes.move_up(),
            KeyCode::Down => self.notes.move_down(),
            KeyCode::Esc => {
                self.save_notes();
                return;
            }
            _ => return,
        }
        if matches!(key, KeyCode::Char(_) | KeyCode::Enter | KeyCode::Backspace) {
            self.notes_dirty = true;
        }
    }

    fn handle_friends_input(&mut self, key: KeyCode) {
        if let Some(input) = self.friend_input.as_mut() {
            match key {
                KeyCode::Esc => self.friend_input = None,
                KeyCode::Enter => {
                    let name = input.value.clone();
                    match self.friends.add(&name, self.today) {
                        Ok(friend) => {
                            let msg = format!("Added {}", friend.name);
                            self.vault.save_friends(&self.friends);
                            self.friends_state.select(Some(self.friends.len() - 1));
                            self.friend_input = None;
                            self.set_status_message(msg);
                        }
                        Err(e) => self.set_error(e),
                    }
                }
                KeyCode::Char(c) => input.handle_char(c),
                KeyCode::Backspace => input.handle_backspace(),
                KeyCode::Left => input.move_cursor_left(),
                KeyCode::Right => input.move_cursor_right(),
                _ => {}
            }
            return;
        }

        let count = self.friends.len();
        match key {
            KeyCode::Char('a') => self.friend_input = Some(InputField::new()),
            KeyCode::Up => {
                if let Some(i) = self.friends_state.selected() {
                    self.friends_state.select(Some(i.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if count > 0 {
                    let i = self.friends_state.selected().map_or(0, |i| (i + 1).min(count - 1));
                    self.friends_state.select(Some(i));
                }
            }
            KeyCode::Char('d') => {
                let name = self
                    .friends_state
                    .selected()
                    .and_then(|i| self.friends.iter().nth(i))
                    .map(|f| f.name.clone());
                if let Some(name) = name {
                    match self.friends.remove(&name) {
                        Ok(_) => {
                            self.vault.save_friends(&self.friends);
                            let remaining = self.friends.len();
                            self.friends_state.select(if remaining == 0 {
                                None
                            } else {
                                self.friends_state.selected().map(|i| i.min(remaining - 1))
                            });
                            self.set_status_message(format!("Removed {name}"));
                        }
                        Err(e) => self.set_error(e),
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_plans_input(&mut self, key: KeyCode) {
        let selected = self.plan_state.selected().unwrap_or(0);
        match key {
            KeyCode::Up => self.plan_state.select(Some(selected.saturating_sub(1))),
            KeyCode::Down => self.plan_state.select(Some((selected + 1).min(Plan::ALL.len() - 1))),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let plan = Plan::ALL[selected];
                if plan != self.plan {
                    self.plan = plan;
                    self.vault.save_plan(plan);
                }
                self.set_status_message(format!("Current plan: {}", format_plan(plan)));
            }
            _ => {}
        }
    }

    fn handle_sounds_input(&mut self, key: KeyCode) {
        let before = self.settings;
        match (key, self.sound_row) {
            (KeyCode::Up, row) => self.sound_row = row.prev(),
            (KeyCode::Down, row) => self.sound_row = row.next(),
            (KeyCode::Left | KeyCode::Right, SoundRow::Sound) => {
                let idx = Sound::ALL.iter().position(|s| *s == self.settings.sound).unwrap_or(0);
                let len = Sound::ALL.len();
                let next = if key == KeyCode::Right { (idx + 1) % len } else { (idx + len - 1) % len };
                self.settings.sound = Sound::ALL[next];
            }
            (KeyCode::Left, SoundRow::Volume) => {
                self.settings.volume = self.settings.volume.saturating_sub(5);
            }
            (KeyCode::Right, SoundRow::Volume) => {
                let volume = (self.settings.volume as u16 + 5).min(100);
                if let Err(e) = self.settings.set_volume(volume) {
                    self.set_error(e);
                }
            }
            (KeyCode::Left | KeyCode::Right | KeyCode::Enter | KeyCode::Char(' '), SoundRow::Mute) => {
                self.settings.muted = !self.settings.muted;
            }
            _ => {}
        }
        if self.settings != before {
            self.vault.save_settings(&self.settings);
        }
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering, input and timers until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
            self.tick(Instant::now());

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn config() -> Config {
        Config {
            data_dir: PathBuf::from("."),
            login_delay: Duration::ZERO,
            default_view: CalendarView::Month,
            reward_interval: 10,
        }
    }

    fn app() -> App {
        App::new(config(), Vault::new(MemoryStore::new()))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn logged_in() -> App {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "me@example.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "secret");
        press(&mut app, KeyCode::Enter);
        app.tick(Instant::now());
        app
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "me@example.com");
        press(&mut app, KeyCode::Enter);
        assert!(app.status_is_error);
        assert!(!app.login_pending());
        assert_eq!(app.screen(), Screen::Login);
    }

    #[test]
    fn test_login_lands_on_calendar() {
        let app = logged_in();
        assert_eq!(app.screen(), Screen::Main(Section::Calendar));
        assert_eq!(app.user.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn test_leaving_login_cancels_pending_attempt() {
        let mut app = App::new(
            Config { login_delay: Duration::from_secs(60), ..config() },
            Vault::new(MemoryStore::new()),
        );
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "a@b.c");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "pw");
        press(&mut app, KeyCode::Enter);
        assert!(app.login_pending());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Home);
        assert!(!app.login_pending());
        app.tick(Instant::now() + Duration::from_secs(120));
        assert_eq!(app.screen(), Screen::Home);
    }

    #[test]
    fn test_registration_prefills_login() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        type_text(&mut app, "Ana");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ana@example.com");
        press(&mut app, KeyCode::Enter);
        assert!(app.status_is_error);
        assert_eq!(app.screen(), Screen::Register);

        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "pw");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(app.login_email.value, "ana@example.com");
        assert_eq!(app.login_field, LoginField::Password);
    }

    #[test]
    fn test_add_and_complete_task_from_calendar() {
        let mut app = logged_in();
        let today = app.today;
        press(&mut app, KeyCode::Enter);
        assert!(app.day_editor.is_some());

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Read 10 pages");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.tasks(today).len(), 1);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.store.is_completed(today));
        assert_eq!(app.current_streak(), 1);

        press(&mut app, KeyCode::Esc);
        assert!(app.day_editor.is_none());
        draw(&mut app);
    }

    #[test]
    fn test_past_day_cannot_be_opened() {
        let mut app = logged_in();
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        assert!(app.day_editor.is_none());
        assert!(app.status_is_error);
    }

    #[test]
    fn test_event_click_opens_task_for_editing() {
        let mut app = logged_in();
        let today = app.today;
        let id = app.store.add_task(today, "stretch", today).unwrap().id;
        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.view, CalendarView::Day);
        assert_eq!(app.visible_events().len(), 1);

        press(&mut app, KeyCode::Enter);
        let editor = app.day_editor.as_ref().unwrap();
        assert_eq!(editor.mode, EditorMode::Editing(id));
        assert_eq!(editor.input.value, "stretch");
        draw(&mut app);
    }

    #[test]
    fn test_typing_q_in_editor_does_not_quit() {
        let mut app = logged_in();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "quiz");
        assert!(!app.should_quit());
        assert_eq!(app.day_editor.as_ref().unwrap().input.value, "quiz");
    }

    #[test]
    fn test_notes_are_saved_when_leaving_section() {
        let mut app = logged_in();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen(), Screen::Main(Section::Notes));
        type_text(&mut app, "q1");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "q2");
        assert!(!app.should_quit());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.vault.load_notes(), "q1\nq2");
    }

    #[test]
    fn test_friends_plans_and_sounds_persist() {
        let mut app = logged_in();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Luis");
        press(&mut app, KeyCode::Enter);
        assert!(app.vault.load_friends().contains("luis"));

        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.vault.load_plan(), Plan::Plus);

        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        let settings = app.vault.load_settings();
        assert_eq!(settings.volume, 75);
        assert!(settings.muted);
    }

    #[test]
    fn test_logout_returns_home() {
        let mut app = logged_in();
        ctrl(&mut app, 'l');
        assert_eq!(app.screen(), Screen::Home);
        assert!(app.user.is_none());
    }

    #[test]
    fn test_every_screen_renders() {
        let mut app = logged_in();
        for section in Section::ALL {
            app.switch_screen(Screen::Main(section));
            draw(&mut app);
        }
        for screen in [Screen::Home, Screen::Login, Screen::Register] {
            app.switch_screen(screen);
            draw(&mut app);
        }
    }
}
