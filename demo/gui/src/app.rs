//! TUI Application state and event handling.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use forms_core::bond_form::{bond_pricing_page, BondPricingController};
use forms_core::dispatch::{Dispatcher, Reply};
use forms_core::option_form::{option_pricing_page, OptionPricingController};
use forms_core::page::{Element, Page};
use forms_core::selection::MissingSelectionPolicy;
use forms_core::service::PricingService;
use forms_core::wire::{BondPricingRequest, OptionPricingRequest};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::config::GuiConfig;
use crate::error::GuiError;
use crate::screens;

/// Available screens in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Black-Scholes option pricer
    OptionPricer,
    /// Bond pricer
    BondPricer,
}

impl Screen {
    /// Get screen title
    pub fn title(&self) -> &'static str {
        match self {
            Self::OptionPricer => "Option Pricer",
            Self::BondPricer => "Bond Pricer",
        }
    }
}

/// What the driver has to do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the application
    Quit,
    /// Activate the controller of a screen
    Trigger(Screen),
}

/// A request ready to be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingRequest {
    Option(OptionPricingRequest),
    Bond(BondPricingRequest),
}

/// Page state and key handling of both screens, independent of the terminal
#[derive(Debug, Clone)]
pub struct FormApp {
    current_screen: Screen,
    option_page: Page,
    bond_page: Page,
    option_focus: usize,
    bond_focus: usize,
    option_controller: OptionPricingController,
    bond_controller: BondPricingController,
}

impl FormApp {
    /// Build both pages with placeholder overrides and controllers with `policy`
    pub fn new(
        policy: MissingSelectionPolicy,
        placeholders: &std::collections::BTreeMap<String, String>,
    ) -> Self {
        let mut option_page = option_pricing_page();
        let mut bond_page = bond_pricing_page();
        option_page.apply_placeholders(placeholders);
        bond_page.apply_placeholders(placeholders);

        Self {
            current_screen: Screen::OptionPricer,
            option_page,
            bond_page,
            option_focus: 0,
            bond_focus: 0,
            option_controller: OptionPricingController::new(policy),
            bond_controller: BondPricingController::new(policy),
        }
    }

    /// Build from configuration
    pub fn from_config(config: &GuiConfig) -> Self {
        Self::new(config.missing_selection, &config.placeholders)
    }

    pub fn current_screen(&self) -> Screen {
        self.current_screen
    }

    pub fn page(&self, screen: Screen) -> &Page {
        match screen {
            Screen::OptionPricer => &self.option_page,
            Screen::BondPricer => &self.bond_page,
        }
    }

    fn page_mut(&mut self, screen: Screen) -> &mut Page {
        match screen {
            Screen::OptionPricer => &mut self.option_page,
            Screen::BondPricer => &mut self.bond_page,
        }
    }

    pub fn current_page(&self) -> &Page {
        self.page(self.current_screen)
    }

    fn focus_index(&self) -> usize {
        match self.current_screen {
            Screen::OptionPricer => self.option_focus,
            Screen::BondPricer => self.bond_focus,
        }
    }

    fn set_focus_index(&mut self, idx: usize) {
        match self.current_screen {
            Screen::OptionPricer => self.option_focus = idx,
            Screen::BondPricer => self.bond_focus = idx,
        }
    }

    /// Id of the focused element on the current screen
    pub fn focused_id(&self) -> Option<&str> {
        self.current_page()
            .focusable_ids()
            .get(self.focus_index())
            .copied()
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.current_page().focusable_ids().len();
        if count == 0 {
            return;
        }
        let idx = self.focus_index();
        let next = if forward {
            (idx + 1) % count
        } else {
            (idx + count - 1) % count
        };
        self.set_focus_index(next);
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        // An open alert swallows every key until dismissed
        if !self.current_page().pending_alerts().is_empty() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                let screen = self.current_screen;
                self.page_mut(screen).dismiss_alert();
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => return Some(Action::Quit),
            KeyCode::F(1) => self.current_screen = Screen::OptionPricer,
            KeyCode::F(2) => self.current_screen = Screen::BondPricer,
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            code => return self.edit_focused(code, key.modifiers),
        }
        None
    }

    fn edit_focused(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        let screen = self.current_screen;
        let id = self.focused_id()?.to_string();
        let element = self.current_page().element(&id)?.clone();

        let result = match (element, code) {
            (Element::Button(_), KeyCode::Enter) => return Some(Action::Trigger(screen)),
            (Element::Radio(_), KeyCode::Enter | KeyCode::Char(' ')) => {
                self.page_mut(screen).check(&id)
            }
            (Element::Input(_), KeyCode::Enter) => {
                self.move_focus(true);
                Ok(())
            }
            (Element::Input(input), KeyCode::Char(c))
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut value = input.value;
                value.push(c);
                self.page_mut(screen).set_value(&id, value)
            }
            (Element::Input(input), KeyCode::Backspace) => {
                let mut value = input.value;
                value.pop();
                self.page_mut(screen).set_value(&id, value)
            }
            (Element::Input(_), KeyCode::Delete) => self.page_mut(screen).set_value(&id, ""),
            _ => Ok(()),
        };

        if let Err(e) = result {
            warn!(error = %e, "key handling failed");
        }
        None
    }

    /// Run the selection and request steps of a screen's controller.
    ///
    /// Returns `None` when the policy blocked the request or the page is
    /// missing an element the controller needs.
    pub fn trigger(&mut self, screen: Screen) -> Option<PricingRequest> {
        let result = match screen {
            Screen::OptionPricer => self
                .option_controller
                .prepare(&mut self.option_page)
                .map(|r| r.map(PricingRequest::Option)),
            Screen::BondPricer => self
                .bond_controller
                .prepare(&mut self.bond_page)
                .map(|r| r.map(PricingRequest::Bond)),
        };

        match result {
            Ok(request) => request,
            Err(e) => {
                warn!(screen = screen.title(), error = %e, "form activation aborted");
                None
            }
        }
    }

    /// Apply a reply to the page it belongs to
    pub fn apply_reply(&mut self, reply: Reply) {
        let seq = reply.seq();
        let result = match reply {
            Reply::Option { result, .. } => self
                .option_controller
                .handle_reply(&mut self.option_page, result),
            Reply::Bond { result, .. } => self
                .bond_controller
                .handle_reply(&mut self.bond_page, result),
        };

        match result {
            Ok(outcome) => debug!(seq, ?outcome, "reply applied"),
            Err(e) => warn!(seq, error = %e, "reply could not be rendered"),
        }
    }
}

/// TUI Application: terminal driver around [`FormApp`]
pub struct TuiApp<P: PricingService + ?Sized + 'static> {
    /// Page state
    state: FormApp,
    /// Request dispatcher
    dispatcher: Dispatcher<P>,
    /// Replies from in-flight requests
    replies: UnboundedReceiver<Reply>,
    /// Exit flag
    should_quit: bool,
    /// Terminal
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl<P: PricingService + ?Sized + 'static> TuiApp<P> {
    /// Create a new TUI application
    pub fn new(config: &GuiConfig, service: Arc<P>) -> Result<Self, GuiError> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let (dispatcher, replies) = Dispatcher::new(service);

        Ok(Self {
            state: FormApp::from_config(config),
            dispatcher,
            replies,
            should_quit: false,
            terminal,
        })
    }

    /// Run the TUI event loop
    pub async fn run(&mut self) -> Result<(), GuiError> {
        loop {
            // Replies land between frames; whichever arrives last is shown
            while let Ok(reply) = self.replies.try_recv() {
                self.state.apply_reply(reply);
            }

            let state = &self.state;
            self.terminal.draw(|frame| Self::draw(frame, state))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let action = self.state.handle_key(key);
                        self.handle_action(action);
                    }
                }
            } else {
                // Let spawned requests make progress on this thread too
                tokio::task::yield_now().await;
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_action(&mut self, action: Option<Action>) {
        match action {
            Some(Action::Quit) => self.should_quit = true,
            Some(Action::Trigger(screen)) => match self.state.trigger(screen) {
                Some(PricingRequest::Option(request)) => {
                    self.dispatcher.dispatch_option(request);
                }
                Some(PricingRequest::Bond(request)) => {
                    self.dispatcher.dispatch_bond(request);
                }
                None => {}
            },
            None => {}
        }
    }

    /// Draw the current screen
    fn draw(frame: &mut Frame, state: &FormApp) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Footer
            ])
            .split(area);

        Self::draw_header(frame, chunks[0], state.current_screen());

        let page = state.current_page();
        screens::draw_page(frame, chunks[1], page, state.focused_id());

        Self::draw_footer(frame, chunks[2]);

        if let Some(message) = page.pending_alerts().first() {
            screens::draw_alert(frame, area, message);
        }
    }

    /// Draw header
    fn draw_header(frame: &mut Frame, area: Rect, screen: Screen) {
        let title = format!(" Pricing Forms - {} ", screen.title());
        let header = Paragraph::new(title)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    /// Draw footer with keybindings
    fn draw_footer(frame: &mut Frame, area: Rect) {
        let footer_text = " [F1]Options [F2]Bonds | [Tab/Up/Down]Move [Space]Select [Enter]Activate [Del]Clear | [Esc]Quit ";
        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);
    }
}

impl<P: PricingService + ?Sized + 'static> Drop for TuiApp<P> {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
