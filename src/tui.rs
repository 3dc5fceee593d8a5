//! Terminal view for the chat client
//!
//! Rendering reads the controller; key handling maps terminal input to
//! [`Action`]s that [`run`] applies. Relay calls run as background tasks and
//! report back through a channel, so the view keeps redrawing (typing
//! indicator, input) while a reply is outstanding.

use crate::chat::{
    ClientError, ConversationController, Message, PendingReply, RelayClient, Sender,
    TransitionError, SUGGESTIONS,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

const ASSISTANT_NAME: &str = "TravelPal AI Assistant";
const STATUS_READY: &str = "Online • Ready to help";
const STATUS_TYPING: &str = "Typing…";
const INPUT_PLACEHOLDER: &str = "Ask me anything about travel...";

/// What a key press asks the event loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    Suggestion(usize),
    Clear,
    Input(char),
    Backspace,
    ScrollUp,
    ScrollDown,
    Ignore,
}

/// Map a terminal key event to an action
#[must_use]
pub fn map_key(key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::Ignore;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('l') if ctrl => Action::Clear,
        KeyCode::Char(_) if ctrl => Action::Ignore,
        KeyCode::Char(c) => Action::Input(c),
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::F(n @ 1..=4) => Action::Suggestion(usize::from(n - 1)),
        KeyCode::Up | KeyCode::PageUp => Action::ScrollUp,
        KeyCode::Down | KeyCode::PageDown => Action::ScrollDown,
        _ => Action::Ignore,
    }
}

/// Terminal input forwarded to [`run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(KeyEvent),
    Resize,
}

type Settled = (PendingReply, Result<String, ClientError>);

/// Run the chat UI until the user quits or `input_rx` closes
///
/// # Errors
///
/// Fails if drawing to the terminal fails.
pub async fn run<B, R>(
    terminal: &mut Terminal<B>,
    relay: &Arc<R>,
    mut input_rx: mpsc::UnboundedReceiver<Input>,
) -> io::Result<()>
where
    B: Backend,
    R: RelayClient + 'static,
{
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settled>();

    let mut chat = ConversationController::new();
    let mut view = ChatView::new();

    loop {
        view.follow(&mut chat);
        terminal.draw(|frame| view.render(frame, &chat))?;

        tokio::select! {
            input = input_rx.recv() => {
                let Some(input) = input else {
                    tracing::warn!("Terminal input closed, shutting down");
                    break;
                };
                let key = match input {
                    Input::Key(key) => key,
                    Input::Resize => continue,
                };
                let submitted = match map_key(key) {
                    Action::Quit => break,
                    Action::Submit => Some(chat.submit_input()),
                    Action::Suggestion(index) => Some(chat.submit_suggestion(index)),
                    Action::Clear => {
                        chat.clear();
                        None
                    }
                    Action::Input(c) => {
                        chat.push_input(c);
                        None
                    }
                    Action::Backspace => {
                        chat.pop_input();
                        None
                    }
                    Action::ScrollUp => {
                        view.scroll_up();
                        None
                    }
                    Action::ScrollDown => {
                        view.scroll_down(chat.transcript().len());
                        None
                    }
                    Action::Ignore => None,
                };
                match submitted {
                    Some(Ok(pending)) => dispatch(relay, &settled_tx, pending),
                    Some(Err(e)) => log_rejection(&e),
                    None => {}
                }
            }
            // `settled_tx` lives as long as this loop, so this arm never closes
            Some((pending, outcome)) = settled_rx.recv() => {
                if let Err(e) = chat.settle(pending, outcome) {
                    tracing::error!(error = %e, "Could not settle relay reply");
                }
            }
        }
    }

    Ok(())
}

/// Send the pending message in the background; the outcome comes back
/// through `settled_tx`
fn dispatch<R: RelayClient + 'static>(
    relay: &Arc<R>,
    settled_tx: &mpsc::UnboundedSender<Settled>,
    pending: PendingReply,
) {
    let relay = Arc::clone(relay);
    let settled_tx = settled_tx.clone();
    tokio::spawn(async move {
        let outcome = relay.send(pending.text()).await;
        if settled_tx.send((pending, outcome)).is_err() {
            tracing::debug!("Reply arrived after the client shut down");
        }
    });
}

fn log_rejection(error: &TransitionError) {
    match error {
        TransitionError::EmptyMessage | TransitionError::Busy => {
            tracing::debug!(error = %error, "Submission ignored");
        }
        _ => tracing::warn!(error = %error, "Submission rejected"),
    }
}

/// View state that outlives a single frame
#[derive(Debug, Default)]
pub struct ChatView {
    list_state: ListState,
}

impl ChatView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to the newest message whenever the transcript changed
    pub fn follow(&mut self, chat: &mut ConversationController) {
        if chat.take_scroll_request() {
            let last = chat.transcript().len().saturating_sub(1);
            self.list_state.select(Some(last));
        }
    }

    pub fn scroll_up(&mut self) {
        let current = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(current.saturating_sub(1)));
    }

    pub fn scroll_down(&mut self, message_count: usize) {
        let current = self.list_state.selected().unwrap_or(0);
        let last = message_count.saturating_sub(1);
        self.list_state.select(Some((current + 1).min(last)));
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn render(&mut self, frame: &mut Frame, chat: &ConversationController) {
        let [header, body, typing, chips, input] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .areas(frame.area());

        render_header(frame, header, chat);
        self.render_transcript(frame, body, chat);
        render_typing(frame, typing, chat);
        render_suggestions(frame, chips, chat);
        render_input(frame, input, chat);
    }

    fn render_transcript(&mut self, frame: &mut Frame, area: Rect, chat: &ConversationController) {
        let width = usize::from(area.width.saturating_sub(4)).max(10);
        let items: Vec<ListItem> = chat
            .transcript()
            .iter()
            .map(|message| message_item(message, width))
            .collect();

        let list = List::new(items).block(Block::bordered());
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

fn render_header(frame: &mut Frame, area: Rect, chat: &ConversationController) {
    let status = if chat.is_awaiting_reply() {
        STATUS_TYPING
    } else {
        STATUS_READY
    };
    let line = Line::from(vec![
        Span::styled(ASSISTANT_NAME, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(status, Style::default().fg(Color::Green)),
    ]);
    let header = Paragraph::new(line).block(Block::bordered().title(" Ctrl-L clear · Esc quit "));
    frame.render_widget(header, area);
}

fn render_typing(frame: &mut Frame, area: Rect, chat: &ConversationController) {
    if chat.is_awaiting_reply() {
        let dots = Paragraph::new(Span::styled(" ● ● ●", Style::default().fg(Color::DarkGray)));
        frame.render_widget(dots, area);
    }
}

fn render_suggestions(frame: &mut Frame, area: Rect, chat: &ConversationController) {
    let style = if chat.is_awaiting_reply() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let lines: Vec<Line> = SUGGESTIONS
        .chunks(2)
        .enumerate()
        .map(|(row, pair)| {
            let spans: Vec<Span> = pair
                .iter()
                .enumerate()
                .flat_map(|(col, text)| {
                    let key = row * 2 + col + 1;
                    [
                        Span::styled(format!(" F{key} "), style.add_modifier(Modifier::REVERSED)),
                        Span::styled(format!(" {text}   "), style),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let chips = Paragraph::new(lines).block(Block::bordered().title(" Suggestions "));
    frame.render_widget(chips, area);
}

fn render_input(frame: &mut Frame, area: Rect, chat: &ConversationController) {
    let (content, style) = if chat.input().is_empty() {
        (INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        (chat.input(), Style::default())
    };
    let title = if chat.can_send() {
        " Enter to send "
    } else {
        " Message "
    };

    let input = Paragraph::new(Span::styled(content, style)).block(Block::bordered().title(title));
    frame.render_widget(input, area);

    let typed = u16::try_from(chat.input().chars().count()).unwrap_or(u16::MAX);
    let max_x = area.x + area.width.saturating_sub(2);
    frame.set_cursor_position(((area.x + 1).saturating_add(typed).min(max_x), area.y + 1));
}

fn message_item(message: &Message, width: usize) -> ListItem<'static> {
    let (alignment, style) = match message.sender {
        Sender::User => (Alignment::Right, Style::default().fg(Color::Cyan)),
        Sender::Bot => (Alignment::Left, Style::default()),
    };

    let mut lines: Vec<Line<'static>> = wrap(&message.text, width)
        .into_iter()
        .map(|line| Line::styled(line, style).alignment(alignment))
        .collect();
    lines.push(
        Line::styled(message.display_time(), Style::default().fg(Color::DarkGray))
            .alignment(alignment),
    );
    lines.push(Line::default());

    ListItem::new(Text::from(lines))
}

/// Greedy word wrap by character count; words longer than `width` are split
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(width);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }

            let word_len = chars.len();
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars);
            current_len += word_len;
        }

        lines.push(current);
    }

    lines
}
