//! Terminal UI for the interactive estimator
//!
//! This module implements a three-step wizard using ratatui: video intake,
//! inventory review with move details, and the final cost breakdown.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::models::{CostEstimate, Inventory, MoveParameters};

/// Home types the extraction prompt understands.
pub const HOME_TYPES: [&str; 2] = ["apartment", "house"];

const MIN_ROOMS: u32 = 1;
const MAX_ROOMS: u32 = 10;

/// Wizard step currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Intake,
    Inventory,
    Estimate,
}

/// Where the walkthrough video comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Url,
}

/// Focused row on the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeField {
    SourceKind,
    SourceInput,
    HomeType,
    RoomCount,
}

/// Focused row on the move-details form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogisticsField {
    Distance,
    OriginFloor,
    ElevatorOrigin,
    DestinationFloor,
    ElevatorDestination,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    None,
    Quit,
    AnalyzeVideo,
    EstimateCost,
    SaveReport,
}

/// Application state for the interactive estimator
pub struct DashboardApp {
    pub screen: Screen,
    pub source_kind: SourceKind,
    pub source_input: String,
    pub home_type_index: usize,
    pub room_count: u32,
    pub intake_field: IntakeField,
    pub inventory: Option<Inventory>,
    pub logistics_field: LogisticsField,
    pub distance_input: String,
    pub origin_floor_input: String,
    pub destination_floor_input: String,
    pub elevator_origin: bool,
    pub elevator_destination: bool,
    pub estimate: Option<CostEstimate>,
    pub busy: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl Default for DashboardApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardApp {
    /// Create a fresh wizard session
    pub fn new() -> Self {
        Self {
            screen: Screen::Intake,
            source_kind: SourceKind::File,
            source_input: String::new(),
            home_type_index: 0,
            room_count: 3,
            intake_field: IntakeField::SourceKind,
            inventory: None,
            logistics_field: LogisticsField::Distance,
            distance_input: "45".to_string(),
            origin_floor_input: "3".to_string(),
            destination_floor_input: "2".to_string(),
            elevator_origin: false,
            elevator_destination: true,
            estimate: None,
            busy: false,
            status_message: None,
            error_message: None,
        }
    }

    /// Throw away all session state and return to the intake step
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn home_type(&self) -> &'static str {
        HOME_TYPES[self.home_type_index % HOME_TYPES.len()]
    }

    /// Parse the move-details form into validated parameters
    pub fn move_parameters(&self) -> Result<MoveParameters, String> {
        let distance_km: f64 = self
            .distance_input
            .trim()
            .parse()
            .map_err(|_| "distance must be a number".to_string())?;
        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err("distance must be greater than zero".to_string());
        }

        let origin_floor = parse_floor(&self.origin_floor_input, "origin floor")?;
        let destination_floor = parse_floor(&self.destination_floor_input, "destination floor")?;

        Ok(MoveParameters {
            distance_km,
            origin_floor,
            destination_floor,
            has_elevator_origin: self.elevator_origin,
            has_elevator_destination: self.elevator_destination,
        })
    }

    /// Record a finished analysis and advance to the review step
    pub fn inventory_ready(&mut self, inventory: Inventory) {
        self.inventory = Some(inventory);
        self.screen = Screen::Inventory;
        self.busy = false;
        self.status_message = None;
        self.error_message = None;
    }

    /// Record a finished estimate and advance to the final step
    pub fn estimate_ready(&mut self, estimate: CostEstimate) {
        self.estimate = Some(estimate);
        self.screen = Screen::Estimate;
        self.busy = false;
        self.status_message = None;
        self.error_message = None;
    }

    /// Surface a failed background call without leaving the current step
    pub fn task_failed(&mut self, message: String) {
        self.busy = false;
        self.status_message = None;
        self.error_message = Some(message);
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if self.busy {
            return match key.code {
                KeyCode::Esc => AppAction::Quit,
                _ => AppAction::None,
            };
        }
        if key.code == KeyCode::Esc {
            return AppAction::Quit;
        }

        match self.screen {
            Screen::Intake => self.handle_intake_key(key),
            Screen::Inventory => self.handle_logistics_key(key),
            Screen::Estimate => self.handle_estimate_key(key),
        }
    }

    fn handle_intake_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.intake_field = next_intake_field(self.intake_field);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.intake_field = prev_intake_field(self.intake_field);
            }
            KeyCode::Left | KeyCode::Right => match self.intake_field {
                IntakeField::SourceKind => {
                    self.source_kind = match self.source_kind {
                        SourceKind::File => SourceKind::Url,
                        SourceKind::Url => SourceKind::File,
                    };
                }
                IntakeField::HomeType => {
                    self.home_type_index = (self.home_type_index + 1) % HOME_TYPES.len();
                }
                IntakeField::RoomCount => {
                    self.room_count = if key.code == KeyCode::Right {
                        (self.room_count + 1).min(MAX_ROOMS)
                    } else {
                        self.room_count.saturating_sub(1).max(MIN_ROOMS)
                    };
                }
                IntakeField::SourceInput => {}
            },
            KeyCode::Char(' ') if self.intake_field == IntakeField::SourceKind => {
                self.source_kind = match self.source_kind {
                    SourceKind::File => SourceKind::Url,
                    SourceKind::Url => SourceKind::File,
                };
            }
            KeyCode::Char(c) if self.intake_field == IntakeField::SourceInput => {
                self.source_input.push(c);
            }
            KeyCode::Backspace if self.intake_field == IntakeField::SourceInput => {
                self.source_input.pop();
            }
            KeyCode::Enter => {
                if self.source_input.trim().is_empty() {
                    self.error_message =
                        Some("Enter a video path or URL before analyzing".to_string());
                } else {
                    self.error_message = None;
                    return AppAction::AnalyzeVideo;
                }
            }
            _ => {}
        }
        AppAction::None
    }

    fn handle_logistics_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.logistics_field = next_logistics_field(self.logistics_field);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.logistics_field = prev_logistics_field(self.logistics_field);
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => match self.logistics_field {
                LogisticsField::ElevatorOrigin => self.elevator_origin = !self.elevator_origin,
                LogisticsField::ElevatorDestination => {
                    self.elevator_destination = !self.elevator_destination;
                }
                _ => {}
            },
            KeyCode::Char(c) => {
                if let Some(input) = self.focused_text_input() {
                    if c.is_ascii_digit() || c == '.' {
                        input.push(c);
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = self.focused_text_input() {
                    input.pop();
                }
            }
            KeyCode::Enter => match self.move_parameters() {
                Ok(_) => {
                    self.error_message = None;
                    return AppAction::EstimateCost;
                }
                Err(e) => self.error_message = Some(e),
            },
            _ => {}
        }
        AppAction::None
    }

    fn handle_estimate_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => AppAction::Quit,
            KeyCode::Char('s') | KeyCode::Char('S') => AppAction::SaveReport,
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.reset();
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    fn focused_text_input(&mut self) -> Option<&mut String> {
        match self.logistics_field {
            LogisticsField::Distance => Some(&mut self.distance_input),
            LogisticsField::OriginFloor => Some(&mut self.origin_floor_input),
            LogisticsField::DestinationFloor => Some(&mut self.destination_floor_input),
            _ => None,
        }
    }

    /// Render the UI
    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(10),   // Body
                Constraint::Length(4), // Footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        match self.screen {
            Screen::Intake => self.render_intake(f, chunks[1]),
            Screen::Inventory => self.render_inventory(f, chunks[1]),
            Screen::Estimate => self.render_estimate(f, chunks[1]),
        }
        self.render_footer(f, chunks[2]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let step = match self.screen {
            Screen::Intake => "Step 1/3: Walkthrough Video",
            Screen::Inventory => "Step 2/3: Inventory & Move Details",
            Screen::Estimate => "Step 3/3: Cost Breakdown",
        };
        let hint = match self.screen {
            Screen::Intake => "Tab: next field | Left/Right: change value | Enter: analyze | Esc: quit",
            Screen::Inventory => "Tab: next field | Space: toggle elevator | Enter: calculate | Esc: quit",
            Screen::Estimate => "'s': save report | 'n': new estimate | 'q': quit",
        };

        let mut first = vec![
            Span::styled(
                "Moving Cost Estimator",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(step, Style::default().fg(Color::Yellow)),
        ];
        if self.busy {
            first.push(Span::raw("  |  "));
            first.push(Span::styled(
                self.status_message.as_deref().unwrap_or("Working..."),
                Style::default().fg(Color::Green),
            ));
        }

        let title = vec![
            Line::from(first),
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        ];

        let paragraph = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_intake(&self, f: &mut Frame, area: Rect) {
        let kind_label = match self.source_kind {
            SourceKind::File => "local file",
            SourceKind::Url => "YouTube URL",
        };
        let input_label = match self.source_kind {
            SourceKind::File => "Video path",
            SourceKind::Url => "Video URL",
        };

        let lines = vec![
            Line::from(""),
            form_line(
                self.intake_field == IntakeField::SourceKind,
                "Video source",
                kind_label.to_string(),
            ),
            form_line(
                self.intake_field == IntakeField::SourceInput,
                input_label,
                text_value(&self.source_input, self.intake_field == IntakeField::SourceInput),
            ),
            form_line(
                self.intake_field == IntakeField::HomeType,
                "Home type",
                self.home_type().to_string(),
            ),
            form_line(
                self.intake_field == IntakeField::RoomCount,
                "Rooms",
                self.room_count.to_string(),
            ),
            Line::from(""),
            Line::from(Span::styled(
                "The video should show every room and large furniture piece.",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Video Intake"));
        f.render_widget(paragraph, area);
    }

    fn render_inventory(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Summary
                Constraint::Min(5),    // Items table
                Constraint::Length(9), // Move details form
            ])
            .split(area);

        let Some(inventory) = &self.inventory else {
            let paragraph = Paragraph::new("No inventory yet.")
                .block(Block::default().borders(Borders::ALL).title("Inventory"));
            f.render_widget(paragraph, area);
            return;
        };

        let special = if inventory.needs_special_handling.is_empty() {
            "none".to_string()
        } else {
            inventory.needs_special_handling.join(", ")
        };
        let summary = vec![
            Line::from(format!(
                "{} items ({} pieces)  |  {:.0} cu ft",
                inventory.items.len(),
                inventory.total_quantity(),
                inventory.total_volume_cubic_feet,
            )),
            Line::from(vec![
                Span::raw("Special handling: "),
                Span::styled(special, Style::default().fg(Color::Yellow)),
            ]),
        ];
        f.render_widget(
            Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title("Summary")),
            chunks[0],
        );

        let header_cells = ["Item", "Qty", "Size", "Category"].iter().map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });
        let header = Row::new(header_cells).height(1).bottom_margin(1);
        let rows: Vec<Row> = inventory
            .items
            .iter()
            .map(|item| {
                Row::new(vec![
                    Cell::from(item.name.clone()),
                    Cell::from(item.quantity.to_string()),
                    Cell::from(item.size.as_str()),
                    Cell::from(item.category.as_str()),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(45),
                Constraint::Percentage(15),
                Constraint::Percentage(18),
                Constraint::Percentage(22),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Items Found"))
        .column_spacing(1);
        f.render_widget(table, chunks[1]);

        let form = vec![
            form_line(
                self.logistics_field == LogisticsField::Distance,
                "Distance (km)",
                text_value(
                    &self.distance_input,
                    self.logistics_field == LogisticsField::Distance,
                ),
            ),
            form_line(
                self.logistics_field == LogisticsField::OriginFloor,
                "Origin floor",
                text_value(
                    &self.origin_floor_input,
                    self.logistics_field == LogisticsField::OriginFloor,
                ),
            ),
            form_line(
                self.logistics_field == LogisticsField::ElevatorOrigin,
                "Origin elevator",
                yes_no(self.elevator_origin).to_string(),
            ),
            form_line(
                self.logistics_field == LogisticsField::DestinationFloor,
                "Destination floor",
                text_value(
                    &self.destination_floor_input,
                    self.logistics_field == LogisticsField::DestinationFloor,
                ),
            ),
            form_line(
                self.logistics_field == LogisticsField::ElevatorDestination,
                "Destination elevator",
                yes_no(self.elevator_destination).to_string(),
            ),
        ];
        f.render_widget(
            Paragraph::new(form).block(Block::default().borders(Borders::ALL).title("Move Details")),
            chunks[2],
        );
    }

    fn render_estimate(&self, f: &mut Frame, area: Rect) {
        let Some(estimate) = &self.estimate else {
            let paragraph = Paragraph::new("No estimate yet.")
                .block(Block::default().borders(Borders::ALL).title("Estimate"));
            f.render_widget(paragraph, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Headline numbers
                Constraint::Min(5),    // Breakdown table
            ])
            .split(area);

        let mut headline = vec![
            Line::from(vec![
                Span::raw("Total cost:  "),
                Span::styled(
                    format_money(estimate.total_cost),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(format!(
                "Range:       {} - {}",
                format_money(estimate.cost_range[0]),
                format_money(estimate.cost_range[1]),
            )),
            Line::from(format!(
                "Crew:        {} movers  |  {} truck  |  {} hours",
                estimate.movers_needed,
                estimate.truck_type.as_str().to_uppercase(),
                estimate.estimated_hours,
            )),
        ];
        if !estimate.special_notes.is_empty() {
            headline.push(Line::from(vec![
                Span::raw("Note:        "),
                Span::styled(
                    estimate.special_notes.clone(),
                    Style::default().fg(Color::Yellow),
                ),
            ]));
        }
        f.render_widget(
            Paragraph::new(headline)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title("Estimate")),
            chunks[0],
        );

        let breakdown = &estimate.breakdown;
        let components = [
            ("Labor", breakdown.labor),
            ("Truck", breakdown.truck),
            ("Fuel", breakdown.fuel),
            ("Stairs fee", breakdown.stairs_fee),
            ("Materials", breakdown.materials),
            ("Other fees", breakdown.other),
        ];
        let mut rows: Vec<Row> = components
            .iter()
            .map(|(label, value)| {
                Row::new(vec![
                    Cell::from(*label),
                    Cell::from(format_money(*value)),
                ])
            })
            .collect();
        rows.push(
            Row::new(vec![
                Cell::from("Total").style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(format_money(estimate.total_cost))
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            ])
            .top_margin(1),
        );

        let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Cost Breakdown"),
            )
            .column_spacing(1);
        f.render_widget(table, chunks[1]);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let content = if let Some(error) = &self.error_message {
            vec![
                Line::from(Span::styled(
                    format!("Error: {}", error),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled(
                    "Fix the input and try again.",
                    Style::default().fg(Color::Yellow),
                )),
            ]
        } else if let Some(status) = &self.status_message {
            vec![Line::from(Span::styled(
                status.clone(),
                Style::default().fg(Color::Green),
            ))]
        } else {
            vec![Line::from(Span::styled(
                "Estimates are generated from AI video analysis and may vary from actual costs.",
                Style::default().fg(Color::DarkGray),
            ))]
        };

        let paragraph = Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}

fn next_intake_field(field: IntakeField) -> IntakeField {
    match field {
        IntakeField::SourceKind => IntakeField::SourceInput,
        IntakeField::SourceInput => IntakeField::HomeType,
        IntakeField::HomeType => IntakeField::RoomCount,
        IntakeField::RoomCount => IntakeField::SourceKind,
    }
}

fn prev_intake_field(field: IntakeField) -> IntakeField {
    match field {
        IntakeField::SourceKind => IntakeField::RoomCount,
        IntakeField::SourceInput => IntakeField::SourceKind,
        IntakeField::HomeType => IntakeField::SourceInput,
        IntakeField::RoomCount => IntakeField::HomeType,
    }
}

fn next_logistics_field(field: LogisticsField) -> LogisticsField {
    match field {
        LogisticsField::Distance => LogisticsField::OriginFloor,
        LogisticsField::OriginFloor => LogisticsField::ElevatorOrigin,
        LogisticsField::ElevatorOrigin => LogisticsField::DestinationFloor,
        LogisticsField::DestinationFloor => LogisticsField::ElevatorDestination,
        LogisticsField::ElevatorDestination => LogisticsField::Distance,
    }
}

fn prev_logistics_field(field: LogisticsField) -> LogisticsField {
    match field {
        LogisticsField::Distance => LogisticsField::ElevatorDestination,
        LogisticsField::OriginFloor => LogisticsField::Distance,
        LogisticsField::ElevatorOrigin => LogisticsField::OriginFloor,
        LogisticsField::DestinationFloor => LogisticsField::ElevatorOrigin,
        LogisticsField::ElevatorDestination => LogisticsField::DestinationFloor,
    }
}

fn parse_floor(input: &str, label: &str) -> Result<u32, String> {
    let floor: u32 = input
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a whole number", label))?;
    if floor < 1 {
        return Err(format!("{} must be 1 or higher", label));
    }
    Ok(floor)
}

fn form_line(focused: bool, label: &str, value: String) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(marker.to_string()),
        Span::styled(format!("{:<22}", label), label_style),
        Span::raw(value),
    ])
}

fn text_value(input: &str, focused: bool) -> String {
    if focused {
        format!("{}_", input)
    } else {
        input.to_string()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Format a dollar amount with thousand separators and cents
fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    format!("${}.{:02}", format_number((cents / 100) as u64), cents % 100)
}

/// Format number with thousand separators
fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
