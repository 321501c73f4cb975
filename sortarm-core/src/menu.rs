//! Menu state machine
//!
//! Hierarchical menu driven by single button presses. Up/Down move the
//! selection (wrapping), Center commits or drills down, Left goes back one
//! level and forgets the selection. Right is not used.
//!
//! ```text
//! Main ─┬─ Start
//!       ├─ Set Drop Off ── zone list ── color ── height
//!       ├─ Set Time (Center toggles value adjust)
//!       ├─ Get Color ── zone list
//!       └─ Stop
//! ```

use core::fmt::Write;

use heapless::String;
use sortarm_display::LINE_LEN;

use crate::classify::Color;
use crate::config::{HeightClass, SessionConfig};
use crate::traits::Button;

/// Step applied to a time value per Up/Down press while adjusting
pub const TIME_STEP_MS: u32 = 1000;

/// Choices offered for a drop-off zone, `None` clears it
pub const COLOR_CHOICES: [Option<Color>; 5] = [
    Some(Color::Red),
    Some(Color::Green),
    Some(Color::Blue),
    Some(Color::Yellow),
    None,
];

const MAIN_ITEMS: [&str; 5] = ["Start", "Set Drop Off", "Set Time", "Get Color", "Stop"];

/// Menu label text
pub type Label = String<LINE_LEN>;

/// Current menu level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuLevel {
    #[default]
    Main,
    /// Drop-off zones with their assigned colors
    DropoffZoneList,
    /// Color choice for one zone
    DropoffZone { zone: usize },
    /// Height choice for one zone, color already chosen
    ZoneHeight { zone: usize, color: Option<Color> },
    /// Cycle wait and start delay
    SetTime,
    /// Zone to pick up and inspect
    GetColorAt,
}

/// What the controller should do after a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Menu changed (or nothing happened); redraw
    None,
    /// Start sorting
    Start,
    /// Terminate the program
    Stop,
    /// Pick up and classify whatever is at this zone
    GetColorAt(usize),
}

/// Time values editable from the SetTime level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeField {
    /// Wait between cycles
    Check,
    /// Countdown before the first cycle
    Delay,
}

impl TimeField {
    fn value_mut(self, session: &mut SessionConfig) -> &mut u32 {
        match self {
            TimeField::Check => &mut session.wait_between_cycles_ms,
            TimeField::Delay => &mut session.start_delay_ms,
        }
    }

    fn value(self, session: &SessionConfig) -> u32 {
        match self {
            TimeField::Check => session.wait_between_cycles_ms,
            TimeField::Delay => session.start_delay_ms,
        }
    }
}

/// Menu navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Menu {
    level: MenuLevel,
    selected: usize,
    adjusting: bool,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the top of the main menu
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn level(&self) -> MenuLevel {
        self.level
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Whether Up/Down currently change a time value
    pub fn adjusting(&self) -> bool {
        self.adjusting
    }

    /// Number of items at the current level
    pub fn item_count(&self, session: &SessionConfig) -> usize {
        match self.level {
            MenuLevel::Main => MAIN_ITEMS.len(),
            MenuLevel::DropoffZoneList => session.zones.drop_zone_count(),
            MenuLevel::DropoffZone { .. } => COLOR_CHOICES.len(),
            MenuLevel::ZoneHeight { .. } => HeightClass::ALL.len(),
            MenuLevel::SetTime => Self::time_fields(session).len(),
            MenuLevel::GetColorAt => session.zones.len(),
        }
    }

    /// Handle one accepted button press
    pub fn handle(&mut self, button: Button, session: &mut SessionConfig) -> MenuAction {
        match button {
            Button::Up if self.adjusting => self.adjust(session, true),
            Button::Down if self.adjusting => self.adjust(session, false),
            Button::Up => self.step(session, false),
            Button::Down => self.step(session, true),
            Button::Center => return self.select(session),
            Button::Left => self.back(),
            Button::Right => {}
        }
        MenuAction::None
    }

    fn step(&mut self, session: &SessionConfig, forward: bool) {
        let count = self.item_count(session);
        if count == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % count
        } else if self.selected == 0 {
            count - 1
        } else {
            (self.selected - 1) % count
        };
    }

    fn adjust(&mut self, session: &mut SessionConfig, up: bool) {
        let Some(field) = Self::time_fields(session).get(self.selected).copied() else {
            return;
        };
        let value = field.value_mut(session);
        *value = if up {
            value.saturating_add(TIME_STEP_MS)
        } else {
            value.saturating_sub(TIME_STEP_MS)
        };
    }

    fn select(&mut self, session: &mut SessionConfig) -> MenuAction {
        match self.level {
            MenuLevel::Main => match self.selected {
                0 => return MenuAction::Start,
                1 => self.enter(MenuLevel::DropoffZoneList, 0),
                2 => self.enter(MenuLevel::SetTime, 0),
                3 => self.enter(MenuLevel::GetColorAt, 0),
                _ => return MenuAction::Stop,
            },
            MenuLevel::DropoffZoneList => {
                if let Some(zone) = session.zones.drop_zone_index(self.selected) {
                    let current = session.zones.get(zone).and_then(|z| z.color);
                    let choice = COLOR_CHOICES
                        .iter()
                        .position(|c| *c == current)
                        .unwrap_or(0);
                    self.enter(MenuLevel::DropoffZone { zone }, choice);
                }
            }
            MenuLevel::DropoffZone { zone } => {
                let color = COLOR_CHOICES.get(self.selected).copied().flatten();
                if session.capabilities.elevated_heights {
                    let current = session.zones.get(zone).map(|z| z.height).unwrap_or_default();
                    let choice = HeightClass::ALL
                        .iter()
                        .position(|h| *h == current)
                        .unwrap_or(0);
                    self.enter(MenuLevel::ZoneHeight { zone, color }, choice);
                } else {
                    Self::commit(session, zone, color, None);
                    self.return_to_zone_list(session, zone);
                }
            }
            MenuLevel::ZoneHeight { zone, color } => {
                let height = HeightClass::ALL.get(self.selected).copied();
                Self::commit(session, zone, color, height);
                self.return_to_zone_list(session, zone);
            }
            MenuLevel::SetTime => self.adjusting = !self.adjusting,
            MenuLevel::GetColorAt => {
                if self.selected < session.zones.len() {
                    return MenuAction::GetColorAt(self.selected);
                }
            }
        }
        MenuAction::None
    }

    fn back(&mut self) {
        let parent = match self.level {
            MenuLevel::Main => return,
            MenuLevel::SetTime if self.adjusting => {
                self.adjusting = false;
                return;
            }
            MenuLevel::DropoffZoneList | MenuLevel::SetTime | MenuLevel::GetColorAt => {
                MenuLevel::Main
            }
            MenuLevel::DropoffZone { .. } => MenuLevel::DropoffZoneList,
            MenuLevel::ZoneHeight { zone, .. } => MenuLevel::DropoffZone { zone },
        };
        self.enter(parent, 0);
    }

    fn enter(&mut self, level: MenuLevel, selected: usize) {
        self.level = level;
        self.selected = selected;
        self.adjusting = false;
    }

    fn commit(
        session: &mut SessionConfig,
        zone: usize,
        color: Option<Color>,
        height: Option<HeightClass>,
    ) {
        if let Some(entry) = session.zones.get_mut(zone) {
            entry.color = color;
            if let Some(height) = height {
                entry.height = height;
            }
            log_info!("zone {} set to {:?} at {:?}", zone, entry.color, entry.height);
        }
    }

    fn return_to_zone_list(&mut self, session: &SessionConfig, zone: usize) {
        let row = session
            .zones
            .drop_number(zone)
            .map_or(0, |number| number - 1);
        self.enter(MenuLevel::DropoffZoneList, row);
    }

    fn time_fields(session: &SessionConfig) -> &'static [TimeField] {
        if session.capabilities.start_delay {
            &[TimeField::Check, TimeField::Delay]
        } else {
            &[TimeField::Check]
        }
    }

    /// Title row for the current level
    pub fn title(&self, session: &SessionConfig) -> Label {
        let mut title = Label::new();
        let _ = match self.level {
            MenuLevel::Main => title.write_str("Main Menu"),
            MenuLevel::DropoffZoneList => title.write_str("Set Drop Off"),
            MenuLevel::DropoffZone { zone } => write!(
                title,
                "Set Color For: Zone {}",
                session.zones.drop_number(zone).unwrap_or(0)
            ),
            MenuLevel::ZoneHeight { zone, .. } => write!(
                title,
                "Height For: Zone {}",
                session.zones.drop_number(zone).unwrap_or(0)
            ),
            MenuLevel::SetTime => title.write_str("Set Time"),
            MenuLevel::GetColorAt => title.write_str("Get Color At"),
        };
        title
    }

    /// Label of item `index` at the current level
    pub fn label(&self, index: usize, session: &SessionConfig) -> Label {
        let mut label = Label::new();
        let _ = match self.level {
            MenuLevel::Main => label.write_str(MAIN_ITEMS.get(index).copied().unwrap_or("")),
            MenuLevel::DropoffZoneList => {
                match session
                    .zones
                    .drop_zone_index(index)
                    .and_then(|zone| session.zones.get(zone))
                {
                    Some(zone) if session.capabilities.elevated_heights => write!(
                        label,
                        "Zone {}: {} {}",
                        index + 1,
                        color_name(zone.color),
                        zone.height.short_name()
                    ),
                    Some(zone) => write!(label, "Zone {}: {}", index + 1, color_name(zone.color)),
                    None => Ok(()),
                }
            }
            MenuLevel::DropoffZone { .. } => match COLOR_CHOICES.get(index) {
                Some(choice) => label.write_str(color_name(*choice)),
                None => Ok(()),
            },
            MenuLevel::ZoneHeight { .. } => match HeightClass::ALL.get(index) {
                Some(height) => label.write_str(height.name()),
                None => Ok(()),
            },
            MenuLevel::SetTime => match Self::time_fields(session).get(index) {
                Some(field) => {
                    let name = match field {
                        TimeField::Check => "Check",
                        TimeField::Delay => "Delay",
                    };
                    let value = field.value(session);
                    if self.adjusting && index == self.selected {
                        write!(label, "{}: <{}> ms", name, value)
                    } else {
                        write!(label, "{}: {} ms", name, value)
                    }
                }
                None => Ok(()),
            },
            MenuLevel::GetColorAt => match session.zones.drop_number(index) {
                Some(number) => write!(label, "Zone {}", number),
                None if index < session.zones.len() => label.write_str("Pick up"),
                None => Ok(()),
            },
        };
        label
    }
}

fn color_name(color: Option<Color>) -> &'static str {
    color.map_or("None", Color::name)
}
