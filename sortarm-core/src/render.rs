//! Screen rendering
//!
//! Builds the text screen for each UI state. The brick LCD fits seven rows
//! of 22 characters with the default font; row 0 is the title.

use core::fmt::Write;

use heapless::String;
use sortarm_display::{DisplayBackend, Screen, LINE_LEN, SCREEN_ROWS};

use crate::classify::Classification;
use crate::config::{SessionConfig, ZoneTable};
use crate::engine::EngineStats;
use crate::menu::Menu;
use crate::state::RunState;
use crate::traits::Axis;

/// Rows available below the title
const BODY_ROWS: usize = SCREEN_ROWS - 1;

/// State of a "Get Color" inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Inspection {
    /// Arm still moving
    Checking,
    /// Gripper closed on nothing
    Empty,
    Found(Classification),
}

/// Screen renderer for the controller's UI states
#[derive(Debug, Default)]
pub struct Renderer {
    screen: Screen,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current screen buffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Push the screen to a display
    ///
    /// Display failures are logged; the arm keeps working without a screen.
    pub fn present<D: DisplayBackend>(&mut self, display: &mut D) {
        if let Err(e) = self.screen.render_to(display) {
            log_error!("display update failed: {:?}", e);
        }
    }

    pub fn render_homing(&mut self, axis: Axis) {
        self.screen.clear();
        self.screen.set_line(0, "SortArm");
        let mut line: String<LINE_LEN> = String::new();
        let _ = write_to_string(&mut line, format_args!("Homing {}...", axis.name()));
        self.screen.set_line(2, &line);
    }

    /// Render the current menu level, scrolling to keep the selection visible
    pub fn render_menu(&mut self, menu: &Menu, session: &SessionConfig) {
        self.screen.clear();
        self.screen.set_line(0, &menu.title(session));

        let count = menu.item_count(session);
        let selected = menu.selected();
        let first = if selected >= BODY_ROWS {
            selected + 1 - BODY_ROWS
        } else {
            0
        };

        for (row, index) in (first..count).take(BODY_ROWS).enumerate() {
            self.screen.set_line(row + 1, &menu.label(index, session));
        }
        if selected < count {
            self.screen.highlight(selected - first + 1);
        }
    }

    pub fn render_running(&mut self, state: &RunState, stats: &EngineStats) {
        self.screen.clear();
        self.screen.set_line(0, "Sorting");

        let mut line: String<LINE_LEN> = String::new();
        let _ = write_to_string(&mut line, format_args!("Step: {}", state.phase.name()));
        self.screen.set_line(1, &line);

        line.clear();
        let last = state.last_classification;
        let _ = write_to_string(
            &mut line,
            format_args!("Last: {} {}", last.color.name(), last.size.name()),
        );
        self.screen.set_line(2, &line);

        line.clear();
        let _ = write_to_string(
            &mut line,
            format_args!("Sorted {} Back {}", stats.sorted, stats.returned),
        );
        self.screen.set_line(3, &line);

        line.clear();
        let _ = write_to_string(&mut line, format_args!("Cycles {}", stats.cycles));
        self.screen.set_line(4, &line);

        self.screen.set_line(6, "Center: Pause");
    }

    pub fn render_paused(&mut self, axis: Axis) {
        self.screen.clear();
        self.screen.set_line(0, "Paused");
        let mut line: String<LINE_LEN> = String::new();
        let _ = write_to_string(&mut line, format_args!("Holding {}", axis.name()));
        self.screen.set_line(1, &line);
        self.screen.set_line(3, "Center: Resume");
        self.screen.set_line(4, "Left: Menu");
    }

    pub fn render_emergency(&mut self, zone: usize, zones: &ZoneTable) {
        self.screen.clear();
        self.screen.set_line(0, "EMERGENCY");
        self.screen.set_line(2, "Setting down at");
        self.screen.set_line(3, &zone_name(zone, zones));
        self.screen.highlight(0);
    }

    /// Countdown before a cycle; Left returns to the menu
    pub fn render_countdown(&mut self, title: &str, remaining_s: u32) {
        self.screen.clear();
        self.screen.set_line(0, title);
        let mut line: String<LINE_LEN> = String::new();
        let _ = write_to_string(&mut line, format_args!("{} s", remaining_s));
        self.screen.set_line(2, &line);
        self.screen.set_line(6, "Left: Menu");
    }

    pub fn render_inspection(&mut self, zone: usize, zones: &ZoneTable, inspection: Inspection) {
        self.screen.clear();
        self.screen.set_line(0, &zone_name(zone, zones));

        let mut line: String<LINE_LEN> = String::new();
        match inspection {
            Inspection::Checking => self.screen.set_line(2, "Checking..."),
            Inspection::Empty => {
                self.screen.set_line(2, "Nothing found");
                self.screen.set_line(6, "Center: Back");
            }
            Inspection::Found(classification) => {
                let _ = write_to_string(
                    &mut line,
                    format_args!("Color: {}", classification.color.name()),
                );
                self.screen.set_line(2, &line);
                line.clear();
                let _ = write_to_string(
                    &mut line,
                    format_args!("Size: {}", classification.size.name()),
                );
                self.screen.set_line(3, &line);
                self.screen.set_line(6, "Center: Back");
            }
        }
    }

    pub fn render_stopped(&mut self, stats: &EngineStats) {
        self.screen.clear();
        self.screen.set_line(0, "Stopped");
        let mut line: String<LINE_LEN> = String::new();
        let _ = write_to_string(&mut line, format_args!("Cycles {}", stats.cycles));
        self.screen.set_line(2, &line);
        line.clear();
        let _ = write_to_string(
            &mut line,
            format_args!("Sorted {} Back {}", stats.sorted, stats.returned),
        );
        self.screen.set_line(3, &line);
    }
}

/// "Pick up" for the pickup station, "Zone N" otherwise
fn zone_name(zone: usize, zones: &ZoneTable) -> String<LINE_LEN> {
    let mut name = String::new();
    let _ = match zones.drop_number(zone) {
        Some(number) => write_to_string(&mut name, format_args!("Zone {}", number)),
        None => name.push_str("Pick up").map_err(|_| core::fmt::Error),
    };
    name
}

fn write_to_string(s: &mut String<LINE_LEN>, args: core::fmt::Arguments<'_>) -> core::fmt::Result {
    s.write_fmt(args)
}
