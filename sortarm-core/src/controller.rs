//! Controller
//!
//! Top-level program loop: home the arm, show the menu, run sorting cycles
//! until the operator returns to the menu, and terminate on "Stop".
//!
//! Every wait is a polling loop on the platform's delay, so buttons are
//! sampled at least every input poll interval outside of motions.

use crate::classify::Classification;
use crate::config::{Calibration, SessionConfig};
use crate::engine::{CycleResult, SortingEngine};
use crate::menu::{Menu, MenuAction};
use crate::motion::{HomingError, MotionTarget, Outcome, Supervisor};
use crate::render::Inspection;
use crate::state::{Event, RunState};
use crate::traits::{Axis, Buttons, ColorSensorDriver, Debouncer, Platform};

/// How the menu loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuExit {
    Start,
    Stop,
    Halted,
}

/// How the program ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Exit {
    /// Operator chose "Stop"
    Stopped,
    /// The halt check fired
    Halted,
}

/// Sorting robot controller
pub struct Controller<P: Platform> {
    supervisor: Supervisor<P>,
    session: SessionConfig,
    state: RunState,
    menu: Menu,
    engine: SortingEngine,
    debouncer: Debouncer,
    halt: fn(&P) -> bool,
}

impl<P: Platform> Controller<P> {
    pub fn new(platform: P, calibration: Calibration, session: SessionConfig) -> Self {
        Self {
            supervisor: Supervisor::new(platform, calibration),
            session,
            state: RunState::new(),
            menu: Menu::new(),
            engine: SortingEngine::new(),
            debouncer: Debouncer::new(calibration.debounce_ms),
            halt: |_| false,
        }
    }

    /// Stop the program at the next wait once `halt` returns true
    pub fn with_halt(mut self, halt: fn(&P) -> bool) -> Self {
        self.halt = halt;
        self
    }

    pub fn supervisor(&self) -> &Supervisor<P> {
        &self.supervisor
    }

    pub fn supervisor_mut(&mut self) -> &mut Supervisor<P> {
        &mut self.supervisor
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionConfig {
        &mut self.session
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn engine(&self) -> &SortingEngine {
        &self.engine
    }

    pub fn into_platform(self) -> P {
        self.supervisor.into_platform()
    }

    fn halted(&self) -> bool {
        (self.halt)(self.supervisor.platform())
    }

    /// Home the arm
    pub fn initialize(&mut self) -> Result<(), HomingError> {
        self.supervisor.home()
    }

    /// Run until "Stop" is chosen or the halt check fires
    pub fn run(&mut self) -> Exit {
        loop {
            match self.menu_loop() {
                MenuExit::Start => {}
                MenuExit::Stop => {
                    log_info!("stopped by operator");
                    self.supervisor
                        .renderer()
                        .render_stopped(self.engine.stats());
                    self.supervisor.present();
                    return Exit::Stopped;
                }
                MenuExit::Halted => return Exit::Halted,
            }

            self.state.apply(Event::Start);
            self.supervisor.wait_release();
            log_info!("sorting started");

            if !self.start_delay() {
                self.state.apply(Event::CancelToMenu);
                continue;
            }
            self.run_loop();
        }
    }

    /// Show the menu and handle presses until it hands off control
    pub fn menu_loop(&mut self) -> MenuExit {
        self.menu.reset();
        self.supervisor.wait_release();
        self.show_menu();

        let poll = self.supervisor.calibration().input_poll_ms;
        loop {
            if self.halted() {
                return MenuExit::Halted;
            }
            if let Some(action) = self.poll_menu() {
                match action {
                    MenuAction::Start => return MenuExit::Start,
                    MenuAction::Stop => return MenuExit::Stop,
                    MenuAction::GetColorAt(zone) => {
                        self.get_color_at(zone);
                    }
                    MenuAction::None => {}
                }
                self.show_menu();
            }
            self.supervisor.pause_ms(poll);
        }
    }

    /// Run cycles until the mode leaves Running
    ///
    /// Left pressed while a cycle is moving returns to the menu once that
    /// cycle has finished.
    pub fn run_loop(&mut self) {
        self.supervisor.take_menu_request();
        loop {
            if self.halted() {
                return;
            }

            let result = self
                .engine
                .run_cycle(&mut self.supervisor, &self.session, &mut self.state);
            if let CycleResult::Aborted(outcome) = result {
                log_info!("cycle aborted ({:?}), back to menu", outcome);
                return;
            }

            let left = self.supervisor.platform_mut().buttons().contains(Buttons::LEFT);
            if self.supervisor.take_menu_request() || left {
                log_info!("returning to menu");
                self.state.apply(Event::CancelToMenu);
                return;
            }

            let wait = self.session.wait_between_cycles_ms;
            if !self.countdown("Next cycle in", wait) {
                self.state.apply(Event::CancelToMenu);
                return;
            }
        }
    }

    fn start_delay(&mut self) -> bool {
        if !self.session.capabilities.start_delay || self.session.start_delay_ms == 0 {
            return true;
        }
        let delay = self.session.start_delay_ms;
        self.countdown("Starting in", delay)
    }

    /// Wait `duration_ms`, showing the seconds left
    ///
    /// Returns `false` if Left was pressed.
    fn countdown(&mut self, title: &str, duration_ms: u32) -> bool {
        let poll = self.supervisor.calibration().input_poll_ms;
        let started = self.supervisor.now_ms();
        let mut shown = None;
        loop {
            if self.supervisor.platform_mut().buttons().contains(Buttons::LEFT) {
                log_info!("returning to menu");
                return false;
            }
            let elapsed = self.supervisor.now_ms().saturating_sub(started);
            if elapsed >= u64::from(duration_ms) || self.halted() {
                return true;
            }

            let remaining_s = (u64::from(duration_ms) - elapsed).div_ceil(1000) as u32;
            if shown != Some(remaining_s) {
                shown = Some(remaining_s);
                self.supervisor
                    .renderer()
                    .render_countdown(title, remaining_s);
                self.supervisor.present();
            }
            self.supervisor.pause_ms(poll);
        }
    }

    fn poll_menu(&mut self) -> Option<MenuAction> {
        let button = self.supervisor.platform_mut().buttons().primary()?;
        let now = self.supervisor.now_ms();
        if !self.debouncer.accept(now) {
            return None;
        }
        log_debug!("menu button {:?}", button);
        Some(self.menu.handle(button, &mut self.session))
    }

    fn show_menu(&mut self) {
        self.supervisor
            .renderer()
            .render_menu(&self.menu, &self.session);
        self.supervisor.present();
    }

    /// Pick up whatever is at `zone`, classify it and put it back
    ///
    /// Runs from the menu, so the motions are not interruptible.
    pub fn get_color_at(&mut self, zone: usize) -> Option<Classification> {
        let cal = *self.supervisor.calibration();
        let sup = &mut self.supervisor;
        let session = &self.session;
        let state = &mut self.state;

        sup.renderer()
            .render_inspection(zone, &session.zones, Inspection::Checking);
        sup.present();

        sup.move_to(session, state, Axis::Elbow, MotionTarget::Angle(cal.transit_height));
        sup.move_to(session, state, Axis::Base, MotionTarget::Zone(zone));
        sup.move_to(session, state, Axis::Gripper, MotionTarget::Angle(cal.gripper_open));
        sup.move_to(session, state, Axis::Elbow, MotionTarget::Zone(zone));
        let grip = sup.close_gripper(session, state);
        sup.move_to(session, state, Axis::Elbow, MotionTarget::Angle(cal.sensor_height));

        let classification = (grip == Outcome::StalledWithObject)
            .then(|| Classification::from(sup.platform_mut().sensor().sample()));

        sup.move_to(session, state, Axis::Elbow, MotionTarget::Zone(zone));
        sup.move_to(session, state, Axis::Gripper, MotionTarget::Angle(cal.gripper_open));
        sup.move_to(session, state, Axis::Elbow, MotionTarget::Angle(cal.transit_height));

        let inspection = classification.map_or(Inspection::Empty, Inspection::Found);
        log_info!("zone {} inspection: {:?}", zone, inspection);
        sup.renderer()
            .render_inspection(zone, &session.zones, inspection);
        sup.present();

        self.await_acknowledge();
        classification
    }

    fn await_acknowledge(&mut self) {
        let poll = self.supervisor.calibration().input_poll_ms;
        self.supervisor.wait_release();
        loop {
            if self.halted() {
                return;
            }
            let buttons = self.supervisor.platform_mut().buttons();
            let now = self.supervisor.now_ms();
            if buttons.intersects(Buttons::CENTER | Buttons::LEFT) && self.debouncer.accept(now) {
                return;
            }
            self.supervisor.pause_ms(poll);
        }
    }
}
