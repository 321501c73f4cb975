//! Motion supervisor
//!
//! Issues a seek, then polls the axis until it settles. While the arm is
//! sorting, each poll also samples the interrupt button (Center):
//!
//! - released before the emergency threshold: the axis holds and the
//!   paused screen waits for Center (resume the same seek) or Left (menu)
//! - held past the threshold: emergency recovery drops the object at the
//!   nearest zone and control returns to the menu
//!
//! Abnormal termination is reported through [`Outcome`], never as an error.

use crate::config::{Calibration, SessionConfig};
use crate::render::Renderer;
use crate::state::{Event, RunState};
use crate::traits::{ActuatorDriver, Axis, Buttons, Debouncer, Platform, StopMode};

use super::target::{MotionTarget, SeekKind, SeekRequest};

/// How a supervised seek ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Axis reached its target
    Reached,
    /// Gripper stalled closed on something
    StalledWithObject,
    /// Gripper closed without finding anything
    StalledEmpty,
    /// Operator cancelled to the menu from the paused screen
    AbortedToMenu,
    /// Emergency recovery ran
    AbortedEmergency,
}

impl Outcome {
    pub fn is_aborted(self) -> bool {
        matches!(self, Outcome::AbortedToMenu | Outcome::AbortedEmergency)
    }
}

/// Result of an interrupt press
enum Interrupt {
    Resume,
    Menu,
    Emergency,
}

/// Owns the platform and runs every motion
pub struct Supervisor<P: Platform> {
    platform: P,
    calibration: Calibration,
    renderer: Renderer,
    /// Left seen during a watched motion
    menu_requested: bool,
}

impl<P: Platform> Supervisor<P> {
    pub fn new(platform: P, calibration: Calibration) -> Self {
        Self {
            platform,
            calibration,
            renderer: Renderer::new(),
            menu_requested: false,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn renderer(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Push the rendered screen to the display
    pub fn present(&mut self) {
        self.renderer.present(self.platform.display());
    }

    /// Current angle of an axis
    pub fn position(&mut self, axis: Axis) -> i32 {
        self.platform.actuator(axis).position()
    }

    pub fn now_ms(&self) -> u64 {
        self.platform.now_ms()
    }

    /// Sleep for `ms`, the single suspension point of every loop
    pub fn pause_ms(&mut self, ms: u32) {
        self.platform.delay_ms(ms);
    }

    /// Whether Left was pressed during a motion since the last call
    pub fn take_menu_request(&mut self) -> bool {
        core::mem::take(&mut self.menu_requested)
    }

    /// Block until no button is pressed
    pub fn wait_release(&mut self) {
        while !self.platform.buttons().is_empty() {
            self.platform.delay_ms(self.calibration.input_poll_ms);
        }
    }

    /// Move an axis at its normal speed
    pub fn move_to(
        &mut self,
        session: &SessionConfig,
        state: &mut RunState,
        axis: Axis,
        target: MotionTarget,
    ) -> Outcome {
        let speed = self.calibration.speed(axis);
        self.move_at(session, state, axis, target, speed)
    }

    /// Move an axis at `speed`
    pub fn move_at(
        &mut self,
        session: &SessionConfig,
        state: &mut RunState,
        axis: Axis,
        target: MotionTarget,
        speed: i32,
    ) -> Outcome {
        match target.resolve(axis, &session.zones, &self.calibration) {
            Some(angle) => self.seek(session, state, SeekRequest::position(axis, angle, speed)),
            None => {
                log_warn!("{} target {:?} does not resolve, ignored", axis.name(), target);
                Outcome::Reached
            }
        }
    }

    /// Close the gripper on whatever is between the jaws
    pub fn close_gripper(&mut self, session: &SessionConfig, state: &mut RunState) -> Outcome {
        let request = SeekRequest::grip(self.calibration.gripper_speed);
        self.seek(session, state, request)
    }

    /// Run a seek to completion, honoring operator interrupts while sorting
    ///
    /// A resumed seek is re-issued with the same axis, target and speed.
    pub fn seek(
        &mut self,
        session: &SessionConfig,
        state: &mut RunState,
        request: SeekRequest,
    ) -> Outcome {
        if !self.target_safe(&request) {
            return Outcome::Reached;
        }

        let mut resumes = 0u8;
        loop {
            let watch = state.mode().interruptible();
            if let Some(outcome) = self.drive(&request, watch) {
                return outcome;
            }

            match self.on_interrupt(session, state, &request) {
                Interrupt::Resume if resumes < self.calibration.max_resumes => {
                    resumes += 1;
                    log_info!(
                        "resuming {} seek to {} ({} resumes)",
                        request.axis.name(),
                        request.target,
                        resumes
                    );
                }
                Interrupt::Resume => {
                    log_warn!("resume limit reached, returning to menu");
                    self.platform.actuator(request.axis).hold();
                    state.apply(Event::CancelToMenu);
                    state.discard_cycle();
                    return Outcome::AbortedToMenu;
                }
                Interrupt::Menu => return Outcome::AbortedToMenu,
                Interrupt::Emergency => return Outcome::AbortedEmergency,
            }
        }
    }

    /// Run a seek without watching for interrupts
    pub fn seek_direct(&mut self, request: SeekRequest) -> Outcome {
        if !self.target_safe(&request) {
            return Outcome::Reached;
        }
        loop {
            if let Some(outcome) = self.drive(&request, false) {
                return outcome;
            }
        }
    }

    fn target_safe(&self, request: &SeekRequest) -> bool {
        if request.axis == Axis::Base && !self.calibration.base_angle_safe(request.target) {
            log_warn!(
                "base target {} outside 0..={}, ignored",
                request.target,
                self.calibration.max_base_angle
            );
            return false;
        }
        true
    }

    /// Start the motion and poll until it settles
    ///
    /// Returns `None` if the interrupt button was seen; the axis is then
    /// holding its position.
    fn drive(&mut self, request: &SeekRequest, watch_interrupt: bool) -> Option<Outcome> {
        log_debug!(
            "seek {} -> {} at {}",
            request.axis.name(),
            request.target,
            request.speed
        );
        let duty = self.calibration.grip_duty;
        let actuator = self.platform.actuator(request.axis);
        match request.kind {
            SeekKind::Position => actuator.seek_target(request.speed, request.target, StopMode::Hold),
            SeekKind::Grip => actuator.run(request.speed, duty),
        }

        loop {
            if let Some(outcome) = self.settled(request) {
                return Some(outcome);
            }
            if watch_interrupt {
                let buttons = self.platform.buttons();
                if buttons.contains(Buttons::CENTER) {
                    self.platform.actuator(request.axis).hold();
                    return None;
                }
                if buttons.contains(Buttons::LEFT) && !self.menu_requested {
                    log_debug!("menu requested, finishing the cycle first");
                    self.menu_requested = true;
                }
            }
            self.platform.delay_ms(self.calibration.motion_poll_ms);
        }
    }

    fn settled(&mut self, request: &SeekRequest) -> Option<Outcome> {
        let cal = self.calibration;
        let actuator = self.platform.actuator(request.axis);
        let position = actuator.position();
        match request.kind {
            SeekKind::Position => cal
                .within_tolerance(position, request.target)
                .then_some(Outcome::Reached),
            SeekKind::Grip => {
                if !actuator.is_stalled() && !cal.within_tolerance(position, request.target) {
                    return None;
                }
                actuator.hold();
                if position < cal.grip_present_below {
                    Some(Outcome::StalledWithObject)
                } else {
                    Some(Outcome::StalledEmpty)
                }
            }
        }
    }

    /// Measure the hold and decide between pause and emergency
    fn on_interrupt(
        &mut self,
        session: &SessionConfig,
        state: &mut RunState,
        request: &SeekRequest,
    ) -> Interrupt {
        log_info!(
            "interrupt during {} seek to {}",
            request.axis.name(),
            request.target
        );
        let pressed_at = self.platform.now_ms();
        let threshold = u64::from(self.calibration.emergency_hold_ms);

        while self.platform.buttons().contains(Buttons::CENTER) {
            let held = self.platform.now_ms().saturating_sub(pressed_at);
            if held >= threshold {
                if session.capabilities.emergency_recovery {
                    self.recover(session, state);
                    return Interrupt::Emergency;
                }
                self.wait_release();
                break;
            }
            self.platform.delay_ms(self.calibration.motion_poll_ms);
        }

        state.apply(Event::Pause);
        state.interrupted = Some(*request);
        self.renderer.render_paused(request.axis);
        self.present();

        if self.await_pause_choice() {
            state.apply(Event::Resume);
            state.interrupted = None;
            self.wait_release();
            Interrupt::Resume
        } else {
            log_info!("cancelled to menu while paused");
            state.apply(Event::CancelToMenu);
            state.discard_cycle();
            Interrupt::Menu
        }
    }

    /// Wait on the paused screen; `true` to resume, `false` for the menu
    fn await_pause_choice(&mut self) -> bool {
        let mut debouncer = Debouncer::new(self.calibration.debounce_ms);
        debouncer.arm(self.platform.now_ms());
        loop {
            let buttons = self.platform.buttons();
            let now = self.platform.now_ms();
            if buttons.intersects(Buttons::CENTER | Buttons::LEFT) && debouncer.accept(now) {
                return !buttons.contains(Buttons::LEFT);
            }
            self.platform.delay_ms(self.calibration.input_poll_ms);
        }
    }
}
