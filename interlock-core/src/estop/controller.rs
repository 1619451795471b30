//! Emergency stop controller
//!
//! Discovers the stop-switch module, registers its report function with
//! the edge detector, and runs the stop/recovery sequence from the tick
//! loop:
//!
//! ```text
//!  Online ──falling──► FallingEdge ──(power off, laser off)──► Invalid
//!                                                                 │
//!         ┌──────────────────────rising───────────────────────────┘
//!         ▼
//!     RisingEdge ──rescan ok──► WaitToolhead ──laser off──► NoAction ──► Invalid
//!         │
//!         └──rescan timeout──► FallingEdge
//! ```
//!
//! A falling edge pre-empts every state.

use heapless::Vec;
use interlock_protocol::{
    get_funcid_request, parse_function_ids, HostEvent, FUNC_REPORT_EMERGENCY_STOP,
    MAX_MODULE_FUNCTIONS, OPC_GET_ADDON_STOP,
};

use super::edge::{Edge, EdgeDetector};
use super::state::SafetyState;
use crate::addon::{AddonModule, InitError, MachineContext, ModuleKind};
use crate::bus::{BusTransport, FrameHandler, FunctionDescriptor, MessageId, ModuleAddress};
use crate::config::EstopConfig;
use crate::restart::RestartPhase;
use crate::traits::{HostError, HostLink, LaserState};

/// Emergency stop add-on controller
pub struct EmergencyStop {
    /// Receives the module's switch reports
    edge: &'static EdgeDetector,
    config: EstopConfig,
    /// Bus identity; `None` while offline
    address: Option<ModuleAddress>,
    state: SafetyState,
    /// Shared debounce / poll counter, reset on entry to timed waits
    ticks: u16,
    /// Last handled edge was a stop; tells the two `Invalid` rests apart
    latched: bool,
}

impl EmergencyStop {
    /// Create an offline controller fed by `edge`
    pub fn new(edge: &'static EdgeDetector, config: EstopConfig) -> Self {
        Self {
            edge,
            config,
            address: None,
            state: SafetyState::Offline,
            ticks: 0,
            latched: false,
        }
    }

    /// Current safety state
    pub fn state(&self) -> SafetyState {
        self.state
    }

    /// Bus identity of the module, if discovered
    pub fn address(&self) -> Option<ModuleAddress> {
        self.address
    }

    /// Check if the module was discovered
    pub fn is_online(&self) -> bool {
        self.address.is_some()
    }

    /// Check if the stop is engaged and has not been released since
    pub fn is_triggered(&self) -> bool {
        match self.state {
            SafetyState::FallingEdge => true,
            SafetyState::Invalid => self.latched,
            _ => false,
        }
    }

    /// Ticks counted in the current timed wait
    pub fn debounce_ticks(&self) -> u16 {
        self.ticks
    }

    /// Active configuration
    pub fn config(&self) -> &EstopConfig {
        &self.config
    }

    /// Discover the module at `address` and register its functions
    ///
    /// Sends one bounded capability enumeration. On any failure the
    /// controller stays offline and nothing is retried here.
    pub fn init(
        &mut self,
        address: ModuleAddress,
        bus: &mut dyn BusTransport,
    ) -> Result<(), InitError> {
        self.address = None;
        self.state = SafetyState::Offline;

        if !address.index.is_valid() {
            return Err(InitError::InvalidAddress);
        }

        let reply = bus
            .send_ext_cmd_sync(
                &address,
                &get_funcid_request(),
                self.config.discovery_timeout_ms,
                self.config.discovery_retries,
            )
            .map_err(|e| {
                warn!("Emergency stop module did not answer: {:?}", e);
                InitError::DiscoveryTimeout
            })?;

        let functions = parse_function_ids(&reply).map_err(|e| {
            warn!("Bad function list from emergency stop module: {:?}", e);
            InitError::MalformedResponse
        })?;
        info!("Got emergency stop module, {} functions", functions.len());

        // Fresh baseline: the first report after discovery must not act
        self.edge.reset();

        let mut ids = Vec::<MessageId, MAX_MODULE_FUNCTIONS>::new();
        for id in functions {
            let handler = (id == FUNC_REPORT_EMERGENCY_STOP)
                .then_some(self.edge as &'static dyn FrameHandler);
            let descriptor = FunctionDescriptor::for_module(id, &address);
            let message = bus.register_function(descriptor, handler);
            // Same capacity as the function list
            let _ = ids.push(message);
        }

        bus.bind_message_ids(&address, &ids).map_err(|e| {
            error!("Binding emergency stop functions failed: {:?}", e);
            InitError::BindFailure
        })?;

        self.address = Some(address);
        self.state = SafetyState::Online;
        self.ticks = 0;
        self.latched = false;
        self.poll_state(bus);
        Ok(())
    }

    /// Ask the module to report its switch state
    pub fn poll_state(&self, bus: &mut dyn BusTransport) {
        bus.send_std_cmd(FUNC_REPORT_EMERGENCY_STOP, &[]);
    }

    /// Drop the module; later ticks do nothing until the next `init`
    pub fn force_offline(&mut self) {
        if self.address.take().is_some() {
            warn!("Emergency stop module forced offline");
        }
        self.state = SafetyState::Offline;
    }

    /// Periodic tick
    pub fn process(&mut self, ctx: &mut MachineContext<'_>) {
        if !self.is_online() {
            return;
        }

        if let Some(edge) = self.edge.take() {
            self.accept(edge);
        }

        match self.state {
            SafetyState::FallingEdge => self.shut_down(ctx),
            SafetyState::RisingEdge => self.await_toolhead_scan(ctx),
            SafetyState::WaitToolhead => self.await_laser_off(ctx),
            SafetyState::NoAction => self.track_restart(ctx),
            SafetyState::Online | SafetyState::Offline | SafetyState::Invalid => {}
        }
    }

    /// Send the current state to the host
    pub fn report_status(&self, host: &mut dyn HostLink) -> Result<(), HostError> {
        let state = self.state.as_byte();
        info!("Host requested emergency stop state: {}", state);
        let event = HostEvent::addon_ack(OPC_GET_ADDON_STOP, &[state])?;
        host.send_event(&event)
    }

    fn accept(&mut self, edge: Edge) {
        let next = self.state.on_edge(edge);
        debug!("Stop edge {:?}: {:?} -> {:?}", edge, self.state, next);

        if edge == Edge::Rising {
            self.latched = false;
            if self.state != SafetyState::RisingEdge {
                self.ticks = 0;
            }
        }
        self.state = next;
    }

    fn shut_down(&mut self, ctx: &mut MachineContext<'_>) {
        self.ticks = 0;
        self.latched = true;
        ctx.power.disable(self.config.protected_domain);
        warn!("Emergency stop engaged, power domain cut");

        if ctx.tool.is_laser_class() {
            ctx.laser.turn_off();
            ctx.laser.deinit();
            ctx.restart.clear();
            info!("Laser shut down");
        }

        self.state = SafetyState::Invalid;
    }

    fn await_toolhead_scan(&mut self, ctx: &mut MachineContext<'_>) {
        ctx.power.enable(self.config.protected_domain);

        self.ticks = self.ticks.saturating_add(1);
        if self.ticks == u16::MAX {
            // Counter saturated, the window can no longer be measured
            warn!("Tool head rescan window exhausted");
            self.state = SafetyState::FallingEdge;
            return;
        }
        if self.ticks % self.config.poll_interval_ticks.max(1) != 0 {
            return;
        }

        match ctx.bus.rescan(self.config.toolhead_channel) {
            Ok(()) => {
                info!("Tool head back on the bus after {} ticks", self.ticks);
                self.state = SafetyState::WaitToolhead;
                self.ticks = 0;
            }
            Err(_) if self.ticks > self.config.rescan_timeout_ticks => {
                warn!("Check the tool head connection and try again");
                self.state = SafetyState::FallingEdge;
            }
            Err(_) => {}
        }
    }

    fn await_laser_off(&mut self, ctx: &mut MachineContext<'_>) {
        self.ticks = self.ticks.saturating_add(1);
        if self.ticks < self.config.toolhead_settle_ticks {
            return;
        }
        self.ticks = 0;

        if ctx.tool.is_laser_class() && ctx.laser.state() == LaserState::Off {
            ctx.laser.enable();
            self.state = SafetyState::NoAction;
            info!("Laser resumed");
        }
    }

    fn track_restart(&mut self, ctx: &mut MachineContext<'_>) {
        match ctx.restart.phase {
            RestartPhase::Phase1 => {
                self.ticks = self.ticks.saturating_add(1);
                if self.ticks >= self.config.restart_timeout_ticks
                    || ctx.restart.completed_moves >= self.config.restart_move_count
                {
                    ctx.motion.recalibrate_machine_size();
                    ctx.restart.restart_complete = true;
                    self.state = SafetyState::Invalid;
                    info!("Restart sequence complete");
                }
            }
            RestartPhase::Phase2 => {
                self.ticks = self.ticks.saturating_add(1);
                if self.ticks >= self.config.pin_check_interval_ticks {
                    self.ticks = 0;
                    ctx.laser.pwm_pin_check();
                }
            }
            RestartPhase::None => {}
        }
    }
}

impl AddonModule for EmergencyStop {
    fn kind(&self) -> ModuleKind {
        ModuleKind::EmergencyStop
    }

    fn init(
        &mut self,
        address: ModuleAddress,
        bus: &mut dyn BusTransport,
    ) -> Result<(), InitError> {
        EmergencyStop::init(self, address, bus)
    }

    fn process(&mut self, ctx: &mut MachineContext<'_>) {
        EmergencyStop::process(self, ctx)
    }

    fn is_online(&self) -> bool {
        EmergencyStop::is_online(self)
    }

    fn report_status(&self, host: &mut dyn HostLink) -> Result<(), HostError> {
        EmergencyStop::report_status(self, host)
    }
}
