//! Recording doubles for the collaborator traits

use interlock_protocol::{ExtPayload, FunctionId, HostEvent, FUNC_REPORT_EMERGENCY_STOP};

use crate::addon::MachineContext;
use crate::bus::{
    BusChannel, BusError, BusTransport, FrameHandler, FunctionDescriptor, MacIndex, MessageId,
    ModuleAddress,
};
use crate::estop::EdgeDetector;
use crate::restart::RestartContext;
use crate::traits::{
    HostError, HostLink, LaserState, LaserToolhead, MotionSystem, PowerDomain, PowerDomains,
    ToolKind,
};

/// Detector with the `'static` lifetime the transport requires
pub fn leak_detector() -> &'static EdgeDetector {
    Box::leak(Box::new(EdgeDetector::new()))
}

/// Function list reply advertising `ids`
pub fn funcid_reply(ids: &[u16]) -> ExtPayload {
    let mut reply = ExtPayload::new();
    reply.push(0x03).unwrap();
    reply.push(ids.len() as u8).unwrap();
    for id in ids {
        reply.extend_from_slice(&id.to_be_bytes()).unwrap();
    }
    reply
}

pub struct MockBus {
    pub ext_reply: Result<ExtPayload, BusError>,
    pub ext_requests: Vec<(ModuleAddress, Vec<u8>, u32, u8)>,
    pub bind_result: Result<(), BusError>,
    pub registered: Vec<(FunctionDescriptor, bool)>,
    pub bound: Vec<MessageId>,
    pub std_cmds: Vec<(FunctionId, Vec<u8>)>,
    /// Rescan results, consumed front to back; the last one repeats
    pub rescan_results: Vec<Result<(), BusError>>,
    pub rescans: Vec<BusChannel>,
    handler: Option<&'static dyn FrameHandler>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            ext_reply: Ok(funcid_reply(&[FUNC_REPORT_EMERGENCY_STOP.raw()])),
            ext_requests: Vec::new(),
            bind_result: Ok(()),
            registered: Vec::new(),
            bound: Vec::new(),
            std_cmds: Vec::new(),
            rescan_results: vec![Ok(())],
            rescans: Vec::new(),
            handler: None,
        }
    }

    /// Deliver a report frame to the registered handler, as the receive
    /// context would
    pub fn deliver(&self, data: &[u8]) {
        if let Some(handler) = self.handler {
            handler.on_frame(data);
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }
}

impl BusTransport for MockBus {
    fn send_ext_cmd_sync(
        &mut self,
        address: &ModuleAddress,
        request: &[u8],
        timeout_ms: u32,
        retries: u8,
    ) -> Result<ExtPayload, BusError> {
        self.ext_requests
            .push((*address, request.to_vec(), timeout_ms, retries));
        self.ext_reply.clone()
    }

    fn register_function(
        &mut self,
        function: FunctionDescriptor,
        handler: Option<&'static dyn FrameHandler>,
    ) -> MessageId {
        if handler.is_some() {
            self.handler = handler;
        }
        self.registered.push((function, handler.is_some()));
        MessageId(self.registered.len() as u16)
    }

    fn bind_message_ids(
        &mut self,
        _address: &ModuleAddress,
        ids: &[MessageId],
    ) -> Result<(), BusError> {
        self.bind_result?;
        self.bound.extend_from_slice(ids);
        Ok(())
    }

    fn send_std_cmd(&mut self, function: FunctionId, payload: &[u8]) {
        self.std_cmds.push((function, payload.to_vec()));
    }

    fn rescan(&mut self, channel: BusChannel) -> Result<(), BusError> {
        self.rescans.push(channel);
        if self.rescan_results.len() > 1 {
            self.rescan_results.remove(0)
        } else {
            self.rescan_results[0]
        }
    }
}

#[derive(Default)]
pub struct MockPower {
    pub enabled: [bool; 2],
    pub enables: u32,
    pub disables: u32,
}

impl PowerDomains for MockPower {
    fn enable(&mut self, domain: PowerDomain) {
        self.enabled[domain.index()] = true;
        self.enables += 1;
    }

    fn disable(&mut self, domain: PowerDomain) {
        self.enabled[domain.index()] = false;
        self.disables += 1;
    }

    fn is_enabled(&self, domain: PowerDomain) -> bool {
        self.enabled[domain.index()]
    }
}

#[derive(Default)]
pub struct MockLaser {
    pub state: LaserState,
    pub turn_offs: u32,
    pub deinits: u32,
    pub enables: u32,
    pub pin_checks: u32,
}

impl LaserToolhead for MockLaser {
    fn turn_off(&mut self) {
        self.turn_offs += 1;
        self.state = LaserState::Off;
    }

    fn deinit(&mut self) {
        self.deinits += 1;
    }

    fn enable(&mut self) {
        self.enables += 1;
    }

    fn state(&self) -> LaserState {
        self.state
    }

    fn pwm_pin_check(&mut self) {
        self.pin_checks += 1;
    }
}

#[derive(Default)]
pub struct MockMotion {
    pub recalibrations: u32,
}

impl MotionSystem for MockMotion {
    fn recalibrate_machine_size(&mut self) {
        self.recalibrations += 1;
    }
}

#[derive(Default)]
pub struct MockHost {
    pub sent: Vec<HostEvent>,
    pub fail: bool,
}

impl HostLink for MockHost {
    fn send_event(&mut self, event: &HostEvent) -> Result<(), HostError> {
        if self.fail {
            return Err(HostError::Io);
        }
        self.sent.push(event.clone());
        Ok(())
    }
}

/// A machine with every collaborator mocked, power on and a laser fitted
pub struct Rig {
    pub bus: MockBus,
    pub power: MockPower,
    pub laser: MockLaser,
    pub motion: MockMotion,
    pub tool: ToolKind,
    pub restart: RestartContext,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            bus: MockBus::new(),
            power: MockPower {
                enabled: [true, true],
                ..MockPower::default()
            },
            laser: MockLaser::default(),
            motion: MockMotion::default(),
            tool: ToolKind::Laser,
            restart: RestartContext::new(),
        }
    }

    pub fn address(&self) -> ModuleAddress {
        ModuleAddress::new(BusChannel::CH1, 0x00A1_B2C3, MacIndex(4))
    }

    pub fn ctx(&mut self) -> MachineContext<'_> {
        MachineContext {
            bus: &mut self.bus,
            power: &mut self.power,
            laser: &mut self.laser,
            motion: &mut self.motion,
            tool: self.tool,
            restart: &mut self.restart,
        }
    }
}
