//! Scheduler-side collection of add-on modules

use heapless::Vec;
use interlock_protocol::HostEvent;

use super::{AddonModule, MachineContext, ModuleKind};
use crate::traits::{HostError, HostLink};

/// Fixed-capacity set of add-on modules
///
/// Modules are borrowed for the lifetime of the set, so the scheduler keeps
/// ownership and may place them in statics.
pub struct AddonSet<'m, const N: usize> {
    modules: Vec<&'m mut dyn AddonModule, N>,
}

impl<'m, const N: usize> Default for AddonSet<'m, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'m, const N: usize> AddonSet<'m, N> {
    /// Create an empty set
    pub const fn new() -> Self {
        Self { modules: Vec::new() }
    }

    /// Add a module, handing it back if the set is full
    pub fn add(&mut self, module: &'m mut dyn AddonModule) -> Result<(), &'m mut dyn AddonModule> {
        self.modules.push(module)
    }

    /// Number of modules in the set
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the set holds no modules
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Run one tick on every module
    ///
    /// Offline modules are skipped.
    pub fn process_all(&mut self, ctx: &mut MachineContext<'_>) {
        for module in self.modules.iter_mut().filter(|m| m.is_online()) {
            module.process(ctx);
        }
    }

    /// First module of `kind`
    pub fn find(&self, kind: ModuleKind) -> Option<&(dyn AddonModule + 'm)> {
        self.modules
            .iter()
            .find(|m| m.kind() == kind)
            .map(|m| &**m)
    }

    /// First module of `kind`, mutably
    pub fn find_mut(&mut self, kind: ModuleKind) -> Option<&mut (dyn AddonModule + 'm)> {
        self.modules
            .iter_mut()
            .find(|m| m.kind() == kind)
            .map(|m| &mut **m)
    }

    /// Check if any module of `kind` is online
    pub fn is_online(&self, kind: ModuleKind) -> bool {
        self.modules
            .iter()
            .any(|m| m.kind() == kind && m.is_online())
    }

    /// Answer a host request with the status of the module it addresses
    ///
    /// Returns `Ok(false)` if the request is not for an add-on in this set.
    pub fn handle_host_request(
        &self,
        event: &HostEvent,
        host: &mut dyn HostLink,
    ) -> Result<bool, HostError> {
        let Some(module) = ModuleKind::for_request(event).and_then(|kind| self.find(kind)) else {
            debug!("Unhandled host event {}/{}", event.id, event.op_code);
            return Ok(false);
        };
        module.report_status(host)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addon::InitError;
    use crate::bus::{BusTransport, ModuleAddress};
    use crate::config::EstopConfig;
    use crate::estop::EmergencyStop;
    use crate::testing::{leak_detector, MockHost, Rig};
    use interlock_protocol::{EVENT_ADDON_ACK, EVENT_ADDON_REQ, OPC_GET_ADDON_STOP};

    /// Module that counts ticks and always discovers
    struct Counter {
        kind: ModuleKind,
        online: bool,
        ticks: u32,
    }

    impl Counter {
        fn new(kind: ModuleKind, online: bool) -> Self {
            Self {
                kind,
                online,
                ticks: 0,
            }
        }
    }

    impl AddonModule for Counter {
        fn kind(&self) -> ModuleKind {
            self.kind
        }

        fn init(
            &mut self,
            _address: ModuleAddress,
            _bus: &mut dyn BusTransport,
        ) -> Result<(), InitError> {
            self.online = true;
            Ok(())
        }

        fn process(&mut self, _ctx: &mut MachineContext<'_>) {
            self.ticks += 1;
        }

        fn is_online(&self) -> bool {
            self.online
        }

        fn report_status(&self, _host: &mut dyn HostLink) -> Result<(), HostError> {
            Ok(())
        }
    }

    #[test]
    fn test_process_skips_offline_modules() {
        let mut enclosure = Counter::new(ModuleKind::Enclosure, true);
        let mut rotary = Counter::new(ModuleKind::Rotary, false);
        let mut rig = Rig::new();

        {
            let mut set: AddonSet<'_, 4> = AddonSet::new();
            set.add(&mut enclosure).ok().unwrap();
            set.add(&mut rotary).ok().unwrap();
            set.process_all(&mut rig.ctx());
            set.process_all(&mut rig.ctx());
        }

        assert_eq!(enclosure.ticks, 2);
        assert_eq!(rotary.ticks, 0);
    }

    #[test]
    fn test_find_by_kind() {
        let mut enclosure = Counter::new(ModuleKind::Enclosure, false);
        let mut set: AddonSet<'_, 2> = AddonSet::new();
        set.add(&mut enclosure).ok().unwrap();

        assert!(set.find(ModuleKind::Enclosure).is_some());
        assert!(set.find(ModuleKind::Purifier).is_none());
        assert!(!set.is_online(ModuleKind::Enclosure));

        let mut rig = Rig::new();
        let address = rig.address();
        set.find_mut(ModuleKind::Enclosure)
            .unwrap()
            .init(address, &mut rig.bus)
            .unwrap();
        assert!(set.is_online(ModuleKind::Enclosure));

        let mut host = MockHost::default();
        assert_eq!(
            set.find(ModuleKind::Enclosure).unwrap().report_status(&mut host),
            Ok(())
        );
    }

    #[test]
    fn test_full_set_returns_module() {
        let mut a = Counter::new(ModuleKind::Enclosure, true);
        let mut b = Counter::new(ModuleKind::Purifier, true);
        let mut set: AddonSet<'_, 1> = AddonSet::new();

        assert!(set.add(&mut a).is_ok());
        assert!(set.add(&mut b).is_err());
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_stop_state_query_answered_by_estop() {
        let mut rig = Rig::new();
        let mut stop = EmergencyStop::new(leak_detector(), EstopConfig::default());
        stop.init(rig.address(), &mut rig.bus).unwrap();
        let mut enclosure = Counter::new(ModuleKind::Enclosure, true);

        let mut set: AddonSet<'_, 2> = AddonSet::new();
        set.add(&mut enclosure).ok().unwrap();
        set.add(&mut stop).ok().unwrap();

        let query = HostEvent::new(EVENT_ADDON_REQ, OPC_GET_ADDON_STOP, &[]).unwrap();
        let mut host = MockHost::default();
        assert_eq!(set.handle_host_request(&query, &mut host), Ok(true));

        assert_eq!(host.sent.len(), 1);
        assert_eq!(host.sent[0].id, EVENT_ADDON_ACK);
        assert_eq!(&host.sent[0].data[..], &[0]);
    }

    #[test]
    fn test_unknown_request_ignored() {
        let mut stop = EmergencyStop::new(leak_detector(), EstopConfig::default());
        let mut set: AddonSet<'_, 1> = AddonSet::new();
        set.add(&mut stop).ok().unwrap();
        let mut host = MockHost::default();

        let other_op = HostEvent::new(EVENT_ADDON_REQ, 0x01, &[]).unwrap();
        assert_eq!(set.handle_host_request(&other_op, &mut host), Ok(false));

        let ack = HostEvent::addon_ack(OPC_GET_ADDON_STOP, &[0]).unwrap();
        assert_eq!(set.handle_host_request(&ack, &mut host), Ok(false));
        assert!(host.sent.is_empty());
    }

    #[test]
    fn test_query_without_estop_ignored() {
        let mut enclosure = Counter::new(ModuleKind::Enclosure, true);
        let mut set: AddonSet<'_, 1> = AddonSet::new();
        set.add(&mut enclosure).ok().unwrap();
        let mut host = MockHost::default();

        let query = HostEvent::new(EVENT_ADDON_REQ, OPC_GET_ADDON_STOP, &[]).unwrap();
        assert_eq!(set.handle_host_request(&query, &mut host), Ok(false));
    }

    #[test]
    fn test_failed_send_is_reported() {
        let mut stop = EmergencyStop::new(leak_detector(), EstopConfig::default());
        let mut set: AddonSet<'_, 1> = AddonSet::new();
        set.add(&mut stop).ok().unwrap();
        let mut host = MockHost {
            fail: true,
            ..MockHost::default()
        };

        let query = HostEvent::new(EVENT_ADDON_REQ, OPC_GET_ADDON_STOP, &[]).unwrap();
        assert_eq!(
            set.handle_host_request(&query, &mut host),
            Err(HostError::Io)
        );
    }
}
