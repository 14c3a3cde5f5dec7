//! Hotplug handling
//!
//! The HPD interrupt only records the new line level; the work is done
//! later in task context, either by polling [`SdeHdmi::process_hotplug`] or
//! by a task looping on [`SdeHdmi::hotplug_work`].

use embassy_sync::blocking_mutex::raw::RawMutex;

use sde_hdmi_core::traits::HdmiController;

use crate::display::SdeHdmi;

/// HPD level change captured in interrupt context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HpdEvent {
    /// HPD line is asserted
    pub asserted: bool,
}

/// Connection change produced by processing a hotplug event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HotplugChange {
    /// A sink was attached
    Connected,
    /// The sink was removed
    Disconnected,
}

impl<C: HdmiController, M: RawMutex> SdeHdmi<C, M> {
    /// Interrupt entry: queue the new HPD level
    ///
    /// Only the latest level is kept if several arrive before the work runs.
    pub fn hpd_irq(&self, asserted: bool) {
        if self.non_pluggable {
            return;
        }
        self.hpd_work.signal(HpdEvent { asserted });
    }

    /// Check if a hotplug event is waiting to be processed
    pub fn hotplug_pending(&self) -> bool {
        self.hpd_work.signaled()
    }

    /// Process a pending hotplug event, if any
    pub fn process_hotplug(&self) -> Option<HotplugChange> {
        let event = self.hpd_work.try_take()?;
        self.apply_hpd(event)
    }

    /// Wait for the next hotplug event and process it
    pub async fn hotplug_work(&self) -> Option<HotplugChange> {
        let event = self.hpd_work.wait().await;
        self.apply_hpd(event)
    }

    fn apply_hpd(&self, event: HpdEvent) -> Option<HotplugChange> {
        self.with_inner(|inner| {
            if self.non_pluggable || !inner.state.is_device_ready() {
                return None;
            }
            if inner.connected == event.asserted {
                return None;
            }

            inner.connected = event.asserted;
            if event.asserted {
                info!("{}: sink connected", self.name.as_str());
                Some(HotplugChange::Connected)
            } else {
                inner.drop_sink();
                info!("{}: sink disconnected", self.name.as_str());
                Some(HotplugChange::Disconnected)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{monitor, panel, MockController};
    use embassy_futures::block_on;
    use sde_hdmi_core::connector::{Connector, ConnectorStatus, ConnectorType};
    use sde_hdmi_core::traits::DisplayBackend;

    fn pluggable() -> SdeHdmi<MockController> {
        let display = SdeHdmi::new(&monitor(), MockController::with_sink()).unwrap();
        display.dev_init().unwrap();
        display
    }

    #[test]
    fn test_unplug_and_replug() {
        let display = pluggable();
        let connector = Connector::new(1, ConnectorType::HdmiA);
        assert!(display.is_connected());

        display.hpd_irq(false);
        assert!(display.hotplug_pending());
        assert_eq!(display.process_hotplug(), Some(HotplugChange::Disconnected));
        assert_eq!(display.detect(&connector, false), ConnectorStatus::Disconnected);
        assert_eq!(display.process_hotplug(), None);

        display.hpd_irq(true);
        assert_eq!(display.process_hotplug(), Some(HotplugChange::Connected));
        assert_eq!(display.detect(&connector, false), ConnectorStatus::Connected);
    }

    #[test]
    fn test_latest_level_wins() {
        let display = pluggable();
        display.hpd_irq(false);
        display.hpd_irq(true);
        assert_eq!(display.process_hotplug(), None);
        assert!(display.is_connected());
    }

    #[test]
    fn test_unplug_drops_sink_size() {
        let display = pluggable();
        let mut connector = Connector::new(1, ConnectorType::HdmiA);
        assert_eq!(display.get_modes(&mut connector), 2);
        assert_eq!(display.get_info().unwrap().width_mm, 520);

        display.hpd_irq(false);
        display.process_hotplug();
        let info = display.get_info().unwrap();
        assert_eq!((info.width_mm, info.height_mm), (0, 0));
        assert!(!display.sink_is_hdmi());
    }

    #[test]
    fn test_reinit_discards_queued_level() {
        let display = pluggable();
        display.hpd_irq(false);
        display.dev_deinit().unwrap();
        assert!(!display.hotplug_pending());

        display.dev_init().unwrap();
        assert_eq!(display.process_hotplug(), None);
        assert!(display.is_connected());
    }

    #[test]
    fn test_level_before_init_discarded() {
        let display = SdeHdmi::<MockController>::new(&monitor(), MockController::with_sink())
            .unwrap();
        display.hpd_irq(false);
        display.dev_init().unwrap();
        assert!(!display.hotplug_pending());
        assert!(display.is_connected());
    }

    #[test]
    fn test_async_worker() {
        let display = pluggable();
        display.hpd_irq(false);
        assert_eq!(
            block_on(display.hotplug_work()),
            Some(HotplugChange::Disconnected)
        );
    }

    #[test]
    fn test_non_pluggable_ignores_events() {
        let display: SdeHdmi<MockController> =
            SdeHdmi::new(&panel(), MockController::default()).unwrap();
        display.dev_init().unwrap();
        display.hpd_irq(false);
        assert!(!display.hotplug_pending());
        assert_eq!(display.process_hotplug(), None);
        assert!(display.is_connected());
    }

    #[test]
    fn test_events_before_init_ignored() {
        let display = SdeHdmi::<MockController>::new(&monitor(), MockController::with_sink())
            .unwrap();
        display.hpd_irq(true);
        assert_eq!(display.process_hotplug(), None);
        assert!(!display.is_connected());
    }
}
