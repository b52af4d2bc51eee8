// Configuration endpoints
//
// Every configurable module answers action 0 (get) and action 1 (set) with
// a free-form JSON document whose shape depends on the module and firmware.
// Settings are therefore passed through as `serde_json::Value`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{M7350Client, into_payload};
use crate::codes::{
    ApBridgeAction, ConfigAction, Module, PortTriggeringAction, TimeAction, VirtualServerAction,
};
use crate::error::Error;

/// Generate a getter, and optionally a setter, for a module's config pair.
macro_rules! config_endpoints {
    ($( $(#[$doc:meta])* $module:ident => $get:ident $(, $set:ident)?; )*) => {
        impl M7350Client {
            $(
                $(#[$doc])*
                pub async fn $get(&self) -> Result<Value, Error> {
                    self.get_config(Module::$module).await
                }

                $(
                    pub async fn $set(&self, config: Value) -> Result<(), Error> {
                        self.set_config(Module::$module, config).await
                    }
                )?
            )*
        }
    };
}

config_endpoints! {
    /// Web UI language and feature flags.
    WebServer => web_server_info;
    /// Network, battery and traffic overview.
    Status => status;
    Wan => wan_settings, set_wan_settings;
    SimLock => sim_lock_settings;
    Wps => wps_settings, set_wps_settings;
    PowerSave => power_save_settings, set_power_save_settings;
    FlowStat => flow_stat_settings, set_flow_stat_settings;
    /// Clients currently attached to the hotspot.
    ConnectedDevices => connected_devices;
    MacFilters => mac_filters, set_mac_filters;
    Lan => lan_settings, set_lan_settings;
    Update => firmware_update_settings;
    StorageShare => storage_share_settings, set_storage_share_settings;
    Time => time_settings, set_time_settings;
    Voice => voice_settings;
    Upnp => upnp_settings, set_upnp_settings;
    Dmz => dmz_settings, set_dmz_settings;
    Alg => alg_settings, set_alg_settings;
    VirtualServer => virtual_server_settings, set_virtual_server_settings;
    PortTrigger => port_triggering_settings, set_port_triggering_settings;
    Wlan => wlan_settings, set_wlan_settings;
    ApBridge => ap_bridge_settings, set_ap_bridge_settings;
}

impl M7350Client {
    /// Read a module's configuration document.
    pub async fn get_config(&self, module: Module) -> Result<Value, Error> {
        debug!(module = module.as_str(), "reading config");
        self.request((module, ConfigAction::Get)).await
    }

    /// Write a module's configuration document.
    ///
    /// `config` must be a JSON object; its members are merged into the
    /// request next to `module`, `action` and `token`.
    pub async fn set_config(&self, module: Module, config: Value) -> Result<(), Error> {
        let payload = into_payload(config)?;
        debug!(module = module.as_str(), keys = payload.len(), "writing config");
        self.execute((module, ConfigAction::Set), payload).await?;
        Ok(())
    }

    // ── Module-specific actions ──────────────────────────────────────

    /// Scan for access points the bridge can join.
    pub async fn scan_ap(&self) -> Result<Value, Error> {
        self.request(ApBridgeAction::ScanAp).await
    }

    pub async fn connect_ap(&self, target: Value) -> Result<(), Error> {
        self.execute(ApBridgeAction::ConnectAp, into_payload(target)?)
            .await?;
        Ok(())
    }

    pub async fn ap_connection_status(&self) -> Result<Value, Error> {
        self.request(ApBridgeAction::CheckConnectionStatus).await
    }

    pub async fn delete_port_trigger_entry(&self, entry: Value) -> Result<(), Error> {
        self.execute(PortTriggeringAction::DeleteEntry, into_payload(entry)?)
            .await?;
        Ok(())
    }

    pub async fn delete_virtual_server(&self, entry: Value) -> Result<(), Error> {
        self.execute(VirtualServerAction::DeleteVirtualServer, into_payload(entry)?)
            .await?;
        Ok(())
    }

    /// Current device clock.
    pub async fn query_time(&self) -> Result<Value, Error> {
        self.request_with(TimeAction::QueryTime, Map::new()).await
    }
}
