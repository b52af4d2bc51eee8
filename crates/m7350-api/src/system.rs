// Power, factory reset, and system log endpoints

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::client::M7350Client;
use crate::codes::{LogAction, RebootAction, RestoreDefaultsAction};
use crate::error::Error;

impl M7350Client {
    /// Reboot the device. The session does not survive it.
    pub async fn reboot(&self) -> Result<(), Error> {
        info!("rebooting device");
        self.execute(RebootAction::Reboot, Map::new()).await?;
        self.set_session(None);
        Ok(())
    }

    /// Power the device off.
    pub async fn shutdown(&self) -> Result<(), Error> {
        info!("shutting device down");
        self.execute(RebootAction::Shutdown, Map::new()).await?;
        self.set_session(None);
        Ok(())
    }

    /// Reset every setting to factory defaults. The device reboots afterwards.
    pub async fn restore_defaults(&self) -> Result<(), Error> {
        info!("restoring factory defaults");
        self.execute(RestoreDefaultsAction::Restore, Map::new())
            .await?;
        self.set_session(None);
        Ok(())
    }

    /// Every entry of the system log, all types and levels.
    pub async fn read_log(&self) -> Result<Vec<Value>, Error> {
        let mut payload = Map::new();
        payload.insert("type".into(), Value::from(0));
        payload.insert("level".into(), Value::from(0));

        let entries = self
            .fetch_paged(LogAction::GetLog, payload, "logList")
            .await?;
        debug!(count = entries.len(), "system log read");
        Ok(entries)
    }

    pub async fn clear_log(&self) -> Result<(), Error> {
        self.execute(LogAction::ClearLog, Map::new()).await?;
        Ok(())
    }
}
