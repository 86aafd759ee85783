//! Everything the user sees, as one value redrawn after each change.
use std::fmt;

use crate::renderer::{RateTable, PLACEHOLDER};
use crate::status::{Controls, StatusIndicator};

/// Display state of the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub status: StatusIndicator,
    pub controls: Controls,
    /// Identity assigned by the server, present only while connected.
    pub observer_id: Option<String>,
    pub table: RateTable,
}

impl View {
    pub fn on_open(&mut self) {
        self.status.set_connected(true);
        self.controls.set_connected(true);
    }

    pub fn on_close(&mut self) {
        self.status.set_connected(false);
        self.controls.set_connected(false);
        self.observer_id = None;
    }

    pub fn on_error(&mut self) {
        self.status.set_connected(false);
    }
}

fn control(label: &str, enabled: bool) -> String {
    if enabled {
        label.to_string()
    } else {
        format!("[{label}]")
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status.status();
        writeln!(f, "Статус: {} ({})", status, status.style_class())?;
        writeln!(
            f,
            "Команды: {} {}",
            control("connect", self.controls.connect_enabled),
            control("disconnect", self.controls.disconnect_enabled)
        )?;
        writeln!(
            f,
            "ID наблюдателя: {}",
            self.observer_id.as_deref().unwrap_or(PLACEHOLDER)
        )?;
        writeln!(f, "Последнее обновление: {}", self.table.last_update())?;
        write!(f, "{}", self.table)
    }
}
