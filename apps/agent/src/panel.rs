use std::fmt;

use thiserror::Error;

/// Extension points a host agent desktop exposes for plugin content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelSlot {
    /// Main agent desktop side panel.
    AgentDesktopPanel,
    /// Tabs shown on the active task canvas.
    TaskCanvasTabs,
}

impl fmt::Display for PanelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PanelSlot::AgentDesktopPanel => "agent-desktop-panel",
            PanelSlot::TaskCanvasTabs => "task-canvas-tabs",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSpec {
    pub key: String,
    pub sort_order: i32,
    pub tab_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("panel `{key}` already registered in {slot}")]
    Duplicate { slot: PanelSlot, key: String },
}

/// Capability the host framework adapter implements to accept plugin panels.
pub trait PanelHost {
    fn register_panel(&mut self, slot: PanelSlot, panel: PanelSpec) -> Result<(), PanelError>;
}

pub const DISPOSITION_PANEL_KEY: &str = "call-disposition-panel";
pub const DISPOSITION_TAB_LABEL: &str = "Disposition";

/// Registers the disposition panel as a task-canvas tab.
pub fn register_disposition_panel(host: &mut dyn PanelHost) -> Result<(), PanelError> {
    host.register_panel(
        PanelSlot::TaskCanvasTabs,
        PanelSpec {
            key: DISPOSITION_PANEL_KEY.into(),
            sort_order: 1,
            tab_label: Some(DISPOSITION_TAB_LABEL.into()),
        },
    )?;
    tracing::info!(
        slot = %PanelSlot::TaskCanvasTabs,
        key = DISPOSITION_PANEL_KEY,
        "disposition panel registered"
    );
    Ok(())
}

/// Host adapter that keeps registrations in order; used by the CLI host.
#[derive(Debug, Default)]
pub struct PanelRegistry {
    panels: Vec<(PanelSlot, PanelSpec)>,
}

impl PanelRegistry {
    pub fn panels(&self) -> &[(PanelSlot, PanelSpec)] {
        &self.panels
    }

    /// Panels in `slot`, ordered by sort order.
    pub fn in_slot(&self, slot: PanelSlot) -> Vec<&PanelSpec> {
        let mut specs: Vec<_> = self
            .panels
            .iter()
            .filter(|(s, _)| *s == slot)
            .map(|(_, spec)| spec)
            .collect();
        specs.sort_by_key(|spec| spec.sort_order);
        specs
    }
}

impl PanelHost for PanelRegistry {
    fn register_panel(&mut self, slot: PanelSlot, panel: PanelSpec) -> Result<(), PanelError> {
        if self
            .panels
            .iter()
            .any(|(s, existing)| *s == slot && existing.key == panel.key)
        {
            return Err(PanelError::Duplicate {
                slot,
                key: panel.key,
            });
        }
        self.panels.push((slot, panel));
        Ok(())
    }
}
