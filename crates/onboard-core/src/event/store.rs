use chrono::Utc;

use super::{WizardEvent, WizardEventKind};

/// Log de eventos de una sesión. `seq` empieza en 0 y es contiguo.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<WizardEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_kind(&mut self, kind: WizardEventKind) -> &WizardEvent {
        let seq = self.events.len() as u64;
        self.events.push(WizardEvent { seq,
                                       kind,
                                       ts: Utc::now() });
        &self.events[self.events.len() - 1]
    }

    pub fn list(&self) -> &[WizardEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&WizardEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &WizardEventKind> {
        self.events.iter().map(|e| &e.kind)
    }
}
