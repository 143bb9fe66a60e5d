use chime_domain::ID;
use dashmap::DashSet;
use std::sync::Arc;

/// Ids of the reminders that currently have a delivery running.
///
/// A reminder is claimed before the worker picks it up and released when the
/// returned `InFlightClaim` is dropped, so overlapping scheduler cycles and
/// manual triggers never deliver the same reminder concurrently.
#[derive(Debug, Default)]
pub struct InFlightReminders {
    ids: DashSet<ID>,
}

impl InFlightReminders {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the reminder is already being delivered
    pub fn claim(self: &Arc<Self>, reminder_id: &ID) -> Option<InFlightClaim> {
        if !self.ids.insert(reminder_id.clone()) {
            return None;
        }
        Some(InFlightClaim {
            owner: self.clone(),
            reminder_id: reminder_id.clone(),
        })
    }

    pub fn contains(&self, reminder_id: &ID) -> bool {
        self.ids.contains(reminder_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug)]
pub struct InFlightClaim {
    owner: Arc<InFlightReminders>,
    reminder_id: ID,
}

impl InFlightClaim {
    pub fn reminder_id(&self) -> &ID {
        &self.reminder_id
    }
}

impl Drop for InFlightClaim {
    fn drop(&mut self) {
        self.owner.ids.remove(&self.reminder_id);
    }
}
