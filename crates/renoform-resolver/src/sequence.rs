/// A stamp identifying one resolve invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use]
pub struct Ticket(u64);

/// Hands out [`Ticket`]s so that a resolve result that arrives after a newer
/// resolve was started can be told apart and dropped.
#[derive(Debug, Default)]
pub struct ResolveSequence {
    latest: u64,
}

impl ResolveSequence {
    /// Issues a new ticket, superseding every ticket issued before it.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Passes `result` through if `ticket` is still the latest one.
    pub fn accept<T>(&self, ticket: Ticket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            tracing::debug!(?ticket, latest = self.latest, "Dropping a superseded resolve result");
            None
        }
    }
}
