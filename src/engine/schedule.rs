/// Handle for one requested recompute pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// Keeps at most one recompute pass pending. A new request supersedes the
/// previous one instead of queueing behind it.
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    generation: u64,
    pending: Option<RefreshTicket>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) -> RefreshTicket {
        if let Some(superseded) = self.pending.take() {
            tracing::trace!(generation = superseded.0, "refresh superseded");
        }
        self.generation = self.generation.wrapping_add(1);
        let ticket = RefreshTicket(self.generation);
        self.pending = Some(ticket);
        ticket
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Claims the pending pass, if any.
    pub fn take(&mut self) -> Option<RefreshTicket> {
        self.pending.take()
    }
}
