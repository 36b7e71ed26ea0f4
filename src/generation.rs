/// Invalidation counter for one asynchronous channel (uploads, background
/// loads, overlay loads). Every start or cancel moves it forward; a
/// completion is applied only if its ticket is still the newest.
#[derive(Debug, Default, Clone)]
pub struct Generation(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Generation {
    pub fn begin(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }

    pub fn cancel(&mut self) {
        self.0 += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0 == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_start_supersedes_older() {
        let mut g = Generation::default();
        let first = g.begin();
        let second = g.begin();
        assert!(!g.is_current(first));
        assert!(g.is_current(second));
    }

    #[test]
    fn cancel_invalidates_in_flight_ticket() {
        let mut g = Generation::default();
        let t = g.begin();
        g.cancel();
        assert!(!g.is_current(t));
    }
}
