/// Lifecycle of one connection to the SMSC. `Open` means the TCP
/// socket is up but the bind has not been accepted yet; every terminal
/// transition goes back to `Closed` and hands control to the
/// reconnect supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Open,
    BoundTrx,
}

impl ConnectionState {
    /// Whether submit_sm, submit_multi, query_sm and enquire_link may
    /// be sent in this state.
    pub fn can_transmit(&self) -> bool {
        matches!(self, ConnectionState::BoundTrx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_bound_state_may_transmit() {
        assert!(!ConnectionState::Closed.can_transmit());
        assert!(!ConnectionState::Open.can_transmit());
        assert!(ConnectionState::BoundTrx.can_transmit());
    }
}
